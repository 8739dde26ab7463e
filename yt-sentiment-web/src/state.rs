use {
    std::{sync::Arc, path::PathBuf},
    anyhow::Result,
    tokio::sync::OnceCell,
    tracing::info,
    yt_sentiment_core::{
        bert::BertClassifier,
        comments::CommentSource,
        config::Config,
        insights::TextGenerator,
        sentiment::SentimentClassifier,
    },
};

pub struct AppState<S, G> {
    pub config: Arc<Config>,
    pub source: Arc<S>,
    pub generator: Option<Arc<G>>,
    classifier: Arc<OnceCell<SentimentClassifier>>,
}

impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: self.source.clone(),
            generator: self.generator.clone(),
            classifier: self.classifier.clone(),
        }
    }
}

impl<S: CommentSource, G: TextGenerator> AppState<S, G> {
    pub fn new(config: Config, source: S, generator: Option<G>) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            generator: generator.map(Arc::new),
            classifier: Arc::new(OnceCell::new()),
        }
    }

    /// State with a classifier that is already loaded.
    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = Arc::new(OnceCell::from(classifier));
        self
    }

    /// Loads the model on first use. A failed load is not cached, so the next request tries again.
    pub async fn classifier(&self) -> Result<SentimentClassifier> {
        self.classifier.get_or_try_init(|| async {
            info!("loading sentiment classifier");
            let model = BertClassifier::load(&self.config.classifier).await?;
            Ok::<_, anyhow::Error>(SentimentClassifier::new(Arc::new(model)))
        }).await.cloned()
    }

    pub fn static_dir(&self) -> PathBuf {
        self.config.server.static_dir()
    }
}
