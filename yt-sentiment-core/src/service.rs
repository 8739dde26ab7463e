use {
    std::{future::Future, path::Path, sync::Arc},
    tracing::info,
    crate::{
        comments::{CommentSource, VideoId},
        config::{Config, DEFAULT_QUESTION},
        error::PipelineError,
        insights::{generate_insights, TextGenerator},
        normalizer::{Normalizer, TextNormalizer},
        pipeline::{AnalysisResult, Pipeline},
        report::{top_words, Report},
        sentiment::SentimentClassifier,
    },
};

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub video_url: String,
    pub custom_stopwords: Option<String>,
    pub question: Option<String>,
}

impl AnalysisRequest {
    pub fn question(&self) -> &str {
        self.question.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_QUESTION)
    }

    pub fn normalizer(&self, config: &Config) -> Arc<dyn TextNormalizer> {
        let stopwords = config.pipeline.stopwords()
            .with_custom(self.custom_stopwords.as_deref().unwrap_or(""));
        Arc::new(Normalizer::new(stopwords))
    }
}

/// Fetch, label and report on one video. The classifier is only requested once there are comments to label.
pub async fn analyze_video<S, G, F, Fut>(
    source: &S,
    generator: Option<&G>,
    load_classifier: F,
    config: &Config,
    output_dir: &Path,
    request: &AnalysisRequest,
) -> Result<(AnalysisResult, Report), PipelineError>
where
    S: CommentSource,
    G: TextGenerator,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<SentimentClassifier>>,
{
    let video = VideoId::parse(&request.video_url)
        .map_err(|err| PipelineError::InvalidVideoUrl(format!("{:#}", err)))?;

    let comments = source.fetch(&video).await.map_err(PipelineError::CommentSource)?;
    if comments.is_empty() {
        return Err(PipelineError::NoComments(video.to_string()));
    }
    info!("analyzing {} comments for video {}", comments.len(), video);

    let classifier = load_classifier().await.map_err(PipelineError::ClassifierInit)?;
    let pipeline = Pipeline::new(request.normalizer(config), classifier, &config.pipeline);
    let result = pipeline.analyze(comments).await;

    let top_words = top_words(&result);
    let insights = generate_insights(generator, request.question(), &top_words, result.counts()).await;

    let report = Report::write(output_dir, video.as_str(), &result, &top_words, insights).await
        .map_err(PipelineError::Report)?;

    Ok((result, report))
}
