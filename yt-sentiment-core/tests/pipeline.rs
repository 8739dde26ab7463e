use {
    std::sync::{Arc, atomic::{AtomicUsize, Ordering}},
    anyhow::{anyhow, Result},
    yt_sentiment_core::{
        config::PipelineConfig,
        entity::{Comment, SentimentLabel, ClassificationOutcome},
        normalizer::{Normalizer, Stopwords},
        pipeline::Pipeline,
        sentiment::{Classifier, Prediction, SentimentClassifier},
    },
};

/// Fails on texts containing "explode", otherwise positive for "love", negative for "terrible".
struct Collaborator {
    calls: AtomicUsize,
}

impl Collaborator {
    fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }
}

impl Classifier for Collaborator {
    fn predict(&self, text: &str) -> Result<Prediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("explode") {
            return Err(anyhow!("inference service unavailable"));
        }

        let label = if text.contains("love") {
            "LABEL_0"
        } else if text.contains("terrible") {
            "LABEL_2"
        } else {
            "LABEL_1"
        };
        Ok(Prediction { label: label.to_owned(), score: 0.93 })
    }
}

fn pipeline(stopwords: Stopwords, classifier: Arc<Collaborator>) -> Pipeline {
    Pipeline::new(
        Arc::new(Normalizer::new(stopwords)),
        SentimentClassifier::new(classifier),
        &PipelineConfig::default(),
    )
}

fn comments(texts: &[&str]) -> Vec<Comment> {
    texts.iter().map(|text| Comment::new(*text)).collect()
}

#[tokio::test]
async fn cleans_and_short_circuits_empty_rows() {
    let classifier = Collaborator::new();
    let pipeline = pipeline(Stopwords::default(), classifier.clone());

    let result = pipeline.analyze(comments(&["I love this!!! :) 123", "", "terrible... waste of money"])).await;

    let cleaned: Vec<_> = result.rows().iter().map(|row| row.cleaned_text()).collect();
    assert_eq!(cleaned, vec!["I love this", "", "terrible waste of money"]);

    let empty = &result.rows()[1];
    assert_eq!(empty.sentiment_label(), SentimentLabel::Neutral);
    assert_eq!(empty.sentiment_score(), 0.5);
    assert_eq!(empty.classification(), &ClassificationOutcome::EmptyInput);

    assert_eq!(result.rows()[0].sentiment_label(), SentimentLabel::Positive);
    assert_eq!(result.rows()[2].sentiment_label(), SentimentLabel::Negative);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn applies_stopwords() {
    let pipeline = pipeline(Stopwords::new(["the", "of"]), Collaborator::new());

    let result = pipeline.analyze(comments(&["one of the best videos"])).await;

    assert_eq!(result.rows()[0].cleaned_text(), "one best videos");
}

#[tokio::test]
async fn length_filter_drops_600_and_keeps_512_characters() {
    let pipeline = pipeline(Stopwords::default(), Collaborator::new());
    let too_long = "x".repeat(600);
    let at_limit = "y".repeat(512);

    let result = pipeline.analyze(comments(&[&too_long, &at_limit])).await;

    assert_eq!(result.rows().len(), 1);
    assert_eq!(result.rows()[0].cleaned_text(), at_limit);
    assert_eq!(result.counts().total(), 1);
}

#[tokio::test]
async fn failing_collaborator_only_affects_its_row() {
    let pipeline = pipeline(Stopwords::default(), Collaborator::new());

    let result = pipeline.analyze(comments(&["love the editing", "this will explode", "terrible sound", "fine"])).await;

    let labeled: Vec<_> = result.rows().iter()
        .map(|row| (row.sentiment_label(), row.sentiment_score()))
        .collect();
    assert_eq!(labeled, vec![
        (SentimentLabel::Positive, 0.93),
        (SentimentLabel::Neutral, 0.5),
        (SentimentLabel::Negative, 0.93),
        (SentimentLabel::Neutral, 0.93),
    ]);
    assert!(matches!(result.rows()[1].classification(), ClassificationOutcome::Fallback { cause } if cause.contains("unavailable")));
    assert_eq!(result.fallbacks().classification, 1);
    assert_eq!(result.counts().total(), 4);
}

#[tokio::test]
async fn counts_match_rows_and_corpora_split_by_label() {
    let pipeline = pipeline(Stopwords::default(), Collaborator::new());

    let result = pipeline.analyze(comments(&["love it", "so terrible", "love the music", "ok"])).await;

    assert_eq!(result.counts().get(SentimentLabel::Positive), 2);
    assert_eq!(result.counts().get(SentimentLabel::Negative), 1);
    assert_eq!(result.counts().get(SentimentLabel::Neutral), 1);
    assert_eq!(result.corpus(SentimentLabel::Positive), "love it love the music");
    assert_eq!(result.corpus(SentimentLabel::Negative), "so terrible");
}
