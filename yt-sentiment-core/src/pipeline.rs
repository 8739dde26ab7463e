use {
    std::{sync::Arc, collections::{BTreeMap, VecDeque}},
    tracing::{info, warn},
    crate::{
        aggregate::{aggregate, corpora, SentimentCounts},
        config::PipelineConfig,
        entity::{
            Comment,
            CleanedComment,
            LabeledComment,
            SentimentLabel,
            NormalizationOutcome,
            ClassificationOutcome,
        },
        length_filter::filter_by_length,
        normalizer::TextNormalizer,
        progress::Progress,
        sentiment::{Classification, SentimentClassifier},
    },
};

pub struct Pipeline {
    normalizer: Arc<dyn TextNormalizer>,
    classifier: SentimentClassifier,
    max_cleaned_chars: usize,
    concurrency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackSummary {
    pub normalization: usize,
    pub classification: usize,
    pub empty_inputs: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    rows: Vec<LabeledComment>,
    counts: SentimentCounts,
    corpora: BTreeMap<SentimentLabel, String>,
    fallbacks: FallbackSummary,
}

impl Pipeline {
    pub fn new(normalizer: Arc<dyn TextNormalizer>, classifier: SentimentClassifier, config: &PipelineConfig) -> Self {
        Self {
            normalizer,
            classifier,
            max_cleaned_chars: config.max_cleaned_chars(),
            concurrency: config.concurrency(),
        }
    }

    pub async fn analyze(&self, comments: Vec<Comment>) -> AnalysisResult {
        let total = comments.len();
        let cleaned = filter_by_length(self.clean(comments), self.max_cleaned_chars);
        if cleaned.len() < total {
            info!("dropped {} comments longer than {} characters", total - cleaned.len(), self.max_cleaned_chars);
        }

        let normalization_fallbacks = cleaned.iter()
            .filter(|row| matches!(row.normalization(), NormalizationOutcome::Fallback { .. }))
            .count();

        let rows = self.label(cleaned).await;
        AnalysisResult::new(rows, normalization_fallbacks)
    }

    pub fn clean(&self, comments: Vec<Comment>) -> Vec<CleanedComment> {
        comments.into_iter()
            .map(|comment| match self.normalizer.normalize(comment.raw_text()) {
                Ok(cleaned_text) => comment.cleaned(cleaned_text, NormalizationOutcome::Normalized),
                Err(err) => {
                    warn!("failed to normalize comment, using fallback text: {:#}", err);
                    let cleaned_text = self.normalizer.fallback(comment.raw_text());
                    comment.cleaned(cleaned_text, NormalizationOutcome::Fallback { cause: format!("{:#}", err) })
                }
            })
            .collect()
    }

    /// Classifies on blocking tasks with at most `concurrency` rows in flight. Output keeps input order.
    pub async fn label(&self, rows: Vec<CleanedComment>) -> Vec<LabeledComment> {
        let mut progress = Progress::new("classifying comments");
        let mut labeled = Vec::with_capacity(rows.len());
        let mut in_flight = VecDeque::new();

        for row in rows {
            let classifier = self.classifier.clone();
            let text = row.cleaned_text().to_owned();
            let handle = tokio::task::spawn_blocking(move || classifier.classify(&text));
            in_flight.push_back((row, handle));

            if in_flight.len() >= self.concurrency {
                if let Some((row, handle)) = in_flight.pop_front() {
                    labeled.push(finish_row(row, handle.await));
                    progress.update();
                }
            }
        }

        while let Some((row, handle)) = in_flight.pop_front() {
            labeled.push(finish_row(row, handle.await));
            progress.update();
        }

        progress.finish();
        labeled
    }
}

fn finish_row(row: CleanedComment, classification: Result<Classification, tokio::task::JoinError>) -> LabeledComment {
    let classification = classification.unwrap_or_else(|err| {
        warn!("classification task failed, using neutral fallback: {}", err);
        Classification::fallback(err.to_string())
    });

    row.labeled(classification.label, classification.score, classification.outcome)
}

impl AnalysisResult {
    pub fn new(rows: Vec<LabeledComment>, normalization_fallbacks: usize) -> Self {
        let counts = aggregate(&rows);
        let corpora = corpora(&rows);
        let fallbacks = FallbackSummary::of(&rows, normalization_fallbacks);

        if fallbacks.classification > 0 {
            warn!("{} of {} comments fell back to neutral after a classifier failure", fallbacks.classification, rows.len());
        }

        Self {
            rows,
            counts,
            corpora,
            fallbacks,
        }
    }

    pub fn rows(&self) -> &[LabeledComment] {
        &self.rows
    }

    pub fn counts(&self) -> &SentimentCounts {
        &self.counts
    }

    pub fn corpus(&self, label: SentimentLabel) -> &str {
        self.corpora.get(&label).map(|v| v.as_str()).unwrap_or("")
    }

    pub fn fallbacks(&self) -> &FallbackSummary {
        &self.fallbacks
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FallbackSummary {
    fn of(rows: &[LabeledComment], normalization: usize) -> Self {
        let mut summary = Self {
            normalization,
            ..Self::default()
        };

        for row in rows {
            match row.classification() {
                ClassificationOutcome::Predicted => {},
                ClassificationOutcome::EmptyInput => summary.empty_inputs += 1,
                ClassificationOutcome::Fallback { .. } => summary.classification += 1,
            }
        }

        summary
    }
}
