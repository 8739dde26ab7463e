use {
    std::sync::Arc,
    anyhow::{anyhow, Result},
    tracing::warn,
    crate::entity::{SentimentLabel, ClassificationOutcome},
};

pub const FALLBACK_SCORE: f64 = 0.5;

/// Top prediction of a classification model, in the model's own label vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

pub trait Classifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub score: f64,
    pub outcome: ClassificationOutcome,
}

/// Total over every input: blank text and model failures both resolve to neutral.
#[derive(Clone)]
pub struct SentimentClassifier {
    classifier: Arc<dyn Classifier>,
}

impl Classification {
    pub fn empty_input() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: FALLBACK_SCORE,
            outcome: ClassificationOutcome::EmptyInput,
        }
    }

    pub fn fallback(cause: String) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: FALLBACK_SCORE,
            outcome: ClassificationOutcome::Fallback { cause },
        }
    }
}

impl SentimentClassifier {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::empty_input();
        }

        match self.classifier.predict(text).and_then(check_score) {
            Ok(prediction) => Classification {
                label: SentimentLabel::from_model_label(&prediction.label),
                score: prediction.score,
                outcome: ClassificationOutcome::Predicted,
            },
            Err(err) => {
                warn!("sentiment classification failed, using neutral fallback: {:#}", err);
                Classification::fallback(format!("{:#}", err))
            }
        }
    }
}

fn check_score(prediction: Prediction) -> Result<Prediction> {
    if prediction.score.is_finite() && (0.0..=1.0).contains(&prediction.score) {
        Ok(prediction)
    } else {
        Err(anyhow!("classifier returned score {} outside of [0, 1] for label {}", prediction.score, prediction.label))
    }
}
