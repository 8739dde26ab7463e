use {
    std::fmt,
    typed_builder::TypedBuilder,
    serde::{Serialize, Deserialize},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationOutcome {
    Normalized,
    Fallback { cause: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedComment {
    raw_text: String,
    cleaned_text: String,
    normalization: NormalizationOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Predicted,
    EmptyInput,
    Fallback { cause: String },
}

#[derive(TypedBuilder, Serialize, Debug, Clone, PartialEq)]
pub struct LabeledComment {
    raw_text: String,
    cleaned_text: String,
    sentiment_label: SentimentLabel,
    sentiment_score: f64,
    #[serde(skip)]
    classification: ClassificationOutcome,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Maps the classifier's native label vocabulary. Unknown labels are treated as neutral.
    pub fn from_model_label(raw_label: &str) -> Self {
        match raw_label {
            "LABEL_0" => SentimentLabel::Positive,
            "LABEL_1" => SentimentLabel::Neutral,
            "LABEL_2" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Comment {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn cleaned(self, cleaned_text: String, normalization: NormalizationOutcome) -> CleanedComment {
        CleanedComment {
            raw_text: self.raw_text,
            cleaned_text,
            normalization,
        }
    }
}

impl CleanedComment {
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn normalization(&self) -> &NormalizationOutcome {
        &self.normalization
    }

    pub fn labeled(self, sentiment_label: SentimentLabel, sentiment_score: f64, classification: ClassificationOutcome) -> LabeledComment {
        LabeledComment::builder()
            .raw_text(self.raw_text)
            .cleaned_text(self.cleaned_text)
            .sentiment_label(sentiment_label)
            .sentiment_score(sentiment_score)
            .classification(classification)
            .build()
    }
}

impl LabeledComment {
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn sentiment_label(&self) -> SentimentLabel {
        self.sentiment_label
    }

    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn classification(&self) -> &ClassificationOutcome {
        &self.classification
    }
}
