use {
    std::collections::BTreeMap,
    crate::entity::{LabeledComment, SentimentLabel},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    counts: BTreeMap<SentimentLabel, usize>,
}

impl SentimentCounts {
    /// Labels that never occurred read as 0.
    pub fn get(&self, label: SentimentLabel) -> usize {
        self.counts.get(&label).cloned().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All three labels, including the ones with zero rows.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL.into_iter().map(move |label| (label, self.get(label)))
    }

    pub fn max(&self) -> usize {
        self.counts.values().cloned().max().unwrap_or(0)
    }
}

pub fn aggregate(rows: &[LabeledComment]) -> SentimentCounts {
    let mut counts = BTreeMap::new();

    for row in rows {
        *counts.entry(row.sentiment_label()).or_insert(0) += 1;
    }

    SentimentCounts {
        counts,
    }
}

/// Space-joined cleaned text of every row carrying `label`, in row order.
pub fn corpus(rows: &[LabeledComment], label: SentimentLabel) -> String {
    rows.iter()
        .filter(|row| row.sentiment_label() == label)
        .map(|row| row.cleaned_text())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn corpora(rows: &[LabeledComment]) -> BTreeMap<SentimentLabel, String> {
    SentimentLabel::ALL.into_iter()
        .map(|label| (label, corpus(rows, label)))
        .collect()
}
