use {
    std::{io::Write, path::Path, fs::File},
    anyhow::{Context, Result},
    crate::entity::LabeledComment,
};

/// Writes `raw_text, cleaned_text, sentiment_label, sentiment_score` rows with a header.
pub fn write_dataset<W: Write>(writer: W, rows: &[LabeledComment]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row).context("failed to serialize labeled comment")?;
    }
    csv_writer.flush().context("failed to flush dataset")?;
    Ok(())
}

pub fn write_dataset_file(path: &Path, rows: &[LabeledComment]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create dataset file {}", path.display()))?;
    write_dataset(file, rows)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::entity::{Comment, SentimentLabel, NormalizationOutcome, ClassificationOutcome},
    };

    #[test]
    fn writes_header_and_quotes_fields() {
        let rows = vec![
            Comment::new("Love it, really!")
                .cleaned("Love it really".to_owned(), NormalizationOutcome::Normalized)
                .labeled(SentimentLabel::Positive, 0.75, ClassificationOutcome::Predicted),
            Comment::new("")
                .cleaned(String::new(), NormalizationOutcome::Normalized)
                .labeled(SentimentLabel::Neutral, 0.5, ClassificationOutcome::EmptyInput),
        ];

        let mut output = Vec::new();
        write_dataset(&mut output, &rows).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "raw_text,cleaned_text,sentiment_label,sentiment_score\n\"Love it, really!\",Love it really,positive,0.75\n,,neutral,0.5\n",
        );
    }
}
