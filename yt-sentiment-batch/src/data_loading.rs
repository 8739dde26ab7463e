use {
    std::{fs::File, path::Path},
    anyhow::{Context, Result},
    indicatif::ProgressBar,
    serde::Deserialize,
    yt_sentiment_core::entity::Comment,
};

#[derive(Deserialize, Debug)]
pub struct RawDataEntry {
    text: String,
}

/// Reads the `text` column of a comments CSV. Other columns are ignored.
pub fn load_comments(path: &Path) -> Result<Vec<Comment>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open comments file {}", path.display()))?;

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .clone();
    let records: Vec<_> = reader.records().collect();

    let pb = ProgressBar::new(records.len() as u64);
    let mut comments = Vec::with_capacity(records.len());

    for (line, record) in records.into_iter().enumerate() {
        let entry: RawDataEntry = record
            .and_then(|record| record.deserialize(Some(&headers)))
            .with_context(|| format!("failed to parse record {} of {}", line + 1, path.display()))?;

        comments.push(Comment::new(entry.text));
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(comments)
}
