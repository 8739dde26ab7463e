pub mod chart;
pub mod dataset;
pub mod pdf;
pub mod wordcloud;

use {
    std::{collections::BTreeMap, path::{Path, PathBuf}},
    anyhow::{Context, Result},
    chrono::{DateTime, Utc},
    rand::{distributions::Alphanumeric, Rng},
    tokio::fs,
    tracing::info,
    crate::{
        aggregate::SentimentCounts,
        entity::SentimentLabel,
        insights::Insights,
        pipeline::AnalysisResult,
    },
    self::{
        dataset::write_dataset_file,
        pdf::{write_pdf, PdfContent},
        wordcloud::MAX_WORDS,
    },
};

pub const CHART_FILE: &str = "sentiment_distribution.svg";
pub const PDF_FILE: &str = "report.pdf";
pub const DATASET_FILE: &str = "comments.csv";

/// Artifacts of one analysis, stored under `<output dir>/<id>/`.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub video_id: String,
    pub counts: SentimentCounts,
    pub chart_file: String,
    pub word_cloud_files: BTreeMap<SentimentLabel, String>,
    pub insights: Insights,
    pub pdf_file: String,
    pub dataset_file: String,
    pub dir: PathBuf,
}

pub fn generate_report_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

pub fn word_cloud_file(label: SentimentLabel) -> String {
    format!("wordcloud_{}.svg", label)
}

/// Top words per label, for the clouds and the insight prompts. Labels with an empty corpus map to an empty list.
pub fn top_words(result: &AnalysisResult) -> BTreeMap<SentimentLabel, Vec<(String, usize)>> {
    SentimentLabel::ALL.into_iter()
        .map(|label| (label, wordcloud::top_words(result.corpus(label), MAX_WORDS)))
        .collect()
}

impl Report {
    pub async fn write(
        output_dir: &Path,
        video_id: &str,
        result: &AnalysisResult,
        top_words: &BTreeMap<SentimentLabel, Vec<(String, usize)>>,
        insights: Insights,
    ) -> Result<Self> {
        let id = generate_report_id();
        let created_at = Utc::now();
        let dir = output_dir.join(&id);

        fs::create_dir_all(&dir).await
            .with_context(|| format!("failed to create report dir {}", dir.display()))?;

        fs::write(dir.join(CHART_FILE), chart::render_svg(result.counts())).await
            .context("failed to write sentiment chart")?;

        let mut word_cloud_files = BTreeMap::new();
        for (label, words) in top_words {
            if let Some(svg) = wordcloud::render_svg(words, *label) {
                let file = word_cloud_file(*label);
                fs::write(dir.join(&file), svg).await
                    .with_context(|| format!("failed to write {} word cloud", label))?;
                word_cloud_files.insert(*label, file);
            }
        }

        let pdf_path = dir.join(PDF_FILE);
        let dataset_path = dir.join(DATASET_FILE);
        let created_at_text = created_at.format("%Y-%m-%d %H:%M UTC").to_string();
        let rows = result.rows().to_vec();
        let counts = result.counts().clone();
        let pdf_words = top_words.clone();
        let pdf_insights = insights.clone();
        let pdf_video_id = video_id.to_owned();

        tokio::task::spawn_blocking(move || -> Result<()> {
            write_pdf(&pdf_path, &PdfContent {
                video_id: &pdf_video_id,
                created_at: &created_at_text,
                counts: &counts,
                top_words: &pdf_words,
                insights: &pdf_insights,
            })?;
            write_dataset_file(&dataset_path, &rows)
        }).await.context("report writer task failed")??;

        info!("wrote report {} for video {} into {}", id, video_id, dir.display());

        Ok(Self {
            id,
            created_at,
            video_id: video_id.to_owned(),
            counts: result.counts().clone(),
            chart_file: CHART_FILE.to_owned(),
            word_cloud_files,
            insights,
            pdf_file: PDF_FILE.to_owned(),
            dataset_file: DATASET_FILE.to_owned(),
            dir,
        })
    }

    /// URL path of an artifact when the output dir is served under `prefix`.
    pub fn url(&self, prefix: &str, file: &str) -> String {
        format!("{}/{}/{}", prefix.trim_end_matches('/'), self.id, file)
    }
}

/// Escapes text for SVG and HTML output.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ids_are_sixteen_alphanumerics() {
        let id = generate_report_id();

        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, generate_report_id());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }
}
