mod data_loading;

use {
    std::{path::{Path, PathBuf}, sync::Arc},
    anyhow::{Context, Result},
    clap::Parser,
    tracing::info,
    yt_sentiment_core::{
        bert::BertClassifier,
        config::Config,
        logging::init_logging,
        normalizer::Normalizer,
        pipeline::{AnalysisResult, Pipeline},
        report::dataset::write_dataset_file,
        sentiment::SentimentClassifier,
    },
    crate::data_loading::load_comments,
};

/// Labels the sentiment of every comment in a CSV file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with a `text` column
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the labeled comments
    #[arg(short, long, default_value = "labeled_comments.csv")]
    output: PathBuf,

    /// Extra stopwords, comma separated
    #[arg(short, long)]
    stopwords: Option<String>,

    /// Config file to use instead of ./config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    init_logging(&config.logging);

    let model = BertClassifier::load(&config.classifier).await
        .context("failed to initialize sentiment classifier")?;
    let classifier = SentimentClassifier::new(Arc::new(model));

    let stopwords = config.pipeline.stopwords().with_custom(args.stopwords.as_deref().unwrap_or(""));
    let pipeline = Pipeline::new(Arc::new(Normalizer::new(stopwords)), classifier, &config.pipeline);

    let result = run(&pipeline, &args.input, &args.output).await?;
    for (label, count) in result.counts().iter() {
        info!("{}: {}", label, count);
    }

    Ok(())
}

async fn run(pipeline: &Pipeline, input: &Path, output: &Path) -> Result<AnalysisResult> {
    let comments = load_comments(input)?;
    info!("loaded {} comments from {}", comments.len(), input.display());

    let result = pipeline.analyze(comments).await;

    write_dataset_file(output, result.rows())?;
    info!(
        "wrote {} labeled comments to {} ({} classifier fallbacks, {} empty)",
        result.rows().len(),
        output.display(),
        result.fallbacks().classification,
        result.fallbacks().empty_inputs,
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde::Deserialize,
        yt_sentiment_core::{
            config::PipelineConfig,
            normalizer::Stopwords,
            sentiment::{Classifier, Prediction},
        },
    };

    struct LengthBased;

    impl Classifier for LengthBased {
        fn predict(&self, text: &str) -> Result<Prediction> {
            let label = if text.len() > 10 { "LABEL_0" } else { "LABEL_2" };
            Ok(Prediction { label: label.to_owned(), score: 0.66 })
        }
    }

    #[derive(Deserialize, Debug)]
    struct OutputRow {
        raw_text: String,
        cleaned_text: String,
        sentiment_label: String,
        sentiment_score: f64,
    }

    #[test]
    fn parses_cli_flags() {
        let args = Args::parse_from(["yt-sentiment-batch", "--input", "in.csv", "--stopwords", "a,b", "--config", "batch.toml"]);

        assert_eq!(args.input, PathBuf::from("in.csv"));
        assert_eq!(args.output, PathBuf::from("labeled_comments.csv"));
        assert_eq!(args.stopwords.as_deref(), Some("a,b"));
        assert_eq!(args.config, Some(PathBuf::from("batch.toml")));
    }

    #[tokio::test]
    async fn labeled_csv_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("comments.csv");
        let output = dir.path().join("labeled.csv");
        std::fs::write(&input, "id,text\n1,Absolutely wonderful tutorial!\n2,meh\n3,\n4,Thanks for sharing this 123\n").unwrap();

        let pipeline = Pipeline::new(
            Arc::new(Normalizer::new(Stopwords::default())),
            SentimentClassifier::new(Arc::new(LengthBased)),
            &PipelineConfig::default(),
        );

        let result = run(&pipeline, &input, &output).await.unwrap();
        assert_eq!(result.rows().len(), 4);

        let rows: Vec<OutputRow> = csv::Reader::from_path(&output).unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();

        let raw: Vec<_> = rows.iter().map(|row| row.raw_text.as_str()).collect();
        assert_eq!(raw, vec!["Absolutely wonderful tutorial!", "meh", "", "Thanks for sharing this 123"]);
        assert_eq!(rows[0].cleaned_text, "Absolutely wonderful tutorial");
        assert_eq!(rows[0].sentiment_label, "positive");
        assert_eq!(rows[1].sentiment_label, "negative");
        assert_eq!(rows[2].sentiment_label, "neutral");
        assert_eq!(rows[2].sentiment_score, 0.5);
        assert_eq!(rows[3].cleaned_text, "Thanks for sharing this");
    }
}
