use {
    std::{path::{Path, PathBuf}, sync::Mutex},
    anyhow::{anyhow, Context, Result},
    reqwest::StatusCode,
    tokio::fs,
    tracing::info,
    rust_bert::{
        pipelines::{
            common::ModelType,
            sequence_classification::{SequenceClassificationConfig, SequenceClassificationModel},
        },
        resources::LocalResource,
    },
    crate::{
        config::ClassifierConfig,
        sentiment::{Classifier, Prediction},
    },
};

/// BERT sequence classifier. The tensor runtime is not `Sync`, so calls are serialised.
pub struct BertClassifier {
    model: Mutex<SequenceClassificationModel>,
}

impl BertClassifier {
    pub async fn load(config: &ClassifierConfig) -> Result<Self> {
        let client = reqwest::Client::new();
        let token = config.token();
        let cache_dir = config.cache_dir();

        fs::create_dir_all(&cache_dir).await
            .with_context(|| format!("failed to create model cache dir {}", cache_dir.display()))?;

        let model_path = fetch_resource(&client, token.as_deref(), &config.model(), &cache_dir.join("rust_model.ot")).await?;
        let config_path = fetch_resource(&client, token.as_deref(), &config.config(), &cache_dir.join("config.json")).await?;
        let vocab_path = fetch_resource(&client, token.as_deref(), &config.vocab(), &cache_dir.join("vocab.txt")).await?;
        let lower_case = config.lower_case();

        info!("loading sentiment model from {}", model_path.display());

        let model = tokio::task::spawn_blocking(move || {
            let sequence_config = SequenceClassificationConfig::new(
                ModelType::Bert,
                LocalResource { local_path: model_path },
                LocalResource { local_path: config_path },
                LocalResource { local_path: vocab_path },
                None,
                lower_case,
                None::<bool>,
                None::<bool>,
            );

            SequenceClassificationModel::new(sequence_config)
                .map_err(|err| anyhow!("failed to build sentiment model: {}", err))
        }).await??;

        info!("sentiment model loaded");

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl Classifier for BertClassifier {
    fn predict(&self, text: &str) -> Result<Prediction> {
        let model = self.model.lock().map_err(|_| anyhow!("sentiment model lock is poisoned"))?;

        model.predict(&[text])
            .into_iter()
            .next()
            .map(|label| Prediction {
                label: label.text,
                score: label.score,
            })
            .ok_or_else(|| anyhow!("sentiment model returned no prediction"))
    }
}

/// Local paths are used as is, remote files are downloaded once into `target`.
async fn fetch_resource(client: &reqwest::Client, token: Option<&str>, source: &str, target: &Path) -> Result<PathBuf> {
    if !is_remote(source) {
        return Ok(PathBuf::from(source));
    }

    if fs::metadata(target).await.is_ok() {
        return Ok(target.to_path_buf());
    }

    info!("downloading {} into {}", source, target.display());

    let mut request = client.get(source);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let res = request.send().await
        .with_context(|| format!("request failed for {}", source))?;

    if res.status() != StatusCode::OK {
        return Err(anyhow!("model repository returned status {} for {}", res.status().as_u16(), source));
    }

    let data = res.bytes().await
        .with_context(|| format!("failed to read body of {}", source))?;

    fs::write(target, &data).await
        .with_context(|| format!("failed to write {}", target.display()))?;

    Ok(target.to_path_buf())
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
