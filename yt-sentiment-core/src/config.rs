use {
    std::{fs::read_to_string, path::{Path, PathBuf}, time::Duration, env},
    tracing::warn,
    anyhow::{Context, Result},
    serde::Deserialize,
    crate::normalizer::{Stopwords, DEFAULT_STOPWORDS},
};

pub const DEFAULT_QUESTION: &str = "Please provide insights based on the sentiment analysis:";

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    bind_address: Option<String>,
    static_dir: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CommentsConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    max_comments: Option<usize>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ClassifierConfig {
    model: Option<String>,
    config: Option<String>,
    vocab: Option<String>,
    cache_dir: Option<String>,
    lower_case: Option<bool>,
    token: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct InsightsConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PipelineConfig {
    max_cleaned_chars: Option<usize>,
    concurrency: Option<usize>,
    stopwords: Option<Vec<String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingConfig {
    level: Option<String>,
    #[serde(default)]
    json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            comments: CommentsConfig::default(),
            classifier: ClassifierConfig::default(),
            insights: InsightsConfig::default(),
            pipeline: PipelineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            static_dir: None,
        }
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            max_comments: None,
            timeout_secs: None,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            config: None,
            vocab: None,
            cache_dir: None,
            lower_case: None,
            token: None,
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: None,
            timeout_secs: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_cleaned_chars: None,
            concurrency: None,
            stopwords: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            json: false,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        read_to_string("./config.toml")
            .or_else(|_| read_to_string("/config/config.toml"))
            .map_err(|err| err.to_string())
            .and_then(|v| toml::from_str(&v).map_err(|err| err.to_string()))
            .unwrap_or_else(|err| {
                warn!("failed to read config: {}", err);
                Config::default()
            })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        self.bind_address.as_ref().cloned().unwrap_or("127.0.0.1:9000".to_owned())
    }

    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(self.static_dir.as_ref().cloned().unwrap_or("static".to_owned()))
    }
}

impl CommentsConfig {
    pub fn endpoint(&self) -> String {
        self.endpoint.as_ref().cloned().unwrap_or("https://www.googleapis.com/youtube/v3".to_owned())
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key.as_ref().cloned().or_else(|| env::var("YOUTUBE_API_KEY").ok())
    }

    pub fn max_comments(&self) -> usize {
        self.max_comments.unwrap_or(1000)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

impl ClassifierConfig {
    pub fn model(&self) -> String {
        self.model.as_ref().cloned().unwrap_or(huggingface_file("rust_model.ot"))
    }

    pub fn config(&self) -> String {
        self.config.as_ref().cloned().unwrap_or(huggingface_file("config.json"))
    }

    pub fn vocab(&self) -> String {
        self.vocab.as_ref().cloned().unwrap_or(huggingface_file("vocab.txt"))
    }

    pub fn cache_dir(&self) -> PathBuf {
        PathBuf::from(self.cache_dir.as_ref().cloned().unwrap_or("models".to_owned()))
    }

    pub fn lower_case(&self) -> bool {
        self.lower_case.unwrap_or(true)
    }

    pub fn token(&self) -> Option<String> {
        self.token.as_ref().cloned().or_else(|| env::var("HF_TOKEN").ok())
    }
}

impl InsightsConfig {
    pub fn endpoint(&self) -> String {
        self.endpoint.as_ref().cloned().unwrap_or("https://generativelanguage.googleapis.com/v1beta".to_owned())
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key.as_ref().cloned().or_else(|| env::var("GEMINI_API_KEY").ok())
    }

    pub fn model(&self) -> String {
        self.model.as_ref().cloned().unwrap_or("gemini-2.0-flash".to_owned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(120))
    }
}

impl PipelineConfig {
    pub fn max_cleaned_chars(&self) -> usize {
        self.max_cleaned_chars.unwrap_or(crate::length_filter::MAX_CLEANED_CHARS)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(4).max(1)
    }

    pub fn stopwords(&self) -> Stopwords {
        match &self.stopwords {
            Some(words) => Stopwords::new(words),
            None => Stopwords::new(DEFAULT_STOPWORDS),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> tracing::Level {
        self.level.as_ref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(tracing::Level::INFO)
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn huggingface_file(file: &str) -> String {
    format!("https://huggingface.co/mdhugol/indonesia-bert-sentiment-classification/resolve/main/{}", file)
}
