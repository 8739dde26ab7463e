use {
    std::{collections::BTreeMap, future::Future, time::Instant},
    anyhow::{anyhow, Context, Result},
    reqwest::StatusCode,
    serde::{Serialize, Deserialize},
    tracing::{info, warn},
    crate::{
        aggregate::SentimentCounts,
        config::InsightsConfig,
        entity::SentimentLabel,
        prompts,
    },
};

pub const SUMMARY_FALLBACK: &str = "Executive summary: Analysis completed with limited processing capabilities.";

pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Gemini `generateContent` client.
pub struct Gemini {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insights {
    by_label: BTreeMap<SentimentLabel, String>,
    summary: Option<String>,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

impl Gemini {
    pub fn new(config: &InsightsConfig) -> Result<Self> {
        let api_key = config.api_key()
            .ok_or_else(|| anyhow!("gemini api key is not configured"))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build http client for gemini")?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key,
            model: config.model(),
        })
    }
}

impl TextGenerator for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let started_at = Instant::now();

        let res = self.client.post(format!("{}/models/{}:generateContent", self.endpoint, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest {
                contents: vec![Content { parts: vec![Part { text: prompt }] }],
            })
            .send()
            .await
            .context("generateContent request failed")?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("gemini returned status: {}, body: {}", status.as_u16(), body));
        }

        let response: GenerateContentResponse = res.json().await
            .context("failed to decode generateContent response")?;

        let text = response.candidates.into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect::<Vec<_>>().join(""))
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| anyhow!("gemini returned no text"))?;

        info!(
            "gemini call completed - duration={:.2}s, prompt_length={} chars, response_length={} chars",
            started_at.elapsed().as_secs_f32(),
            prompt.len(),
            text.len(),
        );

        Ok(text)
    }
}

impl Insights {
    pub fn for_label(&self, label: SentimentLabel) -> Option<&str> {
        self.by_label.get(&label).map(|v| v.as_str())
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

pub fn label_fallback(label: SentimentLabel) -> String {
    format!("Analysis for {} sentiment: Unable to generate detailed insights due to processing limitations.", label)
}

pub fn unavailable(label: SentimentLabel) -> String {
    format!("{} sentiment analysis: Processing error occurred.", label.title())
}

/// Asks for insights on every label that has words, then for an executive summary.
/// Without a generator every label gets the unavailable text.
pub async fn generate_insights<G: TextGenerator>(
    generator: Option<&G>,
    question: &str,
    top_words: &BTreeMap<SentimentLabel, Vec<(String, usize)>>,
    counts: &SentimentCounts,
) -> Insights {
    let generator = match generator {
        Some(generator) => generator,
        None => {
            warn!("no text generator configured, skipping insights");
            return Insights {
                by_label: SentimentLabel::ALL.into_iter().map(|label| (label, unavailable(label))).collect(),
                summary: Some(SUMMARY_FALLBACK.to_owned()),
            };
        }
    };

    let mut by_label = BTreeMap::new();
    for label in SentimentLabel::ALL {
        let words = match top_words.get(&label) {
            Some(words) if !words.is_empty() => words,
            _ => continue,
        };

        let text = match generator.generate(&prompts::label_insights(question, label, words)).await {
            Ok(text) => text,
            Err(err) => {
                warn!("failed to generate insights for {} sentiment: {:#}", label, err);
                label_fallback(label)
            }
        };
        by_label.insert(label, text);
    }

    let summary = if by_label.is_empty() {
        None
    } else {
        let counts: Vec<_> = counts.iter().collect();
        match generator.generate(&prompts::executive_summary(question, &counts)).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!("failed to generate executive summary: {:#}", err);
                Some(SUMMARY_FALLBACK.to_owned())
            }
        }
    };

    Insights {
        by_label,
        summary,
    }
}
