use {
    std::{fmt, future::Future},
    anyhow::{anyhow, Context, Result},
    reqwest::StatusCode,
    serde::Deserialize,
    tracing::{info, warn},
    url::Url,
    crate::{
        config::CommentsConfig,
        entity::Comment,
    },
};

const PAGE_SIZE: usize = 100;
const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

pub trait CommentSource: Send + Sync {
    /// Zero comments is a valid answer, not an error.
    fn fetch(&self, video: &VideoId) -> impl Future<Output = Result<Vec<Comment>>> + Send;
}

/// Top-level comments from the YouTube Data API, most relevant first.
pub struct YoutubeComments {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_comments: usize,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CommentThreadsPage {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Deserialize, Debug)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Deserialize, Debug)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: Option<String>,
    text_original: Option<String>,
}

impl VideoId {
    /// Accepts watch, short link, shorts, embed and live URLs, or a bare id.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(anyhow!("video url is empty"));
        }

        if is_video_id(input) {
            return Ok(Self(input.to_owned()));
        }

        let with_scheme = if input.contains("://") {
            input.to_owned()
        } else {
            format!("https://{}", input)
        };

        let url = Url::parse(&with_scheme)
            .with_context(|| format!("failed to parse video url {:?}", input))?;
        let host = url.host_str().unwrap_or("").trim_start_matches("www.").trim_start_matches("m.");
        let segments: Vec<&str> = url.path_segments()
            .map(|segments| segments.filter(|v| !v.is_empty()).collect())
            .unwrap_or_default();

        let candidate = if host == "youtu.be" {
            segments.first().map(|v| v.to_string())
        } else if host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtube-nocookie.com" {
            match segments.as_slice() {
                ["watch", ..] => url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                ["shorts" | "embed" | "live" | "v", id, ..] => Some(id.to_string()),
                _ => None,
            }
        } else {
            return Err(anyhow!("{:?} is not a youtube url", input));
        };

        match candidate {
            Some(id) if is_video_id(&id) => Ok(Self(id)),
            _ => Err(anyhow!("no video id found in {:?}", input)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_video_id(value: &str) -> bool {
    value.len() == VIDEO_ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl YoutubeComments {
    pub fn new(config: &CommentsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build http client for comments")?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key(),
            max_comments: config.max_comments(),
        })
    }

    async fn fetch_page(&self, api_key: &str, video: &VideoId, page_size: usize, page_token: Option<&str>) -> Result<Option<CommentThreadsPage>> {
        let page_size = page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video.as_str()),
            ("maxResults", page_size.as_str()),
            ("order", "relevance"),
            ("textFormat", "plainText"),
            ("key", api_key),
        ];
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        let res = self.client.get(format!("{}/commentThreads", self.endpoint))
            .query(&query)
            .send()
            .await
            .context("comment threads request failed")?;

        let status = res.status();
        if status == StatusCode::OK {
            return res.json().await
                .map(Some)
                .context("failed to decode comment threads response");
        }

        let body = res.text().await.unwrap_or_default();
        if status == StatusCode::FORBIDDEN && body.contains("commentsDisabled") {
            warn!("comments are disabled for video {}", video);
            return Ok(None);
        }

        Err(anyhow!("comment threads api returned status: {}, body: {}", status.as_u16(), body))
    }
}

impl CommentSource for YoutubeComments {
    async fn fetch(&self, video: &VideoId) -> Result<Vec<Comment>> {
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| anyhow!("youtube api key is not configured"))?;

        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < self.max_comments {
            let page_size = PAGE_SIZE.min(self.max_comments - comments.len());
            let page = match self.fetch_page(api_key, video, page_size, page_token.as_deref()).await? {
                Some(page) => page,
                None => break,
            };
            if page.items.is_empty() {
                break;
            }

            comments.extend(page.items.into_iter()
                .filter_map(|thread| {
                    let snippet = thread.snippet.top_level_comment.snippet;
                    snippet.text_display.or(snippet.text_original)
                })
                .map(Comment::new));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        comments.truncate(self.max_comments);
        info!("fetched {} comments for video {}", comments.len(), video);

        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{Arc, atomic::{AtomicUsize, Ordering}},
        axum::{Router, routing::get, extract::{Query, State}, http::StatusCode as HttpStatus, Json},
        serde_json::{json, Value},
        std::collections::HashMap,
    };

    #[test]
    fn parses_every_supported_url_form() {
        let expected = "dQw4w9WgXcQ";
        let inputs = [
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42s",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?feature=shared",
            "  https://youtu.be/dQw4w9WgXcQ  ",
        ];

        for input in inputs {
            assert_eq!(VideoId::parse(input).unwrap().as_str(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn rejects_urls_without_a_video() {
        for input in [
            "",
            "   ",
            "not a url",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?list=PL123",
            "https://youtu.be/short",
            "https://vimeo.com/123456789",
        ] {
            assert!(VideoId::parse(input).is_err(), "input {:?}", input);
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(endpoint: &str, max_comments: usize) -> CommentsConfig {
        toml::from_str(&format!("endpoint = {:?}\napi_key = \"test-key\"\nmax_comments = {}", endpoint, max_comments)).unwrap()
    }

    fn thread(text: &str) -> Value {
        json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": text } } } })
    }

    async fn paged(State(calls): State<Arc<AtomicUsize>>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(params.get("key").map(|v| v.as_str()), Some("test-key"));
        assert_eq!(params.get("order").map(|v| v.as_str()), Some("relevance"));

        let page: usize = params.get("pageToken").and_then(|v| v.parse().ok()).unwrap_or(0);
        let size: usize = params.get("maxResults").and_then(|v| v.parse().ok()).unwrap_or(0);
        let items: Vec<Value> = (0..size).map(|i| thread(&format!("comment {}", page * 100 + i))).collect();

        Json(json!({ "nextPageToken": (page + 1).to_string(), "items": items }))
    }

    #[tokio::test]
    async fn pages_until_the_cap() {
        let calls = Arc::new(AtomicUsize::new(0));
        let endpoint = serve(Router::new().route("/commentThreads", get(paged)).with_state(calls.clone())).await;
        let source = YoutubeComments::new(&config(&endpoint, 250)).unwrap();

        let comments = source.fetch(&VideoId::parse("dQw4w9WgXcQ").unwrap()).await.unwrap();

        assert_eq!(comments.len(), 250);
        assert_eq!(comments[0].raw_text(), "comment 0");
        assert_eq!(comments[249].raw_text(), "comment 249");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_page_stops_paging() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/commentThreads", get(|State(calls): State<Arc<AtomicUsize>>| async move {
                let page = calls.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "nextPageToken": (page + 1).to_string(), "items": [] }))
            }))
            .with_state(calls.clone());
        let source = YoutubeComments::new(&config(&serve(router).await, 1000)).unwrap();

        let comments = source.fetch(&VideoId::parse("dQw4w9WgXcQ").unwrap()).await.unwrap();

        assert!(comments.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_comments_are_an_empty_answer() {
        let router = Router::new().route("/commentThreads", get(|| async {
            (HttpStatus::FORBIDDEN, Json(json!({ "error": { "errors": [{ "reason": "commentsDisabled" }] } })))
        }));
        let source = YoutubeComments::new(&config(&serve(router).await, 1000)).unwrap();

        let comments = source.fetch(&VideoId::parse("dQw4w9WgXcQ").unwrap()).await.unwrap();

        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn api_errors_are_reported() {
        let router = Router::new().route("/commentThreads", get(|| async { (HttpStatus::NOT_FOUND, "videoNotFound") }));
        let source = YoutubeComments::new(&config(&serve(router).await, 1000)).unwrap();

        let err = source.fetch(&VideoId::parse("dQw4w9WgXcQ").unwrap()).await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let config: CommentsConfig = toml::from_str("endpoint = \"http://127.0.0.1:9\"").unwrap();
        let source = YoutubeComments { api_key: None, ..YoutubeComments::new(&config).unwrap() };

        let err = source.fetch(&VideoId::parse("dQw4w9WgXcQ").unwrap()).await.unwrap_err();

        assert!(err.to_string().contains("api key"));
    }
}
