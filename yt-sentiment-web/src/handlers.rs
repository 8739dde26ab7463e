use {
    axum::{
        extract::{State, Form},
        http::StatusCode,
        response::Html,
    },
    serde::Deserialize,
    tracing::{info, warn, error},
    yt_sentiment_core::{
        comments::{CommentSource, VideoId},
        config::DEFAULT_QUESTION,
        error::PipelineError,
        insights::TextGenerator,
        service::{analyze_video, AnalysisRequest},
    },
    crate::{pages, state::AppState},
};

const MAX_ERROR_CHARS: usize = 200;

#[derive(Deserialize, Debug)]
pub struct AnalyzeForm {
    #[serde(default)]
    youtube_url: String,
    custom_stopwords: Option<String>,
    custom_question: Option<String>,
}

pub async fn index() -> Html<String> {
    Html(pages::index(DEFAULT_QUESTION))
}

pub async fn analyze<S, G>(State(state): State<AppState<S, G>>, Form(form): Form<AnalyzeForm>) -> (StatusCode, Html<String>)
where
    S: CommentSource + 'static,
    G: TextGenerator + 'static,
{
    let video_url = form.youtube_url.trim().to_owned();
    if video_url.is_empty() {
        return (StatusCode::BAD_REQUEST, Html(pages::error("Missing URL", "YouTube URL is required.")));
    }

    if let Err(err) = VideoId::parse(&video_url) {
        warn!("rejected video url {:?}: {:#}", video_url, err);
        return (StatusCode::BAD_REQUEST, Html(pages::error("Invalid URL", &format!("{:#}", err))));
    }

    let request = AnalysisRequest {
        video_url,
        custom_stopwords: form.custom_stopwords,
        question: form.custom_question,
    };

    let output_dir = state.static_dir();
    match analyze_video(state.source.as_ref(), state.generator.as_deref(), || state.classifier(), &state.config, &output_dir, &request).await {
        Ok((result, report)) => {
            info!("report {} ready with {} comments", report.id, result.rows().len());
            (StatusCode::OK, Html(pages::results(&report, result.fallbacks())))
        },
        Err(err) => error_response(err),
    }
}

fn error_response(err: PipelineError) -> (StatusCode, Html<String>) {
    match err {
        PipelineError::InvalidVideoUrl(message) => (StatusCode::BAD_REQUEST, Html(pages::error("Invalid URL", &message))),
        PipelineError::CommentSource(err) => {
            warn!("failed to fetch comments: {:#}", err);
            (StatusCode::BAD_REQUEST, Html(pages::no_data(&truncate(&format!("{:#}", err)))))
        },
        PipelineError::NoComments(video) => {
            info!("no comments found for video {}", video);
            (StatusCode::OK, Html(pages::no_comments()))
        },
        err @ (PipelineError::ClassifierInit(_) | PipelineError::Report(_)) => {
            error!("analysis failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::error("Processing Error", &truncate(&err.to_string()))))
        },
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}
