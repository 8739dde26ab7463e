use thiserror::Error;

/// Failures that abort a whole analysis request. Per-row problems never end up here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid video url: {0}")]
    InvalidVideoUrl(String),
    #[error("failed to fetch comments: {0:#}")]
    CommentSource(#[source] anyhow::Error),
    #[error("no comments found for video {0}")]
    NoComments(String),
    #[error("failed to initialize sentiment classifier: {0:#}")]
    ClassifierInit(#[source] anyhow::Error),
    #[error("failed to write report: {0:#}")]
    Report(#[source] anyhow::Error),
}
