mod handlers;
mod pages;
mod state;

use {
    axum::{Router, routing::{get, post}},
    tower_http::services::ServeDir,
    tracing::{info, warn},
    yt_sentiment_core::{
        comments::{CommentSource, YoutubeComments},
        config::Config,
        insights::{Gemini, TextGenerator},
        logging::init_logging,
    },
    crate::{
        handlers::{analyze, index},
        pages::STATIC_PREFIX,
        state::AppState,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    init_logging(&config.logging);

    let source = YoutubeComments::new(&config.comments)?;
    if config.comments.api_key().is_none() {
        warn!("youtube api key is not configured, every analysis will fail to fetch comments");
    }

    let generator = match Gemini::new(&config.insights) {
        Ok(generator) => Some(generator),
        Err(err) => {
            warn!("insights are disabled: {:#}", err);
            None
        }
    };

    let bind_address = config.server.bind_address();
    tokio::fs::create_dir_all(config.server.static_dir()).await?;

    let state = AppState::new(config, source, generator);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("listening on http://{}", bind_address);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router<S, G>(state: AppState<S, G>) -> Router
where
    S: CommentSource + 'static,
    G: TextGenerator + 'static,
{
    let static_dir = state.static_dir();

    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze::<S, G>))
        .nest_service(STATIC_PREFIX, ServeDir::new(static_dir))
        .with_state(state)
}
