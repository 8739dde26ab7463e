use {
    tracing::Level,
    tracing_subscriber::{prelude::*, filter::filter_fn},
    crate::config::LoggingConfig,
};

const NOISY_TARGETS: &[&str] = &["hyper", "reqwest", "h2", "rustls", "cached_path"];

pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(config.level());

    if config.json() {
        builder.json()
            .finish()
            .with(filter_fn(is_interesting))
            .init();
    } else {
        builder.finish()
            .with(filter_fn(is_interesting))
            .init();
    }
}

fn is_interesting(metadata: &tracing::Metadata<'_>) -> bool {
    if NOISY_TARGETS.iter().any(|target| metadata.target().starts_with(target)) {
        metadata.level() <= &Level::WARN
    } else {
        true
    }
}
