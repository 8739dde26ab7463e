pub mod aggregate;
pub mod bert;
pub mod comments;
pub mod config;
pub mod entity;
pub mod error;
pub mod insights;
pub mod length_filter;
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod sentiment;
pub mod service;
