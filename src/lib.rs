//! Fetch-and-render pipeline for small public HTTP data sources.
//!
//! Each source is a [`pipeline::Source`]: a request descriptor, a declarative
//! field map and a human-readable layout. [`pipeline::DataFetchPipeline`] runs
//! build → send → decode → normalize once per source, and
//! [`formatters::render`] turns the outcome into text or JSON. Failures are
//! classified values, never panics.

pub mod config;
pub mod constants;
pub mod decode;
pub mod formatters;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod request;
pub mod sources;
pub mod transport;
pub mod weather_code;

pub use config::AppConfig;
pub use formatters::Style;
pub use models::{ErrorKind, FetchError, FetchResult, FieldValue, NormalizedRecord, Payload};
pub use pipeline::{DataFetchPipeline, Report, Source};
pub use transport::Transport;
