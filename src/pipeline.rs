use tracing::{info, instrument, warn};

use crate::decode::decode;
use crate::formatters::{render, Layout, Style};
use crate::models::{FetchResult, NormalizedRecord, Payload, SourceDescriptor};
use crate::normalize::{normalize, FieldMap};
use crate::request::build_request;
use crate::transport::Transport;

/// Everything needed to fetch, normalize and render one source
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub descriptor: SourceDescriptor,
    pub fields: FieldMap,
    pub layout: Layout,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: FetchResult<NormalizedRecord>,
    pub layout: Layout,
}

impl Report {
    pub fn render(&self, style: Style) -> String {
        render(&self.outcome, &self.layout, style)
    }
}

/// Linear fetch → decode → normalize pipeline.
///
/// A run short-circuits at the first failing stage; the failure is carried in
/// the returned [`Report`] rather than propagated.
#[derive(Debug, Clone)]
pub struct DataFetchPipeline {
    transport: Transport,
}

impl DataFetchPipeline {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Runs all stages for a source
    #[instrument(skip_all, fields(source = %source.name))]
    pub async fn run(&self, source: &Source) -> Report {
        let outcome = match self.fetch_payload(&source.descriptor).await {
            Ok(payload) => normalize(&payload, &source.fields),
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(record) => info!(fields = record.len(), "Source normalized"),
            Err(err) => warn!(kind = %err.kind(), error = %err, "Source failed"),
        }

        Report {
            outcome,
            layout: source.layout.clone(),
        }
    }

    /// Builds, sends and decodes a request without normalizing it
    pub async fn fetch_payload(&self, descriptor: &SourceDescriptor) -> FetchResult<Payload> {
        let request = build_request(descriptor)?;
        let body = self.transport.fetch(&request, descriptor.timeout).await?;
        decode(body, descriptor.shape)
    }
}
