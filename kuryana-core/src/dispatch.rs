//! Dispatch Facade
//!
//! Sequences Resolver -> Transport -> Normalizer -> Classifier for one
//! request. Every path through [`Dispatcher::dispatch`] ends in an
//! [`OutcomeEnvelope`].

use std::sync::Arc;

use tracing::Instrument;

use crate::classifier::{classify, OutcomeEnvelope};
use crate::error::Failure;
use crate::kind::ResourceKind;
use crate::normalize::normalize;
use crate::request::{QueryOptions, ResourceRequest};
use crate::resolver::{resolve_request, UpstreamRequest};
use crate::transport::{RawResponse, Transport};

/// Pipeline position of one request. Each request moves forward only.
#[derive(Debug)]
enum Stage {
    Resolving(ResourceRequest),
    Fetching(ResourceRequest, UpstreamRequest),
    Normalizing(ResourceRequest, RawResponse),
    Done(OutcomeEnvelope),
}

impl Stage {
    const fn name(&self) -> &'static str {
        match self {
            Self::Resolving(_) => "resolving",
            Self::Fetching(..) => "fetching",
            Self::Normalizing(..) => "normalizing",
            Self::Done(_) => "done",
        }
    }
}

/// Entry point used by the route layer.
///
/// Holds the process-wide transport; cloning is cheap.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Serve one request.
    pub async fn dispatch(
        &self,
        kind: ResourceKind,
        identifier: &str,
        options: QueryOptions,
    ) -> OutcomeEnvelope {
        let span = tracing::info_span!("dispatch", kind = %kind, identifier = %identifier);
        async move {
            let stage = match ResourceRequest::new(kind, identifier.trim(), options) {
                Ok(request) => Stage::Resolving(request),
                Err(err) => Stage::Done(classify(None, Err(err.into()))),
            };
            self.run(stage).await
        }
        .instrument(span)
        .await
    }

    async fn run(&self, mut stage: Stage) -> OutcomeEnvelope {
        loop {
            tracing::debug!(stage = stage.name(), "Dispatch stage");
            stage = match stage {
                Stage::Resolving(request) => match resolve_request(&request) {
                    Ok(upstream) => Stage::Fetching(request, upstream),
                    Err(err) => Stage::Done(classify(None, Err(err.into()))),
                },
                Stage::Fetching(request, upstream) => {
                    match self.transport.fetch(&upstream).await {
                        Ok(raw) => Stage::Normalizing(request, raw),
                        Err(err) => Stage::Done(classify(None, Err(err.into()))),
                    }
                }
                Stage::Normalizing(request, raw) => {
                    let outcome =
                        normalize(request.kind, &request.identifier, &raw).map_err(Failure::from);
                    Stage::Done(classify(Some(raw.http_status), outcome))
                }
                Stage::Done(envelope) => {
                    tracing::debug!(status = envelope.status.as_u16(), "Dispatch finished");
                    return envelope;
                }
            };
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
