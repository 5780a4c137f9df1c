pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod request;
pub mod resolver;
pub mod transport;

pub use classifier::{classify, OutcomeBody, OutcomeEnvelope};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{ErrorBody, ErrorKind, Failure, ParseError, ResolveError, TransportError};
pub use kind::ResourceKind;
pub use record::CanonicalRecord;
pub use request::{OptionValue, QueryOptions, ResourceRequest};
pub use transport::{HttpTransport, RawResponse, Transport};
