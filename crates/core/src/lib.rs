pub mod config;
pub mod env_store;
pub mod report;
pub mod resolver;
pub mod service_monitor;
pub mod transport;
pub mod validator;

pub use config::{load_catalog, load_catalog_from, ConfigLoadError};
pub use env_store::{EnvSnapshot, EnvironmentStore};
pub use resolver::{applies_to, resolve_catalog, resolve_service};
pub use service_monitor::{find_service, CheckError, ServiceMonitor};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use validator::{validate_content, validate_response, MatchStrategy, Strategy, ValidationVerdict};
