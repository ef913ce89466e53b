//! Data model shared by the svcprobe resolver, validator and server.
pub mod descriptor;
pub mod environment;
pub mod result;

pub use descriptor::{EnvVarNames, FlexibleOptions, ResolvedService, ServiceDescriptor, ServiceType};
pub use environment::{Environment, UnknownEnvironment};
pub use result::{BatchResult, BatchSummary, CheckResult, CheckStatus};
