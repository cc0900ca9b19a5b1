//! Round-robin HTTP load balancer.
//!
//! Every inbound request is forwarded to the next live upstream in a fixed
//! pool; the upstream response is streamed back to the caller.

pub mod config;
pub mod error;
pub mod liveness;
pub mod pool;
pub mod proxy;
pub mod req;
pub mod selector;
pub mod upstream;

pub use config::Config;
pub use error::{ConfigError, DispatchError, ForwardError, NoAvailableUpstream};
pub use liveness::{AlwaysAlive, Liveness, LivenessFlag};
pub use pool::TargetPool;
pub use proxy::{dispatch, Dispatcher};
pub use selector::RoundRobinSelector;
pub use upstream::{HttpUpstream, UpstreamTarget};
