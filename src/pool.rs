use std::sync::Arc;

use crate::error::ConfigError;
use crate::upstream::{HttpUpstream, UpstreamTarget};

/// Fixed, ordered set of upstream targets. Order is the round-robin order.
#[derive(Debug, Clone)]
pub struct TargetPool {
    targets: Arc<[Arc<dyn UpstreamTarget>]>,
}

impl TargetPool {
    pub fn new(targets: Vec<Arc<dyn UpstreamTarget>>) -> Result<TargetPool, ConfigError> {
        if targets.is_empty() {
            return Err(ConfigError::EmptyPool);
        }
        Ok(TargetPool {
            targets: targets.into(),
        })
    }

    /// Build a pool of [`HttpUpstream`]s, failing on the first malformed address.
    pub fn from_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<TargetPool, ConfigError> {
        let targets = addresses
            .iter()
            .map(|address| {
                HttpUpstream::new(address.as_ref())
                    .map(|upstream| Arc::new(upstream) as Arc<dyn UpstreamTarget>)
            })
            .collect::<Result<Vec<_>, _>>()?;
        TargetPool::new(targets)
    }

    /// Target at `index`, wrapped modulo the pool length.
    pub fn at(&self, index: usize) -> &Arc<dyn UpstreamTarget> {
        &self.targets[index % self.targets.len()]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn UpstreamTarget>> {
        self.targets.iter()
    }
}
