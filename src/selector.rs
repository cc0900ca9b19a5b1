//! Round-robin selection with liveness skipping.
//!
//! The cursor only grows; the effective index is `cursor % pool.len()`. A call
//! that skips dead targets leaves the cursor one past the target it returned,
//! so skipped targets do not get an out-of-turn pick on the next call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::NoAvailableUpstream;
use crate::pool::TargetPool;
use crate::upstream::UpstreamTarget;

#[derive(Debug)]
pub struct RoundRobinSelector {
    pool: TargetPool,
    cursor: Mutex<usize>,
}

impl RoundRobinSelector {
    pub fn new(pool: TargetPool) -> Self {
        RoundRobinSelector {
            pool,
            cursor: Mutex::new(0),
        }
    }

    /// Pick the next live target.
    ///
    /// Examines at most `pool.len()` targets. If none is alive the cursor is
    /// left where it was and [`NoAvailableUpstream`] is returned.
    pub fn next(&self) -> Result<Arc<dyn UpstreamTarget>, NoAvailableUpstream> {
        let mut cursor = self.cursor.lock();
        let start = *cursor;

        for step in 0..self.pool.len() {
            let index = start.wrapping_add(step);
            let candidate = self.pool.at(index);
            if candidate.is_alive() {
                *cursor = index.wrapping_add(1);
                return Ok(Arc::clone(candidate));
            }
        }

        Err(NoAvailableUpstream)
    }
}
