use crate::error::{NbtError, NbtResult};

/// Decode budget: estimated memory and nesting depth.
///
/// Every decoded node reports its `size_in_bytes` share before its payload
/// is allocated, so a hostile length prefix fails here instead of in the
/// allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeTracker {
    max_bytes: u64,
    max_depth: usize,
    used: u64,
    depth: usize,
}

impl SizeTracker {
    pub const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new(max_bytes: u64, max_depth: usize) -> Self {
        Self {
            max_bytes,
            max_depth,
            used: 0,
            depth: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX, usize::MAX)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Bytes accounted so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn account(&mut self, bytes: u64) -> NbtResult<()> {
        let total = self.used.saturating_add(bytes);
        if total > self.max_bytes {
            return Err(NbtError::SizeLimit(format!(
                "tried to read a tag of {} + {bytes} bytes where the limit is {}",
                self.used, self.max_bytes
            )));
        }
        self.used = total;
        Ok(())
    }

    pub fn push_depth(&mut self) -> NbtResult<()> {
        if self.depth >= self.max_depth {
            return Err(NbtError::SizeLimit(format!(
                "tried to read a tag nested deeper than {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn pop_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for SizeTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BYTES, Self::DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounting_stops_at_the_limit() {
        let mut tracker = SizeTracker::new(100, 2);
        tracker.account(60).expect("within budget");
        tracker.account(40).expect("exactly at budget");
        let err = tracker.account(1).expect_err("over budget");
        assert!(matches!(err, NbtError::SizeLimit(_)));
        assert_eq!(tracker.used(), 100);
    }

    #[test]
    fn depth_is_bounded() {
        let mut tracker = SizeTracker::new(u64::MAX, 2);
        tracker.push_depth().expect("depth 1");
        tracker.push_depth().expect("depth 2");
        assert!(tracker.push_depth().is_err());
        tracker.pop_depth();
        tracker.push_depth().expect("depth 2 again");
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn unlimited_never_trips() {
        let mut tracker = SizeTracker::unlimited();
        tracker.account(u64::MAX).expect("unlimited");
        tracker.account(u64::MAX).expect("saturates");
    }
}
