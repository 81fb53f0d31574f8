//! Client-side id generation.
//!
//! Ids are minted as `<prefix>-<unix-millis>-<base36 random>` so rapid
//! repeated generation (double-clicked toolbar buttons, scripted bulk
//! adds) cannot collide: the random tail comes from a stream that
//! advances on every call even within one millisecond.
//!
//! Ids are never checked for uniqueness against loaded data; two
//! independently-authored layouts merged together can in principle
//! collide. The tree index logs such duplicates rather than rewriting
//! them (see [`crate::tree`]).

use crate::node::NodeId;
use std::time::{SystemTime, UNIX_EPOCH};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_CHARS: usize = 6;

/// Milliseconds since the unix epoch.
///
/// Falls back to 0 if the system clock reads before the epoch.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generator for widget/layout/page ids.
///
/// Internally a xorshift64* stream; seedable for deterministic tests.
#[derive(Debug)]
pub struct IdGenerator {
    state: u64,
}

impl IdGenerator {
    /// Create a generator seeded from the current time.
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9e37_79b9_7f4a_7c15);
        Self::with_seed(nanos)
    }

    /// Create a generator with a fixed seed (tests).
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            // xorshift state must be nonzero
            state: if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed },
        }
    }

    fn next_random(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Mint an id of the form `<prefix>-<millis>-<random>`.
    #[must_use]
    pub fn generate(&mut self, prefix: &str) -> String {
        let mut tail = [0u8; RANDOM_CHARS];
        let mut r = self.next_random();
        for slot in &mut tail {
            *slot = BASE36[(r % 36) as usize];
            r /= 36;
        }
        let tail = std::str::from_utf8(&tail).expect("base36 is ascii");
        format!("{prefix}-{}-{tail}", unix_millis())
    }

    /// Mint a widget node id.
    #[must_use]
    pub fn widget_id(&mut self) -> NodeId {
        NodeId::new(self.generate("widget"))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
