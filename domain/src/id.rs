//! Member id generation strategies.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::{IdGenerator, MemberId};

/// Random v4 UUIDs, hyphenated lowercase.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> MemberId {
        MemberId(Uuid::new_v4().to_string())
    }
}

/// Counter-based ids of the form `{prefix}{n}`, starting at 1.
/// If `min_width` is set, `n` is left-padded with '0' to reach it.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    min_width: usize,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new<S: Into<String>>(prefix: S, min_width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            min_width,
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> MemberId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        // Never blank: the counter always contributes at least one digit.
        MemberId(format!("{}{:0width$}", self.prefix, n, width = self.min_width))
    }
}
