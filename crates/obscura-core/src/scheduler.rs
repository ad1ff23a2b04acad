//! The dual-heap decoy scheduler.
//!
//! Maintains a timestamp map plus two independent min-heaps — one over
//! real keys, one over dummy keys — ordered by "last touched". Popping
//! either heap always surfaces the key that has gone quietest the
//! longest, which is what spreads backend re-addressing evenly across
//! both pools instead of hammering a hot few.

use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Which pool a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Client-meaningful keys.
    Real,
    /// Reserved decoy keys.
    Dummy,
}

/// A (timestamp, key) pair ordered for a min-heap: the smallest
/// timestamp sorts first, ties broken by key for a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    timestamp: i64,
    key: String,
}

struct Heaps {
    timestamps: HashMap<String, i64>,
    real: BinaryHeap<Reverse<HeapEntry>>,
    dummy: BinaryHeap<Reverse<HeapEntry>>,
}

/// The least-recently-touched scheduler shared across batches.
///
/// A key may be pushed onto a heap multiple times across its lifetime;
/// this is intentional — each planned access consumes exactly one
/// entry, and stale duplicates left behind by a newer `set_timestamp`
/// simply surface later with no ill effect beyond bounded heap growth
/// proportional to touches.
pub struct Scheduler {
    inner: Mutex<Heaps>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Heaps {
                timestamps: HashMap::new(),
                real: BinaryHeap::new(),
                dummy: BinaryHeap::new(),
            }),
        }
    }

    /// Registers interest in `key` under `class`, using its current
    /// timestamp (or the sentinel minimum of 0 on first sight).
    ///
    /// Calling this twice for the same key is legal and pushes two
    /// heap entries — each planned access consumes exactly one.
    pub fn add(&self, key: &str, class: KeyClass) {
        let mut heaps = self.inner.lock();
        let ts = *heaps.timestamps.entry(key.to_string()).or_insert(0);
        push(&mut heaps, class, ts, key);
    }

    /// Records `key`'s new timestamp and pushes a fresh heap entry for
    /// it under `class`.
    pub fn set_timestamp(&self, key: &str, ts: i64, class: KeyClass) {
        let mut heaps = self.inner.lock();
        heaps.timestamps.insert(key.to_string(), ts);
        push(&mut heaps, class, ts, key);
    }

    /// Removes and returns the key with the smallest timestamp in the
    /// chosen class's heap, or `None` if that heap is empty.
    pub fn pop_min(&self, class: KeyClass) -> Option<String> {
        let mut heaps = self.inner.lock();
        let heap = match class {
            KeyClass::Real => &mut heaps.real,
            KeyClass::Dummy => &mut heaps.dummy,
        };
        heap.pop().map(|Reverse(entry)| entry.key)
    }

    /// Returns the last-assigned timestamp for `key`, or `None` if it
    /// has never been observed.
    #[must_use]
    pub fn timestamp_of(&self, key: &str) -> Option<i64> {
        self.inner.lock().timestamps.get(key).copied()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn push(heaps: &mut Heaps, class: KeyClass, ts: i64, key: &str) {
    let entry = Reverse(HeapEntry {
        timestamp: ts,
        key: key.to_string(),
    });
    match class {
        KeyClass::Real => heaps.real.push(entry),
        KeyClass::Dummy => heaps.dummy.push(entry),
    }
}
