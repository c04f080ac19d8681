//! Response Cache
//!
//! Keyed TTL cache shared by provider clients. Expired entries are kept so
//! a client can fall back to them when a refresh fails. The cache is
//! bounded: inserting a new key into a full cache evicts the oldest entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Entries kept per cache before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
    /// Insertion order, used to pick the eviction victim
    seq: u64,
}

struct Slots<V> {
    map: HashMap<String, Entry<V>>,
    next_seq: u64,
}

/// Cache lookup outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cached<V> {
    Fresh(V),
    Stale(V),
    Missing,
}

pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<Slots<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(Slots {
                map: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Cached<V> {
        let entries = self.entries.read().await;
        match entries.map.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Cached::Fresh(entry.value.clone()),
            Some(entry) => Cached::Stale(entry.value.clone()),
            None => Cached::Missing,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut slots = self.entries.write().await;

        if !slots.map.contains_key(&key) && slots.map.len() >= self.capacity {
            let oldest = slots
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                slots.map.remove(&oldest);
            }
        }

        let seq = slots.next_seq;
        slots.next_seq += 1;
        slots.map.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
                seq,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }
}
