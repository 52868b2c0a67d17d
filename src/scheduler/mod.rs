//! # Station Scheduler
//!
//! One priority queue per kitchen station. Stations pull work; nothing is pushed to them.
//!
//! Ordering: shortest `estimated_preparation_time` first, first-in-first-out among equal times.
//! The FIFO tie-break comes from a sequence number shared by every queue, so it is stable even
//! when the same dish is re-enqueued after a return.

use crate::model::{InstanceId, OrderId};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// A dish waiting to be cooked at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    pub instance_id: InstanceId,
    pub order_id: OrderId,
    pub estimated_preparation_time: u32,
}

impl WorkItem {
    pub fn new(
        instance_id: InstanceId,
        order_id: OrderId,
        estimated_preparation_time: u32,
    ) -> Self {
        Self {
            instance_id,
            order_id,
            estimated_preparation_time,
        }
    }
}

#[derive(Debug)]
struct Queued {
    // BinaryHeap is a max-heap; Reverse turns it into "smallest (time, seq) first".
    key: Reverse<(u32, u64)>,
    item: WorkItem,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Per-station priority queues, keyed by station name.
///
/// A station that never received work behaves exactly like one whose queue drained.
#[derive(Debug, Default)]
pub struct StationScheduler {
    queues: HashMap<String, BinaryHeap<Queued>>,
    next_seq: u64,
}

impl StationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `item` on `station`, creating the queue on first use. O(log n).
    pub fn enqueue(&mut self, station: &str, item: WorkItem) {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(
            station,
            instance_id = %item.instance_id,
            order_id = %item.order_id,
            estimated = item.estimated_preparation_time,
            "Enqueued"
        );
        let key = Reverse((item.estimated_preparation_time, seq));
        self.queues
            .entry(station.to_string())
            .or_default()
            .push(Queued { key, item });
    }

    /// The next item `station` would get, without removing it.
    pub fn peek(&self, station: &str) -> Option<&WorkItem> {
        self.queues.get(station)?.peek().map(|q| &q.item)
    }

    /// Removes and returns the next item for `station`. `None` means no work.
    pub fn pop(&mut self, station: &str) -> Option<WorkItem> {
        let item = self.queues.get_mut(station)?.pop().map(|q| q.item);
        if let Some(item) = &item {
            debug!(station, instance_id = %item.instance_id, "Dequeued");
        }
        item
    }

    /// Drops every entry for `instance_id`, whichever station holds it. Returns how many went.
    pub fn remove(&mut self, instance_id: InstanceId) -> usize {
        let mut removed = 0;
        for (station, queue) in self.queues.iter_mut() {
            let before = queue.len();
            queue.retain(|q| q.item.instance_id != instance_id);
            if queue.len() < before {
                debug!(station = %station, %instance_id, "Removed");
                removed += before - queue.len();
            }
        }
        removed
    }

    pub fn len(&self, station: &str) -> usize {
        self.queues.get(station).map_or(0, BinaryHeap::len)
    }

    pub fn is_empty(&self, station: &str) -> bool {
        self.len(station) == 0
    }

    /// Every station that has ever received work, sorted by name.
    pub fn stations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
