//! Deadline queue driven by host-supplied instants.
//!
//! Nothing here reads the clock. Hosts schedule work at an [`Instant`] and
//! later call [`Timeline::pop_due`] with the current time. Entries with the
//! same deadline come out in scheduling order.

use std::time::Instant;

#[derive(Debug)]
struct Entry<T> {
    at: Instant,
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct Timeline<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Instant, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { at, seq, task });
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, T)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now)
            .min_by_key(|(_, e)| (e.at, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.at, entry.task))
    }

    /// Keep only tasks matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|e| keep(&e.task));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.at).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
