//! In-memory Stats sink.
//!
//! Counters and histogram cells are atomics keyed by metric name plus
//! sorted tag set, backed by `DashMap`. Tags are sorted on entry so the
//! key is deterministic regardless of the order callers emit them in.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use dashmap::DashMap;

use reqtap_core::Stats;

type Key = (String, Vec<String>);

fn key(name: &str, tags: &[String]) -> Key {
    let mut tags = tags.to_vec();
    tags.sort();
    (name.to_owned(), tags)
}

struct HistogramCell {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl HistogramCell {
    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    fn observe(&self, value: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value, Ordering::Relaxed);
        self.min.fetch_min(value, Ordering::Relaxed);
        self.max.fetch_max(value, Ordering::Relaxed);
    }
}

/// Aggregated view of one histogram series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
}

/// In-memory `Stats` implementation.
#[derive(Default)]
pub struct MemoryStats {
    counters: DashMap<Key, AtomicI64>,
    histograms: DashMap<Key, HistogramCell>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter value for an exact (name, tag set) series; 0 if never hit.
    pub fn counter_value(&self, name: &str, tags: &[String]) -> i64 {
        self.counters
            .get(&key(name, tags))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Counter total across every tag set recorded under `name`.
    pub fn counter_total(&self, name: &str) -> i64 {
        self.counters
            .iter()
            .filter(|e| e.key().0 == name)
            .map(|e| e.value().load(Ordering::Relaxed))
            .sum()
    }

    /// Summary for an exact (name, tag set) histogram series.
    pub fn histogram_summary(&self, name: &str, tags: &[String]) -> Option<HistogramSummary> {
        self.histograms.get(&key(name, tags)).map(|cell| HistogramSummary {
            count: cell.count.load(Ordering::Relaxed),
            sum: cell.sum.load(Ordering::Relaxed),
            min: cell.min.load(Ordering::Relaxed),
            max: cell.max.load(Ordering::Relaxed),
        })
    }

    /// Sample count across every tag set recorded under `name`.
    pub fn histogram_count(&self, name: &str) -> u64 {
        self.histograms
            .iter()
            .filter(|e| e.key().0 == name)
            .map(|e| e.value().count.load(Ordering::Relaxed))
            .sum()
    }
}

impl Stats for MemoryStats {
    fn incr(&self, name: &str, amount: i64, tags: &[String]) {
        let counter = self
            .counters
            .entry(key(name, tags))
            .or_insert_with(|| AtomicI64::new(0));
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    fn histogram(&self, name: &str, value: u64, tags: &[String]) {
        let cell = self
            .histograms
            .entry(key(name, tags))
            .or_insert_with(HistogramCell::new);
        cell.observe(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn counters_accumulate_per_tag_set() {
        let stats = MemoryStats::new();
        stats.incr("response_status", 1, &tags(&["method:GET", "status:200"]));
        stats.incr("response_status", 1, &tags(&["status:200", "method:GET"]));
        stats.incr("response_status", 1, &tags(&["method:GET", "status:404"]));

        // tag order must not split the series
        assert_eq!(
            stats.counter_value("response_status", &tags(&["method:GET", "status:200"])),
            2
        );
        assert_eq!(stats.counter_total("response_status"), 3);
    }

    #[test]
    fn histograms_track_count_sum_min_max() {
        let stats = MemoryStats::new();
        let t = tags(&["method:GET"]);
        stats.histogram("response_duration", 10, &t);
        stats.histogram("response_duration", 30, &t);

        let summary = stats.histogram_summary("response_duration", &t);
        assert_eq!(
            summary,
            Some(HistogramSummary {
                count: 2,
                sum: 40,
                min: 10,
                max: 30
            })
        );
        assert_eq!(stats.histogram_count("response_duration"), 2);
    }

    #[test]
    fn missing_series_read_as_zero() {
        let stats = MemoryStats::new();
        assert_eq!(stats.counter_value("slow_response", &[]), 0);
        assert_eq!(stats.histogram_summary("response_duration", &[]), None);
    }
}
