//! Per-system frame timing.
//!
//! The [`Profiler`] accumulates per-frame update durations for each system
//! and reports arithmetic means — a one-shot diagnostic emitted when the
//! loop stops. It holds no correctness-relevant state and must never affect
//! simulation outcomes; the [`World`](crate::ecs::World) feeds it, the
//! [`GameLoop`](crate::game_loop::GameLoop) formats the report.

use std::collections::HashMap;

/// One row of the shutdown report.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStats {
    pub name: String,
    /// Arithmetic mean update duration across all recorded frames.
    pub mean_ms: f64,
    /// Number of frames recorded.
    pub samples: usize,
}

/// Records per-system per-frame update durations (wall-clock milliseconds).
pub struct Profiler {
    /// Tracked names in first-seen order, so the report is deterministic.
    order: Vec<String>,
    records: HashMap<String, Vec<f64>>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
        }
    }

    /// Append one frame's duration for `name`.
    pub fn track(&mut self, name: &str, duration_ms: f64) {
        match self.records.get_mut(name) {
            Some(durations) => durations.push(duration_ms),
            None => {
                self.order.push(name.to_string());
                self.records.insert(name.to_string(), vec![duration_ms]);
            }
        }
    }

    /// Mean duration per tracked name, in first-seen order.
    pub fn summary(&self) -> Vec<SystemStats> {
        self.order
            .iter()
            .map(|name| {
                let durations = &self.records[name];
                let total: f64 = durations.iter().sum();
                SystemStats {
                    name: name.clone(),
                    mean_ms: total / durations.len() as f64,
                    samples: durations.len(),
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop all recorded durations.
    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_means() {
        let mut profiler = Profiler::new();
        profiler.track("gravity", 1.0);
        profiler.track("gravity", 3.0);
        profiler.track("movement", 2.0);

        let summary = profiler.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "gravity");
        assert_eq!(summary[0].mean_ms, 2.0);
        assert_eq!(summary[0].samples, 2);
        assert_eq!(summary[1].name, "movement");
        assert_eq!(summary[1].mean_ms, 2.0);
        assert_eq!(summary[1].samples, 1);
    }

    #[test]
    fn order_is_first_seen() {
        let mut profiler = Profiler::new();
        profiler.track("b", 1.0);
        profiler.track("a", 1.0);
        profiler.track("b", 1.0);
        let names: Vec<_> = profiler.summary().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn clear_empties_records() {
        let mut profiler = Profiler::new();
        assert!(profiler.is_empty());
        profiler.track("x", 1.0);
        assert!(!profiler.is_empty());
        profiler.clear();
        assert!(profiler.is_empty());
        assert!(profiler.summary().is_empty());
    }
}
