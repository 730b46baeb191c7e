//! Distribution quality and latency analysis.
//!
//! A read-only summarizer over the ring's public lookup operations: it
//! resolves a batch of keys, times the batch, and reports per-server counts
//! together with a dispersion statistic. It holds no ring state of its own.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::ring::HashRing;

/// Result of analyzing a batch of key lookups against a ring.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    /// Number of keys resolved.
    pub total_keys: usize,
    /// Number of servers in the ring at analysis time.
    pub servers: usize,
    /// Virtual nodes per server.
    pub virtual_nodes: usize,
    /// Average wall-clock time per key lookup.
    pub avg_latency: Duration,
    /// Coefficient of variation of per-server counts, as a percentage.
    ///
    /// Population standard deviation divided by the mean count. Lower is a
    /// more even distribution; under 10% is considered good for 150+ virtual
    /// nodes.
    pub distribution_cv: f64,
    /// Raw per-server key counts.
    pub distribution: BTreeMap<String, usize>,
}

/// Resolve `keys` against `ring` and summarize the outcome.
pub fn analyze_performance<K: AsRef<str>>(ring: &HashRing, keys: &[K]) -> PerformanceReport {
    let start = Instant::now();
    let distribution = ring.distribution(keys);
    let elapsed = start.elapsed();

    let avg_latency = if keys.is_empty() {
        Duration::ZERO
    } else {
        elapsed / keys.len() as u32
    };

    PerformanceReport {
        total_keys: keys.len(),
        servers: distribution.len(),
        virtual_nodes: ring.vnodes(),
        avg_latency,
        distribution_cv: coefficient_of_variation(&distribution),
        distribution,
    }
}

/// Population standard deviation of the counts divided by their mean, as a
/// percentage. Zero for an empty or all-zero distribution.
fn coefficient_of_variation(distribution: &BTreeMap<String, usize>) -> f64 {
    if distribution.is_empty() {
        return 0.0;
    }

    let mean = distribution.values().sum::<usize>() as f64 / distribution.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = distribution
        .values()
        .map(|&count| {
            let diff = count as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / distribution.len() as f64;

    variance.sqrt() / mean * 100.0
}

impl PerformanceReport {
    /// One-line quality verdict: < 5% excellent, < 10% good, otherwise poor.
    pub fn verdict(&self) -> &'static str {
        if self.distribution_cv < 5.0 {
            "excellent distribution"
        } else if self.distribution_cv < 10.0 {
            "good distribution"
        } else {
            "poor distribution - consider more virtual nodes"
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Performance Analysis ===")?;
        writeln!(f, "Total Keys: {}", self.total_keys)?;
        writeln!(f, "Servers: {}", self.servers)?;
        writeln!(f, "Virtual Nodes: {}", self.virtual_nodes)?;
        writeln!(f, "Avg Latency: {:?} per key", self.avg_latency)?;
        writeln!(f, "Distribution CV: {:.2}%", self.distribution_cv)?;
        writeln!(f, "{}", self.verdict())?;
        writeln!(f)?;
        writeln!(f, "Key Distribution:")?;
        for (server, count) in &self.distribution {
            let percentage = if self.total_keys == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / self.total_keys as f64
            };
            writeln!(f, "  {server}: {count} keys ({percentage:.1}%)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs
            .iter()
            .map(|(server, count)| (server.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_cv_of_uniform_counts_is_zero() {
        let distribution = counts(&[("a", 100), ("b", 100), ("c", 100)]);
        assert_eq!(coefficient_of_variation(&distribution), 0.0);
    }

    #[test]
    fn test_cv_is_true_population_stddev_over_mean() {
        // counts 2 and 4: mean 3, variance ((1)^2 + (1)^2) / 2 = 1, stddev 1
        let distribution = counts(&[("a", 2), ("b", 4)]);
        let cv = coefficient_of_variation(&distribution);
        assert!((cv - 100.0 / 3.0).abs() < 1e-9, "unexpected cv: {cv}");
    }

    #[test]
    fn test_cv_guards_empty_and_zero() {
        assert_eq!(coefficient_of_variation(&BTreeMap::new()), 0.0);
        let distribution = counts(&[("a", 0), ("b", 0)]);
        assert_eq!(coefficient_of_variation(&distribution), 0.0);
    }

    #[test]
    fn test_analyze_empty_key_batch() {
        let ring = HashRing::new(8);
        ring.add_server("server1").unwrap();

        let report = analyze_performance::<String>(&ring, &[]);
        assert_eq!(report.total_keys, 0);
        assert_eq!(report.servers, 1);
        assert_eq!(report.avg_latency, Duration::ZERO);
        assert_eq!(report.distribution.get("server1"), Some(&0));
    }

    #[test]
    fn test_report_counts_every_key_once() {
        let ring = HashRing::new(16);
        ring.add_server("server1").unwrap();
        ring.add_server("server2").unwrap();

        let keys: Vec<String> = (0..500).map(|i| format!("key-{i}")).collect();
        let report = analyze_performance(&ring, &keys);

        assert_eq!(report.total_keys, 500);
        assert_eq!(report.distribution.values().sum::<usize>(), 500);
        assert_eq!(report.virtual_nodes, 16);
    }

    #[test]
    fn test_verdict_thresholds() {
        let mut report = analyze_performance::<String>(&HashRing::new(1), &[]);
        report.distribution_cv = 3.0;
        assert_eq!(report.verdict(), "excellent distribution");
        report.distribution_cv = 7.5;
        assert_eq!(report.verdict(), "good distribution");
        report.distribution_cv = 25.0;
        assert_eq!(report.verdict(), "poor distribution - consider more virtual nodes");
    }
}
