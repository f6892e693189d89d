//! Benchmark run records and the candidate lists derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchStatus {
    Complete,
    Failed,
    Running,
    Stopped,
}

/// A single metric series within a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
}

/// A graph groups the metric series plotted together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricGroup {
    pub name: String,
    #[serde(default)]
    pub graphs: Vec<Graph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsInfo {
    #[serde(default)]
    pub groups: Vec<MetricGroup>,
}

/// An environment variable recorded for a run, usable for grouping/x-axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One benchmark run as stored in the benchmarks file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub id: u64,
    pub name: String,
    pub status: BenchStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metrics: MetricsInfo,
    #[serde(default)]
    pub env: Vec<EnvEntry>,
    #[serde(default)]
    pub results: serde_json::Map<String, serde_json::Value>,
}

/// Global suggestion sources, recomputed in full from the collection. Derived
/// state only; never mutated directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateLists {
    pub metrics: Vec<String>,
    pub envs: Vec<String>,
    pub results: Vec<String>,
}

impl CandidateLists {
    /// Extract deduplicated metric names, env names, and result keys from the
    /// complete runs in `records`. First-seen order is preserved so suggestion
    /// lists stay stable across recomputation.
    pub fn from_records(records: &[BenchmarkRecord]) -> Self {
        let mut metrics = Vec::new();
        let mut envs = Vec::new();
        let mut results = Vec::new();

        for record in records {
            if record.status != BenchStatus::Complete {
                continue;
            }
            for group in &record.metrics.groups {
                for graph in &group.graphs {
                    for metric in &graph.metrics {
                        metrics.push(metric.name.trim().to_string());
                    }
                }
            }
            for entry in &record.env {
                envs.push(entry.name.clone());
            }
            for key in record.results.keys() {
                results.push(key.clone());
            }
        }

        Self {
            metrics: uniq(metrics),
            envs: uniq(envs),
            results: uniq(results),
        }
    }
}

/// Deduplicate preserving first-seen order.
fn uniq(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}
