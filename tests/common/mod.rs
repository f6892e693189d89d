use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use benchdash::bench::{
    BenchStatus, BenchmarkRecord, EnvEntry, Graph, Metric, MetricGroup, MetricsInfo,
};
use benchdash::dashboard::{ChartConfig, Dashboard};
use chrono::{TimeZone, Utc};

/// Build a complete benchmark record with the given names wired into the
/// nested metric-group shape.
pub fn record(
    id: u64,
    name: &str,
    tags: &[&str],
    metrics: &[&str],
    envs: &[(&str, &str)],
    results: &[&str],
) -> BenchmarkRecord {
    BenchmarkRecord {
        id,
        name: name.to_string(),
        status: BenchStatus::Complete,
        start_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        metrics: MetricsInfo {
            groups: vec![MetricGroup {
                name: "default".to_string(),
                graphs: vec![Graph {
                    title: None,
                    metrics: metrics
                        .iter()
                        .map(|n| Metric {
                            name: n.to_string(),
                        })
                        .collect(),
                }],
            }],
        },
        env: envs
            .iter()
            .map(|(n, v)| EnvEntry {
                name: n.to_string(),
                value: v.to_string(),
            })
            .collect(),
        results: results
            .iter()
            .map(|k| (k.to_string(), serde_json::json!(1.0)))
            .collect(),
    }
}

/// Write a benchmarks JSON file into `dir` and return its path.
pub fn write_benchmarks(dir: &Path, records: &[BenchmarkRecord]) -> PathBuf {
    let path = dir.join("benchmarks.json");
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", serde_json::to_string_pretty(records).unwrap()).unwrap();
    path
}

/// Write a dashboards JSON file into `dir` and return its path.
pub fn write_dashboards(dir: &Path, dashboards: &[Dashboard]) -> PathBuf {
    let path = dir.join("dashboards.json");
    let mut file = File::create(&path).unwrap();
    write!(
        file,
        "{}",
        serde_json::to_string_pretty(dashboards).unwrap()
    )
    .unwrap();
    path
}

/// A dashboard with pre-assigned chart ids for reorder/delete tests.
pub fn dashboard_with_charts(name: &str, criteria: &str, chart_ids: &[u64]) -> Dashboard {
    Dashboard {
        name: name.to_string(),
        criteria: criteria.to_string(),
        charts: chart_ids.iter().map(|&id| ChartConfig::new(id)).collect(),
    }
}
