//! Stores backing the editor: the benchmark collection (with its timeline
//! state and tag list) and the dashboards file (the mutation sink).

use color_eyre::eyre::eyre;
use color_eyre::Result;
use regex::RegexBuilder;
use std::path::{Path, PathBuf};

use crate::bench::BenchmarkRecord;
use crate::dashboard::{ChartConfig, ChartId, Dashboard};

/// In-memory benchmark collection plus the last timeline result. The timeline
/// tag echoes the criteria string the count was computed for, so the editor
/// can tell whether the stored total still corresponds to the current draft.
pub struct BenchStore {
    path: PathBuf,
    items: Vec<BenchmarkRecord>,
    timeline_id: Option<String>,
    total: u64,
}

impl BenchStore {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let items: Vec<BenchmarkRecord> = serde_json::from_str(&data)?;
        Ok(Self {
            path: path.to_path_buf(),
            items,
            timeline_id: None,
            total: 0,
        })
    }

    /// Re-read the benchmarks file. Leaves the collection untouched on error.
    pub fn reload(&mut self) -> Result<()> {
        let data = std::fs::read_to_string(&self.path)?;
        self.items = serde_json::from_str(&data)?;
        Ok(())
    }

    pub fn items(&self) -> &[BenchmarkRecord] {
        &self.items
    }

    /// The criteria string the stored total was computed for; `None` until a
    /// timeline query has run.
    pub fn timeline_id(&self) -> Option<&str> {
        self.timeline_id.as_deref()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn apply_timeline(&mut self, tag: String, total: u64) {
        self.timeline_id = Some(tag);
        self.total = total;
    }

    /// All tags known across the collection, deduplicated in first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.items
            .iter()
            .flat_map(|r| r.tags.iter())
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub fn with_items(items: Vec<BenchmarkRecord>) -> Self {
        Self {
            path: PathBuf::new(),
            items,
            timeline_id: None,
            total: 0,
        }
    }
}

/// Count the records matching `query`, capped at `limit`.
///
/// Criteria grammar: whitespace-separated tokens, all of which must match.
/// `#tag` matches a record tag exactly, `name=value` matches an env entry, and
/// any other token is a case-insensitive substring match on the run name.
/// An empty query matches everything.
pub fn run_timeline_query(records: &[BenchmarkRecord], query: &str, limit: u64) -> u64 {
    let count = records
        .iter()
        .filter(|r| record_matches(r, query))
        .count() as u64;
    count.min(limit)
}

fn record_matches(record: &BenchmarkRecord, query: &str) -> bool {
    query.split_whitespace().all(|token| {
        if let Some(tag) = token.strip_prefix('#') {
            record.tags.iter().any(|t| t == tag)
        } else if let Some((name, value)) = token.split_once('=') {
            record.env.iter().any(|e| e.name == name && e.value == value)
        } else {
            match RegexBuilder::new(&regex::escape(token))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re.is_match(&record.name),
                Err(_) => false,
            }
        }
    })
}

/// The dashboards file and the currently selected draft. All edits go through
/// [`DashboardStore::with_selected`]; chart ids are assigned here and never
/// reused.
pub struct DashboardStore {
    path: PathBuf,
    dashboards: Vec<Dashboard>,
    selected: Option<usize>,
    next_chart_id: ChartId,
}

impl DashboardStore {
    pub fn load(path: &Path) -> Result<Self> {
        let dashboards: Vec<Dashboard> = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        } else {
            Vec::new()
        };
        let next_chart_id = dashboards
            .iter()
            .flat_map(|d| d.charts.iter())
            .map(|c| c.id + 1)
            .max()
            .unwrap_or(0);
        Ok(Self {
            path: path.to_path_buf(),
            dashboards,
            selected: None,
            next_chart_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.dashboards)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    /// Select an existing dashboard by name, or append a new one under that
    /// name and select it.
    pub fn select_or_create(&mut self, name: &str) -> &Dashboard {
        let idx = match self.dashboards.iter().position(|d| d.name == name) {
            Some(idx) => idx,
            None => {
                self.dashboards.push(Dashboard {
                    name: name.to_string(),
                    ..Dashboard::default()
                });
                self.dashboards.len() - 1
            }
        };
        self.selected = Some(idx);
        &self.dashboards[idx]
    }

    /// Select the first dashboard, creating an unnamed one in an empty file.
    pub fn select_first(&mut self) -> &Dashboard {
        if self.dashboards.is_empty() {
            self.dashboards.push(Dashboard::default());
        }
        self.selected = Some(0);
        &self.dashboards[0]
    }

    pub fn selected(&self) -> Result<&Dashboard> {
        self.selected
            .and_then(|idx| self.dashboards.get(idx))
            .ok_or_else(|| eyre!("no dashboard selected"))
    }

    /// Apply `mutate` to the selected draft in place. A no-op when nothing is
    /// selected.
    pub fn with_selected<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Dashboard),
    {
        if let Some(draft) = self.selected.and_then(|idx| self.dashboards.get_mut(idx)) {
            mutate(draft);
        }
    }

    /// Append a chart with defaults to the selected draft, returning its fresh
    /// id.
    pub fn add_chart_to_selected(&mut self) -> Option<ChartId> {
        let id = self.next_chart_id;
        let mut added = false;
        self.with_selected(|draft| {
            draft.charts.push(ChartConfig::new(id));
            added = true;
        });
        if added {
            self.next_chart_id += 1;
            Some(id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{BenchStatus, EnvEntry, MetricsInfo};
    use chrono::Utc;

    fn record(name: &str, tags: &[&str], env: &[(&str, &str)]) -> BenchmarkRecord {
        BenchmarkRecord {
            id: 0,
            name: name.to_string(),
            status: BenchStatus::Complete,
            start_time: Utc::now(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            metrics: MetricsInfo::default(),
            env: env
                .iter()
                .map(|(n, v)| EnvEntry {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            results: serde_json::Map::new(),
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let records = vec![record("a", &[], &[]), record("b", &[], &[])];
        assert_eq!(run_timeline_query(&records, "", 20), 2);
    }

    #[test]
    fn name_tokens_match_case_insensitively() {
        let records = vec![
            record("HTTP-smoke", &[], &[]),
            record("tcp-flood", &[], &[]),
        ];
        assert_eq!(run_timeline_query(&records, "http", 20), 1);
    }

    #[test]
    fn tag_tokens_match_exactly() {
        let records = vec![
            record("a", &["nightly"], &[]),
            record("b", &["nightly-extra"], &[]),
        ];
        assert_eq!(run_timeline_query(&records, "#nightly", 20), 1);
    }

    #[test]
    fn env_tokens_match_name_and_value() {
        let records = vec![
            record("a", &[], &[("workers", "4")]),
            record("b", &[], &[("workers", "8")]),
        ];
        assert_eq!(run_timeline_query(&records, "workers=4", 20), 1);
    }

    #[test]
    fn all_tokens_must_match() {
        let records = vec![
            record("http-smoke", &["nightly"], &[]),
            record("http-flood", &[], &[]),
        ];
        assert_eq!(run_timeline_query(&records, "http #nightly", 20), 1);
    }

    #[test]
    fn total_is_capped_at_limit() {
        let records: Vec<_> = (0..30).map(|i| record(&format!("r{}", i), &[], &[])).collect();
        assert_eq!(run_timeline_query(&records, "", 20), 20);
    }

    #[test]
    fn regex_metacharacters_in_tokens_are_literal() {
        let records = vec![record("rate(p99)", &[], &[])];
        assert_eq!(run_timeline_query(&records, "rate(p99)", 20), 1);
    }

    #[test]
    fn all_tags_deduplicates_in_order() {
        let store = BenchStore::with_items(vec![
            record("a", &["nightly", "smoke"], &[]),
            record("b", &["smoke", "release"], &[]),
        ]);
        assert_eq!(store.all_tags(), vec!["nightly", "smoke", "release"]);
    }

    #[test]
    fn add_chart_assigns_fresh_ids() {
        let mut store = DashboardStore {
            path: PathBuf::new(),
            dashboards: Vec::new(),
            selected: None,
            next_chart_id: 0,
        };
        // No selection: the add is a no-op and no id is consumed.
        assert_eq!(store.add_chart_to_selected(), None);
        store.select_first();
        assert_eq!(store.add_chart_to_selected(), Some(0));
        assert_eq!(store.add_chart_to_selected(), Some(1));
        let draft = store.selected().unwrap();
        assert_eq!(draft.charts.len(), 2);
        assert_ne!(draft.charts[0].id, draft.charts[1].id);
    }

    #[test]
    fn next_chart_id_resumes_past_existing_ids() {
        let mut store = DashboardStore {
            path: PathBuf::new(),
            dashboards: vec![Dashboard {
                name: "d".to_string(),
                criteria: String::new(),
                charts: vec![ChartConfig::new(7)],
            }],
            selected: None,
            next_chart_id: 8,
        };
        store.select_or_create("d");
        assert_eq!(store.add_chart_to_selected(), Some(8));
    }

    #[test]
    fn select_or_create_appends_missing_dashboard() {
        let mut store = DashboardStore {
            path: PathBuf::new(),
            dashboards: Vec::new(),
            selected: None,
            next_chart_id: 0,
        };
        store.select_or_create("nightly");
        assert_eq!(store.dashboards().len(), 1);
        assert_eq!(store.selected().unwrap().name, "nightly");
        store.select_or_create("nightly");
        assert_eq!(store.dashboards().len(), 1);
    }
}
