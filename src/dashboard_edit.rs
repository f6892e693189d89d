//! Dashboard edit state: focus, suggestion caches, derived candidate lists,
//! and the debounced timeline refresh.

use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::bench::CandidateLists;
use crate::dashboard::{ChartId, ChartKind, Dashboard, KIND_CHOICES};
use crate::debounce::Debounce;
use crate::store::BenchStore;
use crate::suggest;

/// Which field of a chart row is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartField {
    Metric,
    Kind,
    Group,
    /// X env input for group charts; the Number/Time selector for regression
    /// charts. Not focusable for compare charts.
    X,
    Description,
}

/// Focus area in the edit view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFocus {
    Name,
    Criteria,
    Chart { index: usize, field: ChartField },
}

/// A timeline refresh produced by the debounce. The query string doubles as
/// the tag echoed back through [`BenchStore::apply_timeline`] for the
/// staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRequest {
    pub query: String,
    pub limit: u64,
}

/// Editor state for the dashboard under edit. The draft itself lives in the
/// dashboard store; this struct only holds derived state (candidate lists,
/// suggestion caches, timeline total) and the focus/debounce machinery.
///
/// Suggestion caches are keyed by chart id, so reordering or deleting charts
/// can never strand a cache entry at a wrong position.
pub struct DashboardEdit {
    pub focus: EditFocus,
    pub candidates: CandidateLists,
    /// Matching-run count for the current criteria; `None` while a refresh for
    /// the current criteria is still outstanding.
    pub total: Option<u64>,
    pub tag_suggestions: Vec<String>,
    /// Highlight within the active suggestion list.
    pub suggestion_state: ListState,
    metric_suggestions: HashMap<ChartId, Vec<String>>,
    group_suggestions: HashMap<ChartId, Vec<String>>,
    x_suggestions: HashMap<ChartId, Vec<String>>,
    debounce: Debounce,
    bench_limit: u64,
}

impl DashboardEdit {
    pub fn new(update_interval: Duration, bench_limit: u64) -> Self {
        Self {
            focus: EditFocus::Name,
            candidates: CandidateLists::default(),
            total: None,
            tag_suggestions: Vec::new(),
            suggestion_state: ListState::default(),
            metric_suggestions: HashMap::new(),
            group_suggestions: HashMap::new(),
            x_suggestions: HashMap::new(),
            debounce: Debounce::new(update_interval),
            bench_limit,
        }
    }

    /// Begin editing `draft`: reset focus, seed the criteria tag suggestions,
    /// and compute all derived state.
    pub fn open(&mut self, draft: &Dashboard, store: &BenchStore) {
        self.focus = EditFocus::Name;
        self.suggestion_state.select(None);
        self.tag_suggestions = suggest::tag_suggestions(&draft.criteria, &store.all_tags());
        self.resolve_derived_state(draft, store);
    }

    /// Stop editing: a pending debounce must never fire against a closed
    /// editor.
    pub fn close(&mut self) {
        self.debounce.cancel();
    }

    /// Recompute everything derived from the draft and the benchmark
    /// collection: the timeline total (pending when the stored timeline was
    /// computed for a different criteria string), the global candidate lists,
    /// and any missing suggestion-cache slots. Idempotent: populated slots are
    /// never overwritten, only gaps are filled and entries for deleted charts
    /// dropped.
    pub fn resolve_derived_state(&mut self, draft: &Dashboard, store: &BenchStore) {
        self.total = if store.timeline_id() == Some(draft.criteria.as_str()) {
            Some(store.total())
        } else {
            None
        };
        self.candidates = CandidateLists::from_records(store.items());

        let live: std::collections::HashSet<ChartId> =
            draft.charts.iter().map(|c| c.id).collect();
        self.metric_suggestions.retain(|id, _| live.contains(id));
        self.group_suggestions.retain(|id, _| live.contains(id));
        self.x_suggestions.retain(|id, _| live.contains(id));

        for chart in &draft.charts {
            self.metric_suggestions.entry(chart.id).or_insert_with(|| {
                suggest::filter_suggestions(
                    &chart.metric,
                    metric_candidates(&self.candidates, chart.kind),
                )
            });
            self.group_suggestions.entry(chart.id).or_insert_with(|| {
                suggest::filter_suggestions(&chart.group_env, &self.candidates.envs)
            });
            self.x_suggestions.entry(chart.id).or_insert_with(|| {
                suggest::filter_suggestions(&chart.x_env, &self.candidates.envs)
            });
        }
    }

    /// Current position of a chart by stable id. Unknown ids resolve to
    /// `None` and every caller treats that as a no-op.
    pub fn index_of(&self, draft: &Dashboard, id: ChartId) -> Option<usize> {
        draft.charts.iter().position(|c| c.id == id)
    }

    /// Swap the chart with its predecessor. No-op at the top or for unknown
    /// ids. Focus follows the chart it was on.
    pub fn move_up(&mut self, draft: &mut Dashboard, id: ChartId) {
        if let Some(idx) = self.index_of(draft, id) {
            if idx > 0 {
                draft.charts.swap(idx, idx - 1);
                self.follow_swap(idx, idx - 1);
            }
        }
    }

    /// Swap the chart with its successor. No-op at the bottom or for unknown
    /// ids.
    pub fn move_down(&mut self, draft: &mut Dashboard, id: ChartId) {
        if let Some(idx) = self.index_of(draft, id) {
            if idx + 1 < draft.charts.len() {
                draft.charts.swap(idx, idx + 1);
                self.follow_swap(idx, idx + 1);
            }
        }
    }

    fn follow_swap(&mut self, from: usize, to: usize) {
        if let EditFocus::Chart { index, .. } = &mut self.focus {
            if *index == from {
                *index = to;
            } else if *index == to {
                *index = from;
            }
        }
    }

    /// Remove a chart and its suggestion caches. No-op for unknown ids.
    pub fn delete_chart(&mut self, draft: &mut Dashboard, id: ChartId) {
        let Some(idx) = self.index_of(draft, id) else {
            return;
        };
        draft.charts.remove(idx);
        self.metric_suggestions.remove(&id);
        self.group_suggestions.remove(&id);
        self.x_suggestions.remove(&id);

        if let EditFocus::Chart { index, .. } = &mut self.focus {
            if draft.charts.is_empty() {
                self.focus = EditFocus::Criteria;
            } else if *index > idx || *index >= draft.charts.len() {
                *index = index.saturating_sub(1);
            }
        }
    }

    /// Write the criteria through immediately, refresh its tag suggestions,
    /// mark the total pending, and (re)arm the debounce. Only the last value
    /// within the window reaches the timeline query.
    pub fn set_criteria(
        &mut self,
        draft: &mut Dashboard,
        all_tags: &[String],
        value: String,
        now: Instant,
    ) {
        draft.criteria = value.clone();
        self.tag_suggestions = suggest::tag_suggestions(&value, all_tags);
        self.total = None;
        self.debounce.arm(value, now);
    }

    /// Fire the debounce if due. At most one request per arm.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<TimelineRequest> {
        self.debounce.poll(now).map(|query| TimelineRequest {
            query,
            limit: self.bench_limit,
        })
    }

    pub fn debounce_armed(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn bench_limit(&self) -> u64 {
        self.bench_limit
    }

    /// Write one text field of a chart. No suggestion slot is touched here;
    /// the per-field update below is called by the input that owns the field.
    pub fn set_chart_text_field(
        &self,
        draft: &mut Dashboard,
        id: ChartId,
        field: ChartField,
        value: &str,
    ) {
        let Some(idx) = self.index_of(draft, id) else {
            return;
        };
        let chart = &mut draft.charts[idx];
        match field {
            ChartField::Metric => chart.metric = value.to_string(),
            ChartField::Group => chart.group_env = value.to_string(),
            ChartField::X => chart.x_env = value.to_string(),
            ChartField::Description => chart.description = value.to_string(),
            ChartField::Kind => {}
        }
    }

    /// Cycle the kind/size preset forwards or backwards.
    pub fn cycle_kind(&self, draft: &mut Dashboard, id: ChartId, forward: bool) {
        let Some(idx) = self.index_of(draft, id) else {
            return;
        };
        let chart = &mut draft.charts[idx];
        let current = chart.kind_choice_index().unwrap_or(0);
        let next = if forward {
            (current + 1) % KIND_CHOICES.len()
        } else {
            (current + KIND_CHOICES.len() - 1) % KIND_CHOICES.len()
        };
        let (kind, size) = KIND_CHOICES[next];
        chart.kind = kind;
        chart.size = size;
    }

    /// Flip the regression x-axis between Number and Time.
    pub fn cycle_regression_x(&self, draft: &mut Dashboard, id: ChartId) {
        let Some(idx) = self.index_of(draft, id) else {
            return;
        };
        let chart = &mut draft.charts[idx];
        chart.regression_x = match chart.regression_x {
            crate::dashboard::RegressionX::Number => crate::dashboard::RegressionX::Time,
            crate::dashboard::RegressionX::Time => crate::dashboard::RegressionX::Number,
        };
    }

    /// Recompute exactly the metric suggestion slot for one chart, leaving
    /// every other slot untouched.
    pub fn update_metric_suggestions(&mut self, draft: &Dashboard, id: ChartId, value: &str) {
        let Some(idx) = self.index_of(draft, id) else {
            return;
        };
        let kind = draft.charts[idx].kind;
        let slot = suggest::filter_suggestions(value, metric_candidates(&self.candidates, kind));
        self.metric_suggestions.insert(id, slot);
    }

    pub fn update_group_suggestions(&mut self, draft: &Dashboard, id: ChartId, value: &str) {
        if self.index_of(draft, id).is_none() {
            return;
        }
        let slot = suggest::filter_suggestions(value, &self.candidates.envs);
        self.group_suggestions.insert(id, slot);
    }

    pub fn update_x_suggestions(&mut self, draft: &Dashboard, id: ChartId, value: &str) {
        if self.index_of(draft, id).is_none() {
            return;
        }
        let slot = suggest::filter_suggestions(value, &self.candidates.envs);
        self.x_suggestions.insert(id, slot);
    }

    pub fn update_tag_suggestions(&mut self, all_tags: &[String], value: &str) {
        self.tag_suggestions = suggest::tag_suggestions(value, all_tags);
    }

    pub fn metric_suggestions(&self, id: ChartId) -> &[String] {
        self.metric_suggestions.get(&id).map_or(&[], |v| v.as_slice())
    }

    pub fn group_suggestions(&self, id: ChartId) -> &[String] {
        self.group_suggestions.get(&id).map_or(&[], |v| v.as_slice())
    }

    pub fn x_suggestions(&self, id: ChartId) -> &[String] {
        self.x_suggestions.get(&id).map_or(&[], |v| v.as_slice())
    }

    /// Suggestions for the focused field, if it is a suggesting text field.
    pub fn active_suggestions<'a>(&'a self, draft: &Dashboard) -> Option<&'a [String]> {
        match self.focus {
            EditFocus::Criteria => Some(&self.tag_suggestions),
            EditFocus::Chart { index, field } => {
                let chart = draft.charts.get(index)?;
                match field {
                    ChartField::Metric => Some(self.metric_suggestions(chart.id)),
                    ChartField::Group => Some(self.group_suggestions(chart.id)),
                    ChartField::X if chart.kind == ChartKind::Group => {
                        Some(self.x_suggestions(chart.id))
                    }
                    _ => None,
                }
            }
            EditFocus::Name => None,
        }
    }

    /// The draft value behind the focused field, when it is a text field.
    pub fn focused_text<'a>(&self, draft: &'a Dashboard) -> Option<&'a str> {
        match self.focus {
            EditFocus::Name => Some(&draft.name),
            EditFocus::Criteria => Some(&draft.criteria),
            EditFocus::Chart { index, field } => {
                let chart = draft.charts.get(index)?;
                match field {
                    ChartField::Metric => Some(&chart.metric),
                    ChartField::Group => Some(&chart.group_env),
                    ChartField::X if chart.kind == ChartKind::Group => Some(&chart.x_env),
                    ChartField::Description => Some(&chart.description),
                    _ => None,
                }
            }
        }
    }

    /// Move focus to the next field, walking name, criteria, then each chart's
    /// fields in row order. The X slot is skipped for compare charts.
    pub fn next_focus(&mut self, draft: &Dashboard) {
        self.suggestion_state.select(None);
        self.focus = match self.focus {
            EditFocus::Name => EditFocus::Criteria,
            EditFocus::Criteria => first_chart_focus(draft).unwrap_or(EditFocus::Name),
            EditFocus::Chart { index, field } => {
                let kind = draft.charts.get(index).map(|c| c.kind);
                match next_field(field, kind) {
                    Some(field) => EditFocus::Chart { index, field },
                    None if index + 1 < draft.charts.len() => EditFocus::Chart {
                        index: index + 1,
                        field: ChartField::Metric,
                    },
                    None => EditFocus::Name,
                }
            }
        };
    }

    pub fn prev_focus(&mut self, draft: &Dashboard) {
        self.suggestion_state.select(None);
        self.focus = match self.focus {
            EditFocus::Name => last_chart_focus(draft).unwrap_or(EditFocus::Criteria),
            EditFocus::Criteria => EditFocus::Name,
            EditFocus::Chart { index, field } => {
                let kind = draft.charts.get(index).map(|c| c.kind);
                match prev_field(field, kind) {
                    Some(field) => EditFocus::Chart { index, field },
                    None if index > 0 => EditFocus::Chart {
                        index: index - 1,
                        field: ChartField::Description,
                    },
                    None => EditFocus::Criteria,
                }
            }
        };
    }
}

fn metric_candidates(candidates: &CandidateLists, kind: ChartKind) -> &[String] {
    match kind {
        ChartKind::Compare => &candidates.metrics,
        _ => &candidates.results,
    }
}

fn first_chart_focus(draft: &Dashboard) -> Option<EditFocus> {
    (!draft.charts.is_empty()).then_some(EditFocus::Chart {
        index: 0,
        field: ChartField::Metric,
    })
}

fn last_chart_focus(draft: &Dashboard) -> Option<EditFocus> {
    (!draft.charts.is_empty()).then_some(EditFocus::Chart {
        index: draft.charts.len() - 1,
        field: ChartField::Description,
    })
}

fn next_field(field: ChartField, kind: Option<ChartKind>) -> Option<ChartField> {
    match field {
        ChartField::Metric => Some(ChartField::Kind),
        ChartField::Kind => Some(ChartField::Group),
        ChartField::Group => match kind {
            Some(ChartKind::Compare) | None => Some(ChartField::Description),
            _ => Some(ChartField::X),
        },
        ChartField::X => Some(ChartField::Description),
        ChartField::Description => None,
    }
}

fn prev_field(field: ChartField, kind: Option<ChartKind>) -> Option<ChartField> {
    match field {
        ChartField::Metric => None,
        ChartField::Kind => Some(ChartField::Metric),
        ChartField::Group => Some(ChartField::Kind),
        ChartField::X => Some(ChartField::Group),
        ChartField::Description => match kind {
            Some(ChartKind::Compare) | None => Some(ChartField::Group),
            _ => Some(ChartField::X),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{
        BenchStatus, BenchmarkRecord, EnvEntry, Graph, Metric, MetricGroup, MetricsInfo,
    };
    use crate::dashboard::ChartConfig;
    use chrono::Utc;

    const WINDOW: Duration = Duration::from_millis(500);

    fn record(id: u64, metrics: &[&str], envs: &[&str], results: &[&str]) -> BenchmarkRecord {
        BenchmarkRecord {
            id,
            name: format!("bench-{}", id),
            status: BenchStatus::Complete,
            start_time: Utc::now(),
            tags: Vec::new(),
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
                .map(|n| EnvEntry {
                    name: n.to_string(),
                    value: "1".to_string(),
                })
                .collect(),
            results: results
                .iter()
                .map(|k| (k.to_string(), serde_json::json!(0)))
                .collect(),
        }
    }

    fn store() -> BenchStore {
        BenchStore::with_items(vec![record(
            1,
            &["latency", "throughput"],
            &["workers", "pool_size"],
            &["rps.max", "rps.mean"],
        )])
    }

    fn draft_with_charts(ids: &[ChartId]) -> Dashboard {
        Dashboard {
            name: "d".to_string(),
            criteria: String::new(),
            charts: ids.iter().map(|&id| ChartConfig::new(id)).collect(),
        }
    }

    fn editor() -> DashboardEdit {
        DashboardEdit::new(WINDOW, 20)
    }

    #[test]
    fn resolve_fills_slots_for_every_chart() {
        let draft = draft_with_charts(&[1, 2]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        // Compare charts suggest from metric names; empty field matches all.
        assert_eq!(edit.metric_suggestions(1), ["latency", "throughput"]);
        assert_eq!(edit.group_suggestions(2), ["workers", "pool_size"]);
        assert_eq!(edit.x_suggestions(1), ["workers", "pool_size"]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let draft = draft_with_charts(&[1, 2]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        edit.update_metric_suggestions(&draft, 1, "lat");
        let before = edit.metric_suggestions(1).to_vec();
        edit.resolve_derived_state(&draft, &store);
        // Populated slots survive; resolve only fills gaps.
        assert_eq!(edit.metric_suggestions(1), before.as_slice());
        assert_eq!(edit.candidates, CandidateLists::from_records(store.items()));
    }

    #[test]
    fn non_compare_charts_suggest_from_result_keys() {
        let mut draft = draft_with_charts(&[1]);
        draft.charts[0].kind = ChartKind::Regression;
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        assert_eq!(edit.metric_suggestions(1), ["rps.max", "rps.mean"]);
    }

    #[test]
    fn total_is_pending_until_timeline_matches_criteria() {
        let mut draft = draft_with_charts(&[]);
        draft.criteria = "http".to_string();
        let mut store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        assert_eq!(edit.total, None);
        store.apply_timeline("http".to_string(), 4);
        edit.resolve_derived_state(&draft, &store);
        assert_eq!(edit.total, Some(4));
        store.apply_timeline("other".to_string(), 9);
        edit.resolve_derived_state(&draft, &store);
        assert_eq!(edit.total, None);
    }

    #[test]
    fn move_up_swaps_with_predecessor() {
        let mut draft = draft_with_charts(&[10, 20, 30]);
        let mut edit = editor();
        edit.move_up(&mut draft, 20);
        let order: Vec<_> = draft.charts.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![20, 10, 30]);
    }

    #[test]
    fn move_down_swaps_with_successor() {
        let mut draft = draft_with_charts(&[10, 20, 30]);
        let mut edit = editor();
        edit.move_down(&mut draft, 20);
        let order: Vec<_> = draft.charts.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![10, 30, 20]);
    }

    #[test]
    fn moves_are_noops_at_boundaries() {
        let mut draft = draft_with_charts(&[10, 20]);
        let mut edit = editor();
        edit.move_up(&mut draft, 10);
        edit.move_down(&mut draft, 20);
        let order: Vec<_> = draft.charts.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![10, 20]);
    }

    #[test]
    fn moves_ignore_unknown_ids() {
        let mut draft = draft_with_charts(&[10, 20]);
        let mut edit = editor();
        edit.move_up(&mut draft, 99);
        edit.move_down(&mut draft, 99);
        edit.delete_chart(&mut draft, 99);
        assert_eq!(draft.charts.len(), 2);
    }

    #[test]
    fn caches_follow_charts_across_reorder() {
        let mut draft = draft_with_charts(&[10, 20]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        edit.update_metric_suggestions(&draft, 20, "lat");
        let slot = edit.metric_suggestions(20).to_vec();
        edit.move_up(&mut draft, 20);
        // Id-keyed caches: the slot still belongs to chart 20 at its new
        // position, nothing went stale.
        assert_eq!(edit.metric_suggestions(20), slot.as_slice());
    }

    #[test]
    fn delete_removes_chart_and_caches() {
        let mut draft = draft_with_charts(&[10, 20, 30]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        edit.delete_chart(&mut draft, 20);
        let order: Vec<_> = draft.charts.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![10, 30]);
        assert_eq!(edit.index_of(&draft, 20), None);
        assert!(edit.metric_suggestions(20).is_empty());
    }

    #[test]
    fn focus_follows_moved_chart() {
        let mut draft = draft_with_charts(&[10, 20]);
        let mut edit = editor();
        edit.focus = EditFocus::Chart {
            index: 1,
            field: ChartField::Metric,
        };
        edit.move_up(&mut draft, 20);
        assert_eq!(
            edit.focus,
            EditFocus::Chart {
                index: 0,
                field: ChartField::Metric
            }
        );
    }

    #[test]
    fn focus_leaves_chart_rows_when_all_deleted() {
        let mut draft = draft_with_charts(&[10]);
        let mut edit = editor();
        edit.focus = EditFocus::Chart {
            index: 0,
            field: ChartField::Description,
        };
        edit.delete_chart(&mut draft, 10);
        assert_eq!(edit.focus, EditFocus::Criteria);
    }

    #[test]
    fn debounce_delivers_only_last_criteria() {
        let mut draft = draft_with_charts(&[]);
        let mut edit = editor();
        let tags: Vec<String> = Vec::new();
        let start = Instant::now();
        edit.set_criteria(&mut draft, &tags, "x".to_string(), start);
        edit.set_criteria(
            &mut draft,
            &tags,
            "xy".to_string(),
            start + Duration::from_millis(100),
        );
        assert_eq!(draft.criteria, "xy");
        assert_eq!(edit.total, None);
        assert_eq!(edit.poll_debounce(start + WINDOW), None);
        assert_eq!(
            edit.poll_debounce(start + Duration::from_millis(100) + WINDOW),
            Some(TimelineRequest {
                query: "xy".to_string(),
                limit: 20,
            })
        );
        assert_eq!(edit.poll_debounce(start + WINDOW * 4), None);
    }

    #[test]
    fn close_cancels_pending_debounce() {
        let mut draft = draft_with_charts(&[]);
        let mut edit = editor();
        let start = Instant::now();
        edit.set_criteria(&mut draft, &[], "x".to_string(), start);
        edit.close();
        assert_eq!(edit.poll_debounce(start + WINDOW), None);
    }

    #[test]
    fn criteria_updates_refresh_tag_suggestions() {
        let mut draft = draft_with_charts(&[]);
        let mut edit = editor();
        let tags = vec!["bar".to_string(), "baz".to_string(), "qux".to_string()];
        edit.set_criteria(&mut draft, &tags, "foo#ba".to_string(), Instant::now());
        assert_eq!(edit.tag_suggestions, vec!["foo#bar", "foo#baz"]);
    }

    #[test]
    fn tag_update_without_hash_clears_suggestions() {
        let mut edit = editor();
        let tags = vec!["nightly".to_string()];
        edit.update_tag_suggestions(&tags, "night#");
        assert_eq!(edit.tag_suggestions, vec!["night#nightly"]);
        edit.update_tag_suggestions(&tags, "night");
        assert!(edit.tag_suggestions.is_empty());
    }

    #[test]
    fn per_field_update_touches_one_slot() {
        let draft = draft_with_charts(&[1, 2]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        let other = edit.metric_suggestions(2).to_vec();
        edit.update_metric_suggestions(&draft, 1, "through");
        assert_eq!(edit.metric_suggestions(1), ["throughput"]);
        assert_eq!(edit.metric_suggestions(2), other.as_slice());
    }

    #[test]
    fn per_field_update_ignores_unknown_ids() {
        let draft = draft_with_charts(&[1]);
        let store = store();
        let mut edit = editor();
        edit.resolve_derived_state(&draft, &store);
        edit.update_metric_suggestions(&draft, 99, "x");
        assert!(edit.metric_suggestions(99).is_empty());
    }

    #[test]
    fn cycle_kind_walks_the_choice_list() {
        let mut draft = draft_with_charts(&[1]);
        let edit = editor();
        edit.cycle_kind(&mut draft, 1, true);
        assert_eq!(draft.charts[0].kind, ChartKind::Compare);
        assert_eq!(draft.charts[0].size, 10);
        edit.cycle_kind(&mut draft, 1, true);
        assert_eq!(draft.charts[0].kind, ChartKind::Regression);
        edit.cycle_kind(&mut draft, 1, false);
        assert_eq!(draft.charts[0].kind, ChartKind::Compare);
        assert_eq!(draft.charts[0].size, 10);
    }

    #[test]
    fn focus_walk_skips_x_for_compare_charts() {
        let draft = draft_with_charts(&[1]);
        let mut edit = editor();
        edit.focus = EditFocus::Chart {
            index: 0,
            field: ChartField::Group,
        };
        edit.next_focus(&draft);
        assert_eq!(
            edit.focus,
            EditFocus::Chart {
                index: 0,
                field: ChartField::Description
            }
        );
    }

    #[test]
    fn focus_walk_visits_x_for_group_charts() {
        let mut draft = draft_with_charts(&[1]);
        draft.charts[0].kind = ChartKind::Group;
        let mut edit = editor();
        edit.focus = EditFocus::Chart {
            index: 0,
            field: ChartField::Group,
        };
        edit.next_focus(&draft);
        assert_eq!(
            edit.focus,
            EditFocus::Chart {
                index: 0,
                field: ChartField::X
            }
        );
    }

    #[test]
    fn focus_wraps_around_the_whole_form() {
        let draft = draft_with_charts(&[1]);
        let mut edit = editor();
        // Name -> Criteria -> chart fields -> back to Name.
        for _ in 0..6 {
            edit.next_focus(&draft);
        }
        assert_eq!(edit.focus, EditFocus::Name);
        edit.prev_focus(&draft);
        assert_eq!(
            edit.focus,
            EditFocus::Chart {
                index: 0,
                field: ChartField::Description
            }
        );
    }

    #[test]
    fn focus_skips_chart_rows_when_empty() {
        let draft = draft_with_charts(&[]);
        let mut edit = editor();
        edit.next_focus(&draft); // Name -> Criteria
        edit.next_focus(&draft); // Criteria -> Name (no charts)
        assert_eq!(edit.focus, EditFocus::Name);
    }

    #[test]
    fn active_suggestions_track_focus() {
        let mut draft = draft_with_charts(&[1]);
        draft.charts[0].kind = ChartKind::Group;
        let store = store();
        let mut edit = editor();
        edit.open(&draft, &store);
        assert_eq!(edit.active_suggestions(&draft), None); // Name
        edit.focus = EditFocus::Criteria;
        assert!(edit.active_suggestions(&draft).is_some());
        edit.focus = EditFocus::Chart {
            index: 0,
            field: ChartField::X,
        };
        assert_eq!(
            edit.active_suggestions(&draft),
            Some(edit.x_suggestions(1))
        );
    }
}
