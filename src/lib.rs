use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget, widgets::Widget};

pub mod bench;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dashboard_edit;
pub mod debounce;
pub mod store;
pub mod suggest;
pub mod widgets;

pub use cache::CacheManager;
pub use cli::Args;
pub use config::{rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme};

use dashboard::{kind_label, ChartConfig, ChartKind};
use dashboard_edit::{ChartField, DashboardEdit, EditFocus};
use store::{run_timeline_query, BenchStore, DashboardStore};
use widgets::controls::Controls;
use widgets::suggestion_list::SuggestionList;
use widgets::text_input::{TextInput, TextInputEvent};

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "benchdash";

/// Rows of suggestions shown below the focused field
const SUGGESTION_ROWS: usize = 6;

/// How to open the dashboards file alongside the benchmarks file.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub dashboards: Option<PathBuf>,
    pub dashboard: Option<String>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dashboards(mut self, path: PathBuf) -> Self {
        self.dashboards = Some(path);
        self
    }

    pub fn with_dashboard(mut self, name: String) -> Self {
        self.dashboard = Some(name);
        self
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf, OpenOptions),
    /// Debounce fired: run the timeline query for this criteria string. The
    /// string is echoed back as the timeline tag.
    Timeline(String),
    /// The benchmark collection changed; derived editor state must be
    /// recomputed.
    BenchUpdate,
    Save,
    Exit,
    Crash(String),
    Resize(u16, u16),
}

pub struct App {
    events: Sender<AppEvent>,
    pub bench_store: Option<BenchStore>,
    pub dashboard_store: Option<DashboardStore>,
    pub edit: DashboardEdit,
    input: TextInput,
    cache: CacheManager,
    theme: Theme,
    config: AppConfig,
    error: Option<String>,
    status: Option<String>,
    debug_enabled: bool,
    num_events: u64,
    num_frames: u64,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to create default theme: {}. Using fallback.",
                e
            );
            Theme {
                colors: std::collections::HashMap::new(),
            }
        });

        Self::new_with_config(events, theme, AppConfig::default())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, config: AppConfig) -> App {
        let cache = CacheManager::new(APP_NAME).unwrap_or_else(|e| {
            eprintln!("Warning: Could not initialize cache manager: {}", e);
            CacheManager {
                cache_dir: std::env::temp_dir().join(APP_NAME),
            }
        });

        let edit = DashboardEdit::new(
            Duration::from_millis(config.editor.update_interval_ms),
            config.editor.bench_limit,
        );

        App {
            events,
            bench_store: None,
            dashboard_store: None,
            edit,
            input: TextInput::new(),
            cache,
            theme,
            config,
            error: None,
            status: None,
            debug_enabled: false,
            num_events: 0,
            num_frames: 0,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn enable_debug(&mut self) {
        self.debug_enabled = true;
    }

    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    /// Poll the editor's debounce. Called by the main loop every iteration so
    /// a pending timeline query fires even when no input arrives.
    pub fn tick(&mut self) -> Option<AppEvent> {
        self.edit
            .poll_debounce(Instant::now())
            .map(|req| AppEvent::Timeline(req.query))
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Open(path, options) => match self.open(path.clone(), options) {
                Ok(next) => next,
                Err(e) => Some(AppEvent::Crash(e.to_string())),
            },
            AppEvent::Timeline(tag) => {
                let bench = self.bench_store.as_mut()?;
                let total = run_timeline_query(bench.items(), tag, self.edit.bench_limit());
                bench.apply_timeline(tag.clone(), total);
                Some(AppEvent::BenchUpdate)
            }
            AppEvent::BenchUpdate => {
                if let (Some(bench), Some(ds)) = (&self.bench_store, &self.dashboard_store) {
                    if let Ok(draft) = ds.selected() {
                        self.edit.resolve_derived_state(draft, bench);
                    }
                }
                None
            }
            AppEvent::Save => {
                if let Some(ds) = &self.dashboard_store {
                    match ds.save() {
                        Ok(()) => {
                            self.error = None;
                            self.status =
                                Some(format!("Saved to {}", ds.path().display()));
                        }
                        Err(e) => self.error = Some(format!("Save failed: {}", e)),
                    }
                }
                None
            }
            AppEvent::Resize(_, _) => None,
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn open(&mut self, path: PathBuf, options: &OpenOptions) -> Result<Option<AppEvent>> {
        let bench = BenchStore::load(&path)?;
        let dashboards_path = options
            .dashboards
            .clone()
            .unwrap_or_else(|| path.with_file_name("dashboards.json"));
        let mut ds = DashboardStore::load(&dashboards_path)?;

        let draft = match &options.dashboard {
            Some(name) => ds.select_or_create(name),
            None => ds.select_first(),
        };
        let criteria = draft.criteria.clone();

        self.edit = DashboardEdit::new(
            Duration::from_millis(self.config.editor.update_interval_ms),
            self.config.editor.bench_limit,
        );
        self.edit.open(draft, &bench);

        let needs_timeline = bench.timeline_id() != Some(criteria.as_str());
        self.bench_store = Some(bench);
        self.dashboard_store = Some(ds);
        self.sync_input_from_focus();

        // Mirror of the mount-time fetch: the stored timeline may belong to a
        // different criteria string.
        Ok(needs_timeline.then_some(AppEvent::Timeline(criteria)))
    }

    fn key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        if self.dashboard_store.is_none() {
            return matches!(key.code, KeyCode::Esc).then_some(AppEvent::Exit);
        }
        self.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.control_key(key);
        }

        match key.code {
            KeyCode::Esc => {
                if self.edit.suggestion_state.selected().is_some() {
                    self.edit.suggestion_state.select(None);
                    None
                } else {
                    self.edit.close();
                    Some(AppEvent::Exit)
                }
            }
            KeyCode::Tab => {
                self.move_focus(true);
                None
            }
            KeyCode::BackTab => {
                self.move_focus(false);
                None
            }
            KeyCode::Up | KeyCode::Down if self.suggestions_visible() => {
                self.navigate_suggestions(key.code == KeyCode::Down);
                None
            }
            KeyCode::Enter if self.edit.suggestion_state.selected().is_some() => {
                self.accept_suggestion();
                None
            }
            KeyCode::Left | KeyCode::Right if self.focused_enum_field() => {
                self.cycle_enum_field(key.code == KeyCode::Right);
                None
            }
            _ => self.forward_to_input(key),
        }
    }

    fn control_key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('s') => Some(AppEvent::Save),
            KeyCode::Char('q') => {
                self.edit.close();
                Some(AppEvent::Exit)
            }
            KeyCode::Char('k') => {
                self.add_chart();
                None
            }
            KeyCode::Char('d') => {
                self.delete_focused_chart();
                None
            }
            KeyCode::Char('r') => {
                let bench = self.bench_store.as_mut()?;
                match bench.reload() {
                    Ok(()) => {
                        self.error = None;
                        // Recount for the current criteria, then re-resolve.
                        let criteria = self
                            .dashboard_store
                            .as_ref()
                            .and_then(|ds| ds.selected().ok())
                            .map(|d| d.criteria.clone())?;
                        Some(AppEvent::Timeline(criteria))
                    }
                    Err(e) => {
                        self.error = Some(format!("Reload failed: {}", e));
                        None
                    }
                }
            }
            KeyCode::Up => {
                self.move_focused_chart(true);
                None
            }
            KeyCode::Down => {
                self.move_focused_chart(false);
                None
            }
            _ => None,
        }
    }

    fn chart_id_at(&self, index: usize) -> Option<u64> {
        self.dashboard_store
            .as_ref()?
            .selected()
            .ok()?
            .charts
            .get(index)
            .map(|c| c.id)
    }

    fn focused_is_text(&self) -> bool {
        let Some(ds) = &self.dashboard_store else {
            return false;
        };
        let Ok(draft) = ds.selected() else {
            return false;
        };
        self.edit.focused_text(draft).is_some()
    }

    fn focused_enum_field(&self) -> bool {
        match self.edit.focus {
            EditFocus::Chart {
                index,
                field: ChartField::Kind,
            } => self.chart_id_at(index).is_some(),
            EditFocus::Chart {
                index,
                field: ChartField::X,
            } => self
                .chart_kind_at(index)
                .is_some_and(|kind| kind == ChartKind::Regression),
            _ => false,
        }
    }

    fn chart_kind_at(&self, index: usize) -> Option<ChartKind> {
        self.dashboard_store
            .as_ref()?
            .selected()
            .ok()?
            .charts
            .get(index)
            .map(|c| c.kind)
    }

    fn suggestions_visible(&self) -> bool {
        let Some(ds) = &self.dashboard_store else {
            return false;
        };
        let Ok(draft) = ds.selected() else {
            return false;
        };
        self.edit
            .active_suggestions(draft)
            .is_some_and(|s| !s.is_empty())
    }

    fn move_focus(&mut self, forward: bool) {
        let Some(ds) = &self.dashboard_store else {
            return;
        };
        let Ok(draft) = ds.selected() else {
            return;
        };
        if forward {
            self.edit.next_focus(draft);
        } else {
            self.edit.prev_focus(draft);
        }
        self.sync_input_from_focus();
    }

    /// Rebuild the shared text input from the draft value behind the focused
    /// field. The criteria field gets the history-backed input.
    fn sync_input_from_focus(&mut self) {
        let value = {
            let Some(ds) = &self.dashboard_store else {
                return;
            };
            let Ok(draft) = ds.selected() else {
                return;
            };
            self.edit
                .focused_text(draft)
                .unwrap_or_default()
                .to_string()
        };

        let mut input = TextInput::new().with_text_color(self.color("text_primary"));
        if self.edit.focus == EditFocus::Criteria {
            // Entering the field recomputes its suggestions for the current
            // value.
            let tags = self
                .bench_store
                .as_ref()
                .map(|b| b.all_tags())
                .unwrap_or_default();
            self.edit.update_tag_suggestions(&tags, &value);
            if self.config.editor.enable_history {
                input = input
                    .with_history("criteria".to_string())
                    .with_history_limit(self.config.editor.history_limit);
            }
        }
        input.set_value(value);
        input.set_focused(true);
        self.input = input;
    }

    fn forward_to_input(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        if !self.focused_is_text() {
            if key.code == KeyCode::Enter {
                self.move_focus(true);
            }
            return None;
        }

        match self.input.handle_key(key, Some(&self.cache)) {
            TextInputEvent::Changed | TextInputEvent::HistoryChanged => {
                self.apply_input_change();
                None
            }
            TextInputEvent::Submit => {
                self.move_focus(true);
                None
            }
            TextInputEvent::Cancel | TextInputEvent::None => None,
        }
    }

    /// Write the edited value through to the draft and refresh exactly the
    /// suggestion slot owned by the focused field.
    fn apply_input_change(&mut self) {
        let value = self.input.value().to_string();
        self.edit.suggestion_state.select(None);

        match self.edit.focus {
            EditFocus::Name => {
                if let Some(ds) = self.dashboard_store.as_mut() {
                    ds.with_selected(|d| d.name = value.clone());
                }
            }
            EditFocus::Criteria => {
                let tags = self
                    .bench_store
                    .as_ref()
                    .map(|b| b.all_tags())
                    .unwrap_or_default();
                let now = Instant::now();
                let edit = &mut self.edit;
                if let Some(ds) = self.dashboard_store.as_mut() {
                    ds.with_selected(|d| edit.set_criteria(d, &tags, value.clone(), now));
                }
            }
            EditFocus::Chart { index, field } => {
                let Some(id) = self.chart_id_at(index) else {
                    return;
                };
                let edit = &mut self.edit;
                if let Some(ds) = self.dashboard_store.as_mut() {
                    ds.with_selected(|d| edit.set_chart_text_field(d, id, field, &value));
                }
                let Some(ds) = self.dashboard_store.as_ref() else {
                    return;
                };
                let Ok(draft) = ds.selected() else {
                    return;
                };
                match field {
                    ChartField::Metric => self.edit.update_metric_suggestions(draft, id, &value),
                    ChartField::Group => self.edit.update_group_suggestions(draft, id, &value),
                    ChartField::X => self.edit.update_x_suggestions(draft, id, &value),
                    ChartField::Kind | ChartField::Description => {}
                }
            }
        }
    }

    fn navigate_suggestions(&mut self, down: bool) {
        let len = {
            let Some(ds) = &self.dashboard_store else {
                return;
            };
            let Ok(draft) = ds.selected() else {
                return;
            };
            self.edit
                .active_suggestions(draft)
                .map_or(0, |s| s.len())
        };
        if len == 0 {
            return;
        }
        let next = match self.edit.suggestion_state.selected() {
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.edit.suggestion_state.select(Some(next));
    }

    fn accept_suggestion(&mut self) {
        let chosen = {
            let Some(ds) = &self.dashboard_store else {
                return;
            };
            let Ok(draft) = ds.selected() else {
                return;
            };
            let Some(suggestions) = self.edit.active_suggestions(draft) else {
                return;
            };
            let Some(idx) = self.edit.suggestion_state.selected() else {
                return;
            };
            let Some(suggestion) = suggestions.get(idx) else {
                return;
            };
            suggest::suggestion_value(suggestion)
        };
        self.input.set_value(chosen);
        self.apply_input_change();
    }

    fn cycle_enum_field(&mut self, forward: bool) {
        let EditFocus::Chart { index, field } = self.edit.focus else {
            return;
        };
        let Some(id) = self.chart_id_at(index) else {
            return;
        };
        let edit = &self.edit;
        let Some(ds) = self.dashboard_store.as_mut() else {
            return;
        };
        match field {
            ChartField::Kind => ds.with_selected(|d| edit.cycle_kind(d, id, forward)),
            ChartField::X => ds.with_selected(|d| edit.cycle_regression_x(d, id)),
            _ => {}
        }
    }

    fn add_chart(&mut self) {
        let Some(ds) = self.dashboard_store.as_mut() else {
            return;
        };
        let Some(id) = ds.add_chart_to_selected() else {
            return;
        };
        if let (Some(bench), Ok(draft)) = (self.bench_store.as_ref(), ds.selected()) {
            self.edit.resolve_derived_state(draft, bench);
            if let Some(index) = self.edit.index_of(draft, id) {
                self.edit.focus = EditFocus::Chart {
                    index,
                    field: ChartField::Metric,
                };
            }
        }
        self.sync_input_from_focus();
    }

    fn delete_focused_chart(&mut self) {
        let EditFocus::Chart { index, .. } = self.edit.focus else {
            return;
        };
        let Some(id) = self.chart_id_at(index) else {
            return;
        };
        let edit = &mut self.edit;
        if let Some(ds) = self.dashboard_store.as_mut() {
            ds.with_selected(|d| edit.delete_chart(d, id));
        }
        self.sync_input_from_focus();
    }

    fn move_focused_chart(&mut self, up: bool) {
        let EditFocus::Chart { index, .. } = self.edit.focus else {
            return;
        };
        let Some(id) = self.chart_id_at(index) else {
            return;
        };
        let edit = &mut self.edit;
        if let Some(ds) = self.dashboard_store.as_mut() {
            if up {
                ds.with_selected(|d| edit.move_up(d, id));
            } else {
                ds.with_selected(|d| edit.move_down(d, id));
            }
        }
        self.sync_input_from_focus();
    }

    fn found_label(&self) -> String {
        match self.edit.total {
            None => "⏳".to_string(),
            Some(total) if total >= self.edit.bench_limit() => format!("> {}", total),
            Some(total) => total.to_string(),
        }
    }

    fn render_field(
        &self,
        label: &str,
        value: &str,
        focused: bool,
        area: Rect,
        buf: &mut Buffer,
    ) -> Option<Rect> {
        let label_width = (label.chars().count() as u16 + 2).min(area.width);
        let chunks = Layout::new(
            Direction::Horizontal,
            [Constraint::Length(label_width), Constraint::Fill(1)],
        )
        .split(area);

        let label_style = if focused {
            Style::default()
                .fg(self.color("primary"))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.color("dimmed"))
        };
        Paragraph::new(format!("{}:", label))
            .style(label_style)
            .render(chunks[0], buf);

        if focused {
            (&self.input).render(chunks[1], buf);
            Some(chunks[1])
        } else {
            Paragraph::new(value)
                .style(Style::default().fg(self.color("text_primary")))
                .render(chunks[1], buf);
            None
        }
    }

    fn render_chart(
        &self,
        chart: &ChartConfig,
        index: usize,
        area: Rect,
        buf: &mut Buffer,
    ) -> Option<Rect> {
        let focused_field = match self.edit.focus {
            EditFocus::Chart { index: i, field } if i == index => Some(field),
            _ => None,
        };
        let border_style = if focused_field.is_some() {
            Style::default().fg(self.color("primary"))
        } else {
            Style::default().fg(self.color("dimmed"))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(
                " Chart {} · {} ",
                index + 1,
                kind_label(chart.kind, chart.size)
            ));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 5 {
            return None;
        }

        let rows = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        )
        .split(inner);

        let mut focused_rect = None;

        let metric_label = match chart.kind {
            ChartKind::Compare => "Metric",
            _ => "Result",
        };
        if let Some(rect) = self.render_field(
            metric_label,
            &chart.metric,
            focused_field == Some(ChartField::Metric),
            rows[0],
            buf,
        ) {
            focused_rect = Some(rect);
        }

        let kind_value = format!("◂ {} ▸", kind_label(chart.kind, chart.size));
        self.render_field(
            "Kind",
            &kind_value,
            false,
            rows[1],
            buf,
        );
        if focused_field == Some(ChartField::Kind) {
            // Enum field: highlight the label, no text cursor.
            Paragraph::new("Kind:")
                .style(
                    Style::default()
                        .fg(self.color("primary"))
                        .add_modifier(Modifier::BOLD),
                )
                .render(
                    Rect {
                        width: rows[1].width.min(6),
                        ..rows[1]
                    },
                    buf,
                );
        }

        let group_label = match chart.kind {
            ChartKind::Compare => "Caption env",
            _ => "Group env",
        };
        if let Some(rect) = self.render_field(
            group_label,
            &chart.group_env,
            focused_field == Some(ChartField::Group),
            rows[2],
            buf,
        ) {
            focused_rect = Some(rect);
        }

        match chart.kind {
            ChartKind::Group => {
                if let Some(rect) = self.render_field(
                    "X env",
                    &chart.x_env,
                    focused_field == Some(ChartField::X),
                    rows[3],
                    buf,
                ) {
                    focused_rect = Some(rect);
                }
            }
            ChartKind::Regression => {
                let x_value = format!("◂ {} ▸", chart.regression_x.as_str());
                self.render_field(
                    "X axis",
                    &x_value,
                    false,
                    rows[3],
                    buf,
                );
                if focused_field == Some(ChartField::X) {
                    Paragraph::new("X axis:")
                        .style(
                            Style::default()
                                .fg(self.color("primary"))
                                .add_modifier(Modifier::BOLD),
                        )
                        .render(
                            Rect {
                                width: rows[3].width.min(8),
                                ..rows[3]
                            },
                            buf,
                        );
                }
            }
            ChartKind::Compare => {}
        }

        if let Some(rect) = self.render_field(
            "Description",
            &chart.description,
            focused_field == Some(ChartField::Description),
            rows[4],
            buf,
        ) {
            focused_rect = Some(rect);
        }

        focused_rect
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.num_frames += 1;

        let draft = match self
            .dashboard_store
            .as_ref()
            .and_then(|ds| ds.selected().ok())
        {
            Some(draft) => draft.clone(),
            None => {
                Paragraph::new("Loading...").render(area, buf);
                return;
            }
        };

        let mut constraints = vec![Constraint::Length(3), Constraint::Fill(1)];
        let has_message = self.error.is_some() || self.status.is_some();
        if has_message {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        if self.debug_enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::new(Direction::Vertical, constraints).split(area);

        let mut focused_rect = None;

        // Header: dashboard name and criteria with the match count.
        let header = Layout::new(
            Direction::Horizontal,
            [Constraint::Percentage(50), Constraint::Percentage(50)],
        )
        .split(layout[0]);

        let name_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.edit.focus == EditFocus::Name {
                Style::default().fg(self.color("primary"))
            } else {
                Style::default().fg(self.color("dimmed"))
            })
            .title(" Dashboard name ");
        let name_inner = name_block.inner(header[0]);
        name_block.render(header[0], buf);
        if self.edit.focus == EditFocus::Name {
            (&self.input).render(name_inner, buf);
            focused_rect = Some(name_inner);
        } else {
            Paragraph::new(draft.name.as_str())
                .style(Style::default().fg(self.color("text_primary")))
                .render(name_inner, buf);
        }

        let criteria_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.edit.focus == EditFocus::Criteria {
                Style::default().fg(self.color("primary"))
            } else {
                Style::default().fg(self.color("dimmed"))
            })
            .title(format!(" Search query ({} matching) ", self.found_label()));
        let criteria_inner = criteria_block.inner(header[1]);
        criteria_block.render(header[1], buf);
        if self.edit.focus == EditFocus::Criteria {
            (&self.input).render(criteria_inner, buf);
            focused_rect = Some(criteria_inner);
        } else {
            Paragraph::new(draft.criteria.as_str())
                .style(Style::default().fg(self.color("text_primary")))
                .render(criteria_inner, buf);
        }

        // Chart rows, top to bottom, clipped to the available area.
        let charts_area = layout[1];
        let chart_height = 7u16;
        let mut y = charts_area.y;
        if draft.charts.is_empty() {
            Paragraph::new("No charts. Press Ctrl+K to add one.")
                .style(Style::default().fg(self.color("dimmed")))
                .render(charts_area, buf);
        }
        for (index, chart) in draft.charts.iter().enumerate() {
            if y + chart_height > charts_area.bottom() {
                break;
            }
            let chart_area = Rect {
                x: charts_area.x,
                y,
                width: charts_area.width,
                height: chart_height,
            };
            if let Some(rect) = self.render_chart(chart, index, chart_area, buf) {
                focused_rect = Some(rect);
            }
            y += chart_height;
        }

        if has_message {
            let (message, color) = match (&self.error, &self.status) {
                (Some(e), _) => (e.clone(), self.color("error")),
                (_, Some(s)) => (s.clone(), self.color("warning")),
                _ => (String::new(), Color::Reset),
            };
            Paragraph::new(message)
                .style(Style::default().fg(color))
                .render(layout[2], buf);
        }

        let controls_index = if has_message { 3 } else { 2 };
        Controls::with_chart_count(draft.charts.len()).render(layout[controls_index], buf);

        if self.debug_enabled {
            let line = Line::from(vec![
                Span::styled("events: ", Style::default().fg(self.color("dimmed"))),
                Span::raw(self.num_events.to_string()),
                Span::styled("  frames: ", Style::default().fg(self.color("dimmed"))),
                Span::raw(self.num_frames.to_string()),
                Span::styled("  debounce: ", Style::default().fg(self.color("dimmed"))),
                Span::raw(if self.edit.debounce_armed() {
                    "armed"
                } else {
                    "idle"
                }),
            ]);
            Paragraph::new(line).render(layout[controls_index + 1], buf);
        }

        // Suggestion dropdown under the focused field, drawn last so it
        // overlays the chart rows.
        let suggestions: Vec<String> = self
            .edit
            .active_suggestions(&draft)
            .map(|s| s.to_vec())
            .unwrap_or_default();
        if let Some(rect) = focused_rect {
            let list = SuggestionList::new(&suggestions);
            let height = list.height(SUGGESTION_ROWS);
            if height > 0 && rect.bottom() < area.bottom() {
                let drop_area = Rect {
                    x: rect.x,
                    y: rect.bottom(),
                    width: rect.width.min(44),
                    height: height.min(area.bottom() - rect.bottom()),
                };
                list.render(drop_area, buf, &mut self.edit.suggestion_state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::mpsc::channel;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn write_benchmarks(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("benchmarks.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{
                "id": 1,
                "name": "http-smoke",
                "status": "complete",
                "start_time": "2024-03-01T12:00:00Z",
                "tags": ["nightly"],
                "metrics": {{"groups": [{{"name": "g", "graphs": [{{"metrics": [{{"name": "latency"}}, {{"name": "throughput"}}]}}]}}]}},
                "env": [{{"name": "workers", "value": "4"}}],
                "results": {{"rps.max": 120.5}}
            }}]"#
        )
        .unwrap();
        path
    }

    fn opened_app(dir: &std::path::Path) -> App {
        let (tx, _rx) = channel::<AppEvent>();
        let mut app = App::new(tx);
        let path = write_benchmarks(dir);
        let next = app.event(&AppEvent::Open(
            path,
            OpenOptions::new().with_dashboard("nightly".to_string()),
        ));
        // No timeline has run yet, so opening requests the mount-time fetch
        // for the draft's criteria; drive it to completion.
        let Some(timeline) = next else {
            panic!("expected a mount-time timeline fetch");
        };
        assert!(matches!(timeline, AppEvent::Timeline(ref q) if q.is_empty()));
        if let Some(update) = app.event(&timeline) {
            app.event(&update);
        }
        app
    }

    #[test]
    fn open_selects_dashboard_and_resolves_state() {
        let temp = tempfile::TempDir::new().unwrap();
        let app = opened_app(temp.path());
        let draft = app.dashboard_store.as_ref().unwrap().selected().unwrap();
        assert_eq!(draft.name, "nightly");
        assert_eq!(app.edit.candidates.metrics, vec!["latency", "throughput"]);
        assert_eq!(app.edit.total, Some(1));
    }

    #[test]
    fn typing_criteria_arms_debounce_and_marks_total_pending() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = opened_app(temp.path());
        app.event(&key(KeyCode::Tab)); // Name -> Criteria
        assert_eq!(app.edit.focus, EditFocus::Criteria);
        app.event(&key(KeyCode::Char('h')));
        app.event(&key(KeyCode::Char('t')));

        let draft = app.dashboard_store.as_ref().unwrap().selected().unwrap();
        assert_eq!(draft.criteria, "ht");
        assert_eq!(app.edit.total, None);
        assert!(app.edit.debounce_armed());
    }

    #[test]
    fn timeline_event_applies_count_and_resolves() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = opened_app(temp.path());
        app.event(&key(KeyCode::Tab));
        app.event(&key(KeyCode::Char('h')));

        let next = app.event(&AppEvent::Timeline("h".to_string()));
        assert!(matches!(next, Some(AppEvent::BenchUpdate)));
        app.event(&AppEvent::BenchUpdate);
        assert_eq!(app.edit.total, Some(1));
    }

    #[test]
    fn add_and_delete_chart_through_keys() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = opened_app(temp.path());
        app.event(&ctrl('k'));
        {
            let draft = app.dashboard_store.as_ref().unwrap().selected().unwrap();
            assert_eq!(draft.charts.len(), 1);
            assert!(matches!(
                app.edit.focus,
                EditFocus::Chart {
                    index: 0,
                    field: ChartField::Metric
                }
            ));
            // The new chart's suggestion slot was filled by the resolve.
            let id = draft.charts[0].id;
            assert_eq!(app.edit.metric_suggestions(id), ["latency", "throughput"]);
        }
        app.event(&ctrl('d'));
        let draft = app.dashboard_store.as_ref().unwrap().selected().unwrap();
        assert!(draft.charts.is_empty());
        assert_eq!(app.edit.focus, EditFocus::Criteria);
    }

    #[test]
    fn save_writes_dashboards_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = opened_app(temp.path());
        app.event(&ctrl('k'));
        app.event(&AppEvent::Save);
        let saved = std::fs::read_to_string(temp.path().join("dashboards.json")).unwrap();
        assert!(saved.contains("nightly"));
        assert!(saved.contains("compare"));
    }

    #[test]
    fn tick_fires_pending_debounce() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.editor.update_interval_ms = 1;
        let (tx, _rx) = channel::<AppEvent>();
        let mut app = App::new_with_config(
            tx,
            Theme {
                colors: std::collections::HashMap::new(),
            },
            config,
        );
        let path = write_benchmarks(temp.path());
        app.event(&AppEvent::Open(path, OpenOptions::new()));
        app.event(&key(KeyCode::Tab));
        app.event(&key(KeyCode::Char('x')));
        std::thread::sleep(Duration::from_millis(5));
        let fired = app.tick();
        assert!(matches!(fired, Some(AppEvent::Timeline(ref q)) if q == "x"));
        assert!(app.tick().is_none());
    }
}
