use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, StatefulWidget, Widget},
};

/// Autosuggestion dropdown rendered under the focused text field.
pub struct SuggestionList<'a> {
    suggestions: &'a [String],
    highlight: Style,
}

impl<'a> SuggestionList<'a> {
    pub fn new(suggestions: &'a [String]) -> Self {
        Self {
            suggestions,
            highlight: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn with_highlight(mut self, style: Style) -> Self {
        self.highlight = style;
        self
    }

    /// Rows needed to show up to `max` suggestions plus the border.
    pub fn height(&self, max: usize) -> u16 {
        if self.suggestions.is_empty() {
            0
        } else {
            self.suggestions.len().min(max) as u16 + 2
        }
    }
}

impl StatefulWidget for SuggestionList<'_> {
    type State = ratatui::widgets::ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if self.suggestions.is_empty() || area.height == 0 {
            return;
        }
        ratatui::widgets::Clear.render(area, buf);
        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .map(|s| ListItem::new(s.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(self.highlight);
        StatefulWidget::render(list, area, buf, state);
    }
}
