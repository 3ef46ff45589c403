use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::BufferedMessage;
use crate::utils::{single_line, truncate_to_width};

use super::mode_style;

/// Persistent strip listing what is waiting for the backend.
pub struct QueueStatus {
    entries: Vec<BufferedMessage>,
    max_items: usize,
}

impl QueueStatus {
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_items: max_items.max(1),
        }
    }

    pub fn set_entries(&mut self, entries: &[BufferedMessage]) {
        self.entries = entries.to_vec();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rows needed including borders; zero when nothing is queued.
    pub fn height(&self) -> u16 {
        if self.entries.is_empty() {
            return 0;
        }
        let shown = self.entries.len().min(self.max_items);
        let overflow = usize::from(self.entries.len() > self.max_items);
        u16::try_from(shown + overflow + 2).unwrap_or(u16::MAX)
    }

    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = self
            .entries
            .iter()
            .take(self.max_items)
            .map(|msg| {
                let tag = format!("[{}] ", msg.mode);
                let text_width = width.saturating_sub(tag.chars().count());
                Line::from(vec![
                    Span::styled(tag, mode_style(msg.mode)),
                    Span::raw(truncate_to_width(&single_line(&msg.text), text_width)),
                ])
            })
            .collect();

        let hidden = self.entries.len().saturating_sub(self.max_items);
        if hidden > 0 {
            lines.push(Line::from(Span::styled(
                format!("… {} more", hidden),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.entries.is_empty() || area.height == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(format!(" Queued ({}) · Alt+Q to edit ", self.entries.len()));
        let width = block.inner(area).width as usize;
        frame.render_widget(Paragraph::new(self.lines(width)).block(block), area);
    }
}
