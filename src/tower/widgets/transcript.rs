use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MAX_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptKind {
    /// Something we sent to the backend.
    Sent,
    /// Something the backend reported.
    Backend,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: TranscriptKind,
    pub text: String,
}

/// Rolling log of deliveries and backend output, newest at the bottom.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: TranscriptKind, text: impl Into<String>) {
        self.lines.push(TranscriptLine {
            kind,
            text: text.into(),
        });
        if self.lines.len() > MAX_LINES {
            let excess = self.lines.len() - MAX_LINES;
            self.lines.drain(..excess);
        }
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(" Transcript ");
        let visible = block.inner(area).height as usize;

        let start = self.lines.len().saturating_sub(visible);
        let lines: Vec<Line> = self.lines[start..]
            .iter()
            .map(|line| {
                let (prefix, style) = match line.kind {
                    TranscriptKind::Sent => ("→ ", Style::default().fg(Color::Cyan)),
                    TranscriptKind::Backend => ("  ", Style::default().fg(Color::White)),
                    TranscriptKind::System => ("· ", Style::default().fg(Color::DarkGray)),
                };
                Line::from(Span::styled(format!("{}{}", prefix, line.text), style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
