use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::popup::TextInput;

pub struct Composer;

impl Composer {
    pub fn render(frame: &mut Frame, area: Rect, input: &TextInput, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let line = if input.content().is_empty() && !focused {
            Line::from(Span::styled(
                "Type a message...",
                Style::default().fg(Color::DarkGray),
            ))
        } else if focused {
            let (before, after) = input.split_at_cursor();
            Line::from(vec![
                Span::styled(before.to_string(), Style::default().fg(Color::White)),
                Span::styled(
                    "│",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::SLOW_BLINK),
                ),
                Span::styled(after.to_string(), Style::default().fg(Color::White)),
            ])
        } else {
            Line::from(Span::styled(
                input.content().to_string(),
                Style::default().fg(Color::Gray),
            ))
        };

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Message "),
        );
        frame.render_widget(paragraph, area);
    }
}
