use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::DeliveryMode;
use crate::popup::ModePicker;
use crate::utils::{single_line, truncate_to_width};

use super::centered_rect;

const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 8;

/// Renders the steer / follow-up choice for a pending submission.
pub struct ModePickerView;

impl ModePickerView {
    pub fn render(frame: &mut Frame, area: Rect, picker: &ModePicker) {
        let width = POPUP_WIDTH.min(area.width.saturating_sub(4));
        let height = POPUP_HEIGHT.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(width, height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Agent is busy: deliver how? ");
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(inner);

        let excerpt = truncate_to_width(
            &single_line(picker.message_text()),
            inner.width.saturating_sub(2) as usize,
        );
        let message = Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::DarkGray)),
            Span::styled(excerpt, Style::default().fg(Color::White)),
        ]))
        .wrap(Wrap { trim: false });
        frame.render_widget(message, chunks[0]);

        frame.render_widget(Paragraph::new(Self::options_line(picker.selected())), chunks[1]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Tab/←/→", Style::default().fg(Color::Cyan)),
            Span::raw(": Choose  |  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(": Send  |  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(": Back to input"),
        ]));
        frame.render_widget(footer, chunks[2]);
    }

    fn options_line(selected: DeliveryMode) -> Line<'static> {
        let spans: Vec<Span> = DeliveryMode::all()
            .iter()
            .map(|mode| {
                let is_selected = *mode == selected;
                let marker = if is_selected { "●" } else { "○" };
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let hint = match mode {
                    DeliveryMode::Steer => "interrupt now",
                    DeliveryMode::FollowUp => "after this task",
                };
                Span::styled(format!("[{}] {} ({})   ", marker, mode.label(), hint), style)
            })
            .collect();
        Line::from(spans)
    }
}
