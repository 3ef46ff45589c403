use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::popup::{EditorMode, QueueEditor};
use crate::utils::{single_line, truncate_to_width};

use super::{centered_rect, mode_style};

const POPUP_WIDTH: u16 = 80;
/// Mode tag column: "[follow-up] ".
const TAG_WIDTH: usize = 12;

pub struct QueueEditorView;

/// One row per entry plus borders, draft box and footer, capped to the area.
fn popup_height(items: usize, area_height: u16) -> u16 {
    let list_rows = u16::try_from(items.max(1)).unwrap_or(u16::MAX);
    list_rows
        .saturating_add(7)
        .min(area_height.saturating_sub(2))
}

impl QueueEditorView {
    pub fn render(frame: &mut Frame, area: Rect, editor: &QueueEditor) {
        let width = POPUP_WIDTH.min(area.width.saturating_sub(4));
        let height = popup_height(editor.items().len(), area.height);
        let popup_area = centered_rect(width, height, area);

        frame.render_widget(Clear, popup_area);

        let title = format!(" Queued messages ({}) ", editor.items().len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        Self::render_list(frame, chunks[0], editor);
        if editor.mode() == EditorMode::Edit {
            Self::render_draft(frame, chunks[1], editor);
        }
        frame.render_widget(Paragraph::new(Self::footer(editor.mode())), chunks[2]);
    }

    fn render_list(frame: &mut Frame, area: Rect, editor: &QueueEditor) {
        if editor.items().is_empty() {
            let empty = Paragraph::new(Span::styled(
                "Queue is empty. Enter or Esc to close.",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(empty, area);
            return;
        }

        let text_width = (area.width as usize).saturating_sub(TAG_WIDTH + 2);
        let items: Vec<ListItem> = editor
            .items()
            .iter()
            .map(|msg| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", format!("[{}]", msg.mode), width = TAG_WIDTH),
                        mode_style(msg.mode),
                    ),
                    Span::raw(truncate_to_width(&single_line(&msg.text), text_width)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(editor.selected()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_draft(frame: &mut Frame, area: Rect, editor: &QueueEditor) {
        let (before, after) = editor.draft().split_at_cursor();
        let line = Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled("│", Style::default().fg(Color::Yellow)),
            Span::raw(after.to_string()),
        ]);
        let draft = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Edit message "),
        );
        frame.render_widget(draft, area);
    }

    fn footer(mode: EditorMode) -> Line<'static> {
        let keys: &[(&str, &str)] = match mode {
            EditorMode::List => &[
                ("↑/↓", "Select"),
                ("j/k", "Move"),
                ("Tab", "Steer/Follow-up"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ],
            EditorMode::Edit => &[("Enter", "Apply"), ("Esc", "Discard edit")],
        };
        let mut spans = Vec::new();
        for (i, (key, action)) in keys.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(": {}", action)));
        }
        Line::from(spans)
    }
}
