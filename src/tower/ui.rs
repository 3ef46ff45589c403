use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::models::BackendState;
use crate::session::NoticeLevel;

use super::app::TowerApp;
use super::widgets::{Composer, ModePickerView, QueueEditorView};

pub struct UI;

impl UI {
    pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    pub fn restore_terminal() -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn render(frame: &mut Frame, app: &TowerApp) {
        let status_height = app.host().status().height();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(status_height),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        Self::render_header(frame, chunks[0], app);
        app.host().transcript().render(frame, chunks[1]);
        app.host().status().render(frame, chunks[2]);
        let popup_open = app.picker().is_some() || app.editor().is_some();
        Composer::render(frame, chunks[3], app.composer(), !popup_open);
        Self::render_footer(frame, chunks[4], app);

        if let Some(picker) = app.picker() {
            ModePickerView::render(frame, frame.area(), picker);
        }
        if let Some(editor) = app.editor() {
            QueueEditorView::render(frame, frame.area(), editor);
        }
        if app.help_modal().is_visible() {
            let modal_area = Self::centered_area(frame.area(), 70, 90);
            app.help_modal().render(frame, modal_area);
        }
    }

    fn centered_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &TowerApp) {
        let (state_label, state_style) = match app.backend_state() {
            BackendState::Idle => ("○ idle", Style::default().fg(Color::Gray)),
            BackendState::Busy => ("● busy", Style::default().fg(Color::Green)),
        };

        let mut title = vec![
            Span::styled(
                " STEERQ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::styled(format!("{} ", state_label), state_style),
            Span::raw("| "),
            Span::styled(
                format!("queued: {}", app.controller().queue().len()),
                Style::default().fg(Color::Yellow),
            ),
        ];

        if app.controller().is_editing() {
            title.push(Span::styled(" (editing)", Style::default().fg(Color::Magenta)));
        }
        if app.controller().policy().skips_picker() {
            title.push(Span::styled(
                " | picker off",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let header = Paragraph::new(Line::from(title)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(header, area);
    }

    fn render_footer(frame: &mut Frame, area: Rect, app: &TowerApp) {
        let mut help_text = Vec::new();

        if let Some((notice, level)) = app.host().notice() {
            let style = match level {
                NoticeLevel::Info => Style::default().fg(Color::Green),
                NoticeLevel::Warning => Style::default().fg(Color::Red),
            };
            help_text.push(Span::styled(format!("{} | ", notice), style));
        }

        help_text.extend([
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(": Send "),
            Span::styled("Alt+Q", Style::default().fg(Color::Yellow)),
            Span::raw(": Queue "),
            Span::styled("F1", Style::default().fg(Color::Yellow)),
            Span::raw(": Help "),
            Span::styled("Ctrl+C", Style::default().fg(Color::Yellow)),
            Span::raw(": Quit"),
        ]);

        let footer = Paragraph::new(Line::from(help_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(footer, area);
    }
}
