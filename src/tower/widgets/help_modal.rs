use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub struct HelpModal {
    visible: bool,
}

impl HelpModal {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                " Help ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));

        frame.render_widget(Paragraph::new(Self::build_help_lines()).block(block), area);
    }

    fn build_help_lines() -> Vec<Line<'static>> {
        vec![
            Self::subsection_title("Global"),
            Self::key_line("Enter", "Send message (asks steer / follow-up while busy)"),
            Self::key_line("Alt+Q or /queue", "Edit queued messages"),
            Self::key_line("F1 or /help", "Toggle this help"),
            Self::key_line("/session", "Start a fresh session"),
            Self::key_line("Ctrl+C or /quit", "Quit application"),
            Line::from(""),
            Self::subsection_title("Delivery picker"),
            Self::key_line("Tab / \u{2191} / \u{2193}", "Toggle steer / follow-up"),
            Self::key_line("\u{2190} / \u{2192}", "Choose steer / follow-up"),
            Self::key_line("Enter", "Send with the chosen mode"),
            Self::key_line("Esc", "Back to input, nothing sent"),
            Line::from(""),
            Self::subsection_title("Queue editor"),
            Self::key_line("\u{2191} / \u{2193}", "Select previous / next"),
            Self::key_line("k / j", "Move selected up / down"),
            Self::key_line("Tab", "Toggle steer / follow-up"),
            Self::key_line("e", "Edit text (Enter applies, Esc discards)"),
            Self::key_line("d / Del / Backspace", "Delete selected"),
            Self::key_line("Enter", "Save changes"),
            Self::key_line("Esc", "Discard changes"),
            Line::from(""),
            Self::subsection_title("Message input"),
            Self::key_line("Ctrl+A / Ctrl+E", "Move to line start / end"),
            Self::key_line("Ctrl+B / Ctrl+F", "Move cursor left / right"),
            Self::key_line("Ctrl+U", "Delete from line start to cursor"),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter / Esc", Style::default().fg(Color::Yellow)),
                Span::raw(": Close this help"),
            ]),
        ]
    }

    fn subsection_title(title: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            format!("━━━ {} ━━━", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:22}", key), Style::default().fg(Color::Yellow)),
            Span::raw(description),
        ])
    }
}

impl Default for HelpModal {
    fn default() -> Self {
        Self::new()
    }
}
