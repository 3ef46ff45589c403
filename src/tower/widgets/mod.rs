mod composer;
mod help_modal;
mod mode_picker;
mod queue_editor;
mod queue_status;
mod transcript;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::models::DeliveryMode;

pub use composer::Composer;
pub use help_modal::HelpModal;
pub use mode_picker::ModePickerView;
pub use queue_editor::QueueEditorView;
pub use queue_status::QueueStatus;
pub use transcript::{Transcript, TranscriptKind};

pub(crate) fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

pub(crate) fn mode_style(mode: DeliveryMode) -> Style {
    match mode {
        DeliveryMode::Steer => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        DeliveryMode::FollowUp => Style::default().fg(Color::Blue),
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
