use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

/// Width of the progress track in cells
const TRACK_WIDTH: usize = 24;

pub struct StatusBarWidget;

/// Split the track into filled and empty cells
pub fn track_cells(fill: f32, width: usize) -> (usize, usize) {
    let filled = ((fill.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    (filled, width - filled)
}

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let progress = &app.scene().progress;
        let base = Style::default().bg(theme.bg2);

        let (filled, empty) = track_cells(progress.fill, TRACK_WIDTH);
        let sound = if app.is_sound_enabled() { "♪ on" } else { "♪ off" };
        let cue = app
            .last_cue
            .map(|c| format!(" {}", c.cue.name()))
            .unwrap_or_default();

        let mut spans = vec![
            Span::styled(
                format!(" {} ", progress.label),
                base.fg(theme.fg0).add_modifier(Modifier::BOLD),
            ),
            Span::styled("━".repeat(filled), base.fg(theme.progress)),
            Span::styled("━".repeat(empty), base.fg(theme.muted)),
            Span::styled(format!(" {} ", progress.total_label), base.fg(theme.grey1)),
            Span::styled(format!(" {}{} ", sound, cue), base.fg(theme.accent)),
        ];
        if let Some(msg) = &app.status_message {
            spans.push(Span::styled(format!(" {} ", msg), base.fg(theme.fg1)));
        }

        let help_hint = " q:quit j/k:scroll 1-0:jump h/l:lists s:sound ";
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let padding = (area.width as usize).saturating_sub(used + help_hint.width());
        spans.push(Span::styled(" ".repeat(padding), base));
        spans.push(Span::styled(help_hint, base.fg(theme.grey0)));

        frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_cells() {
        assert_eq!(track_cells(0.0, 24), (0, 24));
        assert_eq!(track_cells(1.0, 24), (24, 0));
        assert_eq!(track_cells(3.0 / 9.0, 24), (8, 16));
        assert_eq!(track_cells(2.0, 10), (10, 0));
    }
}
