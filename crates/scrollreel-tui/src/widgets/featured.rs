use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Theme;

/// Rows a word travels between fully hidden and resting
const WORD_TRAVEL: f32 = 3.0;

pub struct FeaturedWidget;

/// Row offset for a word offset in percent of the word height
pub fn word_shift(offset: f32) -> i32 {
    (offset / 100.0 * WORD_TRAVEL).round() as i32
}

impl FeaturedWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let theme = &app.theme;
        let buf = frame.buffer_mut();

        let heading = Style::default().fg(theme.grey1);
        let presentation = &app.config.presentation;
        for (i, line) in presentation.header.iter().enumerate() {
            centered(buf, area, area.y + i as u16, line, heading);
        }
        let footer_top = area.bottom().saturating_sub(presentation.footer.len() as u16);
        for (i, line) in presentation.footer.iter().enumerate() {
            centered(buf, area, footer_top + i as u16, line, heading);
        }

        let center = (area.y + area.height / 2) as i32;
        for index in app.scene().visible_sections() {
            render_title(buf, area, center, theme, &app.scene().sections[index].words);
        }
    }
}

fn render_title(
    buf: &mut Buffer,
    area: Rect,
    center: i32,
    theme: &Theme,
    words: &[scrollreel_core::scene::WordState],
) {
    let total: usize = words.iter().map(|w| w.text.width()).sum::<usize>()
        + words.len().saturating_sub(1);
    let mut x = area.x as usize + (area.width as usize).saturating_sub(total) / 2;

    for word in words {
        let width = word.text.width();
        let y = center + word_shift(word.offset);
        let visible = word.opacity > 0.01 && y >= area.y as i32 && y < area.bottom() as i32;
        if visible && x < area.right() as usize {
            let style = Style::default()
                .fg(theme.fade(theme.fg0, word.opacity))
                .add_modifier(Modifier::BOLD);
            let room = area.right() as usize - x;
            buf.set_stringn(x as u16, y as u16, &word.text, room, style);
        }
        x += width + 1;
    }
}

fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.bottom() {
        return;
    }
    let width = text.width().min(area.width as usize);
    let x = area.x + (area.width - width as u16) / 2;
    buf.set_stringn(x, y, text, width, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_shift() {
        assert_eq!(word_shift(0.0), 0);
        assert_eq!(word_shift(100.0), 3);
        assert_eq!(word_shift(-100.0), -3);
        assert_eq!(word_shift(50.0), 2);
    }
}
