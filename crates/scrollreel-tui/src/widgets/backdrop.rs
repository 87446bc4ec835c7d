use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use scrollreel_core::scene::LayerScene;
use scrollreel_core::view::BackgroundState;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::blend;

pub struct BackdropWidget;

/// Rows covered by a layer after parallax shift and clipping
pub fn layer_rows(area: Rect, layer: &LayerScene) -> Option<(u16, u16)> {
    let height = area.height as f32;
    let shift = (layer.offset / 100.0 * height).round();
    let top = area.y as f32 + shift + (layer.clip.top / 100.0 * height).round();
    let bottom = area.y as f32 + shift + height - (layer.clip.bottom / 100.0 * height).round();
    let top = top.max(area.y as f32) as u16;
    let bottom = bottom.min(area.bottom() as f32).max(0.0) as u16;
    (top < bottom).then_some((top, bottom))
}

impl BackdropWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let buf = frame.buffer_mut();
        buf.set_style(area, Style::default().bg(theme.bg0));

        let layers = &app.scene().backgrounds;
        let rank = |state: BackgroundState| match state {
            BackgroundState::Inactive => 0,
            BackgroundState::Previous => 1,
            BackgroundState::Active => 2,
        };
        let mut order: Vec<usize> = (0..layers.len())
            .filter(|&i| layers[i].opacity > 0.0)
            .collect();
        order.sort_by_key(|&i| rank(layers[i].state));

        for i in order {
            let layer = &layers[i];
            let Some((top, bottom)) = layer_rows(area, layer) else {
                continue;
            };
            let tint = theme.layer(i);
            for y in top..bottom {
                for x in area.left()..area.right() {
                    let cell = &mut buf[(x, y)];
                    let under = cell.bg;
                    cell.set_bg(blend(under, tint, layer.opacity));
                }
            }
        }

        if let Some(active) = app.scene().active_background() {
            let name = &layers[active].name;
            let width = name.width() as u16;
            if width + 1 < area.width && area.height > 0 {
                buf.set_string(
                    area.right() - width - 1,
                    area.bottom() - 1,
                    name,
                    Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::ITALIC),
                );
            }
        }
    }
}
