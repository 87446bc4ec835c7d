use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use scrollreel_core::SidebarList;

use crate::app::App;
use crate::layout::item_rows;

pub struct SidebarWidget;

impl SidebarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, list: SidebarList) {
        let theme = &app.theme;
        let is_focused = app.focus.list() == list;
        let items = app.scene().sidebar(list);
        let alignment = match list {
            SidebarList::Left => Alignment::Left,
            SidebarList::Right => Alignment::Right,
        };

        for (i, (item, row)) in items.iter().zip(item_rows(area, items.len())).enumerate() {
            let color = if item.highlighted {
                theme.highlight
            } else {
                theme.fg1
            };
            let mut style = Style::default().fg(theme.fade(color, item.opacity));
            if item.highlighted {
                style = style.add_modifier(Modifier::BOLD);
            }

            let is_cursor = is_focused && app.cursor == i;
            let marker = Span::styled(
                if is_cursor { "›" } else { " " },
                Style::default().fg(theme.accent),
            );
            let label = Span::styled(format!(" {} ", item.label), style);
            let line = match list {
                SidebarList::Left => Line::from(vec![marker, label]),
                SidebarList::Right => Line::from(vec![label, marker]),
            };

            frame.render_widget(Paragraph::new(line).alignment(alignment), row);
        }
    }
}
