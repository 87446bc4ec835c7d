//! Screen geometry shared by the renderer and mouse hit-testing

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use scrollreel_core::SidebarList;

/// Width of each chapter list column
const SIDEBAR_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Whole presentation area behind the columns
    pub stage: Rect,
    pub left: Rect,
    pub featured: Rect,
    pub right: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SIDEBAR_WIDTH),
                Constraint::Min(10),
                Constraint::Length(SIDEBAR_WIDTH),
            ])
            .split(rows[0]);
        Self {
            stage: rows[0],
            left: columns[0],
            featured: columns[1],
            right: columns[2],
            status: rows[1],
        }
    }

    pub fn sidebar(&self, list: SidebarList) -> Rect {
        match list {
            SidebarList::Left => self.left,
            SidebarList::Right => self.right,
        }
    }

    /// Sidebar item under a terminal cell
    pub fn item_at(&self, column: u16, row: u16, lens: [usize; 2]) -> Option<(SidebarList, usize)> {
        SidebarList::BOTH
            .into_iter()
            .zip(lens)
            .find_map(|(list, len)| {
                item_rows(self.sidebar(list), len)
                    .into_iter()
                    .position(|r| r.contains((column, row).into()))
                    .map(|i| (list, i))
            })
    }
}

/// One row per item, vertically centered inside `area`; items that do not fit are dropped
pub fn item_rows(area: Rect, len: usize) -> Vec<Rect> {
    let len = len.min(area.height as usize);
    let top = area.y + (area.height - len as u16) / 2;
    (0..len as u16)
        .map(|i| Rect::new(area.x, top + i, area.width, 1))
        .collect()
}
