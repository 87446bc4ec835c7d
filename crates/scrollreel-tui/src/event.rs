use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use std::time::Duration;

/// Event handler for terminal events
///
/// The frame clock lives with the caller; this only drains whatever input
/// arrived since the last frame without blocking.
pub struct EventHandler {
    /// Upper bound on events taken per frame
    max_per_frame: usize,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self { max_per_frame: 64 }
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every pending event
    pub fn drain(&self) -> Result<Vec<AppEvent>> {
        let mut events = Vec::new();
        while events.len() < self.max_per_frame && event::poll(Duration::ZERO)? {
            if let Some(event) = translate(event::read()?) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            (key.kind == KeyEventKind::Press).then_some(AppEvent::Key(key))
        }
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<AppEvent> {
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(AppEvent::Wheel { down: true }),
        MouseEventKind::ScrollUp => Some(AppEvent::Wheel { down: false }),
        MouseEventKind::Moved => Some(AppEvent::MouseMove {
            column: mouse.column,
            row: mouse.row,
        }),
        MouseEventKind::Down(_) => Some(AppEvent::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// One mouse wheel notch
    Wheel { down: bool },
    /// Pointer moved, used for sidebar hover
    MouseMove { column: u16, row: u16 },
    /// Mouse button pressed
    Click { column: u16, row: u16 },
    /// Terminal was resized
    Resize(u16, u16),
}
