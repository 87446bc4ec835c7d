use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use scrollreel_core::{AppConfig, SidebarList};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;

use scrollreel_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{apply_action, handle_key_event},
    widgets::{BackdropWidget, FeaturedWidget, SidebarWidget, StatusBarWidget},
    Theme,
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let mut app = App::new(config.clone(), Theme::default())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("scrollreel"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(sections = app.section_count(), "Starting presentation");
    let result = event_loop(&mut terminal, &mut app, config.scroll.animation_fps).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

/// Frame loop: the interval is the animation clock
async fn event_loop(terminal: &mut Terminal<Backend>, app: &mut App, fps: u32) -> Result<()> {
    let events = EventHandler::new();
    let mut frames = interval(Duration::from_secs_f64(1.0 / fps.max(1) as f64));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last = Instant::now();
    let mut dirty = true;

    loop {
        frames.tick().await;
        let now = Instant::now();
        let dt = now - last;
        last = now;

        let pending = events.drain()?;
        dirty |= !pending.is_empty();
        for event in pending {
            match event {
                AppEvent::Key(key) => apply_action(app, handle_key_event(key)),
                AppEvent::Wheel { down } => app.scroll(down),
                AppEvent::MouseMove { column, row } => app.hover_at(column, row),
                AppEvent::Click { column, row } => app.click_at(column, row),
                AppEvent::Resize(_, _) => {}
            }
        }

        if app.should_quit {
            break;
        }

        let animating = app.is_animating() || app.last_cue.is_some();
        app.tick(dt);
        if !(dirty || animating) {
            continue;
        }

        terminal.draw(|frame| {
            let area = frame.area();
            app.set_viewport(area);
            let layout = app.layout;

            BackdropWidget::render(frame, layout.stage, app);
            SidebarWidget::render(frame, layout.left, app, SidebarList::Left);
            FeaturedWidget::render(frame, layout.featured, app);
            SidebarWidget::render(frame, layout.right, app, SidebarList::Right);
            StatusBarWidget::render(frame, layout.status, app);
        })?;
        dirty = false;
    }

    info!("Presentation closed");
    Ok(())
}
