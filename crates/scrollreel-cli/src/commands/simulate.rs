//! Headless driver: plays a script against the presentation on a fixed
//! frame clock and prints what happened as JSON lines.
//!
//! Script syntax, one command per line (`#` starts a comment):
//!
//! ```text
//! scroll 0.35        # one progress sample
//! wheel 9            # wheel notches, negative scrolls up
//! jump 4
//! hover left 2
//! sound on
//! wait 800           # advance the clock, in milliseconds
//! ```

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::info;

use scrollreel_core::{AppConfig, FiredCue, Scene, SidebarList, TransitionRequest};
use scrollreel_tui::{App, Theme};

const TOUR: &str = "\
wait 1200
wheel 9
wait 1000
jump 4
wait 1000
scroll 0.35
wait 1000
jump 9
wait 1000
jump 0
wait 1200
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scroll(f64),
    Wheel(i32),
    Jump(usize),
    Hover(SidebarList, usize),
    Sound(bool),
    Wait(Duration),
}

/// One line of the trace
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Command { at_ms: u64, command: String },
    TransitionStarted { at_ms: u64, request: TransitionRequest },
    TransitionComplete { at_ms: u64, section: usize },
    Cue { at_ms: u64, cue: FiredCue },
    Scene { at_ms: u64, scene: Box<Scene> },
}

pub fn parse_script(text: &str) -> Result<Vec<(String, Command)>> {
    let mut commands = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_line(line).with_context(|| format!("script line {}: {}", n + 1, line))?;
        commands.push((line.to_string(), command));
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(|| anyhow!("empty command"))?;
    let args: Vec<&str> = parts.collect();
    let arg = |i: usize| args.get(i).copied().ok_or_else(|| anyhow!("missing argument"));

    let command = match verb {
        "scroll" => Command::Scroll(arg(0)?.parse()?),
        "wheel" => Command::Wheel(arg(0)?.parse()?),
        "jump" => Command::Jump(arg(0)?.parse()?),
        "hover" => {
            let list = match arg(0)? {
                "left" => SidebarList::Left,
                "right" => SidebarList::Right,
                other => bail!("unknown list '{}'", other),
            };
            Command::Hover(list, arg(1)?.parse()?)
        }
        "sound" => match arg(0)? {
            "on" => Command::Sound(true),
            "off" => Command::Sound(false),
            other => bail!("expected on/off, got '{}'", other),
        },
        "wait" => Command::Wait(Duration::from_millis(arg(0)?.parse()?)),
        other => bail!("unknown command '{}'", other),
    };
    Ok(command)
}

/// Play a script and collect the trace
pub fn simulate(
    config: Arc<AppConfig>,
    script: &[(String, Command)],
    frame: Duration,
    scenes: bool,
) -> Result<Vec<TraceRecord>> {
    if frame.is_zero() {
        bail!("frame duration must be positive");
    }
    let mut app = App::new(config, Theme::default())?;
    let mut records = Vec::new();
    let mut clock = Duration::ZERO;
    let mut active = app.navigator.active_request();

    let at_ms = |clock: Duration| clock.as_millis() as u64;

    for (text, command) in script {
        records.push(TraceRecord::Command {
            at_ms: at_ms(clock),
            command: text.clone(),
        });
        match command {
            Command::Scroll(p) => {
                app.navigator.request_scroll(*p);
            }
            Command::Wheel(notches) => {
                for _ in 0..notches.unsigned_abs() {
                    app.scroll(*notches > 0);
                }
            }
            Command::Jump(index) => app.jump(*index),
            Command::Hover(list, index) => app.navigator.hover(*list, *index),
            Command::Sound(on) => app.navigator.set_sound_enabled(*on),
            Command::Wait(duration) => {
                let end = clock + *duration;
                while clock < end {
                    let dt = frame.min(end - clock);
                    clock += dt;
                    for cue in app.tick(dt) {
                        records.push(TraceRecord::Cue {
                            at_ms: at_ms(clock),
                            cue,
                        });
                    }
                    observe(&app, &mut active, at_ms(clock), &mut records);
                }
                if scenes {
                    records.push(TraceRecord::Scene {
                        at_ms: at_ms(clock),
                        scene: Box::new(app.scene().clone()),
                    });
                }
                continue;
            }
        }
        observe(&app, &mut active, at_ms(clock), &mut records);
    }

    app.quit();
    Ok(records)
}

/// Record transition starts and completions since the last observation
fn observe(
    app: &App,
    active: &mut Option<TransitionRequest>,
    at_ms: u64,
    records: &mut Vec<TraceRecord>,
) {
    let now = app.navigator.active_request();
    if now == *active {
        return;
    }
    if let Some(done) = active.take() {
        if app.current_section() == done.to {
            records.push(TraceRecord::TransitionComplete {
                at_ms,
                section: done.to,
            });
        }
    }
    if let Some(request) = now {
        records.push(TraceRecord::TransitionStarted { at_ms, request });
    }
    *active = now;
}

pub fn run(config: Arc<AppConfig>, script: Option<&Path>, frame_ms: u64, scenes: bool) -> Result<()> {
    let text = match script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => TOUR.to_string(),
    };
    let commands = parse_script(&text)?;
    info!(commands = commands.len(), frame_ms, "Simulating");

    let records = simulate(config, &commands, Duration::from_millis(frame_ms), scenes)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.presentation.intro_reveal = false;
        config.sound.enabled = true;
        Arc::new(config)
    }

    fn completions(records: &[TraceRecord]) -> Vec<usize> {
        records
            .iter()
            .filter_map(|r| match r {
                TraceRecord::TransitionComplete { section, .. } => Some(*section),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_script() {
        let script = parse_script("# tour\njump 3\n\nhover right 2  # pointer\nwait 250\nsound off\n").unwrap();
        let commands: Vec<Command> = script.into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            commands,
            vec![
                Command::Jump(3),
                Command::Hover(SidebarList::Right, 2),
                Command::Wait(Duration::from_millis(250)),
                Command::Sound(false),
            ]
        );
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = parse_script("jump 1\nfly 3\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
        assert!(parse_script("hover up 1").is_err());
        assert!(parse_script("wait").is_err());
    }

    #[test]
    fn test_jump_trace() {
        let script = parse_script("jump 3\nwait 1200").unwrap();
        let records = simulate(config(), &script, Duration::from_millis(16), false).unwrap();

        assert!(records.iter().any(|r| matches!(
            r,
            TraceRecord::TransitionStarted { request, .. } if request.from == 0 && request.to == 3
        )));
        assert_eq!(completions(&records), vec![3]);
        assert!(records.iter().any(|r| matches!(r, TraceRecord::Cue { .. })));
    }

    #[test]
    fn test_busy_jump_is_dropped() {
        let script = parse_script("jump 3\njump 7\nwait 1500").unwrap();
        let records = simulate(config(), &script, Duration::from_millis(16), false).unwrap();
        assert_eq!(completions(&records), vec![3]);
    }

    #[test]
    fn test_scene_snapshots() {
        let script = parse_script("jump 2\nwait 1000").unwrap();
        let records = simulate(config(), &script, Duration::from_millis(16), true).unwrap();
        match records.last() {
            Some(TraceRecord::Scene { scene, .. }) => assert_eq!(scene.visible_sections(), vec![2]),
            other => panic!("expected a scene, got {:?}", other),
        }
        let json = serde_json::to_string(&records[0]).unwrap();
        assert!(json.contains("\"event\":\"command\""));
    }

    #[test]
    fn test_builtin_tour_parses() {
        assert!(!parse_script(TOUR).unwrap().is_empty());
    }
}
