//! Foreground session runner.
//!
//! Builds a session from the config file plus flag overrides, then drives
//! it with a one-second clock until it finishes or ctrl-c arrives. The
//! default renderer redraws a single status line in place; `--json` emits
//! one event per line for scripting instead.

use std::io::{self, Write};
use std::time::Duration;

use clap::Args;
use pomodori_core::{Config, Event, NullRenderer, Renderer, Session, StatusView};

#[derive(Args)]
pub struct RunArgs {
    /// Work phase length in minutes (overrides config)
    #[arg(long)]
    work: Option<u64>,
    /// Rest phase length in minutes (overrides config)
    #[arg(long)]
    rest: Option<u64>,
    /// Number of pomodori in the session (overrides config)
    #[arg(long)]
    pomodori: Option<usize>,
    /// Count up from zero instead of down from the phase duration
    #[arg(long)]
    count_up: bool,
    /// Print one JSON event per line instead of drawing a status line
    #[arg(long)]
    json: bool,
}

/// Redraws one status line in place with carriage returns.
struct LineRenderer {
    last_width: usize,
}

impl LineRenderer {
    fn new() -> Self {
        Self { last_width: 0 }
    }
}

impl Renderer for LineRenderer {
    fn render(&mut self, view: &StatusView) {
        let line = view.status_line();
        let padding = self.last_width.saturating_sub(line.len());
        print!("\r{line}{}", " ".repeat(padding));
        self.last_width = line.len();
        if view.finished {
            println!();
            if view.long_break_suggested {
                println!("Well done! You should now take a longer break.");
            }
        }
        let _ = io::stdout().flush();
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Config::load()?.session_config();
    if let Some(work) = args.work {
        settings.work_minutes = work;
    }
    if let Some(rest) = args.rest {
        settings.rest_minutes = rest;
    }
    if let Some(pomodori) = args.pomodori {
        settings.pomodori = pomodori;
    }
    if args.count_up {
        settings.count_down = false;
    }

    let renderer: Box<dyn Renderer> = if args.json {
        Box::new(NullRenderer)
    } else {
        Box::new(LineRenderer::new())
    };
    let mut session = Session::new(settings, renderer)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut session, args.json));
    Ok(())
}

fn emit(json: bool, event: Option<Event>) {
    if !json {
        return;
    }
    if let Some(event) = event {
        if let Ok(line) = serde_json::to_string(&event) {
            println!("{line}");
        }
    }
}

async fn drive(session: &mut Session, json: bool) {
    // Scripts get one snapshot of the initial state before any event.
    emit(json, Some(session.snapshot()));
    emit(json, session.start());

    let mut clock = tokio::time::interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first interval tick completes immediately.
    clock.tick().await;

    loop {
        tokio::select! {
            _ = clock.tick() => {
                emit(json, session.tick());
                if session.is_finished() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.dispose();
                if !json {
                    println!();
                }
                break;
            }
        }
    }
}
