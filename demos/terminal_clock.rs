//! Line-driven terminal chess clock.
//!
//! ```text
//! cargo run --example terminal_clock -- 3+2
//! ```
//!
//! Type a key and press enter: `t` ends the top player's turn, `b` the bottom player's,
//! `p` toggles pause, `r` restarts (pausing first while a clock runs), `q` quits.
//! Alerts are logged through `LogSink`; set `RUST_LOG=chessclock=debug` to see ignored taps.

use chessclock::prelude::*;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn render(handle: &ClockHandle, policy: &AlertPolicy) {
    let state = handle.snapshot();
    let line: Vec<String> = Player::BOTH
        .into_iter()
        .map(|player| {
            let view = PlayerView::new(&state, policy, player);
            let marker = match view.shade {
                Shade::Waiting => " ",
                Shade::Paused => "=",
                Shade::Danger => "!",
                Shade::Running => ">",
            };
            format!("{marker} {player:<6} {}", view.display)
        })
        .collect();
    let status = match state.flagged() {
        Some(player) => format!("  [{player} flagged]"),
        None => String::new(),
    };
    println!("{}   {}{status}", line[0], line[1]);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: GameConfig = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => GameConfig::default(),
    };
    println!("time control {config}: t/b end turn, p pause, r restart, q quit");

    let policy = AlertPolicy::default();
    let engine = ClockEngine::start(config).with_clock(TokioClock::default());
    let handle = ClockDriver::spawn(engine, LogSink, DriverConfig::default());
    render(&handle, &policy);

    // Redraw once a second while a clock is running.
    let ticker = {
        let handle = handle.clone();
        tokio::spawn(async move {
            let mut every_second = tokio::time::interval(Duration::from_secs(1));
            loop {
                every_second.tick().await;
                if handle.is_closed() {
                    break;
                }
                if handle.snapshot().is_running() {
                    render(&handle, &policy);
                }
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "t" => {
                handle.end_turn(Player::Top).await?;
            }
            "b" => {
                handle.end_turn(Player::Bottom).await?;
            }
            "p" => {
                handle.toggle_pause().await?;
            }
            "r" => {
                let outcome = handle.request_restart().await?;
                if outcome == RestartOutcome::Paused {
                    println!("paused; press r again to reset");
                }
            }
            "q" => break,
            "" => {}
            other => println!("unknown key {other:?}"),
        }
        render(&handle, &policy);
    }

    let last = handle.shutdown().await?;
    ticker.abort();
    tracing::info!(turn = %last.turn, "terminal clock closed");
    Ok(())
}
