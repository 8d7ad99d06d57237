use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use dashboard_core::{update, AppState, Msg};
use dashboard_logging::{dash_info, dash_warn};

use crate::config::DashboardConfig;
use crate::effects::EffectRunner;
use crate::{input, render};

/// Runs the dashboard until the operator quits or stdin closes.
///
/// All state changes happen on this thread, one inbox message at a time.
pub fn run(config: DashboardConfig) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner =
        EffectRunner::new(config.engine, msg_tx.clone()).context("failed to start engine")?;
    spawn_input_reader(msg_tx.clone());

    let stdout = io::stdout();
    let mut state = AppState::new();
    writeln!(stdout.lock(), "{}", input::HELP)?;

    if msg_tx.send(Msg::Opened).is_err() {
        anyhow::bail!("inbox closed before start");
    }
    drop(msg_tx);

    while let Ok(msg) = msg_rx.recv() {
        let closing = msg == Msg::Closed;
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        let mut out = stdout.lock();
        for notice in state.take_notices() {
            writeln!(out, "{}", render::render_notice(&notice))?;
        }
        if state.consume_dirty() {
            write!(out, "{}", render::render(&state.view()))?;
        }
        out.flush()?;

        if closing {
            dash_info!("Dashboard closed");
            break;
        }
    }
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    dash_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            match input::parse_line(&line) {
                Ok(msgs) => {
                    let quit = msgs.contains(&Msg::Closed);
                    for msg in msgs {
                        if msg_tx.send(msg).is_err() {
                            return;
                        }
                    }
                    if quit {
                        return;
                    }
                }
                Err(message) => eprintln!("{message}"),
            }
        }
        let _ = msg_tx.send(Msg::Closed);
    });
}
