//! Timer command handler
//!
//! Drives a `CountdownTimer` from a one-second interval until it expires
//! or the user presses Ctrl-C.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use freewrite_core::{CountdownTimer, Tick};

use crate::output::{Output, OutputFormat};

/// `mm:ss` as shown next to the editor
pub fn clock(timer: &CountdownTimer) -> String {
    format!(
        "{:02}:{:02}",
        timer.minutes_remaining(),
        timer.seconds_remaining()
    )
}

/// Count down from `minutes`
pub async fn run(minutes: u32, output: &Output) -> Result<()> {
    let mut timer = CountdownTimer::new();
    timer.start(minutes)?;

    let second = Duration::from_secs(1);
    let mut ticks = interval_at(Instant::now() + second, second);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    show_clock(&timer, output);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                match timer.tick() {
                    Tick::Running => show_clock(&timer, output),
                    Tick::Expired => {
                        show_clock(&timer, output);
                        finish_line(output);
                        output.success("Time's up");
                        return Ok(());
                    }
                    Tick::Idle => return Ok(()),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                timer.clear();
                finish_line(output);
                output.message("Timer cleared");
                return Ok(());
            }
        }
    }
}

fn show_clock(timer: &CountdownTimer, output: &Output) {
    if output.format == OutputFormat::Human {
        print!("\r{}", clock(timer));
        let _ = std::io::stdout().flush();
    }
}

fn finish_line(output: &Output) {
    if output.format == OutputFormat::Human {
        println!();
    }
}
