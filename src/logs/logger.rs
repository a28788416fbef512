use chrono::Local;
use env_logger::{Builder, Env};
use log::Level;
use std::env;
use std::io::Write;

/// Initializes the process-wide logger.
///
/// Lines are formatted as `timestamp | [LEVEL] | target | message`; the
/// target column is the module tag identifying which part of the
/// interceptor emitted the line. `RUST_LOG` selects the level (default
/// `info`), and `NO_COLOR` disables coloring of the level column.
pub fn configure_logger() {
    let no_color = env::var("NO_COLOR").is_ok();

    Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let level = record.level();
            let level_display = if no_color {
                format!("[{}]", level)
            } else {
                let color = match level {
                    Level::Error => 31, // red
                    Level::Warn => 33,  // yellow
                    Level::Info => 32,  // green
                    Level::Debug => 34, // blue
                    Level::Trace => 35, // magenta
                };
                format!("[\x1b[{}m{}\x1b[0m]", color, level)
            };

            writeln!(
                buf,
                "{} | {} | {} | {}",
                Local::now().format("%b %d %y %I:%M:%S %p"),
                level_display,
                record.target(),
                record.args(),
            )
        })
        .init();
}
