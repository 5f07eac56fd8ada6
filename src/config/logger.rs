// SPDX-License-Identifier: MIT

//! The `logger` module defines functions necessary for the setup of [`fern`].

use fern::Dispatch;
use log::{Level, LevelFilter};

/// Crates whose chatter is only useful when tracing.
const NOISY_TARGETS: [&str; 4] = ["reqwest", "hyper_util", "rustls", "h2"];

/// Maps the `-v` occurrence count to the maximum log level, capped at trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Configures the [`fern`] logger.
///
/// Without `-v`, messages go to stdout as user-facing lines: info messages are printed as-is,
/// others carry a `[LEVEL]` prefix. With `-v` or more every line is prefixed with an `ISO`
/// timestamp, the target & the level.
pub fn setup_logger(verbosity: u8) -> Result<(), fern::InitError> {
    let log_max_level = level_for_verbosity(verbosity);

    let mut dispatch = if verbosity > 0 {
        Dispatch::new().format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%dT%H:%M:%S%z]"),
                record.target(),
                record.level(),
                message
            ))
        })
    } else {
        Dispatch::new().format(|out, message, record| match record.level() {
            Level::Info => out.finish(format_args!("{}", message)),
            level => out.finish(format_args!("[{}] {}", level, message)),
        })
    };

    if log_max_level != LevelFilter::Trace {
        for target in NOISY_TARGETS {
            dispatch = dispatch.level_for(target, LevelFilter::Warn);
        }
    }

    dispatch
        .level(log_max_level)
        .chain(std::io::stdout())
        .apply()?;

    debug!("done setting up logger");

    Ok(())
}
