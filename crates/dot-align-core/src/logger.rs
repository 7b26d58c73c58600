//! Stderr logger for frame-by-frame runs.
//!
//! Lines look like `[  1.234s   #3 DEBUG dot_align_detect] message`: time
//! since installation, the frame being analysed (set with [`begin_frame`],
//! `-` between frames), level and originating crate. Records from crates
//! outside the `dot_align*` family are capped at `warn`, so image decoder
//! chatter never buries the per-region diagnostics raised by `--verbose`.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

const OWN_CRATE_PREFIX: &str = "dot_align";

// 0 = no frame in progress
static CURRENT_FRAME: AtomicUsize = AtomicUsize::new(0);
static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Tag subsequent log lines with the 1-based frame `index`.
pub fn begin_frame(index: usize) {
    CURRENT_FRAME.store(index, Ordering::Relaxed);
}

/// Stop tagging log lines with a frame.
pub fn end_frame() {
    CURRENT_FRAME.store(0, Ordering::Relaxed);
}

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl FrameLogger {
    fn allows(&self, target: &str, level: Level) -> bool {
        let cap = if is_own_target(target) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        level <= cap
    }
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.allows(metadata.target(), metadata.level())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            CURRENT_FRAME.load(Ordering::Relaxed),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn is_own_target(target: &str) -> bool {
    crate_of(target).starts_with(OWN_CRATE_PREFIX)
}

fn crate_of(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}

fn format_line(
    elapsed_secs: f64,
    frame: usize,
    level: Level,
    target: &str,
    message: impl fmt::Display,
) -> String {
    let frame = if frame == 0 {
        "-".to_string()
    } else {
        format!("#{frame}")
    };
    format!(
        "[{elapsed_secs:7.3}s {frame:>4} {level:>5} {}] {message}",
        crate_of(target)
    )
}

/// Install the stderr logger. `level` applies to the `dot_align*` crates;
/// everything else is additionally capped at `warn`.
///
/// Calling this more than once is a no-op after the first successful
/// installation.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the `dot_align*` crates log at `debug`
/// when `verbose` is set (else `warn`) and everything else at `warn`.
#[cfg(feature = "tracing")]
pub fn init_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let own = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!(
            "warn,dot_align={own},dot_align_core={own},dot_align_detect={own}"
        ))
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder.finish().try_init();
    }
}
