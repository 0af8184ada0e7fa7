//! Log output for the `cltpj` binary.
//!
//! Everything goes to stderr so stdout carries only the report or the JSON
//! document. A log file, when configured, receives the same events without
//! colour.

use std::{
    fmt::Display,
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// `HH:MM:SS.mmm LEVEL crate:line message fields`.
struct CompactFmt;

/// Wraps a token in an SGR code when the writer supports ANSI.
#[derive(Clone, Copy)]
struct Paint(bool);

impl Paint {
    fn token(self, writer: &mut Writer<'_>, sgr: &str, text: impl Display) -> std::fmt::Result {
        if self.0 {
            write!(writer, "\x1b[{sgr}m{text}\x1b[0m ")
        } else {
            write!(writer, "{text} ")
        }
    }
}

fn level_sgr(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

impl<S, N> FormatEvent<S, N> for CompactFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let paint = Paint(writer.has_ansi_escapes());

        paint.token(&mut writer, "2", Local::now().format("%H:%M:%S%.3f"))?;
        paint.token(
            &mut writer,
            level_sgr(meta.level()),
            format_args!("{:>5}", meta.level()),
        )?;

        // Crate name, not file path.
        let origin = meta.target().split("::").next().unwrap_or_default();
        if let Some(line) = meta.line() {
            paint.token(&mut writer, "36", format_args!("{origin}:{line}"))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

// --- Public API ---

/// Builds the subscriber without installing it: stderr always, plus
/// `log_file` when given.
///
/// `log_file` is opened in append mode; its directory must already exist.
pub fn subscriber(log_file: Option<&Path>) -> Result<impl Subscriber + Send + Sync + 'static> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                fmt::layer()
                    .event_format(CompactFmt)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .event_format(CompactFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    Ok(tracing_subscriber::registry()
        .with(make_filter())
        .with(stderr_layer)
        .with(file_layer))
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    subscriber(log_file)?
        .try_init()
        .context("logging already initialized")
}
