//! Tracing setup for the server binary
//!
//! Development terminals get a compact colored line per event; everything
//! else (production, CI, piped output) gets one JSON object per event.

use colored::*;
use std::env;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::ChronoUtc, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

use error_common::{IcareError, Result};
use logger_redacted::LoggerConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set. `verbose` forces
/// `debug` for the workspace crates.
///
/// # Errors
///
/// `IcareError::InternalError` when a global subscriber is already set.
pub fn init_tracing(logging: &LoggerConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        logging.log_level.clone()
    };

    let is_development =
        env::var("ICARE_ENV").unwrap_or_else(|_| "development".to_string()) == "development";
    let use_colors = env::var("NO_COLOR").is_err() && atty::is(atty::Stream::Stdout);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("subscriber_server={level},database_layer={level},tower_http=info,sqlx=warn").into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if is_development && use_colors && !logging.json {
        registry
            .with(fmt::layer().with_ansi(true).event_format(ColoredFormatter))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    };

    installed.map_err(|e| IcareError::InternalError(format!("Failed to initialise tracing: {}", e)))
}

/// One-line colored event format: `time [LEVEL] target fields`
pub struct ColoredFormatter;

impl<S, N> FormatEvent<S, N> for ColoredFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        write!(writer, "{} ", chrono::Utc::now().format("%H:%M:%S%.3f").to_string().bright_black())?;

        let level = match *metadata.level() {
            Level::TRACE => "TRACE".bright_purple(),
            Level::DEBUG => "DEBUG".bright_blue(),
            Level::INFO => " INFO".bright_green(),
            Level::WARN => " WARN".bright_yellow(),
            Level::ERROR => "ERROR".bright_red(),
        };
        write!(writer, "[{}] ", level)?;

        if let Some(target) = metadata.target().split("::").last() {
            write!(writer, "{:<15} ", target.bright_cyan())?;
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_colored_formatter_writes_message_and_fields() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(ColoredFormatter)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(order_id = %"ICORD0001", "Order created");
            tracing::warn!(status_code = 400, "API request rejected");
        });

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{output}");
        assert!(lines.first().is_some_and(|line| line.contains("INFO")
            && line.contains("Order created")
            && line.contains("order_id=ICORD0001")));
        assert!(lines.get(1).is_some_and(|line| line.contains("WARN")
            && line.contains("status_code=400")));
    }

    #[test]
    fn test_target_is_shortened() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(ColoredFormatter)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "subscriber_server::services::store", "Store search");
        });

        let output = buffer.contents();
        assert!(output.contains("store"));
        assert!(!output.contains("subscriber_server::services"));
    }
}
