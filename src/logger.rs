use crate::error::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The booking screen owns the terminal (raw mode, alternate screen), so log
/// lines only ever go to `log_file`. Without one, nothing is written.
pub fn init_logger(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    subscriber(verbose, log_file)?.init();
    Ok(())
}

fn subscriber(
    verbose: bool,
    log_file: Option<&Path>,
) -> Result<impl Subscriber + Send + Sync + use<>> {
    let default_filter = if verbose {
        "booking_desk=debug"
    } else {
        "booking_desk=info"
    };
    let filter = match log_file {
        Some(_) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
        }
        None => EnvFilter::new("off"),
    };

    let file_layer = match log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };

    Ok(tracing_subscriber::registry().with(filter).with(file_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tracing::{Level, debug, warn};

    #[test]
    fn log_file_receives_events() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let subscriber = subscriber(true, Some(file.path())).expect("subscriber");
        tracing::subscriber::with_default(subscriber, || {
            warn!("simulated backend rejected booking");
            debug!("phase transition");
        });
        let written = fs::read_to_string(file.path()).expect("read log");
        assert!(written.contains("simulated backend rejected booking"));
        assert!(!written.contains("\u{1b}["), "file output carries no ANSI codes");
    }

    #[test]
    fn without_log_file_every_level_is_off() {
        let subscriber = subscriber(true, None).expect("subscriber");
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(Level::ERROR));
            assert!(!tracing::enabled!(Level::WARN));
        });
    }
}
