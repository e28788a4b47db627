//! Observability hooks for the parser, tree assembler and resolver.
//!
//! The `log_event!` macro formats a structured key/value event and sends it to the
//! `log` facade at debug level, so it costs nothing unless a logger is installed and
//! debug output is enabled. `enable_verbose_logging` installs `env_logger` once per process.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use crate::error::FdfError;
use crate::kernels::with_path;

/// Logs a structured key-value event at debug level.
///
/// # Example
/// ```
/// use fdf::log_event;
/// let roots = 3;
/// log_event!("event" = "assemble_tree", "roots" = roots);
/// ```
#[macro_export]
macro_rules! log_event {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("FDF_EVENT: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs `env_logger` for the whole process at `info` level, writing to
/// `log_file` (appended) or to stderr. `RUST_LOG` overrides the level.
///
/// Returns `Ok(true)` if this call installed the logger and `Ok(false)` if a
/// logger was already in place. A log file that cannot be opened is an error.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<bool, FdfError> {
    let sink = match log_file {
        Some(path) => Some(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| with_path(path, e))?,
        ),
        None => None,
    };

    let mut installed = false;
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Info).parse_default_env();
        builder.format(|buf, record| {
            writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
        });
        if let Some(file) = sink {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        installed = builder.try_init().is_ok();
    });
    Ok(installed)
}
