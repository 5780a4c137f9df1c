use std::fs::{File, OpenOptions};
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize `tracing` from the logging configuration.
///
/// `RUST_LOG` takes precedence over `level`. Output goes to stdout unless
/// `file_path` is set, in which case lines are appended to that file.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = parse_log_level(&config.level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let file = config.file_path.as_deref().map(open_log_file).transpose()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.format.as_str(), file) {
        ("json", Some(file)) => registry.with(json_layer().with_writer(file)).try_init()?,
        ("json", None) => registry.with(json_layer()).try_init()?,
        (_, Some(file)) => registry.with(pretty_layer().with_writer(file)).try_init()?,
        (_, None) => registry.with(pretty_layer()).try_init()?,
    }

    Ok(())
}

fn json_layer<S>() -> fmt::Layer<S, fmt::format::JsonFields, fmt::format::Format<fmt::format::Json>> {
    fmt::layer()
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
}

fn pretty_layer<S>() -> fmt::Layer<S, fmt::format::Pretty, fmt::format::Format<fmt::format::Pretty>> {
    fmt::layer()
        .pretty()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_file(false)
}

fn open_log_file(path: &str) -> anyhow::Result<Arc<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Arc::new(file))
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_open_log_file_appends() {
        let path = std::env::temp_dir().join(format!("kuryana-log-{}.log", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        assert!(open_log_file(&path_str).is_ok());
        assert!(open_log_file(&path_str).is_ok());
        let _ = std::fs::remove_file(path);
    }
}
