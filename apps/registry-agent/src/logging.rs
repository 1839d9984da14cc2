//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter directive for the `-v` count, falling back to the configured level.
fn level_for(verbose: u8, cfg: &LoggingConfig) -> String {
    match verbose {
        0 => cfg.level.clone(),
        1 => "info".to_owned(),
        2 => "debug".to_owned(),
        _ => "trace".to_owned(),
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over both the
/// command line and the configuration. Logs go to stderr so stdout stays
/// reserved for command results.
pub fn init(cfg: &LoggingConfig, verbose: u8, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, cfg)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed (e.g. by a test harness).
    let installed = if cfg.json || force_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        eprintln!("logging already initialized: {e}");
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_configured_level() {
        let cfg = LoggingConfig::default();
        assert_eq!(level_for(0, &cfg), "warn");
        assert_eq!(level_for(1, &cfg), "info");
        assert_eq!(level_for(2, &cfg), "debug");
        assert_eq!(level_for(7, &cfg), "trace");
    }
}
