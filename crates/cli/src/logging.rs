use anyhow::Result;
use steamlite_core::tracing::{InstrumentationConfig, init_tracing};
use tracing::Level;

/// Initialize logging for the CLI on stderr. `RUST_LOG` wins over `level`.
pub fn init_logging(level: Level) -> Result<()> {
    let level_str = level.as_str().to_lowercase();

    let config = InstrumentationConfig {
        log_level: format!(
            "steamlite={level_str},steamlite_http={level_str},steamlite_core={level_str}"
        ),
        ..InstrumentationConfig::from_env()
    };

    init_tracing(&config)?;
    Ok(())
}
