//! nautobot-settings
//!
//! Validates the deployment environment and prints the assembled settings
//! mapping as JSON, credentials masked. Exits non-zero when configuration is
//! incomplete.
//!
//! Run with: cargo run -- [test]

use std::io::Write;

use nautobot_settings::settings::logging::init_tracing;
use nautobot_settings::{missing_required, ConfigError, ProcessEnv, Settings};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err @ ConfigError::MissingRequired(_)) => {
            // Tracing is configured from the settings, so report directly
            eprintln!("Missing: {}", missing_required(&ProcessEnv).join(", "));
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    init_tracing(&settings.logging);

    tracing::info!("Settings loaded ({})", settings.summary());
    for warning in settings.warnings() {
        tracing::warn!("{}", warning);
    }
    let backends: Vec<&str> = settings
        .plugins_config
        .enabled_backends()
        .iter()
        .map(|backend| backend.as_str())
        .collect();
    tracing::info!("Chat backends enabled: {:?}", backends);

    let mapping = settings.to_redacted_mapping()?;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &mapping)?;
    writeln!(stdout)?;

    Ok(())
}
