//! ldmrs-bridge - runs the dispatch and reconfiguration core against the
//! mock LD-MRS device manager
//!
//! Send `SIGHUP` to re-apply the `[driver]` section of the config file.

use ldmrs_bridge::app::BridgeApp;
use ldmrs_bridge::config::AppConfig;
use ldmrs_bridge::error::Result;
use std::env;
use std::path::Path;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `ldmrs-bridge <path>` (positional)
/// - `ldmrs-bridge --config <path>` (flag-based)
/// - `ldmrs-bridge -c <path>` (short flag)
///
/// Defaults to `/etc/ldmrs-bridge.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/ldmrs-bridge.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config_found = Path::new(&config_path).exists();
    let config = if config_found {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("ldmrs-bridge v{} starting...", env!("CARGO_PKG_VERSION"));
    if config_found {
        log::info!("Using config: {}", config_path);
    } else {
        log::warn!("Config {} not found, using defaults", config_path);
    }

    let mut app = BridgeApp::new(config, config_path)?;
    app.run()?;

    log::info!("ldmrs-bridge stopped");
    Ok(())
}
