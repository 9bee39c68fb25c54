//! Application wiring
//!
//! Builds the dispatcher, reconfiguration controller and server around a
//! device manager, applies the initial configuration and keeps running until
//! SIGINT/SIGTERM.
//!
//! # Signals
//!
//! | Signal | Action |
//! |--------|--------|
//! | `SIGINT`, `SIGTERM` | Graceful shutdown |
//! | `SIGHUP` | Re-read the config file and queue its `[driver]` section for apply |

use crate::config::AppConfig;
use crate::core::device::DeviceManager;
use crate::core::types::SourceId;
use crate::devices::mock::{MockDeviceManager, PayloadGenerator};
use crate::dispatch::DataDispatcher;
use crate::error::{Error, Result};
use crate::reconfig::{ReconfigureController, ReconfigureHandle, ReconfigureServer, ScanFrequency};
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Interval between statistics log lines
const STATS_INTERVAL: Duration = Duration::from_secs(10);

/// Main application structure that manages all components
pub struct BridgeApp {
    config: AppConfig,
    config_path: PathBuf,
    manager: Arc<MockDeviceManager>,
    server: ReconfigureServer,
    generator: Option<PayloadGenerator>,
    shutdown: Arc<AtomicBool>,
}

impl BridgeApp {
    /// Create the application. The dispatcher is registered before any
    /// device connects so no payload is missed.
    pub fn new(config: AppConfig, config_path: impl Into<PathBuf>) -> Result<Self> {
        let manager = Arc::new(MockDeviceManager::new());
        manager.add_sink(Arc::new(DataDispatcher::new()));

        let controller = Arc::new(
            ReconfigureController::new(
                Arc::clone(&manager) as Arc<dyn DeviceManager>,
                config.driver.clone(),
                config.validation.validator(),
            )
            .with_source_type(config.device.sensor_type),
        );
        let server = ReconfigureServer::spawn(controller)?;

        Ok(Self {
            config,
            config_path: config_path.into(),
            manager,
            server,
            generator: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Run until a shutdown signal arrives
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Adding device {} ({:?})",
            self.config.device.name,
            self.config.device.sensor_type
        );
        self.manager.connect(self.config.device.sensor_type);

        match self
            .server
            .handle()
            .request_blocking(self.config.driver.clone())
        {
            Ok(outcome) => log::info!("Initial configuration: {:?}", outcome),
            Err(e) => log::error!("Initial configuration failed: {}", e),
        }

        if self.config.simulation.enabled {
            self.start_generator()?;
        }

        self.setup_signal_handler()?;
        log::info!("{} is running. Press Ctrl+C to stop.", self.config.device.name);

        let mut last_stats = Instant::now();
        while !self.shutdown.load(Ordering::Relaxed) {
            std::thread::sleep(Duration::from_millis(100));
            if last_stats.elapsed() >= STATS_INTERVAL {
                self.log_statistics();
                last_stats = Instant::now();
            }
        }

        log::info!("Shutdown signal received, stopping threads...");
        self.stop_all_threads()
    }

    /// Start the payload generator at the configured scan frequency. The
    /// generator re-reads the frequency every scan period, so SIGHUP reloads
    /// change its rate too.
    fn start_generator(&mut self) -> Result<()> {
        let controller = Arc::clone(self.server.controller());
        let rate_hz = configured_rate_hz(&controller).unwrap_or(ScanFrequency::Hz12_5.hz());

        let mut generator = PayloadGenerator::new(
            self.config.simulation.clone(),
            SourceId(self.config.device.source_id),
            rate_hz,
        );
        generator.start(Arc::clone(&self.manager), move || {
            configured_rate_hz(&controller)
        })?;
        self.generator = Some(generator);
        Ok(())
    }

    /// Spawn the signal thread: shutdown on SIGINT/SIGTERM, reload on SIGHUP
    fn setup_signal_handler(&self) -> Result<()> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
        let shutdown = Arc::clone(&self.shutdown);
        let reconfigure = self.server.handle();
        let config_path = self.config_path.clone();

        std::thread::Builder::new()
            .name("signal-handler".to_string())
            .spawn(move || {
                for sig in signals.forever() {
                    if sig == SIGHUP {
                        reload_config(&config_path, &reconfigure);
                        continue;
                    }
                    log::info!("Received signal {}, initiating shutdown...", sig);
                    shutdown.store(true, Ordering::Relaxed);
                    break;
                }
            })
            .map_err(|e| Error::Thread(format!("Failed to spawn signal handler: {}", e)))?;
        Ok(())
    }

    fn log_statistics(&self) {
        let current = self.server.controller().current_configuration();
        let delivered = self.generator.as_ref().map_or(0, PayloadGenerator::delivered);
        log::info!(
            "Payloads delivered: {} | device connected: {} | start={:.4} end={:.4} freq={}",
            delivered,
            self.manager.is_connected(),
            current.start_angle,
            current.end_angle,
            current.scan_frequency
        );
    }

    fn stop_all_threads(&mut self) -> Result<()> {
        if let Some(mut generator) = self.generator.take() {
            generator.shutdown()?;
        }
        self.server.shutdown()?;
        self.manager.disconnect();
        log::info!("All threads stopped");
        Ok(())
    }
}

/// Scan rate of the current configuration, if its selector is known
fn configured_rate_hz(controller: &ReconfigureController) -> Option<f64> {
    ScanFrequency::try_from(controller.current_configuration().scan_frequency)
        .ok()
        .map(ScanFrequency::hz)
}

/// Re-read `path` and queue its driver section
fn reload_config(path: &Path, reconfigure: &ReconfigureHandle) {
    log::info!("Reloading configuration from {}", path.display());
    match AppConfig::from_file(path) {
        Ok(config) => {
            if let Err(e) = reconfigure.request(config.driver) {
                log::error!("Failed to queue reconfiguration: {}", e);
            }
        }
        Err(e) => log::error!("Failed to reload {}: {}", path.display(), e),
    }
}
