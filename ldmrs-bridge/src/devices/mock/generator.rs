//! Synthetic payload stream
//!
//! Pushes payloads into a [`MockDeviceManager`] the way the real device
//! manager forwards decoded LD-MRS data to registered applications. Every
//! scan period produces one scan followed by one other payload, taken from a
//! rotation of wire datatype tags that ends with a tag this crate does not
//! decode.
//!
//! The scan period follows the scan frequency: the generator polls a rate
//! source once per period and picks up changes applied at runtime.

use super::manager::MockDeviceManager;
use crate::config::SimulationConfig;
use crate::core::types::{Datatype, Field, NtpTime, Scan, ScannerInfo, SensorPayload, SourceId};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Datatype tag of the undecodable payload in the rotation
const UNDECODED_TAG: u16 = 0x6301;

/// Wire tags of the payloads sent between scans, one per scan period
const SIDE_ROTATION: [u16; 7] = [
    0x2221,
    0x7000,
    0x7100,
    0x7200,
    0x7300,
    0x7400,
    UNDECODED_TAG,
];

/// Start offset between consecutive scanner heads (2^-10 s, ~1 ms)
const HEAD_OFFSET: u64 = 1 << 22;

/// Sweep duration of one head (1/16 s)
const SWEEP_DURATION: u64 = 1 << 28;

/// Rate used when the configured one is unusable
const FALLBACK_RATE_HZ: f64 = 12.5;

/// Build one payload of `datatype`. `cycle` varies the counts between rounds.
pub fn synthetic_payload(
    config: &SimulationConfig,
    source: SourceId,
    datatype: Datatype,
    cycle: u64,
    now: NtpTime,
) -> SensorPayload {
    let n = cycle as usize;
    match datatype {
        Datatype::Scan => SensorPayload::Scan(Scan {
            source,
            num_points: config.points_per_scan,
            scanner_infos: (0..config.scanner_heads)
                .map(|head| {
                    let start = now.raw() + head as u64 * HEAD_OFFSET;
                    ScannerInfo {
                        device_id: head,
                        start_timestamp: NtpTime::from_raw(start),
                        end_timestamp: NtpTime::from_raw(start + SWEEP_DURATION),
                    }
                })
                .collect(),
        }),
        Datatype::Objects => SensorPayload::ObjectList {
            source,
            object_count: n % 16,
        },
        Datatype::Fields => SensorPayload::FieldSet {
            source,
            fields: (0..4)
                .map(|i| Field {
                    number: i,
                    valid: (i as usize) <= n % 4,
                })
                .collect(),
        },
        Datatype::EvalCases => SensorPayload::EvalCaseSet {
            source,
            case_count: 2,
        },
        Datatype::EvalCaseResults => SensorPayload::EvalCaseResultSet {
            source,
            result_count: 2,
        },
        Datatype::Msg => SensorPayload::Message {
            source,
            text: format!("status ok (cycle {})", n),
        },
        Datatype::MeasurementList => SensorPayload::MeasurementList {
            source,
            entry_count: 3,
        },
        Datatype::Unknown(tag) => SensorPayload::Unknown {
            source,
            datatype: tag,
        },
    }
}

/// Payloads delivered in scan period `tick`: the scan, then the next rotation entry
pub fn scan_period_payloads(
    config: &SimulationConfig,
    source: SourceId,
    tick: u64,
    now: NtpTime,
) -> [SensorPayload; 2] {
    let len = SIDE_ROTATION.len() as u64;
    let side = Datatype::from_tag(SIDE_ROTATION[(tick % len) as usize]);
    [
        synthetic_payload(config, source, Datatype::Scan, tick, now),
        synthetic_payload(config, source, side, tick / len, now),
    ]
}

fn ntp_now() -> NtpTime {
    NtpTime::from_unix_duration(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default(),
    )
}

fn usable_rate(hz: f64) -> Option<f64> {
    (hz.is_finite() && hz > 0.0).then_some(hz)
}

/// Background thread delivering synthetic payloads
pub struct PayloadGenerator {
    config: SimulationConfig,
    source: SourceId,
    /// Current scan rate in Hz, stored as `f64` bits
    rate_hz: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl PayloadGenerator {
    /// Create a generator running at `rate_hz` scans per second until the
    /// rate source says otherwise
    pub fn new(config: SimulationConfig, source: SourceId, rate_hz: f64) -> Self {
        let rate_hz = usable_rate(rate_hz).unwrap_or(FALLBACK_RATE_HZ);
        Self {
            config,
            source,
            rate_hz: Arc::new(AtomicU64::new(rate_hz.to_bits())),
            shutdown: Arc::new(AtomicBool::new(false)),
            delivered: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Start delivering into `manager`.
    ///
    /// `rate` is polled once per scan period; `None` or an unusable value
    /// keeps the current rate.
    pub fn start<F>(&mut self, manager: Arc<MockDeviceManager>, rate: F) -> Result<()>
    where
        F: Fn() -> Option<f64> + Send + 'static,
    {
        let config = self.config.clone();
        let source = self.source;
        let rate_hz = Arc::clone(&self.rate_hz);
        let shutdown = Arc::clone(&self.shutdown);
        let delivered = Arc::clone(&self.delivered);

        self.handle = Some(
            thread::Builder::new()
                .name("mock-payloads".to_string())
                .spawn(move || {
                    let mut tick = 0u64;
                    while !shutdown.load(Ordering::Relaxed) {
                        let mut hz = f64::from_bits(rate_hz.load(Ordering::Relaxed));
                        if let Some(next) = rate().and_then(usable_rate) {
                            if next != hz {
                                log::info!("Payload generator rate changed to {:.1} Hz", next);
                                rate_hz.store(next.to_bits(), Ordering::Relaxed);
                                hz = next;
                            }
                        }

                        for payload in scan_period_payloads(&config, source, tick, ntp_now()) {
                            manager.deliver(&payload);
                            delivered.fetch_add(1, Ordering::Relaxed);
                        }
                        tick += 1;
                        thread::sleep(Duration::from_secs_f64(1.0 / hz));
                    }
                    log::info!("Payload generator exiting after {} scan periods", tick);
                })
                .map_err(|e| Error::Thread(format!("Failed to spawn payload generator: {}", e)))?,
        );

        log::info!(
            "Payload generator started ({:.1} Hz, {} heads)",
            self.rate_hz(),
            self.config.scanner_heads
        );
        Ok(())
    }

    /// Scan rate currently used
    pub fn rate_hz(&self) -> f64 {
        f64::from_bits(self.rate_hz.load(Ordering::Relaxed))
    }

    /// Payloads delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Stop and join the generator thread
    pub fn shutdown(&mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| Error::Thread("payload generator panicked".to_string()))?;
        }
        Ok(())
    }
}

impl Drop for PayloadGenerator {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
