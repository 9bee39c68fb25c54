//! Shared helpers for integration tests: a `log` backend that buffers
//! records per thread so parallel tests do not see each other's output.
#![allow(dead_code)]

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

/// One captured log record
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: Level,
    pub target: String,
    pub message: String,
}

thread_local! {
    static RECORDS: RefCell<Vec<Captured>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let captured = Captured {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        RECORDS.with(|records| records.borrow_mut().push(captured));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Install the capture logger (once per test binary) and clear this thread's buffer
pub fn init_capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Drain records captured on this thread
pub fn take_records() -> Vec<Captured> {
    RECORDS.with(|records| std::mem::take(&mut *records.borrow_mut()))
}

/// Drain records and keep those at `level` under `target`
pub fn take_matching(target: &str, level: Level) -> Vec<Captured> {
    take_records()
        .into_iter()
        .filter(|r| r.target == target && r.level == level)
        .collect()
}
