//! Reconfiguration server
//!
//! External reconfiguration events (operator changes, orchestration) arrive
//! as messages on a channel. A single worker thread drains the channel and
//! calls [`ReconfigureController::apply_configuration`] once per message, so
//! applies are serialized no matter how many senders exist.
//!
//! ```text
//! ┌──────────────────┐  request   ┌──────────────────┐  apply   ┌────────────┐
//! │ ReconfigureHandle│ ─────────▶ │ reconfig-server  │ ───────▶ │ Controller │
//! │  (any thread)    │ ◀───────── │  (one thread)    │          └────────────┘
//! └──────────────────┘   reply    └──────────────────┘
//! ```

use super::controller::{ApplyOutcome, ReconfigureController};
use super::LOG_TARGET;
use crate::core::driver_config::DriverConfiguration;
use crate::error::{ApplyError, Error, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type Reply = Sender<std::result::Result<ApplyOutcome, ApplyError>>;

enum Request {
    Apply {
        config: Box<DriverConfiguration>,
        reply: Option<Reply>,
    },
    Shutdown,
}

/// Cloneable sender side of the reconfiguration queue
#[derive(Clone)]
pub struct ReconfigureHandle {
    tx: Sender<Request>,
}

impl ReconfigureHandle {
    /// Queue a configuration without waiting for the result
    pub fn request(&self, config: DriverConfiguration) -> Result<()> {
        self.tx
            .send(Request::Apply {
                config: Box::new(config),
                reply: None,
            })
            .map_err(|_| Error::ChannelClosed("reconfigure queue"))
    }

    /// Queue a configuration and wait until it has been applied
    pub fn request_blocking(&self, config: DriverConfiguration) -> Result<ApplyOutcome> {
        let (reply_tx, reply_rx) = bounded(1);
        self.tx
            .send(Request::Apply {
                config: Box::new(config),
                reply: Some(reply_tx),
            })
            .map_err(|_| Error::ChannelClosed("reconfigure queue"))?;

        let outcome = reply_rx
            .recv()
            .map_err(|_| Error::ChannelClosed("reconfigure reply"))??;
        Ok(outcome)
    }
}

/// Owns the worker thread that applies queued configurations
pub struct ReconfigureServer {
    controller: Arc<ReconfigureController>,
    tx: Sender<Request>,
    handle: Option<JoinHandle<()>>,
}

impl ReconfigureServer {
    /// Spawn the worker thread
    pub fn spawn(controller: Arc<ReconfigureController>) -> Result<Self> {
        let (tx, rx) = unbounded();
        let worker_controller = Arc::clone(&controller);

        let handle = thread::Builder::new()
            .name("reconfig-server".to_string())
            .spawn(move || Self::run(worker_controller, rx))
            .map_err(|e| Error::Thread(format!("Failed to spawn reconfigure server: {}", e)))?;

        log::debug!(target: LOG_TARGET, "Reconfigure server started");
        Ok(Self {
            controller,
            tx,
            handle: Some(handle),
        })
    }

    fn run(controller: Arc<ReconfigureController>, rx: Receiver<Request>) {
        let mut applied = 0u64;
        for request in rx.iter() {
            match request {
                Request::Apply { config, reply } => {
                    let result = controller.apply_configuration(*config);
                    applied += 1;
                    if let Some(reply) = reply {
                        // Requester may have given up waiting
                        let _ = reply.send(result);
                    }
                }
                Request::Shutdown => break,
            }
        }
        log::debug!(
            target: LOG_TARGET,
            "Reconfigure server exiting after {} requests",
            applied
        );
    }

    /// New sender for reconfiguration requests
    pub fn handle(&self) -> ReconfigureHandle {
        ReconfigureHandle {
            tx: self.tx.clone(),
        }
    }

    /// Controller driven by this server, for reading the current configuration
    pub fn controller(&self) -> &Arc<ReconfigureController> {
        &self.controller
    }

    /// Finish queued requests, then stop and join the worker
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // Worker may already be gone if it panicked; join reports that
        let _ = self.tx.send(Request::Shutdown);
        handle
            .join()
            .map_err(|_| Error::Thread("reconfigure server panicked".to_string()))
    }
}

impl Drop for ReconfigureServer {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
