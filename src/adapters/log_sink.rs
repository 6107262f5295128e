//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). Status events are
//! serialised to the same JSON the dashboard receives, so the serial
//! console mirrors what connected clients see. A WebSocket adapter would
//! implement the same trait.

use log::{info, warn};

use crate::app::events::KettleEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`KettleEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &KettleEvent) {
        match event {
            KettleEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            KettleEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            KettleEvent::LevelChanged { full } => {
                info!("LEVEL | {}", if *full { "full" } else { "low" });
            }
            KettleEvent::CommandRefused(cmd) => {
                info!("CMD   | {:?} refused, state unchanged", cmd);
            }
            KettleEvent::SafetyCutoff(reason) => {
                warn!("CUTOFF| {reason}");
            }
            KettleEvent::Status(snapshot) => {
                if let Ok(json) = serde_json::to_string(snapshot) {
                    info!("STATUS| {json}");
                }
            }
        }
    }
}
