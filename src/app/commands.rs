//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (dashboard,
//! WebSocket, serial console) that the
//! [`KettleService`](super::service::KettleService) interprets and acts
//! upon. Commands are `Copy` so they travel through the lock-free
//! [`command_queue`](crate::command_queue) without allocation.

/// Commands that external adapters can send into the application core.
/// Discriminants are the queue's wire encoding — keep in sync with
/// `command_queue::command_from_u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KettleCommand {
    /// Toggle the fill pump: stop it if running, otherwise start it
    /// (refused while the kettle is full).
    TogglePump = 0,

    /// Toggle the heat: stop it if running, otherwise engage it (refused
    /// unless the kettle is full).
    ToggleHeat = 1,

    /// Start filling now and engage heat automatically once the kettle
    /// becomes full. Idempotent: a second request while one is pending is
    /// a no-op, as is a request while heat is already running.
    FillAndHeat = 2,
}
