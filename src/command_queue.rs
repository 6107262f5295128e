//! Lock-free inbound command queue.
//!
//! Commands are produced by the transport context (WebSocket handler,
//! serial console) and consumed by the control loop, which drains the
//! queue once at the top of every iteration. Keeping the control loop the
//! only writer of kettle state makes each command atomic with respect to
//! the safety checks that follow in the same iteration.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ WS handler   │────▶│               │     │              │
//! │ Serial       │────▶│ Command Queue │────▶│ Control Loop │
//! │ (producer)   │     │  (lock-free)  │     │  (consumer)  │
//! └──────────────┘     └───────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::KettleCommand;

/// Maximum number of pending commands.
/// Power of 2 for efficient ring buffer modulo.
const COMMAND_QUEUE_CAP: usize = 16;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Transport context writes (produce), control loop reads (consume).
// Uses atomic head/tail indices over a byte buffer of command
// discriminants.

static CMD_HEAD: AtomicU8 = AtomicU8::new(0);
static CMD_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: CMD_BUFFER is accessed under the SPSC discipline only.
// Producer (push_command): transport task — one writer.
// Consumer (pop_command): control-loop task — one reader.
// The release/acquire pairs on CMD_HEAD/CMD_TAIL order the buffer
// accesses; no concurrent mutable access to a slot is possible.
static mut CMD_BUFFER: [u8; COMMAND_QUEUE_CAP] = [0; COMMAND_QUEUE_CAP];

/// Push a command into the queue.
/// Safe to call from the transport context (lock-free).
/// Returns `false` if the queue is full (command dropped).
pub fn push_command(cmd: KettleCommand) -> bool {
    let head = CMD_HEAD.load(Ordering::Relaxed);
    let tail = CMD_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % COMMAND_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop command.
    }

    // SAFETY: single producer; the slot at `head` is not visible to the
    // consumer until the Release store below.
    unsafe {
        CMD_BUFFER[head as usize] = cmd as u8;
    }

    CMD_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next command from the queue.
/// Called from the control loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_command() -> Option<KettleCommand> {
    let tail = CMD_TAIL.load(Ordering::Relaxed);
    let head = CMD_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { CMD_BUFFER[tail as usize] };
    CMD_TAIL.store((tail + 1) % COMMAND_QUEUE_CAP as u8, Ordering::Release);

    command_from_u8(raw)
}

/// Drain all pending commands into a callback, FIFO order.
pub fn drain_commands(mut handler: impl FnMut(KettleCommand)) {
    while let Some(cmd) = pop_command() {
        handler(cmd);
    }
}

/// Check if the command queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = CMD_TAIL.load(Ordering::Relaxed);
    let head = CMD_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending commands.
pub fn queue_len() -> usize {
    let head = CMD_HEAD.load(Ordering::Relaxed) as usize;
    let tail = CMD_TAIL.load(Ordering::Relaxed) as usize;
    (head + COMMAND_QUEUE_CAP - tail) % COMMAND_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn command_from_u8(raw: u8) -> Option<KettleCommand> {
    match raw {
        0 => Some(KettleCommand::TogglePump),
        1 => Some(KettleCommand::ToggleHeat),
        2 => Some(KettleCommand::FillAndHeat),
        _ => None,
    }
}
