//! Pure control-logic components: level debounce and the temperature
//! history ring. No hardware access; everything here runs identically on
//! the host and the board.

pub mod debounce;
pub mod history;
