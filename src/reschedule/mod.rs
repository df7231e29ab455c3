//! Online rescheduling of callback tasks against a built schedule.
//!
//! - [`Rescheduler`] — replays callbacks in trigger order, splicing each
//!   into the nearest active route of its day
//! - [`CallbackOutcome`] — per-callback record of where it landed and
//!   which tasks it pushed out

mod replay;

pub use replay::{CallbackOutcome, Rescheduler};
