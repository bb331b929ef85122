//! Scripting layer that drives the external e-forms portal: a scoped,
//! promise-like query abstraction over a target page, bounded waits as the
//! only concurrency primitive, and the multi-step form-fill protocol.

mod filler;
mod page;
mod script;
mod wait;

pub use filler::*;
pub use page::*;
pub use script::*;
pub use wait::{first_event, poll_until, sleep_for, WaitOutcome, INTERVAL, TIMEOUT};
