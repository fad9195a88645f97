//! Small poll(2) loop that drives the test server: one [`Producer`] per file descriptor,
//! each with a callback that may register further producers.

pub mod producers;
mod runtime;

pub use producers::Producer;
pub use runtime::*;
