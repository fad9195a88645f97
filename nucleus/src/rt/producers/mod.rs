mod unix_listener;
mod wl;

pub use unix_listener::*;
pub use wl::*;

use crate::Result;

/// A pollable source of messages for the [`crate::rt::Runtime`].
pub trait Producer {
	type Message<'a>;
	type Ret;

	fn fd(&self) -> std::os::fd::RawFd;

	/// Called when `fd` is readable. Returning `Break` unregisters the producer.
	fn call(
		&mut self,
		callback: &mut impl FnMut(Self::Message<'_>) -> Self::Ret,
	) -> Result<std::ops::ControlFlow<()>>;
}
