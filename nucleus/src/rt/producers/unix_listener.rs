use std::os::fd::AsRawFd as _;

use crate::{rt::Producer, Result};

/// Accepts every pending connection on a non-blocking listener. Accepted streams are
/// handed out non-blocking as well.
pub struct UnixListener {
	listener: std::os::unix::net::UnixListener,
}

impl UnixListener {
	pub fn new(listener: std::os::unix::net::UnixListener) -> Self {
		Self { listener }
	}
}

impl Producer for UnixListener {
	type Message<'a> = std::os::unix::net::UnixStream;

	type Ret = Result<()>;

	fn fd(&self) -> std::os::fd::RawFd {
		self.listener.as_raw_fd()
	}

	fn call(
		&mut self,
		callback: &mut impl FnMut(Self::Message<'_>) -> Self::Ret,
	) -> Result<std::ops::ControlFlow<()>> {
		loop {
			let stream = match self.listener.accept() {
				Ok((stream, _)) => stream,
				Err(x) if x.kind() == std::io::ErrorKind::WouldBlock => break,
				Err(x) if x.kind() == std::io::ErrorKind::Interrupted => continue,
				Err(x) => return Err(x)?,
			};

			stream.set_nonblocking(true)?;
			callback(stream)?;
		}

		Ok(std::ops::ControlFlow::Continue(()))
	}
}
