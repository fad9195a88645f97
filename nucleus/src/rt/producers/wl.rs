use log::warn;

use crate::{rt::Producer, Result};

/// Reads requests off one client connection.
pub struct Wl {
	connection: crate::Connection,
	bytes: Vec<u8>,
	fds: Vec<std::os::fd::OwnedFd>,
}

impl Wl {
	pub fn new(connection: crate::Connection) -> Self {
		Self {
			connection,
			bytes: Vec::new(),
			fds: Vec::new(),
		}
	}

	pub fn connection(&self) -> &crate::Connection {
		&self.connection
	}
}

pub enum WlMessage<'a> {
	/// Fds that arrived with the bytes of the requests that follow.
	Fds(Vec<std::os::fd::OwnedFd>),
	Request {
		object: u32,
		op: u16,
		params: &'a [u8],
	},
	Closed,
}

impl Producer for Wl {
	type Message<'a> = WlMessage<'a>;
	type Ret = Result<()>;

	fn fd(&self) -> std::os::fd::RawFd {
		self.connection.as_raw_fd()
	}

	fn call(
		&mut self,
		callback: &mut impl FnMut(Self::Message<'_>) -> Self::Ret,
	) -> Result<std::ops::ControlFlow<()>> {
		let received = self.connection.receive(&mut self.bytes, &mut self.fds)?;

		if !self.fds.is_empty() {
			callback(WlMessage::Fds(std::mem::take(&mut self.fds)))?;
		}

		let Some(_) = received else {
			callback(WlMessage::Closed)?;
			return Ok(std::ops::ControlFlow::Break(()));
		};

		let messages = match crate::split_messages(&mut self.bytes) {
			Ok(x) => x,
			Err(e) => {
				warn!("fd {}: malformed message: {e}", self.fd());
				callback(WlMessage::Closed)?;
				return Ok(std::ops::ControlFlow::Break(()));
			}
		};

		for (header, params) in messages {
			callback(WlMessage::Request {
				object: header.object_id,
				op: header.op,
				params: &params,
			})?;
		}

		Ok(std::ops::ControlFlow::Continue(()))
	}
}
