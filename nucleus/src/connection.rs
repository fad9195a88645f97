use std::os::fd::{AsRawFd as _, FromRawFd as _};

use nix::sys::socket::{ControlMessage, ControlMessageOwned, MsgFlags};

use crate::{Outgoing, Result};

/// Most fds libwayland puts into one message batch.
const MAX_FDS: usize = 28;

/// Client socket. Cloning shares the underlying stream.
#[derive(Clone)]
pub struct Connection {
	stream: std::rc::Rc<std::os::unix::net::UnixStream>,
}

impl Connection {
	pub fn new(stream: std::os::unix::net::UnixStream) -> Self {
		Self {
			stream: std::rc::Rc::new(stream),
		}
	}

	pub fn as_raw_fd(&self) -> std::os::fd::RawFd {
		self.stream.as_raw_fd()
	}

	/// Stops both directions. The peer sees a hangup, pending reads return end of file.
	pub fn shutdown(&self) -> Result<()> {
		self.stream.shutdown(std::net::Shutdown::Both)?;
		Ok(())
	}

	/// Reads whatever is available into `bytes` and collects passed fds into `fds`.
	/// Returns `None` once the peer hung up.
	pub fn receive(
		&self,
		bytes: &mut Vec<u8>,
		fds: &mut Vec<std::os::fd::OwnedFd>,
	) -> Result<Option<usize>> {
		let mut buffer = [0u8; 4096];
		let mut cmsg = nix::cmsg_space!([std::os::fd::RawFd; MAX_FDS]);

		let (len, received) = {
			let mut iov = [std::io::IoSliceMut::new(&mut buffer)];

			let msg = match nix::sys::socket::recvmsg::<()>(
				self.as_raw_fd(),
				&mut iov,
				Some(&mut cmsg),
				MsgFlags::MSG_CMSG_CLOEXEC,
			) {
				Ok(msg) => msg,
				Err(nix::errno::Errno::ECONNRESET) => return Ok(None),
				Err(nix::errno::Errno::EAGAIN) => return Ok(Some(0)),
				Err(x) => return Err(x)?,
			};

			let mut received = Vec::new();

			for i in msg.cmsgs()? {
				let ControlMessageOwned::ScmRights(raw) = i else {
					continue;
				};

				// the kernel handed these over, nobody else owns them
				received.extend(
					raw.into_iter()
						.map(|x| unsafe { std::os::fd::OwnedFd::from_raw_fd(x) }),
				);
			}

			(msg.bytes, received)
		};

		fds.extend(received);

		if len == 0 {
			return Ok(None);
		}

		bytes.extend_from_slice(&buffer[..len]);

		Ok(Some(len))
	}

	/// Writes as much of `messages` as the socket takes without blocking. Whatever was
	/// written is removed from the front of `messages`; a message the socket only took
	/// part of keeps its unwritten bytes, its fds went out with the first part.
	pub fn send(&self, messages: &mut Vec<Outgoing>) -> Result<()> {
		let mut sent = 0;

		let ret = 'messages: loop {
			let Some(message) = messages.get_mut(sent) else {
				break Ok(());
			};

			while !message.bytes.is_empty() {
				let raw = message
					.fds
					.iter()
					.map(|x| x.as_raw_fd())
					.collect::<Vec<_>>();

				let cmsgs = if raw.is_empty() {
					Vec::new()
				} else {
					vec![ControlMessage::ScmRights(&raw)]
				};

				let iov = [std::io::IoSlice::new(&message.bytes)];

				match nix::sys::socket::sendmsg::<()>(
					self.as_raw_fd(),
					&iov,
					&cmsgs,
					MsgFlags::MSG_NOSIGNAL,
					None,
				) {
					Ok(0) | Err(nix::errno::Errno::EAGAIN) => break 'messages Ok(()),
					Ok(n) => {
						message.bytes.drain(..n);
						message.fds.clear();
					}
					Err(nix::errno::Errno::EINTR) => {}
					Err(x) => break 'messages Err(x),
				}
			}

			sent += 1;
		};

		messages.drain(..sent);
		ret?;

		Ok(())
	}
}

/// Splits complete messages off the front of `bytes`, leaving a partial message in place.
pub fn split_messages(bytes: &mut Vec<u8>) -> Result<Vec<(wlm::Header, Vec<u8>)>> {
	let mut ret = Vec::new();
	let mut offset = 0;

	while bytes.len() - offset >= wlm::HEADER_SIZE {
		let header = wlm::Header::parse(&bytes[offset..])?;
		let end = offset + header.size as usize;

		if end > bytes.len() {
			break;
		}

		ret.push((header, bytes[offset + wlm::HEADER_SIZE..end].to_vec()));
		offset = end;
	}

	bytes.drain(..offset);

	Ok(ret)
}

#[cfg(test)]
mod tests {
	use super::split_messages;

	#[test]
	fn partial_messages_stay_buffered() {
		let a = wlm::Message {
			object_id: 1,
			op: 0,
			args: 2u32,
		}
		.to_vec()
		.unwrap();

		let b = wlm::Message {
			object_id: 2,
			op: 1,
			args: ("text/plain", 3u32),
		}
		.to_vec()
		.unwrap();

		let mut bytes = a.clone();
		bytes.extend(&b[..10]);

		let messages = split_messages(&mut bytes).unwrap();
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].0.object_id, 1);
		assert_eq!(messages[0].1, 2u32.to_ne_bytes());
		assert_eq!(bytes, b[..10]);

		bytes.extend(&b[10..]);

		let messages = split_messages(&mut bytes).unwrap();
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].0.op, 1);
		assert!(bytes.is_empty());
	}
}
