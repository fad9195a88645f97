use std::os::fd::{AsFd as _, AsRawFd as _};

use log::trace;

use crate::{rt::Producer, Result};

struct Caller<T: Producer, U, V: FnMut(T::Message<'_>, &mut U, &mut Runtime<U>) -> T::Ret> {
	producer: T,
	callback: V,
	_phantom: std::marker::PhantomData<U>,
}

trait CallerWrapper<T> {
	fn call(&mut self, state: &mut T, runtime: &mut Runtime<T>) -> Result<std::ops::ControlFlow<()>>;
}

impl<T: Producer, U, V: FnMut(T::Message<'_>, &mut U, &mut Runtime<U>) -> T::Ret> CallerWrapper<U>
	for Caller<T, U, V>
{
	fn call(&mut self, state: &mut U, runtime: &mut Runtime<U>) -> Result<std::ops::ControlFlow<()>> {
		self.producer
			.call(&mut |event| (self.callback)(event, state, runtime))
	}
}

/// Runs until no producer is left or [`Runtime::stop`] is called.
///
/// A producer returning `ControlFlow::Break` is dropped from the loop, the others keep
/// running.
pub struct Runtime<State> {
	map: std::collections::HashMap<std::os::fd::RawFd, Box<dyn CallerWrapper<State>>>,
	stopped: bool,
}

impl<State: 'static> Default for Runtime<State> {
	fn default() -> Self {
		Self::new()
	}
}

impl<State: 'static> Runtime<State> {
	pub fn new() -> Self {
		Self {
			map: Default::default(),
			stopped: false,
		}
	}

	pub fn on<T: Producer + 'static>(
		&mut self,
		producer: T,
		callback: impl FnMut(T::Message<'_>, &mut State, &mut Runtime<State>) -> T::Ret + 'static,
	) {
		let fd = producer.fd();

		let a = Caller {
			producer,
			callback,
			_phantom: std::marker::PhantomData::<State>,
		};

		self.map.insert(fd, Box::new(a));
	}

	pub fn stop(&mut self) {
		self.stopped = true;
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn run(&mut self, state: &mut State) -> Result<()> {
		while !self.stopped && !self.map.is_empty() {
			self.turn(state)?;
		}

		Ok(())
	}

	/// Waits for at least one ready producer and runs every ready one once.
	pub fn turn(&mut self, state: &mut State) -> Result<()> {
		let ready = {
			let mut fds = self
				.map
				.keys()
				.map(|&x| {
					nix::poll::PollFd::new(
						unsafe { std::os::fd::BorrowedFd::borrow_raw(x) },
						nix::poll::PollFlags::POLLIN,
					)
				})
				.collect::<Vec<_>>();

			match nix::poll::poll(&mut fds, nix::poll::PollTimeout::NONE) {
				Ok(_) => {}
				Err(nix::errno::Errno::EINTR) => return Ok(()),
				Err(x) => return Err(x)?,
			}

			// hangups and errors count as readable, the producer finds out on read
			fds.iter()
				.filter(|x| x.revents().is_some_and(|x| !x.is_empty()))
				.map(|x| x.as_fd().as_raw_fd())
				.collect::<Vec<_>>()
		};

		for fd in ready {
			// taken out while it runs so its callback can register new producers
			let Some(mut entry) = self.map.remove(&fd) else {
				continue;
			};

			match entry.call(state, self)? {
				std::ops::ControlFlow::Continue(_) => {
					self.map.insert(fd, entry);
				}
				std::ops::ControlFlow::Break(_) => {
					trace!("producer on fd {fd} finished");
				}
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write as _;

	use super::Runtime;
	use crate::rt::producers::{UnixListener, Wl, WlMessage};

	#[test]
	fn closed_producers_leave_the_loop() {
		let (a, b) = std::os::unix::net::UnixStream::pair().unwrap();
		a.set_nonblocking(true).unwrap();

		let mut runtime = Runtime::<Vec<(u32, u16)>>::new();

		runtime.on(
			Wl::new(crate::Connection::new(a)),
			|msg, state, _| {
				match msg {
					WlMessage::Request { object, op, .. } => state.push((object, op)),
					WlMessage::Fds(_) | WlMessage::Closed => {}
				}

				Ok(())
			},
		);

		let message = wlm::Message {
			object_id: 1,
			op: 1,
			args: 2u32,
		}
		.to_vec()
		.unwrap();

		(&b).write_all(&message).unwrap();
		drop(b);

		let mut state = Vec::new();
		runtime.run(&mut state).unwrap();

		assert_eq!(state, [(1, 1)]);
		assert!(runtime.is_empty());
	}

	#[test]
	fn callbacks_can_register_producers() {
		let dir = std::env::temp_dir().join(format!("nucleus-rt-{}", std::process::id()));
		let _ = std::fs::remove_file(&dir);

		let listener = std::os::unix::net::UnixListener::bind(&dir).unwrap();
		listener.set_nonblocking(true).unwrap();

		let client = std::os::unix::net::UnixStream::connect(&dir).unwrap();

		let mut runtime = Runtime::<usize>::new();

		runtime.on(UnixListener::new(listener), |stream, accepted, runtime| {
			*accepted += 1;
			runtime.on(Wl::new(crate::Connection::new(stream)), |_, _, _| Ok(()));

			Ok(())
		});

		let mut accepted = 0;
		runtime.turn(&mut accepted).unwrap();

		assert_eq!(accepted, 1);
		assert_eq!(runtime.len(), 2);

		drop(client);
		let _ = std::fs::remove_file(&dir);
	}
}
