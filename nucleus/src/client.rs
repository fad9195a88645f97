use crate::{
	store::{Slot, Store, CLIENT_START, SERVER_START},
	Connection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "client#{}", self.0)
	}
}

/// Encoded event waiting to be written to the client socket.
#[derive(Debug)]
pub struct Outgoing {
	pub object_id: u32,
	pub op: u16,
	pub bytes: Vec<u8>,
	pub fds: Vec<std::os::fd::OwnedFd>,
}

pub struct Client {
	pub id: ClientId,
	pub fd: Option<std::os::fd::RawFd>,
	client_store: Store<CLIENT_START>,
	server_store: Store<SERVER_START>,
	next_generation: u32,
	pub received_fds: std::collections::VecDeque<std::os::fd::OwnedFd>,
	outbox: Vec<Outgoing>,
	connection: Option<Connection>,
	errored: bool,
	closing: bool,
}

impl Client {
	pub fn new(id: ClientId, fd: Option<std::os::fd::RawFd>) -> Self {
		Self {
			id,
			fd,
			client_store: Store::new(),
			server_store: Store::new(),
			next_generation: 0,
			received_fds: Default::default(),
			outbox: Vec::new(),
			connection: None,
			errored: false,
			closing: false,
		}
	}

	pub fn next_generation(&mut self) -> u32 {
		self.next_generation = self.next_generation.wrapping_add(1);
		self.next_generation
	}

	pub fn insert_slot(&mut self, id: u32, slot: Slot) -> crate::Result<()> {
		self.client_store.insert(id, slot)
	}

	pub fn allocate_slot(&mut self, slot: Slot) -> u32 {
		self.server_store.allocate(slot)
	}

	pub fn slot(&self, id: u32) -> Option<&Slot> {
		if id >= SERVER_START {
			self.server_store.get(id)
		} else {
			self.client_store.get(id)
		}
	}

	pub fn slot_mut(&mut self, id: u32) -> Option<&mut Slot> {
		if id >= SERVER_START {
			self.server_store.get_mut(id)
		} else {
			self.client_store.get_mut(id)
		}
	}

	/// Removes the slot if it still holds the given generation.
	pub fn take_slot(&mut self, id: u32, generation: u32) -> Option<Slot> {
		if self.slot(id)?.generation != generation {
			return None;
		}

		if id >= SERVER_START {
			self.server_store.remove(id)
		} else {
			self.client_store.remove(id)
		}
	}

	pub fn slots(&self) -> impl Iterator<Item = (u32, &Slot)> {
		self.client_store.iter().chain(self.server_store.iter())
	}

	pub fn object_count(&self) -> usize {
		self.client_store.len() + self.server_store.len()
	}

	pub fn push_outgoing(&mut self, message: Outgoing) {
		self.outbox.push(message);
	}

	pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
		std::mem::take(&mut self.outbox)
	}

	/// Puts messages the socket did not take back in front of the queue.
	pub fn restore_outgoing(&mut self, mut messages: Vec<Outgoing>) {
		messages.append(&mut self.outbox);
		self.outbox = messages;
	}

	/// Bytes queued but not yet written.
	pub fn backlog(&self) -> usize {
		self.outbox.iter().map(|x| x.bytes.len()).sum()
	}

	pub fn set_connection(&mut self, connection: Connection) {
		self.connection = Some(connection);
	}

	pub fn connection(&self) -> Option<&Connection> {
		self.connection.as_ref()
	}

	pub fn is_errored(&self) -> bool {
		self.errored
	}

	pub fn set_errored(&mut self) {
		self.errored = true;
	}

	pub fn is_closing(&self) -> bool {
		self.closing
	}

	pub fn set_closing(&mut self) {
		self.closing = true;
	}
}
