use std::{collections::BTreeMap, rc::Rc};

use log::{debug, trace, warn};

use crate::{
	arena::Arena,
	client::{Client, ClientId, Outgoing},
	output, seat, signal,
	store::{Slot, SERVER_START},
	virtual_desktop,
	wl,
	Change, Connection, Result,
};

pub const DISPLAY_ID: u32 = 1;

/// Unwritten event bytes a client may pile up before it is dropped.
pub const MAX_BACKLOG: usize = 1 << 20;

/// A client-caused failure. Returned from a request handler, it is posted to the client
/// as `wl_display.error` instead of the generic `invalid_method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
	pub object_id: u32,
	pub code: u32,
	pub message: String,
}

impl ProtocolError {
	pub fn new(object: impl Into<wl::ObjectRef>, code: u32, message: impl Into<String>) -> Self {
		Self {
			object_id: object.into().id,
			code,
			message: message.into(),
		}
	}

	pub fn on_display(code: u32, message: impl Into<String>) -> Self {
		Self {
			object_id: DISPLAY_ID,
			code,
			message: message.into(),
		}
	}
}

impl std::fmt::Display for ProtocolError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"protocol error {} on object {}: {}",
			self.code, self.object_id, self.message
		)
	}
}

impl std::error::Error for ProtocolError {}

struct GlobalEntry {
	global: Rc<dyn wl::Global>,
	binds: Vec<wl::ObjectRef>,
	/// Tick in which the global was withdrawn. The entry is reclaimed once that tick is over.
	removed_at: Option<u64>,
}

/// Process-wide protocol state: clients with their resources, globals and the per-seat,
/// per-output and virtual desktop state built on top of them.
///
/// Everything runs on one thread; nothing in here locks.
pub struct Display {
	clients: BTreeMap<ClientId, Client>,
	connections: std::collections::HashMap<std::os::fd::RawFd, ClientId>,
	next_client: u64,
	globals: BTreeMap<u32, GlobalEntry>,
	next_global_name: u32,
	serial: u32,
	tick: u64,
	pub(crate) signals: signal::Hub,
	changes: Vec<Change>,
	pub(crate) seats: Arena<seat::Seat>,
	pub(crate) outputs: Arena<output::Output>,
	pub(crate) output_management: output::Management,
	pub(crate) desktops: virtual_desktop::VirtualDesktops,
}

impl Default for Display {
	fn default() -> Self {
		Self::new()
	}
}

impl Display {
	pub fn new() -> Self {
		Self {
			clients: BTreeMap::new(),
			connections: Default::default(),
			next_client: 0,
			globals: BTreeMap::new(),
			next_global_name: 0,
			serial: 0,
			tick: 0,
			signals: Default::default(),
			changes: Vec::new(),
			seats: Arena::new(),
			outputs: Arena::new(),
			output_management: Default::default(),
			desktops: Default::default(),
		}
	}

	// clients

	/// Returns the client for a transport connection, creating it on first sight.
	pub fn get_or_create_client(&mut self, fd: std::os::fd::RawFd) -> ClientId {
		if let Some(client) = self.connections.get(&fd) {
			return *client;
		}

		let client = self.add_client(Some(fd));
		self.connections.insert(fd, client);

		client
	}

	/// Creates a client without a transport handle.
	pub fn create_client(&mut self) -> ClientId {
		self.add_client(None)
	}

	fn add_client(&mut self, fd: Option<std::os::fd::RawFd>) -> ClientId {
		self.next_client += 1;
		let id = ClientId(self.next_client);

		let mut client = Client::new(id, fd);
		let generation = client.next_generation();

		let display = Slot {
			resource: wl::Display.into(),
			version: 1,
			generation,
			inert: false,
			global: None,
		};

		// the store is empty, so the first id is always free
		if let Err(x) = client.insert_slot(DISPLAY_ID, display) {
			warn!("{id}: failed to create wl_display: {x}");
		}

		debug!("{id} created (fd {fd:?})");

		self.clients.insert(id, client);
		self.changes.push(Change::ClientCreated(id));

		id
	}

	pub fn client(&self, id: ClientId) -> Option<&Client> {
		self.clients.get(&id)
	}

	pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
		self.clients.get_mut(&id)
	}

	pub fn client_for_fd(&self, fd: std::os::fd::RawFd) -> Option<ClientId> {
		self.connections.get(&fd).copied()
	}

	pub fn clients(&self) -> Vec<ClientId> {
		self.clients.keys().copied().collect()
	}

	pub fn set_connection(&mut self, client: ClientId, connection: Connection) {
		if let Some(x) = self.clients.get_mut(&client) {
			x.set_connection(connection);
		}
	}

	pub fn push_fds(
		&mut self,
		client: ClientId,
		fds: impl IntoIterator<Item = std::os::fd::OwnedFd>,
	) {
		if let Some(x) = self.clients.get_mut(&client) {
			x.received_fds.extend(fds);
		}
	}

	pub fn take_fd(&mut self, client: ClientId) -> Result<std::os::fd::OwnedFd> {
		self.clients
			.get_mut(&client)
			.and_then(|x| x.received_fds.pop_front())
			.ok_or_else(|| color_eyre::eyre::eyre!("request is missing a file descriptor"))
	}

	/// Tears down every resource of the client, newest first, then forgets the client.
	pub fn destroy_client(&mut self, client: ClientId) -> Result<()> {
		let Some(x) = self.clients.get_mut(&client) else {
			return Ok(());
		};

		x.set_closing();

		let mut objects = x
			.slots()
			.map(|(id, slot)| wl::ObjectRef {
				client,
				id,
				generation: slot.generation,
			})
			.collect::<Vec<_>>();

		objects.reverse();

		for object in objects {
			self.destroy_object(object)?;
		}

		if let Some(x) = self.clients.remove(&client) {
			if let Some(fd) = x.fd {
				self.connections.remove(&fd);
			}
		}

		debug!("{client} destroyed");
		self.changes.push(Change::ClientDestroyed(client));

		Ok(())
	}

	// globals

	pub fn add_global(&mut self, global: impl wl::Global + 'static) -> Result<u32> {
		self.next_global_name += 1;
		let name = self.next_global_name;

		let interface = global.get_name();
		let version = global.get_version();

		debug!("global {name}: {interface} v{version}");

		self.globals.insert(
			name,
			GlobalEntry {
				global: Rc::new(global),
				binds: Vec::new(),
				removed_at: None,
			},
		);

		for registry in self.all_objects::<wl::Registry>() {
			wl::Registry::global(self, registry, name, interface, version)?;
		}

		Ok(name)
	}

	/// Withdraws the global. Existing binds turn inert right away; the entry itself is
	/// reclaimed at the end of the current tick so binds already in flight still resolve.
	pub fn remove_global(&mut self, name: u32) -> Result<()> {
		let tick = self.tick;

		let Some(entry) = self.globals.get_mut(&name) else {
			color_eyre::eyre::bail!("global {name} does not exist");
		};

		if entry.removed_at.is_some() {
			return Ok(());
		}

		entry.removed_at = Some(tick);
		let binds = entry.binds.clone();

		debug!("global {name} removed, {} binds", binds.len());

		for registry in self.all_objects::<wl::Registry>() {
			wl::Registry::global_remove(self, registry, name)?;
		}

		for bind in binds {
			self.set_inert(bind);
		}

		Ok(())
	}

	/// Ends the current dispatch tick, reclaiming globals removed during it.
	pub fn finish_tick(&mut self) {
		self.tick += 1;
		let tick = self.tick;

		self.globals.retain(|name, entry| match entry.removed_at {
			Some(removed_at) if removed_at < tick => {
				debug!("global {name} reclaimed");
				false
			}
			_ => true,
		});
	}

	pub fn tick(&self) -> u64 {
		self.tick
	}

	/// Whether the global is currently advertised.
	pub fn has_global(&self, name: u32) -> bool {
		self.globals
			.get(&name)
			.is_some_and(|x| x.removed_at.is_none())
	}

	pub fn global_interface(&self, name: u32) -> Option<&'static str> {
		self.globals.get(&name).map(|x| x.global.get_name())
	}

	/// Live binds of the global.
	pub fn global_binds(&self, name: u32) -> Vec<wl::ObjectRef> {
		self.globals
			.get(&name)
			.map(|x| x.binds.clone())
			.unwrap_or_default()
			.into_iter()
			.filter(|x| self.is_alive(*x) && !self.is_inert(*x))
			.collect()
	}

	pub(crate) fn announce_globals(&mut self, registry: wl::Handle<wl::Registry>) -> Result<()> {
		let globals = self
			.globals
			.iter()
			.filter(|(_, x)| x.removed_at.is_none())
			.map(|(name, x)| (*name, x.global.get_name(), x.global.get_version()))
			.collect::<Vec<_>>();

		for (name, interface, version) in globals {
			wl::Registry::global(self, registry, name, interface, version)?;
		}

		Ok(())
	}

	pub(crate) fn bind_global(
		&mut self,
		registry: wl::Handle<wl::Registry>,
		name: u32,
		interface: &str,
		version: u32,
		id: u32,
	) -> Result<()> {
		let Some(entry) = self.globals.get(&name) else {
			return Err(ProtocolError::new(
				registry,
				wl::INVALID_OBJECT,
				format!("invalid global {interface} ({name})"),
			)
			.into());
		};

		let global = entry.global.clone();
		let removed = entry.removed_at.is_some();

		if global.get_name() != interface {
			return Err(ProtocolError::new(
				registry,
				wl::INVALID_OBJECT,
				format!(
					"invalid interface for global {name}: have {interface}, wanted {}",
					global.get_name()
				),
			)
			.into());
		}

		if version == 0 || version < global.min_version() || version > global.get_version() {
			return Err(ProtocolError::new(
				registry,
				wl::INVALID_OBJECT,
				format!(
					"invalid version for global {interface} ({name}): have {version}, wanted {}..={}",
					global.min_version(),
					global.get_version()
				),
			)
			.into());
		}

		let object = self.insert_object(
			registry.client(),
			Some(id),
			version,
			global.instantiate(),
			Some(name),
		)?;

		if let Some(entry) = self.globals.get_mut(&name) {
			entry.binds.push(object);
		}

		if removed {
			debug!("{} bound removed global {interface}@{id}", object.client);
			self.set_inert(object);
			return Ok(());
		}

		debug!("{} bound {interface}@{id} v{version}", object.client);

		global.bind(self, object)
	}

	// objects

	fn insert_object(
		&mut self,
		client: ClientId,
		id: Option<u32>,
		version: u32,
		resource: wl::Resource,
		global: Option<u32>,
	) -> Result<wl::ObjectRef> {
		let Some(x) = self.clients.get_mut(&client) else {
			color_eyre::eyre::bail!("{client} does not exist");
		};

		let generation = x.next_generation();

		let slot = Slot {
			resource,
			version,
			generation,
			inert: false,
			global,
		};

		let id = match id {
			Some(id) => {
				if let Err(e) = x.insert_slot(id, slot) {
					return Err(ProtocolError::on_display(
						wl::INVALID_OBJECT,
						format!("invalid new id {id}: {e}"),
					)
					.into());
				}

				id
			}
			None => x.allocate_slot(slot),
		};

		Ok(wl::ObjectRef {
			client,
			id,
			generation,
		})
	}

	/// Creates a resource under a client-chosen id.
	pub fn create<T: wl::Object>(
		&mut self,
		client: ClientId,
		id: wl::Id<T>,
		version: u32,
		value: T,
	) -> Result<wl::Handle<T>> {
		let object = self.insert_object(client, Some(*id), version, value.into(), None)?;
		trace!("{client} created {}@{}", T::INTERFACE, object.id);

		Ok(wl::Handle::new(object))
	}

	/// Creates a resource under a server-allocated id.
	pub fn create_server<T: wl::Object>(
		&mut self,
		client: ClientId,
		version: u32,
		value: T,
	) -> Result<wl::Handle<T>> {
		let object = self.insert_object(client, None, version, value.into(), None)?;
		trace!("{client} got {}@{}", T::INTERFACE, object.id);

		Ok(wl::Handle::new(object))
	}

	fn slot(&self, object: wl::ObjectRef) -> Option<&Slot> {
		let slot = self.clients.get(&object.client)?.slot(object.id)?;
		(slot.generation == object.generation).then_some(slot)
	}

	fn slot_mut(&mut self, object: wl::ObjectRef) -> Option<&mut Slot> {
		let slot = self.clients.get_mut(&object.client)?.slot_mut(object.id)?;

		if slot.generation != object.generation {
			return None;
		}

		Some(slot)
	}

	pub fn get<T: wl::Object>(&self, handle: wl::Handle<T>) -> Option<&T> {
		T::cast(&self.slot(handle.object)?.resource)
	}

	pub fn get_mut<T: wl::Object>(&mut self, handle: wl::Handle<T>) -> Option<&mut T> {
		T::cast_mut(&mut self.slot_mut(handle.object)?.resource)
	}

	pub fn object<T: wl::Object>(&self, handle: wl::Handle<T>) -> Result<&T> {
		self.get(handle)
			.ok_or_else(|| color_eyre::eyre::eyre!("object '{handle:?}' does not exist"))
	}

	pub fn object_mut<T: wl::Object>(&mut self, handle: wl::Handle<T>) -> Result<&mut T> {
		self.get_mut(handle)
			.ok_or_else(|| color_eyre::eyre::eyre!("object '{handle:?}' does not exist"))
	}

	pub fn is_alive(&self, object: impl Into<wl::ObjectRef>) -> bool {
		self.slot(object.into()).is_some()
	}

	/// Negotiated version of the resource, 0 once it is gone.
	pub fn version(&self, object: impl Into<wl::ObjectRef>) -> u32 {
		self.slot(object.into()).map_or(0, |x| x.version)
	}

	pub fn is_inert(&self, object: impl Into<wl::ObjectRef>) -> bool {
		self.slot(object.into()).is_some_and(|x| x.inert)
	}

	pub fn set_inert(&mut self, object: impl Into<wl::ObjectRef>) {
		if let Some(x) = self.slot_mut(object.into()) {
			x.inert = true;
		}
	}

	/// Resolves an object argument of a request.
	pub fn lookup<T: wl::Object>(&self, client: ClientId, id: u32) -> Result<wl::Handle<T>> {
		let slot = self
			.clients
			.get(&client)
			.and_then(|x| x.slot(id))
			.filter(|x| T::cast(&x.resource).is_some());

		match slot {
			Some(slot) => Ok(wl::Handle::new(wl::ObjectRef {
				client,
				id,
				generation: slot.generation,
			})),
			None => Err(ProtocolError::on_display(
				wl::INVALID_OBJECT,
				format!("invalid object {id}, expected {}", T::INTERFACE),
			)
			.into()),
		}
	}

	/// Resolves a nullable object argument of a request.
	pub fn lookup_optional<T: wl::Object>(
		&self,
		client: ClientId,
		id: u32,
	) -> Result<Option<wl::Handle<T>>> {
		if id == 0 {
			return Ok(None);
		}

		self.lookup(client, id).map(Some)
	}

	pub fn objects<T: wl::Object>(&self, client: ClientId) -> Vec<wl::Handle<T>> {
		let Some(x) = self.clients.get(&client) else {
			return Vec::new();
		};

		x.slots()
			.filter(|(_, slot)| T::cast(&slot.resource).is_some())
			.map(|(id, slot)| {
				wl::Handle::new(wl::ObjectRef {
					client,
					id,
					generation: slot.generation,
				})
			})
			.collect()
	}

	pub fn all_objects<T: wl::Object>(&self) -> Vec<wl::Handle<T>> {
		self.clients
			.keys()
			.flat_map(|x| self.objects::<T>(*x))
			.collect()
	}

	pub fn destroy<T>(&mut self, handle: wl::Handle<T>) -> Result<()> {
		self.destroy_object(handle.object)
	}

	/// Removes the resource, runs its cleanup, notifies its observers and finally
	/// releases the id back to the client.
	pub fn destroy_object(&mut self, object: wl::ObjectRef) -> Result<()> {
		let Some(x) = self.clients.get_mut(&object.client) else {
			return Ok(());
		};

		let Some(slot) = x.take_slot(object.id, object.generation) else {
			return Ok(());
		};

		trace!(
			"{} destroyed {}@{}",
			object.client,
			slot.resource.interface(),
			object.id
		);

		if let Some(name) = slot.global {
			if let Some(entry) = self.globals.get_mut(&name) {
				entry.binds.retain(|x| *x != object);
			}
		}

		slot.resource.destroyed(self, object)?;

		self.emit(signal::Topic::Destroyed(object), signal::Payload::None)?;
		self.signals.forget(object);

		if object.id < SERVER_START {
			wl::Display::delete_id(self, object.client, object.id)?;
		}

		Ok(())
	}

	// messages

	/// Handles one request. Client-caused failures are posted to the client and never
	/// returned as errors.
	pub fn dispatch(
		&mut self,
		client: ClientId,
		object_id: u32,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let Some(x) = self.clients.get(&client) else {
			color_eyre::eyre::bail!("{client} does not exist");
		};

		if x.is_errored() {
			trace!("{client}: dropping request to {object_id} after protocol error");
			return Ok(());
		}

		let Some(slot) = x.slot(object_id) else {
			return self.post_error(
				client,
				DISPLAY_ID,
				wl::INVALID_OBJECT,
				&format!("invalid object {object_id}"),
			);
		};

		let interface = slot.resource.interface();

		if slot.inert && !slot.resource.is_destructor(op) {
			trace!("{client}: ignoring {interface}@{object_id}.{op} on inert object");
			return Ok(());
		}

		let object = wl::ObjectRef {
			client,
			id: object_id,
			generation: slot.generation,
		};

		let handler = slot.resource.dispatcher();

		trace!("{client} -> {interface}@{object_id}.{op}");

		if let Err(e) = handler(self, object, op, params) {
			match e.downcast_ref::<ProtocolError>() {
				Some(x) => {
					let (object_id, code, message) = (x.object_id, x.code, x.message.clone());
					self.post_error(client, object_id, code, &message)?;
				}
				None => {
					self.post_error(
						client,
						object_id,
						wl::INVALID_METHOD,
						&format!("{interface}@{object_id}.{op}: {e}"),
					)?;
				}
			}
		}

		Ok(())
	}

	/// Sends `wl_display.error` and stops processing the client.
	pub fn post_error(
		&mut self,
		client: ClientId,
		object_id: u32,
		code: u32,
		message: &str,
	) -> Result<()> {
		warn!("{client}: protocol error {code} on object {object_id}: {message}");

		wl::Display::error(self, client, object_id, code, message)?;

		if let Some(x) = self.clients.get_mut(&client) {
			x.set_errored();
		}

		Ok(())
	}

	pub fn send(
		&mut self,
		object: impl Into<wl::ObjectRef>,
		op: u16,
		args: impl serde::Serialize,
	) -> Result<()> {
		self.send_since(object, 1, op, args)
	}

	/// Sends an event that only exists from version `since` on. Events to dead or inert
	/// objects and to older binds are dropped.
	pub fn send_since(
		&mut self,
		object: impl Into<wl::ObjectRef>,
		since: u32,
		op: u16,
		args: impl serde::Serialize,
	) -> Result<()> {
		self.send_with_fds(object, since, op, args, Vec::new())
	}

	pub fn send_with_fd(
		&mut self,
		object: impl Into<wl::ObjectRef>,
		op: u16,
		args: impl serde::Serialize,
		fd: std::os::fd::OwnedFd,
	) -> Result<()> {
		self.send_with_fds(object, 1, op, args, vec![fd])
	}

	fn send_with_fds(
		&mut self,
		object: impl Into<wl::ObjectRef>,
		since: u32,
		op: u16,
		args: impl serde::Serialize,
		fds: Vec<std::os::fd::OwnedFd>,
	) -> Result<()> {
		let object = object.into();

		let Some(slot) = self.slot(object) else {
			return Ok(());
		};

		if slot.inert || slot.version < since {
			return Ok(());
		}

		trace!(
			"{} <- {}@{}.{op}",
			object.client,
			slot.resource.interface(),
			object.id
		);

		self.queue(object.client, object.id, op, args, fds)
	}

	pub(crate) fn queue(
		&mut self,
		client: ClientId,
		object_id: u32,
		op: u16,
		args: impl serde::Serialize,
		fds: Vec<std::os::fd::OwnedFd>,
	) -> Result<()> {
		let Some(x) = self.clients.get_mut(&client) else {
			return Ok(());
		};

		if x.is_errored() || x.is_closing() {
			return Ok(());
		}

		let bytes = wlm::Message {
			object_id,
			op,
			args,
		}
		.to_vec()?;

		x.push_outgoing(Outgoing {
			object_id,
			op,
			bytes,
			fds,
		});

		Ok(())
	}

	pub fn take_outgoing(&mut self, client: ClientId) -> Vec<Outgoing> {
		self.clients
			.get_mut(&client)
			.map(|x| x.take_outgoing())
			.unwrap_or_default()
	}

	/// Writes queued events to the client's socket without blocking. Clients without a
	/// connection keep their events queued for [`Display::take_outgoing`]. What the socket
	/// does not take stays queued for the next flush; a client whose backlog grows past
	/// [`MAX_BACKLOG`] is marked errored and loses its queue.
	pub fn flush(&mut self, client: ClientId) -> Result<()> {
		let Some(x) = self.clients.get_mut(&client) else {
			return Ok(());
		};

		let Some(connection) = x.connection().cloned() else {
			return Ok(());
		};

		let mut outgoing = x.take_outgoing();

		if let Err(e) = connection.send(&mut outgoing) {
			warn!("{client}: failed to flush {} messages: {e}", outgoing.len());
			outgoing.clear();
		}

		x.restore_outgoing(outgoing);

		let backlog = x.backlog();

		if backlog > MAX_BACKLOG {
			warn!("{client}: {backlog} bytes not read, dropping the client");

			x.take_outgoing();
			x.set_errored();
		}

		Ok(())
	}

	pub fn flush_all(&mut self) -> Result<()> {
		for client in self.clients() {
			self.flush(client)?;
		}

		Ok(())
	}

	// serials

	/// Next event serial. Serials wrap past `u32::MAX` and never take the value 0.
	pub fn next_serial(&mut self) -> u32 {
		self.serial = self.serial.wrapping_add(1);

		if self.serial == 0 {
			self.serial = 1;
		}

		self.serial
	}

	pub fn serial(&self) -> u32 {
		self.serial
	}

	// policy notifications

	pub(crate) fn push_change(&mut self, change: Change) {
		self.changes.push(change);
	}

	pub fn take_changes(&mut self) -> Vec<Change> {
		std::mem::take(&mut self.changes)
	}

	// signals

	pub(crate) fn connect(
		&mut self,
		topic: signal::Topic,
		owner: impl Into<wl::ObjectRef>,
		subscriber: signal::Subscriber,
	) -> signal::ConnectionId {
		self.signals.connect(topic, Some(owner.into()), subscriber)
	}

	pub(crate) fn disconnect(&mut self, connection: &mut Option<signal::ConnectionId>) {
		if let Some(x) = connection.take() {
			self.signals.disconnect(x);
		}
	}

	pub(crate) fn emit(&mut self, topic: signal::Topic, payload: signal::Payload) -> Result<()> {
		for (id, subscriber) in self.signals.subscribers(&topic) {
			// an earlier subscriber may have torn this one down
			if !self.signals.is_connected(id) {
				continue;
			}

			subscriber.call(self, &payload)?;
		}

		Ok(())
	}

	/// Number of live observer connections.
	pub fn signal_connections(&self) -> usize {
		self.signals.len()
	}

	pub fn signal_connections_on(&self, topic: signal::Topic) -> usize {
		self.signals.count(&topic)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Read as _;

	use super::{Display, MAX_BACKLOG};
	use crate::Connection;

	/// A client whose peer end of the socket is returned to the test.
	fn connected(display: &mut Display) -> (crate::ClientId, std::os::unix::net::UnixStream) {
		let (a, b) = std::os::unix::net::UnixStream::pair().unwrap();
		a.set_nonblocking(true).unwrap();
		b.set_nonblocking(true).unwrap();

		let client = display.create_client();
		display.set_connection(client, Connection::new(a));

		(client, b)
	}

	fn queue_kib(display: &mut Display, client: crate::ClientId, count: usize) -> usize {
		let text = "x".repeat(1016);

		for _ in 0..count {
			display.queue(client, 1, 0, text.as_str(), Vec::new()).unwrap();
		}

		display.client(client).unwrap().backlog()
	}

	#[test]
	fn flush_leaves_what_a_slow_reader_does_not_take() {
		let mut display = Display::new();
		let (client, mut peer) = connected(&mut display);

		let total = queue_kib(&mut display, client, 512);
		assert!(total < MAX_BACKLOG);

		let mut read = 0;
		let mut buffer = vec![0u8; 64 * 1024];

		loop {
			display.flush(client).unwrap();

			let backlog = display.client(client).unwrap().backlog();

			match peer.read(&mut buffer) {
				Ok(n) => read += n,
				Err(e) if e.kind() == std::io::ErrorKind::WouldBlock && backlog == 0 => break,
				Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
				Err(e) => panic!("{e}"),
			}
		}

		assert_eq!(read, total);
		assert!(!display.client(client).unwrap().is_errored());
	}

	#[test]
	fn client_that_never_reads_is_dropped() {
		let mut display = Display::new();
		let (client, _peer) = connected(&mut display);

		queue_kib(&mut display, client, 4096);
		display.flush(client).unwrap();

		let x = display.client(client).unwrap();
		assert!(x.is_errored());
		assert_eq!(x.backlog(), 0);
	}

	#[test]
	fn serials_increase_and_skip_zero() {
		let mut display = Display::new();

		let a = display.next_serial();
		let b = display.next_serial();
		assert!(b > a);
		assert_eq!(display.serial(), b);

		display.serial = u32::MAX - 1;
		assert_eq!(display.next_serial(), u32::MAX);
		assert_eq!(display.next_serial(), 1);
	}

	#[test]
	fn get_or_create_client_is_idempotent() {
		let mut display = Display::new();

		let a = display.get_or_create_client(7);
		let b = display.get_or_create_client(7);
		let c = display.get_or_create_client(8);

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(display.clients().len(), 2);
		assert_eq!(display.client_for_fd(7), Some(a));
	}

	#[test]
	fn destroyed_client_releases_its_fd() {
		let mut display = Display::new();

		let a = display.get_or_create_client(7);
		display.destroy_client(a).unwrap();

		assert!(display.client(a).is_none());
		assert_eq!(display.client_for_fd(7), None);

		let b = display.get_or_create_client(7);
		assert_ne!(a, b);
	}
}
