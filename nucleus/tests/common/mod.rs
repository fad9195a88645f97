//! Scripted client that talks to a [`Display`] without a socket.

#![allow(dead_code)]

use nucleus::{wl, ClientId, Display};

pub struct Event {
	pub object: u32,
	pub op: u16,
	pub args: Vec<u8>,
}

impl Event {
	pub fn decode<'a, T: serde::Deserialize<'a>>(&'a self) -> T {
		wlm::decode::from_slice(&self.args).unwrap()
	}
}

pub struct TestClient {
	pub id: ClientId,
	pub registry: u32,
	pub globals: Vec<(u32, String, u32)>,
	next_id: u32,
}

impl TestClient {
	pub fn connect(display: &mut Display) -> Self {
		let id = display.create_client();

		let mut ret = Self {
			id,
			registry: 0,
			globals: Vec::new(),
			next_id: 2,
		};

		ret.registry = ret.new_id();
		ret.request(display, 1, 1, ret.registry);
		ret.events(display);

		ret
	}

	pub fn new_id(&mut self) -> u32 {
		let id = self.next_id;
		self.next_id += 1;

		id
	}

	pub fn request(&self, display: &mut Display, object: u32, op: u16, args: impl serde::Serialize) {
		let bytes = wlm::Message {
			object_id: object,
			op,
			args,
		}
		.to_vec()
		.unwrap();

		display
			.dispatch(self.id, object, op, &bytes[wlm::HEADER_SIZE..])
			.unwrap();
	}

	/// Drains queued events, keeping the global list up to date.
	pub fn events(&mut self, display: &mut Display) -> Vec<Event> {
		let events = display
			.take_outgoing(self.id)
			.into_iter()
			.map(|x| Event {
				object: x.object_id,
				op: x.op,
				args: x.bytes[wlm::HEADER_SIZE..].to_vec(),
			})
			.collect::<Vec<_>>();

		for x in events.iter().filter(|x| x.object == self.registry) {
			match x.op {
				0 => {
					let (name, interface, version): (u32, String, u32) = x.decode();
					self.globals.push((name, interface, version));
				}
				1 => {
					let name: u32 = x.decode();
					self.globals.retain(|x| x.0 != name);
				}
				_ => {}
			}
		}

		events
	}

	pub fn global(&self, interface: &str) -> u32 {
		self.globals
			.iter()
			.find(|x| x.1 == interface)
			.map(|x| x.0)
			.unwrap_or_else(|| panic!("no global {interface}"))
	}

	pub fn bind(&mut self, display: &mut Display, interface: &str, version: u32) -> u32 {
		let name = self.global(interface);
		self.bind_name(display, name, interface, version)
	}

	pub fn bind_name(&mut self, display: &mut Display, name: u32, interface: &str, version: u32) -> u32 {
		let id = self.new_id();
		self.request(display, self.registry, 0, (name, interface, version, id));

		id
	}

	/// Creates a new object with `request`, the new id being the first argument.
	pub fn create(&mut self, display: &mut Display, object: u32, op: u16) -> u32 {
		let id = self.new_id();
		self.request(display, object, op, id);

		id
	}

	pub fn protocol_error(&mut self, display: &mut Display) -> Option<(u32, u32, String)> {
		self.events(display)
			.iter()
			.find(|x| x.object == 1 && x.op == 0)
			.map(|x| x.decode())
	}
}

pub fn ops(events: &[Event], object: u32) -> Vec<u16> {
	events
		.iter()
		.filter(|x| x.object == object)
		.map(|x| x.op)
		.collect()
}

/// Client with a surface and a data device on the first seat.
pub struct Peer {
	pub client: TestClient,
	pub manager: u32,
	pub surface: u32,
	pub device: u32,
}

impl Peer {
	pub fn new(display: &mut Display) -> Self {
		let mut client = TestClient::connect(display);

		let compositor = client.bind(display, "wl_compositor", 4);
		let seat = client.bind(display, "wl_seat", 5);
		let manager = client.bind(display, "wl_data_device_manager", 3);

		let surface = client.create(display, compositor, 0);

		let device = client.new_id();
		client.request(display, manager, 1, (device, seat));
		client.events(display);

		Self {
			client,
			manager,
			surface,
			device,
		}
	}

	pub fn surface(&self, display: &Display) -> wl::Handle<wl::Surface> {
		display.lookup(self.client.id, self.surface).unwrap()
	}

	pub fn create_source(&mut self, display: &mut Display, actions: wl::DndActions) -> u32 {
		let source = self.client.create(display, self.manager, 0);

		self.client.request(display, source, 0, "text/plain");
		self.client.request(display, source, 2, actions.bits());

		source
	}
}
