mod common;

use common::{ops, Peer};
use nucleus::{
	seat::{self, SeatKey, SelectionKind, Source},
	wl, Change, Display,
};

fn setup() -> (Display, SeatKey) {
	let mut display = Display::new();

	display.add_global(wl::Compositor).unwrap();
	display.add_global(wl::DataDeviceManager).unwrap();

	let seat = seat::create_seat(&mut display, "seat0", seat::Capabilities::POINTER).unwrap();

	(display, seat)
}

fn selection_offer(events: &[common::Event], device: u32) -> Option<u32> {
	events
		.iter()
		.filter(|x| x.object == device && x.op == 5)
		.map(|x| x.decode::<u32>())
		.last()
}

#[test]
fn focused_client_follows_the_selection() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);

	let first = a.create_source(&mut display, wl::DndActions::empty());
	a.client.request(&mut display, a.device, 1, (first, 0u32));

	let handle = display.lookup::<wl::DataSource>(a.client.id, first).unwrap();
	assert_eq!(
		seat::selection::seat_selection(&display, seat, SelectionKind::Clipboard).unwrap(),
		Some(Source::Data(handle))
	);
	assert!(display.take_changes().contains(&Change::SelectionChanged {
		seat,
		kind: SelectionKind::Clipboard
	}));

	seat::selection::set_selection_focus(&mut display, seat, Some(b.client.id)).unwrap();

	let events = b.client.events(&mut display);
	assert_eq!(ops(&events, b.device), [0, 5]);

	let offer = selection_offer(&events, b.device).unwrap();
	assert_eq!(ops(&events, offer), [0]);
	assert_eq!(
		events
			.iter()
			.find(|x| x.object == offer)
			.unwrap()
			.decode::<String>(),
		"text/plain"
	);

	// replacing cancels the old source
	let second = a.create_source(&mut display, wl::DndActions::empty());
	a.client.request(&mut display, a.device, 1, (second, 0u32));

	assert_eq!(ops(&a.client.events(&mut display), first), [2]);
	assert_eq!(ops(&b.client.events(&mut display), b.device), [0, 5]);

	// and a dying source clears it
	a.client.request(&mut display, second, 1, ());

	let events = b.client.events(&mut display);
	assert_eq!(ops(&events, b.device), [5]);
	assert_eq!(selection_offer(&events, b.device), Some(0));
	assert_eq!(
		seat::selection::seat_selection(&display, seat, SelectionKind::Clipboard).unwrap(),
		None
	);
}

#[test]
fn new_devices_of_the_focused_client_learn_the_selection() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);

	let source = a.create_source(&mut display, wl::DndActions::empty());
	a.client.request(&mut display, a.device, 1, (source, 0u32));
	seat::selection::set_selection_focus(&mut display, seat, Some(a.client.id)).unwrap();
	a.client.events(&mut display);

	let seat_object = a.client.bind(&mut display, "wl_seat", 5);
	let device = a.client.new_id();
	a.client.request(&mut display, a.manager, 1, (device, seat_object));

	let events = a.client.events(&mut display);
	assert_eq!(ops(&events, device), [0, 5]);
}

#[test]
fn drag_sources_cannot_become_the_selection() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);

	let source = a.create_source(&mut display, wl::DndActions::COPY);
	a.client.request(&mut display, a.device, 1, (source, 0u32));

	let (object, code, _) = a.client.protocol_error(&mut display).unwrap();
	assert_eq!((object, code), (source, wl::INVALID_SOURCE));
	assert_eq!(
		seat::selection::seat_selection(&display, seat, SelectionKind::Clipboard).unwrap(),
		None
	);
}
