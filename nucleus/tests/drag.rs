mod common;

use common::{ops, Peer};
use nucleus::{
	seat::{self, drag, SeatKey},
	signal::Topic,
	wl, Change, Display, PointF, Transformation,
};

fn setup() -> (Display, SeatKey) {
	let mut display = Display::new();

	display.add_global(wl::Compositor).unwrap();
	display.add_global(wl::DataDeviceManager).unwrap();

	let seat = seat::create_seat(
		&mut display,
		"seat0",
		seat::Capabilities::POINTER | seat::Capabilities::TOUCH,
	)
	.unwrap();

	(display, seat)
}

/// Gives `peer` pointer focus and a held button, then starts a drag from it.
fn start_drag(display: &mut Display, seat: SeatKey, peer: &mut Peer, source: u32) {
	let surface = peer.surface(display);
	seat::pointer::set_pointer_focus(display, seat, Some(surface), Transformation::default()).unwrap();

	let serial = seat::pointer::pointer_button_pressed(display, seat, 0x110).unwrap();
	peer.client
		.request(display, peer.device, 0, (source, peer.surface, 0u32, serial));

	assert!(seat::seat_ref(display, seat).unwrap().drag.is_active());
	display.take_changes();
}

fn offer_of(events: &[common::Event], device: u32) -> u32 {
	events
		.iter()
		.find(|x| x.object == device && x.op == 0)
		.map(|x| x.decode::<u32>())
		.unwrap()
}

#[test]
fn drag_needs_an_implicit_grab() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let source = a.create_source(&mut display, wl::DndActions::COPY);

	let surface = a.surface(&display);
	seat::pointer::set_pointer_focus(&mut display, seat, Some(surface), Transformation::default())
		.unwrap();

	let serial = seat::pointer::pointer_button_pressed(&mut display, seat, 0x110).unwrap();

	// a serial that no pressed button carries
	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial + 1));
	assert!(!seat::seat_ref(&display, seat).unwrap().drag.is_active());

	seat::pointer::pointer_button_released(&mut display, seat, 0x110).unwrap();
	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial));
	assert!(!seat::seat_ref(&display, seat).unwrap().drag.is_active());

	let serial = seat::pointer::pointer_button_pressed(&mut display, seat, 0x110).unwrap();
	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial));

	let x = &seat::seat_ref(&display, seat).unwrap().drag;
	assert!(x.is_pointer_drag());

	let device = display.lookup::<wl::DataDevice>(a.client.id, a.device).unwrap();
	assert!(display
		.take_changes()
		.contains(&Change::DragStarted { seat, device }));

	assert!(a.client.protocol_error(&mut display).is_none());
}

#[test]
fn second_drag_is_ignored() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);

	let first = a.create_source(&mut display, wl::DndActions::COPY);
	let second = a.create_source(&mut display, wl::DndActions::COPY);

	start_drag(&mut display, seat, &mut a, first);

	let serial = seat::pointer::pointer_button_pressed(&mut display, seat, 0x111).unwrap();
	a.client
		.request(&mut display, a.device, 0, (second, a.surface, 0u32, serial));

	let source = drag::drag_source(&display, seat).unwrap();
	assert_eq!(source.object.id, first);
}

#[test]
fn listeners_follow_the_target() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);
	let mut c = Peer::new(&mut display);

	let source = a.create_source(&mut display, wl::DndActions::COPY | wl::DndActions::MOVE);
	start_drag(&mut display, seat, &mut a, source);

	let source = display.lookup::<wl::DataSource>(a.client.id, source).unwrap();
	let (b_surface, c_surface) = (b.surface(&display), c.surface(&display));

	let motion = display.signal_connections_on(Topic::PointerMoved(seat));
	let on_b = display.signal_connections_on(Topic::Destroyed(b_surface.object));

	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();

	let events = b.client.events(&mut display);
	assert_eq!(ops(&events, b.device), [0, 1]);

	let offer = offer_of(&events, b.device);
	assert_eq!(ops(&events, offer), [0, 1]);

	assert_eq!(display.signal_connections_on(Topic::PointerMoved(seat)), motion + 1);
	assert_eq!(
		display.signal_connections_on(Topic::Destroyed(b_surface.object)),
		on_b + 1
	);
	assert_eq!(
		display.signal_connections_on(Topic::SourceActionsChanged(source.object)),
		1
	);

	drag::drag_update_target(&mut display, seat, Some(c_surface), Transformation::default())
		.unwrap();

	assert_eq!(ops(&b.client.events(&mut display), b.device), [2]);
	assert_eq!(ops(&c.client.events(&mut display), c.device), [0, 1]);

	// nothing of the first target is left behind
	assert_eq!(display.signal_connections_on(Topic::PointerMoved(seat)), motion + 1);
	assert_eq!(
		display.signal_connections_on(Topic::Destroyed(b_surface.object)),
		on_b
	);
	assert_eq!(
		display.signal_connections_on(Topic::SourceActionsChanged(source.object)),
		1
	);

	seat::pointer::set_pointer_position(&mut display, seat, PointF(5.0, 5.0)).unwrap();

	assert!(ops(&b.client.events(&mut display), b.device).is_empty());
	assert_eq!(ops(&c.client.events(&mut display), c.device), [3]);
}

#[test]
fn destroyed_target_gets_exactly_one_leave() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);

	let source = a.create_source(&mut display, wl::DndActions::COPY);
	start_drag(&mut display, seat, &mut a, source);

	let b_surface = b.surface(&display);
	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();
	b.client.events(&mut display);

	b.client.request(&mut display, b.surface, 0, ());

	assert_eq!(ops(&b.client.events(&mut display), b.device), [2]);
	assert!(seat::seat_ref(&display, seat).unwrap().drag.target.is_none());
	assert_eq!(
		display.signal_connections_on(Topic::PointerMoved(seat)),
		0
	);

	drag::drag_update_target(&mut display, seat, None, Transformation::default()).unwrap();
	drag::drag_cancel(&mut display, seat).unwrap();

	assert!(ops(&b.client.events(&mut display), b.device).is_empty());
	assert!(ops(&a.client.events(&mut display), source).contains(&2));
	assert!(!seat::seat_ref(&display, seat).unwrap().drag.is_active());
	assert!(display
		.take_changes()
		.contains(&Change::DragCancelled { seat }));
}

#[test]
fn drop_negotiates_and_notifies_both_sides() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);

	let source = a.create_source(&mut display, wl::DndActions::COPY | wl::DndActions::MOVE);
	start_drag(&mut display, seat, &mut a, source);

	let b_surface = b.surface(&display);
	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();

	let offer = offer_of(&b.client.events(&mut display), b.device);
	a.client.events(&mut display);

	let supported = wl::DndActions::COPY | wl::DndActions::MOVE;
	b.client
		.request(&mut display, offer, 4, (supported.bits(), wl::DndActions::MOVE.bits()));

	let action = |events: &[common::Event], object: u32, op: u16| {
		events
			.iter()
			.filter(|x| x.object == object && x.op == op)
			.map(|x| x.decode::<u32>())
			.last()
	};

	let b_events = b.client.events(&mut display);
	let a_events = a.client.events(&mut display);
	assert_eq!(action(&b_events, offer, 2), Some(wl::DndActions::MOVE.bits()));
	assert_eq!(action(&a_events, source, 5), Some(wl::DndActions::MOVE.bits()));

	drag::drag_drop(&mut display, seat).unwrap();

	assert_eq!(ops(&b.client.events(&mut display), b.device), [4]);
	assert_eq!(ops(&a.client.events(&mut display), source), [3]);
	assert!(!seat::seat_ref(&display, seat).unwrap().drag.is_active());
	assert!(display.take_changes().contains(&Change::DragDropped { seat }));
}

#[test]
fn drag_without_source_still_enters() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);

	start_drag(&mut display, seat, &mut a, 0);
	assert!(drag::drag_source(&display, seat).is_none());

	let b_surface = b.surface(&display);
	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();

	// enter with a null offer, no data_offer before it
	let events = b.client.events(&mut display);
	assert_eq!(ops(&events, b.device), [1]);

	let enter = events.iter().find(|x| x.object == b.device).unwrap();
	let (_, surface, _, _, offer): (u32, u32, i32, i32, u32) = enter.decode();
	assert_eq!((surface, offer), (b.surface, 0));

	drag::drag_cancel(&mut display, seat).unwrap();
	assert_eq!(ops(&b.client.events(&mut display), b.device), [2]);
}

#[test]
fn touch_drag_follows_its_own_point() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);
	let source = a.create_source(&mut display, wl::DndActions::COPY);

	let surface = a.surface(&display);
	seat::touch::set_touch_focus(&mut display, seat, Some(surface), Transformation::default())
		.unwrap();

	let serial = seat::touch::touch_down(&mut display, seat, 0, PointF(7.0, 3.0)).unwrap();
	seat::touch::touch_down(&mut display, seat, 1, PointF(40.0, 40.0)).unwrap();

	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial));
	assert!(seat::seat_ref(&display, seat).unwrap().drag.is_touch_drag());

	let b_surface = b.surface(&display);
	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();

	let events = b.client.events(&mut display);
	let enter = events
		.iter()
		.find(|x| x.object == b.device && x.op == 1)
		.unwrap();

	let (_, surface, x, y, _): (u32, u32, wlm::Fixed, wlm::Fixed, u32) = enter.decode();
	assert_eq!(surface, b.surface);
	assert_eq!((x.to_f64(), y.to_f64()), (7.0, 3.0));

	seat::touch::touch_move(&mut display, seat, 1, PointF(45.0, 40.0)).unwrap();
	assert!(ops(&b.client.events(&mut display), b.device).is_empty());

	seat::touch::touch_move(&mut display, seat, 0, PointF(9.0, 3.0)).unwrap();
	assert_eq!(ops(&b.client.events(&mut display), b.device), [3]);
}

#[test]
fn proxy_drags_for_its_remote() {
	let (mut display, seat) = setup();
	let mut a = Peer::new(&mut display);
	let mut b = Peer::new(&mut display);
	let source = a.create_source(&mut display, wl::DndActions::COPY);

	let compositor = a.client.bind(&mut display, "wl_compositor", 4);
	let remote = a.client.create(&mut display, compositor, 0);
	let remote = display.lookup::<wl::Surface>(a.client.id, remote).unwrap();

	seat::pointer::set_pointer_focus(&mut display, seat, Some(remote), Transformation::default())
		.unwrap();
	let serial = seat::pointer::pointer_button_pressed(&mut display, seat, 0x110).unwrap();

	// the grab is on the remote, not on the origin
	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial));
	assert!(!seat::seat_ref(&display, seat).unwrap().drag.is_active());

	let device = display.lookup::<wl::DataDevice>(a.client.id, a.device).unwrap();
	drag::set_data_device_proxy(&mut display, device, Some(remote)).unwrap();

	a.client
		.request(&mut display, a.device, 0, (source, a.surface, 0u32, serial));
	assert!(seat::seat_ref(&display, seat).unwrap().drag.is_pointer_drag());
	a.client.events(&mut display);

	drag::drag_update_target(&mut display, seat, Some(remote), Transformation::default())
		.unwrap();
	assert!(ops(&a.client.events(&mut display), a.device).is_empty());

	let b_surface = b.surface(&display);
	drag::drag_update_target(&mut display, seat, Some(b_surface), Transformation::default())
		.unwrap();
	assert_eq!(ops(&b.client.events(&mut display), b.device), [0, 1]);
}

#[test]
fn unknown_source_actions_are_an_error() {
	let (mut display, _) = setup();
	let mut a = Peer::new(&mut display);

	let source = a.client.create(&mut display, a.manager, 0);
	a.client.request(&mut display, source, 2, 0xffu32);

	let (object, code, _) = a.client.protocol_error(&mut display).unwrap();
	assert_eq!((object, code), (source, wl::SOURCE_INVALID_ACTION_MASK));
}
