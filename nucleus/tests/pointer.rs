mod common;

use common::{ops, TestClient};
use nucleus::{
	seat::{self, SeatKey},
	wl, Change, Display, PointF, Size, Transformation,
};

struct Setup {
	display: Display,
	seat: SeatKey,
	client: TestClient,
	surface: u32,
	pointer: u32,
}

impl Setup {
	fn new() -> Self {
		let mut display = Display::new();

		display.add_global(wl::Compositor).unwrap();
		display.add_global(wl::SubCompositor).unwrap();
		display.add_global(wl::ZwpRelativePointerManagerV1).unwrap();
		display.add_global(wl::ZwpPointerGesturesV1).unwrap();
		display.add_global(wl::ZwpPointerConstraintsV1).unwrap();

		let seat = seat::create_seat(&mut display, "seat0", seat::Capabilities::POINTER).unwrap();

		let mut client = TestClient::connect(&mut display);
		let compositor = client.bind(&mut display, "wl_compositor", 4);
		let seat_object = client.bind(&mut display, "wl_seat", 5);

		let surface = client.create(&mut display, compositor, 0);
		let pointer = client.create(&mut display, seat_object, 0);
		client.events(&mut display);

		let handle = display.lookup::<wl::Surface>(client.id, surface).unwrap();
		nucleus::surface::set_surface_size(&mut display, handle, Size(200, 100)).unwrap();

		Self {
			display,
			seat,
			client,
			surface,
			pointer,
		}
	}

	fn surface(&self) -> wl::Handle<wl::Surface> {
		self.display.lookup(self.client.id, self.surface).unwrap()
	}

	fn focus(&mut self, transformation: Transformation) {
		let surface = self.surface();

		seat::pointer::set_pointer_focus(&mut self.display, self.seat, Some(surface), transformation)
			.unwrap();
	}
}

#[test]
fn focus_sends_enter_motion_and_leave() {
	let mut x = Setup::new();

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(110.5, 60.0)).unwrap();
	x.focus(Transformation::translate(100.0, 50.0));

	let events = x.client.events(&mut x.display);
	assert_eq!(ops(&events, x.pointer), [0, 5]);

	let (_, surface, sx, sy): (u32, u32, wlm::Fixed, wlm::Fixed) = events[0].decode();
	assert_eq!(surface, x.surface);
	assert_eq!((sx.to_f64(), sy.to_f64()), (10.5, 10.0));

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(120.0, 60.0)).unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), x.pointer), [2, 5]);

	seat::pointer::set_pointer_focus(&mut x.display, x.seat, None, Transformation::default())
		.unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), x.pointer), [1, 5]);
}

#[test]
fn refocus_within_a_client_shares_one_frame() {
	let mut x = Setup::new();
	x.focus(Transformation::default());

	let compositor = x.client.bind(&mut x.display, "wl_compositor", 4);
	let other = x.client.create(&mut x.display, compositor, 0);
	x.client.events(&mut x.display);

	let handle = x.display.lookup::<wl::Surface>(x.client.id, other).unwrap();
	nucleus::surface::set_surface_size(&mut x.display, handle, Size(10, 10)).unwrap();

	seat::pointer::set_pointer_focus(&mut x.display, x.seat, Some(handle), Transformation::default())
		.unwrap();

	assert_eq!(ops(&x.client.events(&mut x.display), x.pointer), [1, 0, 5]);
}

#[test]
fn destroyed_focus_leaves_once() {
	let mut x = Setup::new();
	x.focus(Transformation::default());
	x.client.events(&mut x.display);

	x.client.request(&mut x.display, x.surface, 0, ());

	// the surface is gone, so there is nothing to leave
	let events = x.client.events(&mut x.display);
	assert_eq!(ops(&events, x.pointer), [5]);

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(1.0, 1.0)).unwrap();
	assert!(ops(&x.client.events(&mut x.display), x.pointer).is_empty());
}

#[test]
fn buttons_carry_a_fresh_serial() {
	let mut x = Setup::new();
	x.focus(Transformation::default());
	x.client.events(&mut x.display);

	let pressed = seat::pointer::pointer_button_pressed(&mut x.display, x.seat, 0x110).unwrap();
	let released = seat::pointer::pointer_button_released(&mut x.display, x.seat, 0x110).unwrap();
	assert!(released > pressed);

	let events = x.client.events(&mut x.display);
	let buttons = events
		.iter()
		.filter(|e| e.object == x.pointer && e.op == 3)
		.map(|e| e.decode::<(u32, u32, u32, u32)>())
		.collect::<Vec<_>>();

	assert_eq!(
		buttons,
		[
			(pressed, 0, 0x110, wl::BUTTON_PRESSED),
			(released, 0, 0x110, wl::BUTTON_RELEASED)
		]
	);
}

#[test]
#[should_panic(expected = "without a focused surface")]
fn button_without_focus_is_a_bug() {
	let mut x = Setup::new();
	let _ = seat::pointer::pointer_button_pressed(&mut x.display, x.seat, 0x110);
}

#[test]
#[should_panic(expected = "without a focused surface")]
fn button_after_the_focus_died_is_a_bug() {
	let mut x = Setup::new();
	x.focus(Transformation::default());
	x.client.request(&mut x.display, x.surface, 0, ());

	assert!(seat::seat_ref(&x.display, x.seat)
		.unwrap()
		.pointer
		.focus
		.surface
		.is_none());

	let _ = seat::pointer::pointer_button_pressed(&mut x.display, x.seat, 0x110);
}

#[test]
fn motion_resolves_the_sub_surface_below() {
	let mut x = Setup::new();
	let compositor = x.client.bind(&mut x.display, "wl_compositor", 4);
	let subcompositor = x.client.bind(&mut x.display, "wl_subcompositor", 1);

	let child = x.client.create(&mut x.display, compositor, 0);
	let subsurface = x.client.new_id();
	x.client
		.request(&mut x.display, subcompositor, 1, (subsurface, child, x.surface));
	x.client
		.request(&mut x.display, subsurface, 1, (100i32, 50i32));

	// the position applies with the parent's commit
	x.client.request(&mut x.display, x.surface, 6, ());

	let handle = x.display.lookup::<wl::Surface>(x.client.id, child).unwrap();
	nucleus::surface::set_surface_size(&mut x.display, handle, Size(50, 50)).unwrap();

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(10.0, 10.0)).unwrap();
	x.focus(Transformation::default());
	x.client.events(&mut x.display);

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(105.0, 55.0)).unwrap();

	let events = x.client.events(&mut x.display);
	assert_eq!(ops(&events, x.pointer), [1, 0, 5]);

	let enter = events
		.iter()
		.find(|e| e.object == x.pointer && e.op == 0)
		.unwrap();

	let (_, surface, sx, sy): (u32, u32, wlm::Fixed, wlm::Fixed) = enter.decode();
	assert_eq!(surface, child);
	assert_eq!((sx.to_f64(), sy.to_f64()), (5.0, 5.0));

	// staying on the child is plain motion
	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(106.0, 55.0)).unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), x.pointer), [2, 5]);
}

#[test]
fn relative_motion_reaches_listeners_until_destroyed() {
	let mut x = Setup::new();
	let manager = x
		.client
		.bind(&mut x.display, "zwp_relative_pointer_manager_v1", 1);

	let relative = x.client.new_id();
	x.client
		.request(&mut x.display, manager, 1, (relative, x.pointer));

	x.focus(Transformation::default());
	x.client.events(&mut x.display);

	seat::pointer::relative_pointer_motion(
		&mut x.display,
		x.seat,
		PointF(1.0, 2.0),
		PointF(0.5, 1.0),
		(7u64 << 32) | 3,
	)
	.unwrap();

	let events = x.client.events(&mut x.display);
	assert_eq!(ops(&events, relative), [0]);
	assert_eq!(ops(&events, x.pointer), [5]);

	let (hi, lo, dx, _, _, _): (u32, u32, wlm::Fixed, i32, i32, i32) = events[0].decode();
	assert_eq!((hi, lo), (7, 3));
	assert_eq!(dx.to_f64(), 1.0);

	x.client.request(&mut x.display, relative, 0, ());

	seat::pointer::relative_pointer_motion(
		&mut x.display,
		x.seat,
		PointF(1.0, 2.0),
		PointF(0.5, 1.0),
		0,
	)
	.unwrap();

	assert!(ops(&x.client.events(&mut x.display), x.pointer).is_empty());
}

#[test]
fn swipe_gestures_follow_focus() {
	let mut x = Setup::new();
	let gestures = x.client.bind(&mut x.display, "zwp_pointer_gestures_v1", 2);

	let swipe = x.client.new_id();
	x.client
		.request(&mut x.display, gestures, 0, (swipe, x.pointer));

	x.focus(Transformation::default());
	x.client.events(&mut x.display);

	seat::pointer::swipe_gesture_begin(&mut x.display, x.seat, 3).unwrap();
	seat::pointer::swipe_gesture_update(&mut x.display, x.seat, PointF(4.0, 0.0)).unwrap();
	seat::pointer::swipe_gesture_cancel(&mut x.display, x.seat).unwrap();

	let events = x.client.events(&mut x.display);
	assert_eq!(ops(&events, swipe), [0, 1, 2]);

	let (_, _, cancelled): (u32, u32, i32) = events[2].decode();
	assert_eq!(cancelled, 1);
}

#[test]
fn locks_are_granted_by_the_compositor() {
	let mut x = Setup::new();
	let constraints = x
		.client
		.bind(&mut x.display, "zwp_pointer_constraints_v1", 1);
	x.display.take_changes();

	let locked = x.client.new_id();
	x.client.request(
		&mut x.display,
		constraints,
		1,
		(locked, x.surface, x.pointer, 0u32, wl::Lifetime::Oneshot as u32),
	);

	let surface = x.surface();
	assert_eq!(
		x.display.take_changes(),
		[Change::PointerConstraintCreated { surface }]
	);
	assert!(ops(&x.client.events(&mut x.display), locked).is_empty());

	seat::pointer::set_pointer_constraint_active(&mut x.display, surface, true).unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), locked), [0]);

	// a oneshot lock never comes back
	seat::pointer::set_pointer_constraint_active(&mut x.display, surface, false).unwrap();
	seat::pointer::set_pointer_constraint_active(&mut x.display, surface, true).unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), locked), [1]);

	let confined = x.client.new_id();
	x.client.request(
		&mut x.display,
		constraints,
		2,
		(confined, x.surface, x.pointer, 0u32, wl::Lifetime::Persistent as u32),
	);

	let (object, code, _) = x.client.protocol_error(&mut x.display).unwrap();
	assert_eq!((object, code), (constraints, wl::ALREADY_CONSTRAINED));
}

#[test]
fn active_lock_holds_motion_back() {
	let mut x = Setup::new();
	let constraints = x
		.client
		.bind(&mut x.display, "zwp_pointer_constraints_v1", 1);

	let locked = x.client.new_id();
	x.client.request(
		&mut x.display,
		constraints,
		1,
		(locked, x.surface, x.pointer, 0u32, wl::Lifetime::Persistent as u32),
	);

	x.focus(Transformation::default());
	let surface = x.surface();
	seat::pointer::set_pointer_constraint_active(&mut x.display, surface, true).unwrap();
	x.client.events(&mut x.display);

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(20.0, 20.0)).unwrap();
	assert!(ops(&x.client.events(&mut x.display), x.pointer).is_empty());

	seat::pointer::set_pointer_constraint_active(&mut x.display, surface, false).unwrap();
	x.client.events(&mut x.display);

	seat::pointer::set_pointer_position(&mut x.display, x.seat, PointF(30.0, 20.0)).unwrap();
	assert_eq!(ops(&x.client.events(&mut x.display), x.pointer), [2, 5]);
}
