use crate::{
	seat::{self, SeatKey},
	signal, surface, wl, Display, PointF, Result, Transformation,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerFocus {
	pub surface: Option<wl::Handle<wl::Surface>>,
	/// Maps seat coordinates into coordinates local to `surface`.
	pub transformation: Transformation,
	pub serial: u32,
}

#[derive(Debug, Default)]
pub struct PointerPool {
	pub position: PointF,
	pub focus: PointerFocus,
	/// Pressed buttons and the serial of their press event.
	buttons: std::collections::BTreeMap<u32, u32>,
}

impl PointerPool {
	/// Whether a button pressed with `serial` is still held down.
	pub fn has_implicit_grab(&self, serial: u32) -> bool {
		self.buttons.values().any(|x| *x == serial)
	}

	pub fn is_pressed(&self, button: u32) -> bool {
		self.buttons.contains_key(&button)
	}
}

/// Pointers of the focused client that currently have focus.
fn focused_pointers(display: &Display, seat: SeatKey) -> Result<Vec<wl::Handle<wl::Pointer>>> {
	let Some(surface) = seat::seat_ref(display, seat)?.pointer.focus.surface else {
		return Ok(Vec::new());
	};

	Ok(seat::seat_objects::<wl::Pointer>(display, seat, surface.client())
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.focused_surface.is_some()))
		.collect())
}

pub fn set_pointer_position(display: &mut Display, seat: SeatKey, position: PointF) -> Result<()> {
	seat::seat_mut(display, seat)?.pointer.position = position;
	display.emit(signal::Topic::PointerMoved(seat), signal::Payload::None)
}

/// Moves pointer focus to `surface`. Ignored while a pointer drag is in progress; the
/// drag target is updated through [`seat::drag::drag_update_target`] instead.
pub fn set_pointer_focus(
	display: &mut Display,
	seat: SeatKey,
	surface: Option<wl::Handle<wl::Surface>>,
	transformation: Transformation,
) -> Result<()> {
	if seat::seat_ref(display, seat)?.drag.is_pointer_drag() {
		return Ok(());
	}

	let serial = display.next_serial();
	let old = seat::seat_ref(display, seat)?.pointer.focus.surface;

	if let Some(old) = old {
		// the same client gets its leave and enter grouped into one frame
		let same_client = surface.is_some_and(|x| x.client() == old.client());

		for pointer in seat::seat_objects::<wl::Pointer>(display, seat, old.client()) {
			let entered = display
				.get(pointer)
				.and_then(|x| x.focused_child)
				.is_some_and(|x| display.is_alive(x));

			set_focused_surface(display, pointer, serial, None)?;

			if entered && !same_client {
				wl::Pointer::frame(display, pointer)?;
			}
		}

		display.flush(old.client())?;
	}

	seat::seat_mut(display, seat)?.pointer.focus = PointerFocus {
		surface,
		transformation,
		serial,
	};

	if let Some(surface) = surface {
		for pointer in seat::seat_objects::<wl::Pointer>(display, seat, surface.client()) {
			set_focused_surface(display, pointer, serial, Some(surface))?;
		}
	}

	Ok(())
}

/// Updates the transformation of the focused surface, e.g. after it moved.
pub fn set_pointer_focus_transformation(
	display: &mut Display,
	seat: SeatKey,
	transformation: Transformation,
) -> Result<()> {
	seat::seat_mut(display, seat)?.pointer.focus.transformation = transformation;
	Ok(())
}

pub(crate) fn pointer_created(display: &mut Display, pointer: wl::Handle<wl::Pointer>) -> Result<()> {
	let seat = display.object(pointer)?.seat;

	display.connect(
		signal::Topic::PointerMoved(seat),
		pointer,
		signal::Subscriber::PointerMotion { pointer },
	);

	let focus = seat::seat_ref(display, seat)?.pointer.focus;

	if let Some(surface) = focus.surface.filter(|x| x.client() == pointer.client()) {
		if display.is_alive(surface) {
			set_focused_surface(display, pointer, focus.serial, Some(surface))?;
			wl::Pointer::frame(display, pointer)?;
		}
	}

	Ok(())
}

fn set_focused_surface(
	display: &mut Display,
	pointer: wl::Handle<wl::Pointer>,
	serial: u32,
	surface: Option<wl::Handle<wl::Surface>>,
) -> Result<()> {
	let x = display.object_mut(pointer)?;
	let seat = x.seat;
	let old_child = x.focused_child;
	let mut connection = x.focus_connection.take();

	if let Some(old) = old_child.filter(|x| display.is_alive(*x)) {
		wl::Pointer::leave(display, pointer, serial, old)?;
	}

	display.disconnect(&mut connection);

	let Some(surface) = surface else {
		let x = display.object_mut(pointer)?;
		x.focused_surface = None;
		x.focused_child = None;

		return Ok(());
	};

	let connection = display.connect(
		signal::Topic::Destroyed(surface.object),
		pointer,
		signal::Subscriber::PointerFocusDestroyed { pointer },
	);

	let position = {
		let pool = &seat::seat_ref(display, seat)?.pointer;
		pool.focus.transformation.map(pool.position)
	};

	let child = surface::input_surface_at(display, surface, position).unwrap_or(surface);

	let x = display.object_mut(pointer)?;
	x.focused_surface = Some(surface);
	x.focused_child = Some(child);
	x.focus_connection = Some(connection);

	send_enter(display, pointer, serial, child, position)?;
	wl::Pointer::frame(display, pointer)?;

	display.flush(pointer.client())
}

fn send_enter(
	display: &mut Display,
	pointer: wl::Handle<wl::Pointer>,
	serial: u32,
	surface: wl::Handle<wl::Surface>,
	position: PointF,
) -> Result<()> {
	let adjusted = position - surface::surface_position(display, surface).as_f64();
	wl::Pointer::enter(display, pointer, serial, surface, adjusted)
}

/// Reacts to a seat pointer position change for one `wl_pointer`.
pub(crate) fn route_motion(display: &mut Display, pointer: wl::Handle<wl::Pointer>) -> Result<()> {
	let Some(x) = display.get(pointer) else {
		return Ok(());
	};

	let seat = x.seat;
	let focused_child = x.focused_child;

	let Some(focused) = x.focused_surface.filter(|x| display.is_alive(*x)) else {
		return Ok(());
	};

	let pool = seat::seat_ref(display, seat)?;

	if pool.drag.is_pointer_drag() {
		let origin = pool
			.drag
			.source_device
			.and_then(|x| display.get(x))
			.and_then(|x| x.origin());

		let proxy_remote_focused = origin.is_some_and(|origin| {
			origin == focused && display.get(origin).is_some_and(|x| x.data_proxy.is_some())
		});

		// the data device handles motion during a drag
		if !proxy_remote_focused {
			return Ok(());
		}
	}

	let locked = display
		.get(focused)
		.and_then(|x| x.locked_pointer)
		.and_then(|x| display.get(x))
		.is_some_and(|x| x.locked);

	if locked {
		return Ok(());
	}

	let time = pool.timestamp;
	let position = pool.pointer.focus.transformation.map(pool.pointer.position);

	let target = surface::input_surface_at(display, focused, position).unwrap_or(focused);

	if Some(target) != focused_child {
		let serial = display.next_serial();

		if let Some(old) = focused_child.filter(|x| display.is_alive(*x)) {
			wl::Pointer::leave(display, pointer, serial, old)?;
		}

		display.object_mut(pointer)?.focused_child = Some(target);

		send_enter(display, pointer, serial, target, position)?;
		wl::Pointer::frame(display, pointer)?;

		display.flush(pointer.client())
	} else {
		let adjusted = position - surface::surface_position(display, target).as_f64();

		wl::Pointer::motion(display, pointer, time, adjusted)?;
		wl::Pointer::frame(display, pointer)
	}
}

/// The focused surface went away under the pointer.
pub(crate) fn focus_destroyed(display: &mut Display, pointer: wl::Handle<wl::Pointer>) -> Result<()> {
	let Some(x) = display.get_mut(pointer) else {
		return Ok(());
	};

	let seat = x.seat;
	let child = x.focused_child.take();
	let surface = x.focused_surface.take();
	x.focus_connection = None;

	if let Some(x) = display.seats.get_mut(seat) {
		if x.pointer.focus.surface == surface {
			x.pointer.focus.surface = None;
		}
	}

	let serial = display.next_serial();

	if let Some(child) = child.filter(|x| display.is_alive(*x)) {
		wl::Pointer::leave(display, pointer, serial, child)?;
	}

	wl::Pointer::frame(display, pointer)
}

pub(crate) fn remove_listener(
	display: &mut Display,
	pointer: wl::Handle<wl::Pointer>,
	listener: wl::ObjectRef,
) {
	if let Some(x) = display.get_mut(pointer) {
		x.relative_pointers.retain(|x| x.object != listener);
		x.swipe_gestures.retain(|x| x.object != listener);
		x.pinch_gestures.retain(|x| x.object != listener);
	}
}

/// Registers an extension object that receives a copy of this pointer's events. The
/// registration ends when the listener is destroyed.
pub(crate) fn add_listener(
	display: &mut Display,
	pointer: wl::Handle<wl::Pointer>,
	listener: Listener,
) -> Result<()> {
	let x = display.object_mut(pointer)?;

	let object = match listener {
		Listener::Relative(l) => {
			x.relative_pointers.push(l);
			l.object
		}
		Listener::Swipe(l) => {
			x.swipe_gestures.push(l);
			l.object
		}
		Listener::Pinch(l) => {
			x.pinch_gestures.push(l);
			l.object
		}
	};

	display.connect(
		signal::Topic::Destroyed(object),
		pointer,
		signal::Subscriber::PointerListenerDestroyed {
			pointer,
			listener: object,
		},
	);

	Ok(())
}

pub(crate) enum Listener {
	Relative(wl::Handle<wl::ZwpRelativePointerV1>),
	Swipe(wl::Handle<wl::ZwpPointerGestureSwipeV1>),
	Pinch(wl::Handle<wl::ZwpPointerGesturePinchV1>),
}

pub fn pointer_button_pressed(display: &mut Display, seat: SeatKey, button: u32) -> Result<u32> {
	pointer_button(display, seat, button, wl::BUTTON_PRESSED)
}

pub fn pointer_button_released(display: &mut Display, seat: SeatKey, button: u32) -> Result<u32> {
	pointer_button(display, seat, button, wl::BUTTON_RELEASED)
}

/// # Panics
///
/// Panics if no surface has pointer focus.
fn pointer_button(display: &mut Display, seat: SeatKey, button: u32, state: u32) -> Result<u32> {
	let serial = display.next_serial();
	let x = seat::seat_mut(display, seat)?;
	let time = x.timestamp;

	assert!(
		x.pointer.focus.surface.is_some(),
		"pointer button {button} without a focused surface"
	);

	if state == wl::BUTTON_PRESSED {
		x.pointer.buttons.insert(button, serial);
	} else {
		x.pointer.buttons.remove(&button);
	}

	for pointer in focused_pointers(display, seat)? {
		wl::Pointer::button(display, pointer, serial, time, button, state)?;
	}

	Ok(serial)
}

pub fn pointer_axis(
	display: &mut Display,
	seat: SeatKey,
	axis: wl::Axis,
	delta: f64,
	discrete: i32,
	source: wl::AxisSource,
) -> Result<()> {
	let x = seat::seat_ref(display, seat)?;
	assert!(x.pointer.focus.surface.is_some(), "pointer axis without a focused surface");

	let time = x.timestamp;

	for pointer in focused_pointers(display, seat)? {
		wl::Pointer::axis(display, pointer, time, axis, delta, discrete, source)?;
	}

	Ok(())
}

pub fn relative_pointer_motion(
	display: &mut Display,
	seat: SeatKey,
	delta: PointF,
	delta_unaccelerated: PointF,
	microseconds: u64,
) -> Result<()> {
	for pointer in focused_pointers(display, seat)? {
		let listeners = display.object(pointer)?.relative_pointers.clone();

		if listeners.is_empty() {
			continue;
		}

		for listener in listeners {
			wl::ZwpRelativePointerV1::relative_motion(
				display,
				listener,
				microseconds,
				delta,
				delta_unaccelerated,
			)?;
		}

		wl::Pointer::frame(display, pointer)?;
	}

	Ok(())
}

pub fn swipe_gesture_begin(display: &mut Display, seat: SeatKey, fingers: u32) -> Result<()> {
	let serial = display.next_serial();
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		let x = display.object(pointer)?;
		let (Some(surface), listeners) = (x.focused_surface, x.swipe_gestures.clone()) else {
			continue;
		};

		for listener in listeners {
			wl::ZwpPointerGestureSwipeV1::begin(display, listener, serial, time, surface, fingers)?;
		}
	}

	Ok(())
}

pub fn swipe_gesture_update(display: &mut Display, seat: SeatKey, delta: PointF) -> Result<()> {
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		for listener in display.object(pointer)?.swipe_gestures.clone() {
			wl::ZwpPointerGestureSwipeV1::update(display, listener, time, delta)?;
		}
	}

	Ok(())
}

pub fn swipe_gesture_end(display: &mut Display, seat: SeatKey) -> Result<()> {
	swipe_gesture_finish(display, seat, false)
}

pub fn swipe_gesture_cancel(display: &mut Display, seat: SeatKey) -> Result<()> {
	swipe_gesture_finish(display, seat, true)
}

fn swipe_gesture_finish(display: &mut Display, seat: SeatKey, cancelled: bool) -> Result<()> {
	let serial = display.next_serial();
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		for listener in display.object(pointer)?.swipe_gestures.clone() {
			wl::ZwpPointerGestureSwipeV1::end(display, listener, serial, time, cancelled)?;
		}
	}

	Ok(())
}

pub fn pinch_gesture_begin(display: &mut Display, seat: SeatKey, fingers: u32) -> Result<()> {
	let serial = display.next_serial();
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		let x = display.object(pointer)?;
		let (Some(surface), listeners) = (x.focused_surface, x.pinch_gestures.clone()) else {
			continue;
		};

		for listener in listeners {
			wl::ZwpPointerGesturePinchV1::begin(display, listener, serial, time, surface, fingers)?;
		}
	}

	Ok(())
}

pub fn pinch_gesture_update(
	display: &mut Display,
	seat: SeatKey,
	delta: PointF,
	scale: f64,
	rotation: f64,
) -> Result<()> {
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		for listener in display.object(pointer)?.pinch_gestures.clone() {
			wl::ZwpPointerGesturePinchV1::update(display, listener, time, delta, scale, rotation)?;
		}
	}

	Ok(())
}

pub fn pinch_gesture_end(display: &mut Display, seat: SeatKey) -> Result<()> {
	pinch_gesture_finish(display, seat, false)
}

pub fn pinch_gesture_cancel(display: &mut Display, seat: SeatKey) -> Result<()> {
	pinch_gesture_finish(display, seat, true)
}

fn pinch_gesture_finish(display: &mut Display, seat: SeatKey, cancelled: bool) -> Result<()> {
	let serial = display.next_serial();
	let time = seat::seat_ref(display, seat)?.timestamp;

	for pointer in focused_pointers(display, seat)? {
		for listener in display.object(pointer)?.pinch_gestures.clone() {
			wl::ZwpPointerGesturePinchV1::end(display, listener, serial, time, cancelled)?;
		}
	}

	Ok(())
}

/// Activates or deactivates the pointer constraint of `surface`. Whether a constraint
/// may become active is up to the compositor.
pub fn set_pointer_constraint_active(
	display: &mut Display,
	surface: wl::Handle<wl::Surface>,
	active: bool,
) -> Result<()> {
	let x = display.object(surface)?;
	let (locked, confined) = (x.locked_pointer, x.confined_pointer);

	if let Some(locked) = locked {
		wl::ZwpLockedPointerV1::set_active(display, locked, active)?;
	}

	if let Some(confined) = confined {
		wl::ZwpConfinedPointerV1::set_active(display, confined, active)?;
	}

	display.flush(surface.client())
}
