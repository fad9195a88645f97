//! Drag-and-drop transactions.
//!
//! A drag starts from a `wl_data_device` request and is then driven by the compositor: it
//! picks the surface under the pointer or touch point with [`drag_update_target`] and
//! ends the transaction with [`drag_drop`] or [`drag_cancel`]. Every listener wired up
//! for one target is torn down before the next target is entered.

use log::debug;

use crate::{
	seat::{self, SeatKey, Source},
	signal, wl, Change, Display, PointF, Result, Transformation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	#[default]
	Idle,
	/// Started, no target picked yet.
	Pending,
	Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
	Pointer,
	Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
	pub surface: wl::Handle<wl::Surface>,
	/// Data device of the target's client, if it has one on this seat.
	pub device: Option<wl::Handle<wl::DataDevice>>,
	pub transformation: Transformation,
}

#[derive(Debug, Default)]
pub struct Drag {
	pub phase: Phase,
	pub kind: Option<DragKind>,
	pub source_device: Option<wl::Handle<wl::DataDevice>>,
	pub target: Option<DragTarget>,
}

impl Drag {
	pub fn is_active(&self) -> bool {
		self.phase != Phase::Idle
	}

	pub fn is_pointer_drag(&self) -> bool {
		self.is_active() && self.kind == Some(DragKind::Pointer)
	}

	pub fn is_touch_drag(&self) -> bool {
		self.is_active() && self.kind == Some(DragKind::Touch)
	}
}

/// Picks the drop action: the offer's preferred action if both sides support it,
/// otherwise the first mutual one of copy, move and ask.
pub fn negotiate(
	source: wl::DndActions,
	supported: wl::DndActions,
	preferred: wl::DndActions,
) -> wl::DndActions {
	if !preferred.is_empty() && source.contains(preferred) && supported.contains(preferred) {
		return preferred;
	}

	[wl::DndActions::COPY, wl::DndActions::MOVE, wl::DndActions::ASK]
		.into_iter()
		.find(|x| source.contains(*x) && supported.contains(*x))
		.unwrap_or(wl::DndActions::empty())
}

/// Sets the remote surface a proxy device drags on behalf of.
pub fn set_data_device_proxy(
	display: &mut Display,
	device: wl::Handle<wl::DataDevice>,
	remote: Option<wl::Handle<wl::Surface>>,
) -> Result<()> {
	display.object_mut(device)?.proxy_remote = remote;
	Ok(())
}

/// Source of the active drag, if it has one and it is still alive.
pub fn drag_source(display: &Display, seat: SeatKey) -> Option<wl::Handle<wl::DataSource>> {
	let device = display.seats.get(seat)?.drag.source_device?;

	display
		.get(device)?
		.drag_source
		.filter(|x| display.is_alive(*x))
}

pub(crate) fn start_drag(
	display: &mut Display,
	device: wl::Handle<wl::DataDevice>,
	source: Option<wl::Handle<wl::DataSource>>,
	origin: wl::Handle<wl::Surface>,
	icon: Option<wl::Handle<wl::Surface>>,
	serial: u32,
) -> Result<()> {
	let x = display.object(device)?;
	let seat_key = x.seat;
	let focus_surface = x.proxy_remote.unwrap_or(origin);

	let seat = seat::seat_ref(display, seat_key)?;

	if seat.drag.is_active() {
		debug!("{}: ignoring start_drag during an active drag", device.client());
		return Ok(());
	}

	let pointer_grab = seat.has_pointer()
		&& seat.pointer.has_implicit_grab(serial)
		&& seat.pointer.focus.surface == Some(focus_surface);

	let touch_grab = seat.has_touch()
		&& seat.touch.has_implicit_grab(serial)
		&& seat.touch.focus.surface == Some(focus_surface);

	let kind = match (pointer_grab, touch_grab) {
		(true, _) => DragKind::Pointer,
		(false, true) => DragKind::Touch,
		(false, false) => {
			debug!(
				"{}: ignoring start_drag without implicit grab for serial {serial}",
				device.client()
			);
			return Ok(());
		}
	};

	// nothing of an earlier transaction may stay wired up
	for x in seat::all_seat_objects::<wl::DataDevice>(display, seat_key) {
		cancel_drag_target(display, x)?;
	}

	let mut old = display.object_mut(device)?.source_connection.take();
	display.disconnect(&mut old);

	// a drag without a source is valid, the client handles it internally
	let connection = source.map(|x| {
		display.connect(
			signal::Topic::Destroyed(x.object),
			device,
			signal::Subscriber::DragSourceDestroyed { device },
		)
	});

	let x = display.object_mut(device)?;
	x.drag_source = source;
	x.source_connection = connection;
	x.surface = Some(origin);
	x.icon = icon;
	x.drag.serial = serial;

	seat::seat_mut(display, seat_key)?.drag = Drag {
		phase: Phase::Pending,
		kind: Some(kind),
		source_device: Some(device),
		target: None,
	};

	debug!("{}: drag started ({kind:?}, serial {serial})", device.client());

	display.push_change(Change::DragStarted {
		seat: seat_key,
		device,
	});

	Ok(())
}

/// Moves the drag over `surface`, or off any surface with `None`. `transformation` maps
/// seat coordinates into the surface.
pub fn drag_update_target(
	display: &mut Display,
	seat_key: SeatKey,
	surface: Option<wl::Handle<wl::Surface>>,
	transformation: Transformation,
) -> Result<()> {
	let seat = seat::seat_ref(display, seat_key)?;

	if !seat.drag.is_active() {
		color_eyre::eyre::bail!("no drag in progress on seat '{}'", seat.name);
	}

	let old = seat.drag.target.and_then(|x| x.device);
	let serial = display.next_serial();

	if let Some(old) = old {
		cancel_drag_target(display, old)?;
	}

	let device = surface.and_then(|x| {
		seat::seat_objects::<wl::DataDevice>(display, seat_key, x.client())
			.first()
			.copied()
	});

	let drag = &mut seat::seat_mut(display, seat_key)?.drag;
	drag.phase = Phase::Dragging;
	drag.target = surface.map(|surface| DragTarget {
		surface,
		device,
		transformation,
	});

	match (surface, device) {
		(Some(surface), Some(device)) => set_device_target(display, device, surface, serial),
		_ => {
			if let Some(source) = drag_source(display, seat_key) {
				wl::DataSource::action(display, source, wl::DndActions::empty())?;
				display.flush(source.client())?;
			}

			Ok(())
		}
	}
}

fn drag_position(display: &Display, seat_key: SeatKey) -> Result<PointF> {
	let seat = seat::seat_ref(display, seat_key)?;

	let transformation = seat
		.drag
		.target
		.map(|x| x.transformation)
		.unwrap_or_default();

	let position = match seat.drag.kind {
		Some(DragKind::Touch) => seat
			.drag
			.source_device
			.and_then(|x| display.get(x))
			.and_then(|x| seat.touch.point_by_serial(x.drag.serial))
			.map_or(seat.pointer.position, |x| x.position),
		_ => seat.pointer.position,
	};

	Ok(transformation.map(position))
}

fn set_device_target(
	display: &mut Display,
	device: wl::Handle<wl::DataDevice>,
	surface: wl::Handle<wl::Surface>,
	serial: u32,
) -> Result<()> {
	let x = display.object(device)?;

	// the remote a proxy stands in for can never be its own drag target
	if x.proxy_remote == Some(surface) {
		return Ok(());
	}

	let seat_key = x.seat;
	let kind = seat::seat_ref(display, seat_key)?.drag.kind;
	let source = drag_source(display, seat_key);

	let position_connection = match kind {
		Some(DragKind::Pointer) => Some(display.connect(
			signal::Topic::PointerMoved(seat_key),
			device,
			signal::Subscriber::DragPointerMotion { device },
		)),
		Some(DragKind::Touch) => Some(display.connect(
			signal::Topic::TouchMoved(seat_key),
			device,
			signal::Subscriber::DragTouchMotion { device },
		)),
		None => None,
	};

	let destroy_connection = display.connect(
		signal::Topic::Destroyed(surface.object),
		device,
		signal::Subscriber::DragTargetDestroyed { device },
	);

	let x = display.object_mut(device)?;
	x.drag.surface = Some(surface);
	x.drag.position_connection = position_connection;
	x.drag.destroy_connection = Some(destroy_connection);

	let offer = match source {
		Some(source) => Some(wl::DataDevice::create_offer(
			display,
			device,
			Source::Data(source),
		)?),
		None => None,
	};

	let position = drag_position(display, seat_key)?;
	wl::DataDevice::enter(display, device, serial, surface, position, offer)?;

	if let (Some(offer), Some(source)) = (offer, source) {
		let actions = display.object(source)?.actions;
		wl::DataOffer::source_actions(display, offer, actions)?;

		let target_action_connection = display.connect(
			signal::Topic::OfferActionsChanged(offer.object),
			device,
			signal::Subscriber::MatchDndActions { offer, source },
		);

		let source_action_connection = display.connect(
			signal::Topic::SourceActionsChanged(source.object),
			device,
			signal::Subscriber::MatchDndActions { offer, source },
		);

		let x = display.object_mut(device)?;
		x.drag.offer = Some(offer);
		x.drag.target_action_connection = Some(target_action_connection);
		x.drag.source_action_connection = Some(source_action_connection);
	}

	display.flush(device.client())
}

/// Leaves the current target of `device` and drops every listener of it.
fn cancel_drag_target(display: &mut Display, device: wl::Handle<wl::DataDevice>) -> Result<()> {
	let Some(x) = display.get_mut(device) else {
		return Ok(());
	};

	let surface = x.drag.surface.take();
	x.drag.offer = None;

	let mut connections = [
		x.drag.position_connection.take(),
		x.drag.destroy_connection.take(),
		x.drag.source_action_connection.take(),
		x.drag.target_action_connection.take(),
	];

	for connection in &mut connections {
		display.disconnect(connection);
	}

	if surface.is_some_and(|x| display.is_alive(x)) {
		wl::DataDevice::leave(display, device)?;
	}

	Ok(())
}

pub(crate) fn pointer_motion(display: &mut Display, device: wl::Handle<wl::DataDevice>) -> Result<()> {
	let Some(x) = display.get(device) else {
		return Ok(());
	};

	let seat = seat::seat_ref(display, x.seat)?;

	let Some(target) = seat.drag.target else {
		return Ok(());
	};

	let time = seat.timestamp;
	let position = target.transformation.map(seat.pointer.position);

	wl::DataDevice::motion(display, device, time, position)?;
	display.flush(device.client())
}

pub(crate) fn touch_motion(
	display: &mut Display,
	device: wl::Handle<wl::DataDevice>,
	payload: &signal::Payload,
) -> Result<()> {
	let signal::Payload::Touch {
		serial, position, ..
	} = *payload
	else {
		return Ok(());
	};

	let Some(x) = display.get(device) else {
		return Ok(());
	};

	let seat = seat::seat_ref(display, x.seat)?;

	// some other touch point moved
	let grab = seat
		.drag
		.source_device
		.and_then(|x| display.get(x))
		.map(|x| x.drag.serial);

	if grab != Some(serial) {
		return Ok(());
	}

	let Some(target) = seat.drag.target else {
		return Ok(());
	};

	let time = seat.timestamp;
	let position = target.transformation.map(position);

	wl::DataDevice::motion(display, device, time, position)?;
	display.flush(device.client())
}

/// The target surface died mid-drag.
pub(crate) fn target_destroyed(display: &mut Display, device: wl::Handle<wl::DataDevice>) -> Result<()> {
	let Some(x) = display.get_mut(device) else {
		return Ok(());
	};

	let seat_key = x.seat;
	let surface = x.drag.surface;

	// the grab serial belongs to the source role and survives
	let serial = x.drag.serial;
	let mut drag = std::mem::take(&mut x.drag);
	x.drag.serial = serial;

	wl::DataDevice::leave(display, device)?;

	for connection in [
		&mut drag.position_connection,
		&mut drag.destroy_connection,
		&mut drag.source_action_connection,
		&mut drag.target_action_connection,
	] {
		display.disconnect(connection);
	}

	if let Some(seat) = display.seats.get_mut(seat_key) {
		if seat.drag.target.map(|x| x.surface) == surface {
			seat.drag.target = None;
		}
	}

	display.flush(device.client())
}

pub(crate) fn source_destroyed(display: &mut Display, device: wl::Handle<wl::DataDevice>) -> Result<()> {
	if let Some(x) = display.get_mut(device) {
		x.drag_source = None;
		x.source_connection = None;
	}

	Ok(())
}

pub(crate) fn match_actions(
	display: &mut Display,
	offer: wl::Handle<wl::DataOffer>,
	source: wl::Handle<wl::DataSource>,
) -> Result<()> {
	let (Some(o), Some(s)) = (display.get(offer), display.get(source)) else {
		return Ok(());
	};

	let action = negotiate(s.actions, o.supported, o.preferred);
	display.object_mut(offer)?.action = action;

	wl::DataOffer::action(display, offer, action)?;
	wl::DataSource::action(display, source, action)?;

	display.flush(offer.client())?;
	display.flush(source.client())
}

/// Drops onto the current target. Without a target that has a data device the drag is
/// cancelled instead.
pub fn drag_drop(display: &mut Display, seat_key: SeatKey) -> Result<()> {
	let seat = seat::seat_ref(display, seat_key)?;

	if !seat.drag.is_active() {
		return Ok(());
	}

	let Some(device) = seat.drag.target.and_then(|x| x.device) else {
		return drag_cancel(display, seat_key);
	};

	let Some(x) = display.get_mut(device) else {
		return drag_cancel(display, seat_key);
	};

	if x.drag.surface.is_none() {
		return drag_cancel(display, seat_key);
	}

	// surface is cleared, serial and action negotiation stay for finish
	x.drag.surface = None;
	let offer = x.drag.offer;
	let mut connections = [
		x.drag.position_connection.take(),
		x.drag.destroy_connection.take(),
	];

	wl::DataDevice::drop(display, device)?;

	for connection in &mut connections {
		display.disconnect(connection);
	}

	if let Some(offer) = offer.and_then(|x| display.get_mut(x)) {
		offer.dropped = true;
	}

	if let Some(source) = drag_source(display, seat_key) {
		wl::DataSource::dnd_drop_performed(display, source)?;
		display.flush(source.client())?;
	}

	finish_transaction(display, seat_key)?;
	display.push_change(Change::DragDropped { seat: seat_key });

	display.flush(device.client())
}

pub fn drag_cancel(display: &mut Display, seat_key: SeatKey) -> Result<()> {
	let seat = seat::seat_ref(display, seat_key)?;

	if !seat.drag.is_active() {
		return Ok(());
	}

	if let Some(device) = seat.drag.target.and_then(|x| x.device) {
		cancel_drag_target(display, device)?;
		display.flush(device.client())?;
	}

	if let Some(source) = drag_source(display, seat_key) {
		Source::Data(source).cancel(display)?;
	}

	finish_transaction(display, seat_key)?;
	display.push_change(Change::DragCancelled { seat: seat_key });

	Ok(())
}

fn finish_transaction(display: &mut Display, seat_key: SeatKey) -> Result<()> {
	let drag = std::mem::take(&mut seat::seat_mut(display, seat_key)?.drag);

	if let Some(x) = drag.source_device.and_then(|x| display.get_mut(x)) {
		let mut connection = x.source_connection.take();
		x.drag_source = None;

		display.disconnect(&mut connection);
	}

	Ok(())
}

pub(crate) fn device_destroyed(
	display: &mut Display,
	seat_key: SeatKey,
	device: wl::Handle<wl::DataDevice>,
) -> Result<()> {
	let Some(seat) = display.seats.get_mut(seat_key) else {
		return Ok(());
	};

	if seat.drag.is_active() && seat.drag.source_device == Some(device) {
		return drag_cancel(display, seat_key);
	}

	if let Some(target) = &mut seat.drag.target {
		if target.device == Some(device) {
			target.device = None;
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::negotiate;
	use crate::wl::DndActions;

	#[test]
	fn preferred_action_wins_when_mutual() {
		let action = negotiate(
			DndActions::COPY | DndActions::MOVE,
			DndActions::COPY | DndActions::MOVE,
			DndActions::MOVE,
		);

		assert_eq!(action, DndActions::MOVE);
	}

	#[test]
	fn fallback_order_is_copy_move_ask() {
		let all = DndActions::all();

		assert_eq!(negotiate(all, all, DndActions::empty()), DndActions::COPY);
		assert_eq!(
			negotiate(DndActions::MOVE | DndActions::ASK, all, DndActions::empty()),
			DndActions::MOVE
		);
	}

	#[test]
	fn ask_only_source() {
		assert_eq!(
			negotiate(DndActions::ASK, DndActions::COPY | DndActions::ASK, DndActions::COPY),
			DndActions::ASK
		);

		assert_eq!(
			negotiate(DndActions::ASK, DndActions::COPY, DndActions::COPY),
			DndActions::empty()
		);
	}
}
