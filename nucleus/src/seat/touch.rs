use crate::{
	seat::{self, SeatKey},
	signal, wl, Display, PointF, Result, Transformation,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchFocus {
	pub surface: Option<wl::Handle<wl::Surface>>,
	pub transformation: Transformation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
	/// Serial of the down event.
	pub serial: u32,
	/// Last position in seat coordinates.
	pub position: PointF,
}

#[derive(Debug, Default)]
pub struct TouchPool {
	pub focus: TouchFocus,
	points: std::collections::BTreeMap<i32, TouchPoint>,
}

impl TouchPool {
	pub fn has_implicit_grab(&self, serial: u32) -> bool {
		self.points.values().any(|x| x.serial == serial)
	}

	pub fn point(&self, id: i32) -> Option<&TouchPoint> {
		self.points.get(&id)
	}

	pub fn point_by_serial(&self, serial: u32) -> Option<&TouchPoint> {
		self.points.values().find(|x| x.serial == serial)
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}
}

fn focused_touches(display: &Display, seat: SeatKey) -> Result<Vec<wl::Handle<wl::Touch>>> {
	let Some(surface) = seat::seat_ref(display, seat)?
		.touch
		.focus
		.surface
		.filter(|x| display.is_alive(*x))
	else {
		return Ok(Vec::new());
	};

	Ok(seat::seat_objects::<wl::Touch>(display, seat, surface.client()))
}

pub fn set_touch_focus(
	display: &mut Display,
	seat: SeatKey,
	surface: Option<wl::Handle<wl::Surface>>,
	transformation: Transformation,
) -> Result<()> {
	seat::seat_mut(display, seat)?.touch.focus = TouchFocus {
		surface,
		transformation,
	};

	Ok(())
}

/// Returns the serial of the down event.
pub fn touch_down(display: &mut Display, seat: SeatKey, id: i32, position: PointF) -> Result<u32> {
	let serial = display.next_serial();

	let x = seat::seat_mut(display, seat)?;
	x.touch.points.insert(id, TouchPoint { serial, position });

	let time = x.timestamp;
	let focus = x.touch.focus;

	if let Some(surface) = focus.surface {
		let local = focus.transformation.map(position);

		for touch in focused_touches(display, seat)? {
			wl::Touch::down(display, touch, serial, time, surface, id, local)?;
		}
	}

	Ok(serial)
}

pub fn touch_move(display: &mut Display, seat: SeatKey, id: i32, position: PointF) -> Result<()> {
	let x = seat::seat_mut(display, seat)?;

	let Some(point) = x.touch.points.get_mut(&id) else {
		color_eyre::eyre::bail!("touch point {id} is not down");
	};

	point.position = position;

	let serial = point.serial;
	let time = x.timestamp;
	let local = x.touch.focus.transformation.map(position);

	for touch in focused_touches(display, seat)? {
		wl::Touch::motion(display, touch, time, id, local)?;
	}

	display.emit(
		signal::Topic::TouchMoved(seat),
		signal::Payload::Touch {
			id,
			serial,
			position,
		},
	)
}

pub fn touch_up(display: &mut Display, seat: SeatKey, id: i32) -> Result<()> {
	let serial = display.next_serial();

	let x = seat::seat_mut(display, seat)?;

	if x.touch.points.remove(&id).is_none() {
		color_eyre::eyre::bail!("touch point {id} is not down");
	}

	let time = x.timestamp;

	for touch in focused_touches(display, seat)? {
		wl::Touch::up(display, touch, serial, time, id)?;
	}

	Ok(())
}

pub fn touch_frame(display: &mut Display, seat: SeatKey) -> Result<()> {
	for touch in focused_touches(display, seat)? {
		wl::Touch::frame(display, touch)?;
	}

	Ok(())
}

/// Cancels every touch point of the seat.
pub fn touch_cancel(display: &mut Display, seat: SeatKey) -> Result<()> {
	let touches = focused_touches(display, seat)?;
	seat::seat_mut(display, seat)?.touch.points.clear();

	for touch in touches {
		wl::Touch::cancel(display, touch)?;
	}

	Ok(())
}
