use crate::{seat::SeatKey, signal, wl, Change, Point, PointF, Result};

// https://wayland.app/protocols/wayland#wl_pointer:enum:button_state
pub const BUTTON_RELEASED: u32 = 0;
pub const BUTTON_PRESSED: u32 = 1;

/// https://wayland.app/protocols/wayland#wl_pointer:enum:axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
	Vertical = 0,
	Horizontal = 1,
}

/// https://wayland.app/protocols/wayland#wl_pointer:enum:axis_source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
	Unknown,
	Wheel,
	Finger,
	Continuous,
	WheelTilt,
}

impl AxisSource {
	fn wire(self) -> Option<u32> {
		match self {
			Self::Unknown => None,
			Self::Wheel => Some(0),
			Self::Finger => Some(1),
			Self::Continuous => Some(2),
			Self::WheelTilt => Some(3),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
	pub entered_serial: u32,
	pub hotspot: Point,
	pub surface: Option<wl::Handle<wl::Surface>>,
}

pub struct Pointer {
	pub seat: SeatKey,
	pub focused_surface: Option<wl::Handle<wl::Surface>>,
	/// Surface of the focused tree that is actually under the pointer.
	pub focused_child: Option<wl::Handle<wl::Surface>>,
	pub cursor: Option<Cursor>,
	pub(crate) focus_connection: Option<signal::ConnectionId>,
	pub(crate) relative_pointers: Vec<wl::Handle<wl::ZwpRelativePointerV1>>,
	pub(crate) swipe_gestures: Vec<wl::Handle<wl::ZwpPointerGestureSwipeV1>>,
	pub(crate) pinch_gestures: Vec<wl::Handle<wl::ZwpPointerGesturePinchV1>>,
}

impl Pointer {
	pub fn new(seat: SeatKey) -> Self {
		Self {
			seat,
			focused_surface: None,
			focused_child: None,
			cursor: None,
			focus_connection: None,
			relative_pointers: Vec::new(),
			swipe_gestures: Vec::new(),
			pinch_gestures: Vec::new(),
		}
	}

	/// Stores the cursor and tells whether anything changed.
	fn update_cursor(&mut self, cursor: Cursor) -> bool {
		let changed = self.cursor != Some(cursor);
		self.cursor = Some(cursor);

		changed
	}

	pub fn enter(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		surface: wl::Handle<wl::Surface>,
		position: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_pointer:event:enter
		display.send(
			this,
			0,
			(
				serial,
				surface,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
			),
		)
	}

	pub fn leave(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		surface: wl::Handle<wl::Surface>,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_pointer:event:leave
		display.send(this, 1, (serial, surface))
	}

	pub fn motion(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		time: u32,
		position: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_pointer:event:motion
		display.send(
			this,
			2,
			(
				time,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
			),
		)
	}

	pub fn button(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		time: u32,
		button: u32,
		state: u32,
	) -> Result<()> {
		assert!(
			display.get(this).is_some_and(|x| x.focused_surface.is_some()),
			"pointer button event without a focused surface"
		);

		// https://wayland.app/protocols/wayland#wl_pointer:event:button
		display.send(this, 3, (serial, time, button, state))?;
		Self::frame(display, this)
	}

	pub fn axis(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		time: u32,
		axis: Axis,
		delta: f64,
		discrete: i32,
		source: AxisSource,
	) -> Result<()> {
		assert!(
			display.get(this).is_some_and(|x| x.focused_surface.is_some()),
			"pointer axis event without a focused surface"
		);

		if let Some(source) = source.wire() {
			// https://wayland.app/protocols/wayland#wl_pointer:event:axis_source
			display.send_since(this, 5, 6, source)?;
		}

		if delta != 0.0 {
			if discrete != 0 {
				// https://wayland.app/protocols/wayland#wl_pointer:event:axis_discrete
				display.send_since(this, 5, 8, (axis as u32, discrete))?;
			}

			// https://wayland.app/protocols/wayland#wl_pointer:event:axis
			display.send(this, 4, (time, axis as u32, wlm::Fixed::from_f64(delta)))?;
		} else {
			// https://wayland.app/protocols/wayland#wl_pointer:event:axis_stop
			display.send_since(this, 5, 7, (time, axis as u32))?;
		}

		Self::frame(display, this)
	}

	pub fn frame(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_pointer:event:frame
		display.send_since(this, 5, 5, ())
	}
}

impl crate::wl::SeatBound for Pointer {
	fn seat(&self) -> SeatKey {
		self.seat
	}
}

impl wl::Object for Pointer {
	const INTERFACE: &'static str = "wl_pointer";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_pointer:request:set_cursor
				let (serial, surface, x, y): (u32, u32, i32, i32) =
					wlm::decode::from_slice(params)?;

				let surface = display.lookup_optional::<wl::Surface>(this.client(), surface)?;

				let cursor = Cursor {
					entered_serial: serial,
					hotspot: Point(x, y),
					surface,
				};

				if display.object_mut(this)?.update_cursor(cursor) {
					display.push_change(Change::CursorChanged { pointer: this });
				}
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_pointer:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Pointer"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
