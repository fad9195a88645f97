use crate::{seat::SeatKey, wl, PointF, Result};

pub struct Touch {
	pub seat: SeatKey,
}

impl Touch {
	pub fn new(seat: SeatKey) -> Self {
		Self { seat }
	}

	pub fn down(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		time: u32,
		surface: wl::Handle<wl::Surface>,
		id: i32,
		position: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_touch:event:down
		display.send(
			this,
			0,
			(
				serial,
				time,
				surface,
				id,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
			),
		)
	}

	pub fn up(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		time: u32,
		id: i32,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_touch:event:up
		display.send(this, 1, (serial, time, id))
	}

	pub fn motion(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		time: u32,
		id: i32,
		position: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_touch:event:motion
		display.send(
			this,
			2,
			(
				time,
				id,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
			),
		)
	}

	pub fn frame(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_touch:event:frame
		display.send(this, 3, ())
	}

	pub fn cancel(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_touch:event:cancel
		display.send(this, 4, ())
	}
}

impl wl::SeatBound for Touch {
	fn seat(&self) -> SeatKey {
		self.seat
	}
}

impl wl::Object for Touch {
	const INTERFACE: &'static str = "wl_touch";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_touch:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Touch"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}
