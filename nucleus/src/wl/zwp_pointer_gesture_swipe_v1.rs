use crate::{wl, PointF, Result};

pub struct ZwpPointerGestureSwipeV1 {
	pub pointer: wl::Handle<wl::Pointer>,
}

impl ZwpPointerGestureSwipeV1 {
	pub fn begin(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		time: u32,
		surface: wl::Handle<wl::Surface>,
		fingers: u32,
	) -> Result<()> {
		// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gesture_swipe_v1:event:begin
		display.send(this, 0, (serial, time, surface, fingers))
	}

	pub fn update(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		time: u32,
		delta: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gesture_swipe_v1:event:update
		display.send(
			this,
			1,
			(
				time,
				wlm::Fixed::from_f64(delta.0),
				wlm::Fixed::from_f64(delta.1),
			),
		)
	}

	pub fn end(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		time: u32,
		cancelled: bool,
	) -> Result<()> {
		// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gesture_swipe_v1:event:end
		display.send(this, 2, (serial, time, cancelled as i32))
	}
}

impl wl::Object for ZwpPointerGestureSwipeV1 {
	const INTERFACE: &'static str = "zwp_pointer_gesture_swipe_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gesture_swipe_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPointerGestureSwipeV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}
