use crate::{wl, PointF, Result};

pub struct ZwpRelativePointerV1 {
	pub pointer: wl::Handle<wl::Pointer>,
}

impl ZwpRelativePointerV1 {
	pub fn relative_motion(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		microseconds: u64,
		delta: PointF,
		delta_unaccelerated: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/relative-pointer-unstable-v1#zwp_relative_pointer_v1:event:relative_motion
		display.send(
			this,
			0,
			(
				(microseconds >> 32) as u32,
				microseconds as u32,
				wlm::Fixed::from_f64(delta.0),
				wlm::Fixed::from_f64(delta.1),
				wlm::Fixed::from_f64(delta_unaccelerated.0),
				wlm::Fixed::from_f64(delta_unaccelerated.1),
			),
		)
	}
}

impl wl::Object for ZwpRelativePointerV1 {
	const INTERFACE: &'static str = "zwp_relative_pointer_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/relative-pointer-unstable-v1#zwp_relative_pointer_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpRelativePointerV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}
