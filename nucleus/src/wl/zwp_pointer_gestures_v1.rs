use crate::{seat::pointer, wl, Result};

#[derive(Clone)]
pub struct ZwpPointerGesturesV1;

impl wl::Object for ZwpPointerGesturesV1 {
	const INTERFACE: &'static str = "zwp_pointer_gestures_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gestures_v1:request:get_swipe_gesture
				let (id, pointer): (wl::Id<wl::ZwpPointerGestureSwipeV1>, u32) =
					wlm::decode::from_slice(params)?;

				let pointer = display.lookup::<wl::Pointer>(this.client(), pointer)?;
				let gesture = display.create(
					this.client(),
					id,
					version,
					wl::ZwpPointerGestureSwipeV1 { pointer },
				)?;

				pointer::add_listener(display, pointer, pointer::Listener::Swipe(gesture))?;
			}
			1 => {
				// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gestures_v1:request:get_pinch_gesture
				let (id, pointer): (wl::Id<wl::ZwpPointerGesturePinchV1>, u32) =
					wlm::decode::from_slice(params)?;

				let pointer = display.lookup::<wl::Pointer>(this.client(), pointer)?;
				let gesture = display.create(
					this.client(),
					id,
					version,
					wl::ZwpPointerGesturePinchV1 { pointer },
				)?;

				pointer::add_listener(display, pointer, pointer::Listener::Pinch(gesture))?;
			}
			2 => {
				// https://wayland.app/protocols/pointer-gestures-unstable-v1#zwp_pointer_gestures_v1:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPointerGesturesV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 2
	}
}

impl wl::Global for ZwpPointerGesturesV1 {
	fn get_name(&self) -> &'static str {
		"zwp_pointer_gestures_v1"
	}

	fn get_version(&self) -> u32 {
		2
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
