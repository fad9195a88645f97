use crate::{seat::pointer, wl, Result};

#[derive(Clone)]
pub struct ZwpRelativePointerManagerV1;

impl wl::Object for ZwpRelativePointerManagerV1 {
	const INTERFACE: &'static str = "zwp_relative_pointer_manager_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/relative-pointer-unstable-v1#zwp_relative_pointer_manager_v1:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/relative-pointer-unstable-v1#zwp_relative_pointer_manager_v1:request:get_relative_pointer
				let (id, pointer): (wl::Id<wl::ZwpRelativePointerV1>, u32) =
					wlm::decode::from_slice(params)?;

				let pointer = display.lookup::<wl::Pointer>(this.client(), pointer)?;
				let version = display.version(this);

				let relative = display.create(
					this.client(),
					id,
					version,
					wl::ZwpRelativePointerV1 { pointer },
				)?;

				pointer::add_listener(display, pointer, pointer::Listener::Relative(relative))?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpRelativePointerManagerV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}

impl wl::Global for ZwpRelativePointerManagerV1 {
	fn get_name(&self) -> &'static str {
		"zwp_relative_pointer_manager_v1"
	}

	fn get_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
