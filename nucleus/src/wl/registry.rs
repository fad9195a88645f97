use crate::{wl, Result};

pub struct Registry;

impl Registry {
	pub(crate) fn global(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		name: u32,
		interface: &str,
		version: u32,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_registry:event:global
		display.send(this, 0, (name, interface, version))
	}

	pub(crate) fn global_remove(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		name: u32,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_registry:event:global_remove
		display.send(this, 1, name)
	}
}

impl wl::Object for Registry {
	const INTERFACE: &'static str = "wl_registry";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_registry:request:bind
				let (name, interface, version, id): (u32, &str, u32, u32) =
					wlm::decode::from_slice(params)?;

				display.bind_global(this, name, interface, version, id)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Registry"),
		}

		Ok(())
	}
}
