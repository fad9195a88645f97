use crate::{wl, Result};

#[derive(Clone)]
pub struct Compositor;

impl wl::Object for Compositor {
	const INTERFACE: &'static str = "wl_compositor";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_compositor:request:create_surface
				let id: wl::Id<wl::Surface> = wlm::decode::from_slice(params)?;
				display.create(this.client(), id, version, wl::Surface::new())?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_compositor:request:create_region
				let id: wl::Id<wl::Region> = wlm::decode::from_slice(params)?;
				display.create(this.client(), id, version, wl::Region::new())?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Compositor"),
		}

		Ok(())
	}
}

impl wl::Global for Compositor {
	fn get_name(&self) -> &'static str {
		"wl_compositor"
	}

	fn get_version(&self) -> u32 {
		4
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
