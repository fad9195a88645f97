use crate::{wl, ClientId, Result};

// https://wayland.app/protocols/wayland#wl_display:enum:error
pub const INVALID_OBJECT: u32 = 0;
pub const INVALID_METHOD: u32 = 1;
pub const NO_MEMORY: u32 = 2;
pub const IMPLEMENTATION: u32 = 3;

pub struct Display;

impl Display {
	pub(crate) fn error(
		display: &mut crate::Display,
		client: ClientId,
		object_id: u32,
		code: u32,
		message: &str,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_display:event:error
		display.queue(
			client,
			crate::DISPLAY_ID,
			0,
			(object_id, code, message),
			Vec::new(),
		)
	}

	pub(crate) fn delete_id(display: &mut crate::Display, client: ClientId, id: u32) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_display:event:delete_id
		display.queue(client, crate::DISPLAY_ID, 1, id, Vec::new())
	}
}

impl wl::Object for Display {
	const INTERFACE: &'static str = "wl_display";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_display:request:sync
				let id: wl::Id<wl::Callback> = wlm::decode::from_slice(params)?;

				let callback = display.create(this.client(), id, 1, wl::Callback)?;
				let serial = display.serial();

				wl::Callback::done(display, callback, serial)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_display:request:get_registry
				let id: wl::Id<wl::Registry> = wlm::decode::from_slice(params)?;

				let registry = display.create(this.client(), id, 1, wl::Registry)?;
				display.announce_globals(registry)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Display"),
		}

		Ok(())
	}
}
