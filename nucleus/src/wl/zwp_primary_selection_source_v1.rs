use crate::{wl, Result};

#[derive(Default)]
pub struct ZwpPrimarySelectionSourceV1 {
	pub mime_types: Vec<String>,
}

impl ZwpPrimarySelectionSourceV1 {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn send_data(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		mime_type: &str,
		fd: std::os::fd::OwnedFd,
	) -> Result<()> {
		// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_source_v1:event:send
		display.send_with_fd(this, 0, mime_type, fd)
	}

	pub fn cancelled(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_source_v1:event:cancelled
		display.send(this, 1, ())
	}
}

impl wl::Object for ZwpPrimarySelectionSourceV1 {
	const INTERFACE: &'static str = "zwp_primary_selection_source_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_source_v1:request:offer
				let mime_type: String = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.mime_types.push(mime_type);
			}
			1 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_source_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPrimarySelectionSourceV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
