use crate::{output, wl, Result};

pub struct ZwlrOutputModeV1 {
	pub mode: output::Mode,
}

impl ZwlrOutputModeV1 {
	pub fn send_data(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		let mode = display.object(this)?.mode;

		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_mode_v1:event:size
		display.send(this, 0, (mode.size.0, mode.size.1))?;

		if mode.refresh_rate > 0 {
			// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_mode_v1:event:refresh
			display.send(this, 1, mode.refresh_rate)?;
		}

		if mode.preferred {
			// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_mode_v1:event:preferred
			display.send(this, 2, ())?;
		}

		Ok(())
	}

	pub fn finished(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_mode_v1:event:finished
		display.send(this, 3, ())
	}
}

impl wl::Object for ZwlrOutputModeV1 {
	const INTERFACE: &'static str = "zwlr_output_mode_v1";

	fn handle(
		_display: &mut crate::Display,
		_this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		color_eyre::eyre::bail!("unknown op '{op}' in ZwlrOutputModeV1")
	}
}
