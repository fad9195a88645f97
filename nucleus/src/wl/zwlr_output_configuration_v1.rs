use crate::{wl, Result};

/// Output configurations are never applied by the library, every one is cancelled
/// right after creation.
pub struct ZwlrOutputConfigurationV1;

impl ZwlrOutputConfigurationV1 {
	pub fn cancelled(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_configuration_v1:event:cancelled
		display.send(this, 2, ())
	}
}

impl wl::Object for ZwlrOutputConfigurationV1 {
	const INTERFACE: &'static str = "zwlr_output_configuration_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			// enable_head, disable_head, apply and test are never reached on a cancelled configuration
			4 => {
				// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_configuration_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwlrOutputConfigurationV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 4
	}
}
