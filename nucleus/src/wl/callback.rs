use crate::{wl, Result};

pub struct Callback;

impl Callback {
	/// Fires the callback. The object is gone afterwards.
	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>, data: u32) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_callback:event:done
		display.send(this, 0, data)?;
		display.destroy(this)
	}
}

impl wl::Object for Callback {
	const INTERFACE: &'static str = "wl_callback";

	fn handle(
		_display: &mut crate::Display,
		_this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		color_eyre::eyre::bail!("unknown op '{op}' in Callback");
	}
}
