use crate::{seat::Source, wl, Result};

pub struct ZwpPrimarySelectionOfferV1 {
	pub source: Source,
}

impl ZwpPrimarySelectionOfferV1 {
	pub fn new(source: Source) -> Self {
		Self { source }
	}

	pub fn offer(display: &mut crate::Display, this: wl::Handle<Self>, mime_type: &str) -> Result<()> {
		// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_offer_v1:event:offer
		display.send(this, 0, mime_type)
	}
}

impl wl::Object for ZwpPrimarySelectionOfferV1 {
	const INTERFACE: &'static str = "zwp_primary_selection_offer_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_offer_v1:request:receive
				let mime_type: String = wlm::decode::from_slice(params)?;
				let fd = display.take_fd(this.client())?;

				let source = display.object(this)?.source;

				// the source is gone, closing the fd tells the receiver
				if !display.is_alive(source.object()) {
					return Ok(());
				}

				source.request_data(display, &mime_type, fd)?;
				display.flush(source.client())?;
			}
			1 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_offer_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPrimarySelectionOfferV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
