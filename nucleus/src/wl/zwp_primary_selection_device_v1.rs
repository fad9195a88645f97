use crate::{
	seat::{self, SeatKey, SelectionKind, Source},
	wl, Result,
};

pub struct ZwpPrimarySelectionDeviceV1 {
	pub seat: SeatKey,
}

impl ZwpPrimarySelectionDeviceV1 {
	pub fn new(seat: SeatKey) -> Self {
		Self { seat }
	}

	pub fn data_offer(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		offer: wl::Handle<wl::ZwpPrimarySelectionOfferV1>,
	) -> Result<()> {
		// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_v1:event:data_offer
		display.send(this, 0, offer)
	}

	pub fn selection(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		offer: Option<wl::Handle<wl::ZwpPrimarySelectionOfferV1>>,
	) -> Result<()> {
		// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_v1:event:selection
		display.send(this, 1, offer)
	}

	pub(crate) fn create_offer(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		source: Source,
	) -> Result<wl::Handle<wl::ZwpPrimarySelectionOfferV1>> {
		let version = display.version(this);
		let offer = display.create_server(
			this.client(),
			version,
			wl::ZwpPrimarySelectionOfferV1::new(source),
		)?;

		Self::data_offer(display, this, offer)?;

		for mime_type in source.mime_types(display) {
			wl::ZwpPrimarySelectionOfferV1::offer(display, offer, &mime_type)?;
		}

		Ok(offer)
	}
}

impl wl::SeatBound for ZwpPrimarySelectionDeviceV1 {
	fn seat(&self) -> SeatKey {
		self.seat
	}
}

impl wl::Object for ZwpPrimarySelectionDeviceV1 {
	const INTERFACE: &'static str = "zwp_primary_selection_device_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_v1:request:set_selection
				let (source, _serial): (u32, u32) = wlm::decode::from_slice(params)?;
				let source = display
					.lookup_optional::<wl::ZwpPrimarySelectionSourceV1>(this.client(), source)?;

				let seat = display.object(this)?.seat;
				seat::selection::set_seat_selection(
					display,
					seat,
					SelectionKind::Primary,
					source.map(Source::Primary),
				)?;
			}
			1 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPrimarySelectionDeviceV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
