use crate::{seat::SelectionKind, wl, Result};

#[derive(Clone)]
pub struct ZwpPrimarySelectionDeviceManagerV1;

impl wl::Object for ZwpPrimarySelectionDeviceManagerV1 {
	const INTERFACE: &'static str = "zwp_primary_selection_device_manager_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_manager_v1:request:create_source
				let id: wl::Id<wl::ZwpPrimarySelectionSourceV1> = wlm::decode::from_slice(params)?;
				display.create(
					this.client(),
					id,
					version,
					wl::ZwpPrimarySelectionSourceV1::new(),
				)?;
			}
			1 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_manager_v1:request:get_device
				let (id, seat): (wl::Id<wl::ZwpPrimarySelectionDeviceV1>, u32) =
					wlm::decode::from_slice(params)?;

				let seat = display.lookup::<wl::Seat>(this.client(), seat)?;
				let seat = display.object(seat)?.seat;

				display.create(
					this.client(),
					id,
					version,
					wl::ZwpPrimarySelectionDeviceV1::new(seat),
				)?;

				crate::seat::selection::device_created(
					display,
					seat,
					this.client(),
					SelectionKind::Primary,
				)?;
			}
			2 => {
				// https://wayland.app/protocols/primary-selection-unstable-v1#zwp_primary_selection_device_manager_v1:request:destroy
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPrimarySelectionDeviceManagerV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 2
	}
}

impl wl::Global for ZwpPrimarySelectionDeviceManagerV1 {
	fn get_name(&self) -> &'static str {
		"zwp_primary_selection_device_manager_v1"
	}

	fn get_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
