use crate::{wl, Change, Result};

bitflags::bitflags! {
	/// https://wayland.app/protocols/wayland#wl_data_device_manager:enum:dnd_action
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct DndActions: u32 {
		const COPY = 1;
		const MOVE = 2;
		const ASK = 4;
	}
}

#[derive(Clone)]
pub struct DataDeviceManager;

impl wl::Object for DataDeviceManager {
	const INTERFACE: &'static str = "wl_data_device_manager";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_data_device_manager:request:create_data_source
				let id: wl::Id<wl::DataSource> = wlm::decode::from_slice(params)?;
				display.create(this.client(), id, version, wl::DataSource::new(version))?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_data_device_manager:request:get_data_device
				let (id, seat): (wl::Id<wl::DataDevice>, u32) = wlm::decode::from_slice(params)?;

				let seat = display.lookup::<wl::Seat>(this.client(), seat)?;
				let seat = display.object(seat)?.seat;

				let device = display.create(this.client(), id, version, wl::DataDevice::new(seat))?;
				display.push_change(Change::DataDeviceCreated { seat, device });

				crate::seat::selection::device_created(
					display,
					seat,
					device.client(),
					crate::seat::SelectionKind::Clipboard,
				)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in DataDeviceManager"),
		}

		Ok(())
	}
}

impl wl::Global for DataDeviceManager {
	fn get_name(&self) -> &'static str {
		"wl_data_device_manager"
	}

	fn get_version(&self) -> u32 {
		3
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
