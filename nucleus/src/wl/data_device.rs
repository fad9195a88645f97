use crate::{
	seat::{self, SeatKey, SelectionKind, Source},
	signal, wl, PointF, ProtocolError, Result,
};

/// Per-device state of the drag target side.
#[derive(Debug, Default)]
pub(crate) struct DeviceDrag {
	pub surface: Option<wl::Handle<wl::Surface>>,
	/// Serial of the implicit grab the drag started from.
	pub serial: u32,
	pub offer: Option<wl::Handle<wl::DataOffer>>,
	pub destroy_connection: Option<signal::ConnectionId>,
	pub position_connection: Option<signal::ConnectionId>,
	pub source_action_connection: Option<signal::ConnectionId>,
	pub target_action_connection: Option<signal::ConnectionId>,
}

pub struct DataDevice {
	pub seat: SeatKey,
	pub drag_source: Option<wl::Handle<wl::DataSource>>,
	pub icon: Option<wl::Handle<wl::Surface>>,
	/// Remote surface for nested setups, replaces the origin.
	pub proxy_remote: Option<wl::Handle<wl::Surface>>,
	pub(crate) surface: Option<wl::Handle<wl::Surface>>,
	pub(crate) drag: DeviceDrag,
	pub(crate) source_connection: Option<signal::ConnectionId>,
}

impl DataDevice {
	pub fn new(seat: SeatKey) -> Self {
		Self {
			seat,
			drag_source: None,
			icon: None,
			proxy_remote: None,
			surface: None,
			drag: DeviceDrag::default(),
			source_connection: None,
		}
	}

	/// Surface the drag started from, or its proxy remote.
	pub fn origin(&self) -> Option<wl::Handle<wl::Surface>> {
		self.proxy_remote.or(self.surface)
	}

	pub fn drag_implicit_grab_serial(&self) -> u32 {
		self.drag.serial
	}

	pub fn data_offer(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		offer: wl::Handle<wl::DataOffer>,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:data_offer
		display.send(this, 0, offer)
	}

	pub fn enter(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		serial: u32,
		surface: wl::Handle<wl::Surface>,
		position: PointF,
		offer: Option<wl::Handle<wl::DataOffer>>,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:enter
		display.send(
			this,
			1,
			(
				serial,
				surface,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
				offer,
			),
		)
	}

	pub fn leave(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:leave
		display.send(this, 2, ())
	}

	pub fn motion(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		time: u32,
		position: PointF,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:motion
		display.send(
			this,
			3,
			(
				time,
				wlm::Fixed::from_f64(position.0),
				wlm::Fixed::from_f64(position.1),
			),
		)
	}

	pub fn drop(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:drop
		display.send(this, 4, ())
	}

	pub fn selection(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		offer: Option<wl::Handle<wl::DataOffer>>,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_device:event:selection
		display.send(this, 5, offer)
	}

	/// Creates an offer for `source` on the device's client and announces it.
	pub(crate) fn create_offer(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		source: Source,
	) -> Result<wl::Handle<wl::DataOffer>> {
		let version = display.version(this);
		let offer = display.create_server(this.client(), version, wl::DataOffer::new(source))?;

		Self::data_offer(display, this, offer)?;
		wl::DataOffer::send_all_offers(display, offer)?;

		Ok(offer)
	}
}

impl wl::SeatBound for DataDevice {
	fn seat(&self) -> SeatKey {
		self.seat
	}
}

impl wl::Object for DataDevice {
	const INTERFACE: &'static str = "wl_data_device";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_data_device:request:start_drag
				let (source, origin, icon, serial): (u32, u32, u32, u32) =
					wlm::decode::from_slice(params)?;

				let source = display.lookup_optional::<wl::DataSource>(this.client(), source)?;
				let origin = display.lookup::<wl::Surface>(this.client(), origin)?;
				let icon = display.lookup_optional::<wl::Surface>(this.client(), icon)?;

				seat::drag::start_drag(display, this, source, origin, icon, serial)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_data_device:request:set_selection
				let (source, _serial): (u32, u32) = wlm::decode::from_slice(params)?;
				let source = display.lookup_optional::<wl::DataSource>(this.client(), source)?;

				if let Some(source) = source {
					let actions = display.object(source)?.actions;

					if !actions.is_empty() && display.version(source) >= 3 {
						return Err(ProtocolError::new(
							source,
							wl::INVALID_SOURCE,
							"data source is for drag and drop",
						)
						.into());
					}
				}

				let seat = display.object(this)?.seat;
				seat::selection::set_seat_selection(
					display,
					seat,
					SelectionKind::Clipboard,
					source.map(Source::Data),
				)?;
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_data_device:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in DataDevice"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 2
	}

	fn destroyed(self, display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		seat::drag::device_destroyed(display, self.seat, this)
	}
}
