use crate::{seat::Source, signal, wl, ProtocolError, Result};

// https://wayland.app/protocols/wayland#wl_data_offer:enum:error
pub const INVALID_FINISH: u32 = 0;
pub const INVALID_ACTION_MASK: u32 = 1;
pub const INVALID_ACTION: u32 = 2;
pub const INVALID_OFFER: u32 = 3;

pub struct DataOffer {
	pub source: Source,
	/// Actions the receiving client accepts.
	pub supported: wl::DndActions,
	pub preferred: wl::DndActions,
	/// Last negotiated action.
	pub action: wl::DndActions,
	pub dropped: bool,
}

impl DataOffer {
	pub fn new(source: Source) -> Self {
		Self {
			source,
			supported: wl::DndActions::empty(),
			preferred: wl::DndActions::empty(),
			action: wl::DndActions::empty(),
			dropped: false,
		}
	}

	pub fn offer(display: &mut crate::Display, this: wl::Handle<Self>, mime_type: &str) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_offer:event:offer
		display.send(this, 0, mime_type)
	}

	pub fn source_actions(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		actions: wl::DndActions,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_offer:event:source_actions
		display.send_since(this, 3, 1, actions.bits())
	}

	pub fn action(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		action: wl::DndActions,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_offer:event:action
		display.send_since(this, 3, 2, action.bits())
	}

	/// Announces every mime type of the source.
	pub(crate) fn send_all_offers(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		let source = display.object(this)?.source;

		for mime_type in source.mime_types(display) {
			Self::offer(display, this, &mime_type)?;
		}

		Ok(())
	}

	fn data_source(&self) -> Result<wl::Handle<wl::DataSource>> {
		match self.source {
			Source::Data(x) => Ok(x),
			Source::Primary(_) => color_eyre::eyre::bail!("offer is not backed by a wl_data_source"),
		}
	}
}

impl wl::Object for DataOffer {
	const INTERFACE: &'static str = "wl_data_offer";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_data_offer:request:accept
				let (_serial, mime_type): (u32, Option<&str>) = wlm::decode::from_slice(params)?;

				let source = display.object(this)?.source;

				if let Source::Data(source) = source {
					wl::DataSource::target(display, source, mime_type)?;
				}
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_data_offer:request:receive
				let mime_type: &str = wlm::decode::from_slice(params)?;
				let fd = display.take_fd(this.client())?;

				let source = display.object(this)?.source;

				// a dead source has nobody to write, the fd is closed on drop
				if display.is_alive(source.object()) {
					source.request_data(display, mime_type, fd)?;
					display.flush(source.client())?;
				}
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_data_offer:request:destroy
				display.destroy(this)?;
			}
			3 => {
				// https://wayland.app/protocols/wayland#wl_data_offer:request:finish
				let x = display.object(this)?;

				if !x.dropped {
					return Err(ProtocolError::new(
						this,
						INVALID_FINISH,
						"finish requested before the drop",
					)
					.into());
				}

				if x.action.is_empty() || x.action == wl::DndActions::ASK {
					return Err(ProtocolError::new(
						this,
						INVALID_FINISH,
						"finish requested without a resolved action",
					)
					.into());
				}

				let source = x.data_source()?;
				wl::DataSource::dnd_finished(display, source)?;
			}
			4 => {
				// https://wayland.app/protocols/wayland#wl_data_offer:request:set_actions
				let (supported, preferred): (u32, u32) = wlm::decode::from_slice(params)?;

				let Some(supported) = wl::DndActions::from_bits(supported) else {
					return Err(ProtocolError::new(
						this,
						INVALID_ACTION_MASK,
						format!("invalid action mask {supported:#x}"),
					)
					.into());
				};

				let preferred = match wl::DndActions::from_bits(preferred) {
					Some(x) if x.bits().count_ones() <= 1 && supported.contains(x) => x,
					_ => {
						return Err(ProtocolError::new(
							this,
							INVALID_ACTION,
							format!("invalid preferred action {preferred:#x}"),
						)
						.into());
					}
				};

				let x = display.object_mut(this)?;

				if x.supported != supported || x.preferred != preferred {
					x.supported = supported;
					x.preferred = preferred;

					display.emit(
						signal::Topic::OfferActionsChanged(this.object),
						signal::Payload::None,
					)?;
				}
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in DataOffer"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 2
	}
}
