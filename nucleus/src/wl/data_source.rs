use crate::{signal, wl, ProtocolError, Result};

// https://wayland.app/protocols/wayland#wl_data_source:enum:error
pub const SOURCE_INVALID_ACTION_MASK: u32 = 0;
pub const INVALID_SOURCE: u32 = 1;

const ACTION_SINCE: u32 = 3;

pub struct DataSource {
	pub mime_types: Vec<String>,
	pub actions: wl::DndActions,
}

impl DataSource {
	pub fn new(version: u32) -> Self {
		Self {
			mime_types: Vec::new(),
			// older clients cannot announce actions and only ever copy
			actions: if version < ACTION_SINCE {
				wl::DndActions::COPY
			} else {
				wl::DndActions::empty()
			},
		}
	}

	pub fn target(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		mime_type: Option<&str>,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:target
		display.send(this, 0, mime_type)
	}

	pub fn send_data(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		mime_type: &str,
		fd: std::os::fd::OwnedFd,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:send
		display.send_with_fd(this, 1, mime_type, fd)
	}

	pub fn cancelled(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:cancelled
		display.send(this, 2, ())
	}

	pub fn dnd_drop_performed(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:dnd_drop_performed
		display.send_since(this, 3, 3, ())
	}

	pub fn dnd_finished(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:dnd_finished
		display.send_since(this, 3, 4, ())
	}

	pub fn action(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		action: wl::DndActions,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_data_source:event:action
		display.send_since(this, 3, 5, action.bits())
	}
}

impl wl::Object for DataSource {
	const INTERFACE: &'static str = "wl_data_source";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_data_source:request:offer
				let mime_type: String = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.mime_types.push(mime_type);
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_data_source:request:destroy
				display.destroy(this)?;
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_data_source:request:set_actions
				let mask: u32 = wlm::decode::from_slice(params)?;

				let Some(actions) = wl::DndActions::from_bits(mask) else {
					return Err(ProtocolError::new(
						this,
						SOURCE_INVALID_ACTION_MASK,
						format!("invalid action mask {mask:#x}"),
					)
					.into());
				};

				let x = display.object_mut(this)?;

				if x.actions != actions {
					x.actions = actions;

					display.emit(
						signal::Topic::SourceActionsChanged(this.object),
						signal::Payload::None,
					)?;
				}
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in DataSource"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
