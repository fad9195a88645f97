use crate::{output::OutputKey, wl, Result};

#[derive(Clone)]
pub struct ZwlrOutputManagerV1;

impl ZwlrOutputManagerV1 {
	pub fn head(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		head: wl::Handle<wl::ZwlrOutputHeadV1>,
	) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_manager_v1:event:head
		display.send(this, 0, head)
	}

	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>, serial: u32) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_manager_v1:event:done
		display.send(this, 1, serial)
	}

	pub fn finished(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_manager_v1:event:finished
		display.send(this, 2, ())
	}

	/// Announces a head for `output` with its static data, modes and mutable state.
	pub(crate) fn add_head(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		output: OutputKey,
	) -> Result<()> {
		let version = display.version(this);
		let head = display.create_server(
			this.client(),
			version,
			wl::ZwlrOutputHeadV1::new(output),
		)?;

		Self::head(display, this, head)?;
		wl::ZwlrOutputHeadV1::send_state(display, head)
	}
}

impl wl::Object for ZwlrOutputManagerV1 {
	const INTERFACE: &'static str = "zwlr_output_manager_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_manager_v1:request:create_configuration
				let (id, _serial): (wl::Id<wl::ZwlrOutputConfigurationV1>, u32) =
					wlm::decode::from_slice(params)?;

				let version = display.version(this);
				let configuration =
					display.create(this.client(), id, version, wl::ZwlrOutputConfigurationV1)?;

				// configuring outputs is up to the compositor
				wl::ZwlrOutputConfigurationV1::cancelled(display, configuration)?;
				display.set_inert(configuration);
			}
			1 => {
				// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_manager_v1:request:stop
				Self::finished(display, this)?;
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwlrOutputManagerV1"),
		}

		Ok(())
	}
}

impl wl::Global for ZwlrOutputManagerV1 {
	fn get_name(&self) -> &'static str {
		"zwlr_output_manager_v1"
	}

	fn get_version(&self) -> u32 {
		2
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}

	fn bind(&self, display: &mut crate::Display, object: wl::ObjectRef) -> Result<()> {
		let this = wl::Handle::<Self>::new(object);

		for output in display.outputs.keys() {
			Self::add_head(display, this, output)?;
		}

		let serial = display.next_serial();
		Self::done(display, this, serial)
	}
}
