use crate::{
	output::{self, OutputKey, OutputState},
	wl, Result,
};

// https://wayland.app/protocols/wayland#wl_output:enum:mode
const MODE_CURRENT: u32 = 1;
const MODE_PREFERRED: u32 = 2;

#[derive(Clone)]
pub struct Output {
	pub output: OutputKey,
}

impl Output {
	pub fn new(output: OutputKey) -> Self {
		Self { output }
	}

	pub fn geometry(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		state: &OutputState,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_output:event:geometry
		display.send(
			this,
			0,
			(
				state.geometry.position.0,
				state.geometry.position.1,
				state.meta.physical_size.0,
				state.meta.physical_size.1,
				state.subpixel as i32,
				state.meta.make.as_str(),
				state.meta.model.as_str(),
				state.transform as i32,
			),
		)
	}

	/// Flags are derived from `current`, the state the mode is announced in.
	pub fn mode(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		mode: &output::Mode,
		current: &OutputState,
	) -> Result<()> {
		let mut flags = 0;

		if *mode == current.mode {
			flags |= MODE_CURRENT;
		}

		if mode.preferred {
			flags |= MODE_PREFERRED;
		}

		// https://wayland.app/protocols/wayland#wl_output:event:mode
		display.send(
			this,
			1,
			(flags, mode.size.0, mode.size.1, mode.refresh_rate),
		)
	}

	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_output:event:done
		display.send_since(this, 2, 2, ())
	}

	pub fn scale(display: &mut crate::Display, this: wl::Handle<Self>, factor: i32) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_output:event:scale
		display.send_since(this, 2, 3, factor)
	}

	/// Sends the groups that differ between the two states. Returns whether anything was
	/// sent.
	pub(crate) fn broadcast(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		published: &OutputState,
		pending: &OutputState,
	) -> Result<bool> {
		let mut changed = false;

		if published.geometry.position != pending.geometry.position
			|| published.meta.physical_size != pending.meta.physical_size
			|| published.subpixel != pending.subpixel
			|| published.meta.make != pending.meta.make
			|| published.meta.model != pending.meta.model
			|| published.transform != pending.transform
		{
			Self::geometry(display, this, pending)?;
			changed = true;
		}

		if published.client_scale() != pending.client_scale() {
			Self::scale(display, this, pending.client_scale())?;
			changed = true;
		}

		if published.mode != pending.mode {
			Self::mode(display, this, &pending.mode, pending)?;
			changed = true;
		}

		Ok(changed)
	}
}

impl wl::Object for Output {
	const INTERFACE: &'static str = "wl_output";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_output:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Output"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}

impl wl::Global for Output {
	fn get_name(&self) -> &'static str {
		"wl_output"
	}

	fn get_version(&self) -> u32 {
		3
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}

	fn bind(&self, display: &mut crate::Display, object: wl::ObjectRef) -> Result<()> {
		let this = wl::Handle::<Self>::new(object);
		let x = output::output_ref(display, self.output)?;
		let (state, modes) = (x.published.clone(), x.modes.clone());

		Self::geometry(display, this, &state)?;

		// the current mode goes last
		for mode in modes.iter().filter(|x| **x != state.mode) {
			Self::mode(display, this, mode, &state)?;
		}

		Self::mode(display, this, &state.mode, &state)?;
		Self::scale(display, this, state.client_scale())?;
		Self::done(display, this)
	}
}
