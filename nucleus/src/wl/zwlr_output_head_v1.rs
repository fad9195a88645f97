use crate::{
	output::{self, OutputKey},
	wl, Point, Result,
};

pub struct ZwlrOutputHeadV1 {
	pub output: OutputKey,
	pub modes: Vec<wl::Handle<wl::ZwlrOutputModeV1>>,
}

impl ZwlrOutputHeadV1 {
	pub fn new(output: OutputKey) -> Self {
		Self {
			output,
			modes: Vec::new(),
		}
	}

	pub fn enabled(display: &mut crate::Display, this: wl::Handle<Self>, enabled: bool) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:enabled
		display.send(this, 4, enabled as i32)
	}

	/// Points the head at its mode object matching `mode`.
	pub fn current_mode(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		mode: output::Mode,
	) -> Result<()> {
		let object = display
			.object(this)?
			.modes
			.iter()
			.copied()
			.find(|x| display.get(*x).is_some_and(|x| x.mode == mode));

		let Some(object) = object else {
			log::warn!("{this:?}: current mode {mode:?} was never announced");
			return Ok(());
		};

		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:current_mode
		display.send(this, 5, object)
	}

	pub fn position(display: &mut crate::Display, this: wl::Handle<Self>, position: Point) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:position
		display.send(this, 6, (position.0, position.1))
	}

	pub fn transform(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		transform: output::Transform,
	) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:transform
		display.send(this, 7, transform as i32)
	}

	pub fn scale(display: &mut crate::Display, this: wl::Handle<Self>, scale: f64) -> Result<()> {
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:scale
		display.send(this, 8, wlm::Fixed::from_f64(scale))
	}

	/// The output is gone. The head and its modes are destroyed right after.
	pub fn finished(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		let modes = display.object(this)?.modes.clone();

		for mode in modes {
			wl::ZwlrOutputModeV1::finished(display, mode)?;
			display.destroy(mode)?;
		}

		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:finished
		display.send(this, 9, ())?;
		display.destroy(this)
	}

	/// Full state for a new head. Uses the pending state, a broadcast may be on its way.
	pub(crate) fn send_state(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		let key = display.object(this)?.output;
		let x = output::output_ref(display, key)?;
		let (state, modes) = (x.pending.clone(), x.modes.clone());
		let meta = &state.meta;

		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:name
		display.send(this, 0, meta.name.as_str())?;
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:description
		display.send(this, 1, meta.description.as_str())?;

		if !meta.physical_size.is_empty() {
			// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:physical_size
			display.send(this, 2, (meta.physical_size.0, meta.physical_size.1))?;
		}

		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:make
		display.send_since(this, 2, 10, meta.make.as_str())?;
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:model
		display.send_since(this, 2, 11, meta.model.as_str())?;
		// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:serial_number
		display.send_since(this, 2, 12, meta.serial_number.as_str())?;

		let version = display.version(this);

		for mode in modes {
			let object = display.create_server(this.client(), version, wl::ZwlrOutputModeV1 { mode })?;

			// https://wayland.app/protocols/wlr-output-management-unstable-v1#zwlr_output_head_v1:event:mode
			display.send(this, 3, object)?;
			wl::ZwlrOutputModeV1::send_data(display, object)?;

			display.object_mut(this)?.modes.push(object);
		}

		Self::enabled(display, this, state.enabled)?;

		if !state.enabled {
			return Ok(());
		}

		Self::current_mode(display, this, state.mode)?;
		Self::position(display, this, state.geometry.position)?;
		Self::transform(display, this, state.transform)?;
		Self::scale(display, this, output::estimate_scale(&state))
	}
}

impl wl::Object for ZwlrOutputHeadV1 {
	const INTERFACE: &'static str = "zwlr_output_head_v1";

	fn handle(
		_display: &mut crate::Display,
		_this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		color_eyre::eyre::bail!("unknown op '{op}' in ZwlrOutputHeadV1")
	}
}
