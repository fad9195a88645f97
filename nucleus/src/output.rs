//! Output state and its broadcast to `wl_output`, `zwlr_output_head_v1` and
//! `org_kde_kwin_dpms` resources.
//!
//! The compositor edits the `pending` state of an output and then calls
//! [`broadcast_output`]. Each protocol view only receives the field groups that differ
//! from the last `published` state, terminated by its own done event.

use log::debug;

use crate::{wl, Display, Rect, Result, Size};

pub type OutputKey = crate::Key<Output>;

/// https://wayland.app/protocols/wayland#wl_output:enum:subpixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subpixel {
	#[default]
	Unknown = 0,
	None = 1,
	HorizontalRgb = 2,
	HorizontalBgr = 3,
	VerticalRgb = 4,
	VerticalBgr = 5,
}

/// https://wayland.app/protocols/wayland#wl_output:enum:transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
	#[default]
	Normal = 0,
	Rotated90 = 1,
	Rotated180 = 2,
	Rotated270 = 3,
	Flipped = 4,
	Flipped90 = 5,
	Flipped180 = 6,
	Flipped270 = 7,
}

/// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:enum:mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DpmsMode {
	#[default]
	On = 0,
	Standby = 1,
	Suspend = 2,
	Off = 3,
}

impl DpmsMode {
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::On),
			1 => Some(Self::Standby),
			2 => Some(Self::Suspend),
			3 => Some(Self::Off),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
	pub size: Size,
	/// In mHz.
	pub refresh_rate: i32,
	pub preferred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
	pub name: String,
	pub description: String,
	pub make: String,
	pub model: String,
	pub serial_number: String,
	/// In millimeters.
	pub physical_size: Size,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputState {
	pub enabled: bool,
	/// Logical position and size in the global compositor space.
	pub geometry: Rect,
	pub mode: Mode,
	pub subpixel: Subpixel,
	pub transform: Transform,
	/// Explicit client scale. `None` derives it from mode and geometry size.
	pub scale: Option<i32>,
	pub meta: Metadata,
}

impl OutputState {
	/// Scale clients should render at.
	pub fn client_scale(&self) -> i32 {
		self.scale
			.unwrap_or_else(|| estimate_scale(self).ceil() as i32)
			.max(1)
	}
}

/// Ratio between mode size and logical size, averaged over both axes.
pub fn estimate_scale(state: &OutputState) -> f64 {
	let mode = state.mode.size;
	let logical = state.geometry.size;

	if mode.is_empty() || logical.is_empty() {
		return 1.0;
	}

	let x = mode.0 as f64 / logical.0 as f64;
	let y = mode.1 as f64 / logical.1 as f64;

	(x + y) / 2.0
}

pub struct Output {
	pub modes: Vec<Mode>,
	/// State clients have seen.
	pub published: OutputState,
	pub pending: OutputState,
	pub dpms_supported: bool,
	pub dpms_mode: DpmsMode,
	pub global: u32,
	/// Scale last sent to the heads.
	pub(crate) head_scale: f64,
}

/// State of the `zwlr_output_manager_v1` side shared by all outputs.
#[derive(Default)]
pub struct Management {
	pub(crate) changed: bool,
}

pub fn output_ref(display: &Display, output: OutputKey) -> Result<&Output> {
	display
		.outputs
		.get(output)
		.ok_or_else(|| color_eyre::eyre::eyre!("output {output:?} does not exist"))
}

pub fn output_mut(display: &mut Display, output: OutputKey) -> Result<&mut Output> {
	display
		.outputs
		.get_mut(output)
		.ok_or_else(|| color_eyre::eyre::eyre!("output {output:?} does not exist"))
}

/// State that is sent on the next [`broadcast_output`].
pub fn pending_mut(display: &mut Display, output: OutputKey) -> Result<&mut OutputState> {
	Ok(&mut output_mut(display, output)?.pending)
}

pub fn create_output(display: &mut Display, state: OutputState, modes: Vec<Mode>) -> Result<OutputKey> {
	let mut modes = modes;

	if !modes.contains(&state.mode) {
		modes.push(state.mode);
	}

	let name = state.meta.name.clone();
	let head_scale = estimate_scale(&state);

	let key = display.outputs.insert(Output {
		modes,
		published: state.clone(),
		pending: state,
		dpms_supported: false,
		dpms_mode: DpmsMode::On,
		global: 0,
		head_scale,
	});

	let global = display.add_global(wl::Output::new(key))?;
	output_mut(display, key)?.global = global;

	for manager in display.all_objects::<wl::ZwlrOutputManagerV1>() {
		if display.is_inert(manager) {
			continue;
		}

		wl::ZwlrOutputManagerV1::add_head(display, manager, key)?;
	}

	display.output_management.changed = true;
	send_manager_done(display)?;

	debug!("output '{name}' created");

	Ok(key)
}

pub fn remove_output(display: &mut Display, output: OutputKey) -> Result<()> {
	let global = output_ref(display, output)?.global;
	display.remove_global(global)?;

	for head in heads(display, output) {
		wl::ZwlrOutputHeadV1::finished(display, head)?;
	}

	for dpms in dpms_objects(display, output) {
		display.set_inert(dpms);
	}

	display.outputs.remove(output);
	display.output_management.changed = true;
	send_manager_done(display)?;

	display.flush_all()
}

/// Sends what changed between published and pending state to every view of the output,
/// then publishes the pending state.
pub fn broadcast_output(display: &mut Display, output: OutputKey) -> Result<()> {
	let x = output_ref(display, output)?;
	let (published, pending) = (x.published.clone(), x.pending.clone());

	let objects = output_objects(display, output);
	let mut changed = false;

	for object in &objects {
		changed |= wl::Output::broadcast(display, *object, &published, &pending)?;
	}

	if changed {
		for object in &objects {
			wl::Output::done(display, *object)?;
		}
	}

	broadcast_heads(display, output, &published, &pending)?;
	send_manager_done(display)?;

	output_mut(display, output)?.published = pending;

	display.flush_all()
}

fn broadcast_heads(
	display: &mut Display,
	output: OutputKey,
	published: &OutputState,
	pending: &OutputState,
) -> Result<()> {
	let heads = heads(display, output);

	if published.enabled != pending.enabled {
		for head in &heads {
			wl::ZwlrOutputHeadV1::enabled(display, *head, pending.enabled)?;
		}

		display.output_management.changed = true;
	}

	if !pending.enabled {
		return Ok(());
	}

	// a head that was just enabled gets everything again
	let force = !published.enabled;

	if force || published.mode != pending.mode {
		for head in &heads {
			wl::ZwlrOutputHeadV1::current_mode(display, *head, pending.mode)?;
		}

		display.output_management.changed = true;
	}

	if force || published.geometry.position != pending.geometry.position {
		for head in &heads {
			wl::ZwlrOutputHeadV1::position(display, *head, pending.geometry.position)?;
		}

		display.output_management.changed = true;
	}

	if force || published.transform != pending.transform {
		for head in &heads {
			wl::ZwlrOutputHeadV1::transform(display, *head, pending.transform)?;
		}

		display.output_management.changed = true;
	}

	let scale = estimate_scale(pending);

	if force || scale != output_ref(display, output)?.head_scale {
		for head in &heads {
			wl::ZwlrOutputHeadV1::scale(display, *head, scale)?;
		}

		output_mut(display, output)?.head_scale = scale;
		display.output_management.changed = true;
	}

	Ok(())
}

fn send_manager_done(display: &mut Display) -> Result<()> {
	if !std::mem::take(&mut display.output_management.changed) {
		return Ok(());
	}

	let serial = display.next_serial();

	for manager in display.all_objects::<wl::ZwlrOutputManagerV1>() {
		wl::ZwlrOutputManagerV1::done(display, manager, serial)?;
	}

	Ok(())
}

pub fn set_dpms_supported(display: &mut Display, output: OutputKey, supported: bool) -> Result<()> {
	let x = output_mut(display, output)?;

	if x.dpms_supported == supported {
		return Ok(());
	}

	x.dpms_supported = supported;

	for dpms in dpms_objects(display, output) {
		wl::OrgKdeKwinDpms::supported(display, dpms, supported)?;
		wl::OrgKdeKwinDpms::done(display, dpms)?;
	}

	display.flush_all()
}

/// Reports the mode the output actually is in. Requests from clients arrive as
/// [`crate::Change::DpmsModeRequested`].
pub fn set_dpms_mode(display: &mut Display, output: OutputKey, mode: DpmsMode) -> Result<()> {
	let x = output_mut(display, output)?;

	if x.dpms_mode == mode {
		return Ok(());
	}

	x.dpms_mode = mode;

	for dpms in dpms_objects(display, output) {
		wl::OrgKdeKwinDpms::mode(display, dpms, mode)?;
		wl::OrgKdeKwinDpms::done(display, dpms)?;
	}

	display.flush_all()
}

/// `wl_output` resources of the output.
pub fn output_objects(display: &Display, output: OutputKey) -> Vec<wl::Handle<wl::Output>> {
	display
		.all_objects::<wl::Output>()
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.output == output))
		.collect()
}

pub(crate) fn heads(display: &Display, output: OutputKey) -> Vec<wl::Handle<wl::ZwlrOutputHeadV1>> {
	display
		.all_objects::<wl::ZwlrOutputHeadV1>()
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.output == output))
		.collect()
}

fn dpms_objects(display: &Display, output: OutputKey) -> Vec<wl::Handle<wl::OrgKdeKwinDpms>> {
	display
		.all_objects::<wl::OrgKdeKwinDpms>()
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.output == output))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::{estimate_scale, Mode, OutputState};
	use crate::{Rect, Size};

	fn state(mode: Size, logical: Size) -> OutputState {
		OutputState {
			enabled: true,
			geometry: Rect::new(0, 0, logical.0, logical.1),
			mode: Mode {
				size: mode,
				refresh_rate: 60000,
				preferred: true,
			},
			..Default::default()
		}
	}

	#[test]
	fn scale_is_mode_over_logical_size() {
		assert_eq!(estimate_scale(&state(Size(3840, 2160), Size(1920, 1080))), 2.0);
		assert_eq!(estimate_scale(&state(Size(2560, 1440), Size(2560, 1440))), 1.0);
	}

	#[test]
	fn client_scale_rounds_up_unless_explicit() {
		let mut x = state(Size(2880, 1620), Size(1920, 1080));
		assert_eq!(estimate_scale(&x), 1.5);
		assert_eq!(x.client_scale(), 2);

		x.scale = Some(1);
		assert_eq!(x.client_scale(), 1);
	}

	#[test]
	fn empty_geometry_does_not_divide_by_zero() {
		assert_eq!(estimate_scale(&state(Size(1920, 1080), Size(0, 0))), 1.0);
		assert_eq!(state(Size(0, 0), Size(0, 0)).client_scale(), 1);
	}
}
