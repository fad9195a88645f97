use crate::{wl, PointF, Result};

pub struct ZwpLockedPointerV1 {
	pub surface: wl::Handle<wl::Surface>,
	pub pointer: wl::Handle<wl::Pointer>,
	/// `None` locks anywhere on the surface.
	pub region: Option<wl::Region>,
	pub cursor_hint: Option<PointF>,
	pub lifetime: wl::Lifetime,
	pub locked: bool,
	/// Set once a oneshot lock was released.
	pub defunct: bool,
	pending_region: Option<Option<wl::Region>>,
	pending_hint: Option<PointF>,
}

impl ZwpLockedPointerV1 {
	pub fn new(
		surface: wl::Handle<wl::Surface>,
		pointer: wl::Handle<wl::Pointer>,
		region: Option<wl::Region>,
		lifetime: wl::Lifetime,
	) -> Self {
		Self {
			surface,
			pointer,
			region,
			cursor_hint: None,
			lifetime,
			locked: false,
			defunct: false,
			pending_region: None,
			pending_hint: None,
		}
	}

	/// Double-buffered state, applied with the surface commit.
	pub(crate) fn apply_pending(&mut self) {
		if let Some(region) = self.pending_region.take() {
			self.region = region;
		}

		if let Some(hint) = self.pending_hint.take() {
			self.cursor_hint = Some(hint);
		}
	}

	pub fn set_active(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		active: bool,
	) -> Result<()> {
		let x = display.object_mut(this)?;

		if x.defunct || x.locked == active {
			return Ok(());
		}

		x.locked = active;

		if active {
			// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_locked_pointer_v1:event:locked
			display.send(this, 0, ())
		} else {
			x.defunct = x.lifetime == wl::Lifetime::Oneshot;

			// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_locked_pointer_v1:event:unlocked
			display.send(this, 1, ())
		}
	}
}

impl wl::Object for ZwpLockedPointerV1 {
	const INTERFACE: &'static str = "zwp_locked_pointer_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_locked_pointer_v1:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_locked_pointer_v1:request:set_cursor_position_hint
				let (x, y): (wlm::Fixed, wlm::Fixed) = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.pending_hint = Some(PointF(x.to_f64(), y.to_f64()));
			}
			2 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_locked_pointer_v1:request:set_region
				let region: u32 = wlm::decode::from_slice(params)?;
				let region = match display.lookup_optional::<wl::Region>(this.client(), region)? {
					Some(x) => Some(display.object(x)?.clone()),
					None => None,
				};

				display.object_mut(this)?.pending_region = Some(region);
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpLockedPointerV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}

	fn destroyed(self, display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		if let Some(x) = display.get_mut(self.surface) {
			if x.locked_pointer == Some(this) {
				x.locked_pointer = None;
			}
		}

		Ok(())
	}
}
