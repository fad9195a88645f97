use crate::{wl, Result};

pub struct ZwpConfinedPointerV1 {
	pub surface: wl::Handle<wl::Surface>,
	pub pointer: wl::Handle<wl::Pointer>,
	/// `None` confines to the whole surface.
	pub region: Option<wl::Region>,
	pub lifetime: wl::Lifetime,
	pub confined: bool,
	pub defunct: bool,
	pending_region: Option<Option<wl::Region>>,
}

impl ZwpConfinedPointerV1 {
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
			lifetime,
			confined: false,
			defunct: false,
			pending_region: None,
		}
	}

	pub(crate) fn apply_pending(&mut self) {
		if let Some(region) = self.pending_region.take() {
			self.region = region;
		}
	}

	pub fn set_active(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		active: bool,
	) -> Result<()> {
		let x = display.object_mut(this)?;

		if x.defunct || x.confined == active {
			return Ok(());
		}

		x.confined = active;

		if !active {
			x.defunct = x.lifetime == wl::Lifetime::Oneshot;
		}

		// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_confined_pointer_v1:event:confined
		// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_confined_pointer_v1:event:unconfined
		display.send(this, if active { 0 } else { 1 }, ())
	}
}

impl wl::Object for ZwpConfinedPointerV1 {
	const INTERFACE: &'static str = "zwp_confined_pointer_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_confined_pointer_v1:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_confined_pointer_v1:request:set_region
				let region: u32 = wlm::decode::from_slice(params)?;
				let region = display
					.lookup_optional::<wl::Region>(this.client(), region)?
					.and_then(|x| display.get(x).cloned());

				display.object_mut(this)?.pending_region = Some(region);
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpConfinedPointerV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}

	fn destroyed(self, display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		if let Some(x) = display.get_mut(self.surface) {
			if x.confined_pointer == Some(this) {
				x.confined_pointer = None;
			}
		}

		Ok(())
	}
}
