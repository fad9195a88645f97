use log::debug;

use crate::{
	output::{DpmsMode, OutputKey},
	wl, Change, Result,
};

pub struct OrgKdeKwinDpms {
	pub output: OutputKey,
}

impl OrgKdeKwinDpms {
	pub fn supported(display: &mut crate::Display, this: wl::Handle<Self>, supported: bool) -> Result<()> {
		// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:event:supported
		display.send(this, 0, supported as u32)
	}

	pub fn mode(display: &mut crate::Display, this: wl::Handle<Self>, mode: DpmsMode) -> Result<()> {
		// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:event:mode
		display.send(this, 1, mode as u32)
	}

	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:event:done
		display.send(this, 2, ())
	}
}

impl wl::Object for OrgKdeKwinDpms {
	const INTERFACE: &'static str = "org_kde_kwin_dpms";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:request:set
				let mode: u32 = wlm::decode::from_slice(params)?;

				let Some(mode) = DpmsMode::from_u32(mode) else {
					debug!("{this:?}: ignoring unknown dpms mode {mode}");
					return Ok(());
				};

				let output = display.object(this)?.output;
				display.push_change(Change::DpmsModeRequested { output, mode });
			}
			1 => {
				// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in OrgKdeKwinDpms"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 1
	}
}
