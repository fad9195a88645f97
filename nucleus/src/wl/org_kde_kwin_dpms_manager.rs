use crate::{output, wl, Result};

#[derive(Clone)]
pub struct OrgKdeKwinDpmsManager;

impl wl::Object for OrgKdeKwinDpmsManager {
	const INTERFACE: &'static str = "org_kde_kwin_dpms_manager";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/kde-dpms#org_kde_kwin_dpms_manager:request:get
				let (id, output): (wl::Id<wl::OrgKdeKwinDpms>, u32) = wlm::decode::from_slice(params)?;

				let output = display.lookup::<wl::Output>(this.client(), output)?;
				let key = display.object(output)?.output;
				let version = display.version(this);

				let dpms = display.create(this.client(), id, version, wl::OrgKdeKwinDpms { output: key })?;

				// the output may already be gone while its wl_output lingers
				if display.is_inert(output) {
					display.set_inert(dpms);
					return Ok(());
				}

				let x = output::output_ref(display, key)?;
				let (supported, mode) = (x.dpms_supported, x.dpms_mode);

				wl::OrgKdeKwinDpms::supported(display, dpms, supported)?;
				wl::OrgKdeKwinDpms::mode(display, dpms, mode)?;
				wl::OrgKdeKwinDpms::done(display, dpms)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in OrgKdeKwinDpmsManager"),
		}

		Ok(())
	}
}

impl wl::Global for OrgKdeKwinDpmsManager {
	fn get_name(&self) -> &'static str {
		"org_kde_kwin_dpms_manager"
	}

	fn get_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
