use crate::{wl, Change, Result};

pub struct OrgKdePlasmaVirtualDesktop {
	pub id: String,
}

impl OrgKdePlasmaVirtualDesktop {
	pub fn desktop_id(display: &mut crate::Display, this: wl::Handle<Self>, id: &str) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:desktop_id
		display.send(this, 0, id)
	}

	pub fn name(display: &mut crate::Display, this: wl::Handle<Self>, name: &str) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:name
		display.send(this, 1, name)
	}

	pub fn activated(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:activated
		display.send(this, 2, ())
	}

	pub fn deactivated(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:deactivated
		display.send(this, 3, ())
	}

	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:done
		display.send(this, 4, ())
	}

	pub fn removed(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:event:removed
		display.send(this, 5, ())
	}
}

impl wl::Object for OrgKdePlasmaVirtualDesktop {
	const INTERFACE: &'static str = "org_kde_plasma_virtual_desktop";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		_params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop:request:request_activate
				let id = display.object(this)?.id.clone();
				display.push_change(Change::DesktopActivateRequested { id });
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in OrgKdePlasmaVirtualDesktop"),
		}

		Ok(())
	}
}
