use crate::{wl, Change, Result};

#[derive(Clone)]
pub struct OrgKdePlasmaVirtualDesktopManagement;

impl OrgKdePlasmaVirtualDesktopManagement {
	pub fn desktop_created(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		id: &str,
		position: u32,
	) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:event:desktop_created
		display.send(this, 0, (id, position))
	}

	pub fn desktop_removed(display: &mut crate::Display, this: wl::Handle<Self>, id: &str) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:event:desktop_removed
		display.send(this, 1, id)
	}

	pub fn done(display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:event:done
		display.send(this, 2, ())
	}

	pub fn rows(display: &mut crate::Display, this: wl::Handle<Self>, rows: u32) -> Result<()> {
		// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:event:rows
		display.send_since(this, 2, 3, rows)
	}
}

impl wl::Object for OrgKdePlasmaVirtualDesktopManagement {
	const INTERFACE: &'static str = "org_kde_plasma_virtual_desktop_management";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:request:get_virtual_desktop
				let (id, desktop_id): (wl::Id<wl::OrgKdePlasmaVirtualDesktop>, String) =
					wlm::decode::from_slice(params)?;

				let version = display.version(this);
				let desktop = display.desktops.desktop(&desktop_id).cloned();

				let object = display.create(
					this.client(),
					id,
					version,
					wl::OrgKdePlasmaVirtualDesktop { id: desktop_id },
				)?;

				let Some(desktop) = desktop else {
					display.set_inert(object);
					return Ok(());
				};

				wl::OrgKdePlasmaVirtualDesktop::desktop_id(display, object, &desktop.id)?;
				wl::OrgKdePlasmaVirtualDesktop::name(display, object, &desktop.name)?;

				if desktop.active {
					wl::OrgKdePlasmaVirtualDesktop::activated(display, object)?;
				}

				wl::OrgKdePlasmaVirtualDesktop::done(display, object)?;
			}
			1 => {
				// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:request:request_create_virtual_desktop
				let (name, position): (String, u32) = wlm::decode::from_slice(params)?;
				let position = display.desktops.normalize_position(position);

				display.push_change(Change::DesktopCreateRequested { name, position });
			}
			2 => {
				// https://wayland.app/protocols/kde-plasma-virtual-desktop#org_kde_plasma_virtual_desktop_management:request:request_remove_virtual_desktop
				let id: String = wlm::decode::from_slice(params)?;
				display.push_change(Change::DesktopRemoveRequested { id });
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in OrgKdePlasmaVirtualDesktopManagement"),
		}

		Ok(())
	}
}

impl wl::Global for OrgKdePlasmaVirtualDesktopManagement {
	fn get_name(&self) -> &'static str {
		"org_kde_plasma_virtual_desktop_management"
	}

	fn get_version(&self) -> u32 {
		2
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}

	fn bind(&self, display: &mut crate::Display, object: wl::ObjectRef) -> Result<()> {
		let this = wl::Handle::<Self>::new(object);

		let ids = display
			.desktops
			.desktops()
			.iter()
			.map(|x| x.id.clone())
			.collect::<Vec<_>>();

		for (position, id) in ids.iter().enumerate() {
			Self::desktop_created(display, this, id, position as u32)?;
		}

		let rows = display.desktops.rows();
		Self::rows(display, this, rows)?;
		Self::done(display, this)
	}
}
