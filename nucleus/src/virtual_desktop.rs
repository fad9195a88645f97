//! Ordered set of virtual desktops, mirrored to every
//! `org_kde_plasma_virtual_desktop_management` bind.
//!
//! Clients only ever request changes. Which desktop exists or is active is decided by the
//! compositor through the functions here.

use log::debug;

use crate::{wl, Display, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desktop {
	pub id: String,
	pub name: String,
	pub active: bool,
}

#[derive(Default)]
pub struct VirtualDesktops {
	desktops: Vec<Desktop>,
	rows: u32,
	pub global: Option<u32>,
}

impl VirtualDesktops {
	pub fn desktops(&self) -> &[Desktop] {
		&self.desktops
	}

	pub fn desktop(&self, id: &str) -> Option<&Desktop> {
		self.desktops.iter().find(|x| x.id == id)
	}

	pub fn position(&self, id: &str) -> Option<usize> {
		self.desktops.iter().position(|x| x.id == id)
	}

	pub fn active(&self) -> Option<&Desktop> {
		self.desktops.iter().find(|x| x.active)
	}

	pub fn rows(&self) -> u32 {
		self.rows
	}

	/// Clamps a client supplied position into `[0, len]`.
	pub fn normalize_position(&self, position: u32) -> u32 {
		position.min(self.desktops.len() as u32)
	}
}

pub fn virtual_desktops(display: &Display) -> &VirtualDesktops {
	&display.desktops
}

pub fn create_management(display: &mut Display) -> Result<u32> {
	if let Some(global) = display.desktops.global {
		return Ok(global);
	}

	let global = display.add_global(wl::OrgKdePlasmaVirtualDesktopManagement)?;
	display.desktops.global = Some(global);

	Ok(global)
}

fn managements(display: &Display) -> Vec<wl::Handle<wl::OrgKdePlasmaVirtualDesktopManagement>> {
	display
		.all_objects::<wl::OrgKdePlasmaVirtualDesktopManagement>()
		.into_iter()
		.filter(|x| !display.is_inert(*x))
		.collect()
}

fn desktop_objects(display: &Display, id: &str) -> Vec<wl::Handle<wl::OrgKdePlasmaVirtualDesktop>> {
	display
		.all_objects::<wl::OrgKdePlasmaVirtualDesktop>()
		.into_iter()
		.filter(|x| !display.is_inert(*x) && display.get(*x).is_some_and(|x| x.id == id))
		.collect()
}

/// Inserts a desktop at `position`, or appends it with `None`. An existing id is left
/// where it is. Returns the position of the desktop.
pub fn create_desktop(display: &mut Display, id: &str, position: Option<u32>) -> Result<usize> {
	if let Some(position) = display.desktops.position(id) {
		return Ok(position);
	}

	let position = display
		.desktops
		.normalize_position(position.unwrap_or(u32::MAX)) as usize;

	display.desktops.desktops.insert(
		position,
		Desktop {
			id: id.to_owned(),
			name: String::new(),
			active: false,
		},
	);

	debug!("desktop '{id}' created at {position}");

	for management in managements(display) {
		wl::OrgKdePlasmaVirtualDesktopManagement::desktop_created(
			display,
			management,
			id,
			position as u32,
		)?;
	}

	display.flush_all()?;

	Ok(position)
}

pub fn remove_desktop(display: &mut Display, id: &str) -> Result<()> {
	let Some(position) = display.desktops.position(id) else {
		return Ok(());
	};

	display.desktops.desktops.remove(position);

	debug!("desktop '{id}' removed");

	for object in desktop_objects(display, id) {
		wl::OrgKdePlasmaVirtualDesktop::removed(display, object)?;
		display.set_inert(object);
	}

	for management in managements(display) {
		wl::OrgKdePlasmaVirtualDesktopManagement::desktop_removed(display, management, id)?;
	}

	display.flush_all()
}

pub fn set_desktop_name(display: &mut Display, id: &str, name: &str) -> Result<()> {
	let Some(x) = display.desktops.desktops.iter_mut().find(|x| x.id == id) else {
		color_eyre::eyre::bail!("desktop '{id}' does not exist");
	};

	if x.name == name {
		return Ok(());
	}

	x.name = name.to_owned();

	for object in desktop_objects(display, id) {
		wl::OrgKdePlasmaVirtualDesktop::name(display, object, name)?;
	}

	Ok(())
}

/// Marks the desktop (in)active. Keeping a single active desktop is up to the caller.
pub fn set_desktop_active(display: &mut Display, id: &str, active: bool) -> Result<()> {
	let Some(x) = display.desktops.desktops.iter_mut().find(|x| x.id == id) else {
		color_eyre::eyre::bail!("desktop '{id}' does not exist");
	};

	if x.active == active {
		return Ok(());
	}

	x.active = active;

	for object in desktop_objects(display, id) {
		if active {
			wl::OrgKdePlasmaVirtualDesktop::activated(display, object)?;
		} else {
			wl::OrgKdePlasmaVirtualDesktop::deactivated(display, object)?;
		}
	}

	Ok(())
}

pub fn set_rows(display: &mut Display, rows: u32) -> Result<()> {
	if display.desktops.rows == rows {
		return Ok(());
	}

	display.desktops.rows = rows;

	for management in managements(display) {
		wl::OrgKdePlasmaVirtualDesktopManagement::rows(display, management, rows)?;
	}

	display.flush_all()
}

/// Ends a burst of manager level changes.
pub fn send_done(display: &mut Display) -> Result<()> {
	for management in managements(display) {
		wl::OrgKdePlasmaVirtualDesktopManagement::done(display, management)?;
	}

	display.flush_all()
}

/// Ends a burst of changes to one desktop's properties.
pub fn send_desktop_done(display: &mut Display, id: &str) -> Result<()> {
	for object in desktop_objects(display, id) {
		wl::OrgKdePlasmaVirtualDesktop::done(display, object)?;
	}

	display.flush_all()
}

#[cfg(test)]
mod tests {
	use super::{create_desktop, remove_desktop};
	use crate::Display;

	fn ids(display: &Display) -> Vec<&str> {
		display
			.desktops
			.desktops()
			.iter()
			.map(|x| x.id.as_str())
			.collect()
	}

	#[test]
	fn existing_id_keeps_its_position() {
		let mut display = Display::new();

		assert_eq!(create_desktop(&mut display, "a", None).unwrap(), 0);
		assert_eq!(create_desktop(&mut display, "b", None).unwrap(), 1);
		assert_eq!(create_desktop(&mut display, "a", Some(1)).unwrap(), 0);

		assert_eq!(ids(&display), ["a", "b"]);
	}

	#[test]
	fn positions_are_clamped() {
		let mut display = Display::new();

		create_desktop(&mut display, "a", Some(7)).unwrap();
		create_desktop(&mut display, "b", Some(0)).unwrap();
		create_desktop(&mut display, "c", Some(1)).unwrap();

		assert_eq!(ids(&display), ["b", "c", "a"]);

		remove_desktop(&mut display, "c").unwrap();
		remove_desktop(&mut display, "missing").unwrap();

		assert_eq!(ids(&display), ["b", "a"]);
	}
}
