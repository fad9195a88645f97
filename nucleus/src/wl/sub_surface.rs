use crate::{wl, Point, ProtocolError, Result};

pub struct SubSurface {
	pub surface: wl::Handle<wl::Surface>,
	pub parent: wl::Handle<wl::Surface>,
	/// Offset relative to the parent.
	pub position: Point,
	pub(crate) pending_position: Option<Point>,
	pub sync: bool,
}

impl SubSurface {
	pub fn new(surface: wl::Handle<wl::Surface>, parent: wl::Handle<wl::Surface>) -> Self {
		Self {
			surface,
			parent,
			position: Point(0, 0),
			pending_position: None,
			sync: true,
		}
	}

	fn restack(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		sibling: u32,
		above: bool,
	) -> Result<()> {
		let sibling = display.lookup::<wl::Surface>(this.client(), sibling)?;
		let (surface, parent) = {
			let x = display.object(this)?;
			(x.surface, x.parent)
		};

		let target = if sibling == parent {
			wl::StackEntry::Parent
		} else {
			wl::StackEntry::Child(sibling)
		};

		let parent = display.object_mut(parent)?;

		let mut stack = parent
			.pending
			.stack
			.clone()
			.unwrap_or_else(|| parent.stack.clone());

		stack.retain(|x| *x != wl::StackEntry::Child(surface));

		let Some(index) = stack.iter().position(|x| *x == target) else {
			return Err(ProtocolError::new(
				this,
				wl::BAD_SURFACE,
				"sibling is neither the parent nor a sibling",
			)
			.into());
		};

		let index = if above { index + 1 } else { index };
		stack.insert(index, wl::StackEntry::Child(surface));

		parent.pending.stack = Some(stack);

		Ok(())
	}
}

impl wl::Object for SubSurface {
	const INTERFACE: &'static str = "wl_subsurface";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:set_position
				let (x, y): (i32, i32) = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.pending_position = Some(Point(x, y));
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:place_above
				let sibling: u32 = wlm::decode::from_slice(params)?;
				Self::restack(display, this, sibling, true)?;
			}
			3 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:place_below
				let sibling: u32 = wlm::decode::from_slice(params)?;
				Self::restack(display, this, sibling, false)?;
			}
			4 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:set_sync
				display.object_mut(this)?.sync = true;
			}
			5 => {
				// https://wayland.app/protocols/wayland#wl_subsurface:request:set_desync
				display.object_mut(this)?.sync = false;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in SubSurface"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}

	fn destroyed(self, display: &mut crate::Display, _this: wl::Handle<Self>) -> Result<()> {
		if let Some(x) = display.get_mut(self.parent) {
			x.remove_child(self.surface);
		}

		if let Some(x) = display.get_mut(self.surface) {
			x.subsurface = None;
			x.parent = None;
		}

		Ok(())
	}
}
