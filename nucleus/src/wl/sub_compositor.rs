use crate::{wl, ProtocolError, Result};

// https://wayland.app/protocols/wayland#wl_subcompositor:enum:error
pub const BAD_SURFACE: u32 = 0;
pub const BAD_PARENT: u32 = 1;

#[derive(Clone)]
pub struct SubCompositor;

impl wl::Object for SubCompositor {
	const INTERFACE: &'static str = "wl_subcompositor";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_subcompositor:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_subcompositor:request:get_subsurface
				let (id, surface, parent): (wl::Id<wl::SubSurface>, u32, u32) =
					wlm::decode::from_slice(params)?;

				let surface = display.lookup::<wl::Surface>(this.client(), surface)?;
				let parent = display.lookup::<wl::Surface>(this.client(), parent)?;

				if display.object(surface)?.subsurface.is_some() {
					return Err(ProtocolError::new(
						this,
						BAD_SURFACE,
						"surface already has a sub-surface role",
					)
					.into());
				}

				if surface == parent || is_ancestor(display, surface, parent) {
					return Err(ProtocolError::new(
						this,
						BAD_PARENT,
						"parent would create a sub-surface loop",
					)
					.into());
				}

				let subsurface = display.create(
					this.client(),
					id,
					display.version(this),
					wl::SubSurface::new(surface, parent),
				)?;

				display.object_mut(surface)?.subsurface = Some(subsurface);
				display.object_mut(surface)?.parent = Some(parent);

				let parent = display.object_mut(parent)?;
				parent.stack.push(wl::StackEntry::Child(surface));

				if let Some(x) = &mut parent.pending.stack {
					x.push(wl::StackEntry::Child(surface));
				}
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in SubCompositor"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}

/// Whether `surface` is `other` or one of its parents.
fn is_ancestor(
	display: &crate::Display,
	surface: wl::Handle<wl::Surface>,
	other: wl::Handle<wl::Surface>,
) -> bool {
	let mut current = Some(other);

	while let Some(x) = current {
		if x == surface {
			return true;
		}

		current = display.get(x).and_then(|x| x.parent);
	}

	false
}

impl wl::Global for SubCompositor {
	fn get_name(&self) -> &'static str {
		"wl_subcompositor"
	}

	fn get_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
