use crate::{wl, Result, Size};

// https://wayland.app/protocols/wayland#wl_surface:enum:error
pub const INVALID_SCALE: u32 = 0;
pub const INVALID_TRANSFORM: u32 = 1;

/// Entry of a surface's sub-surface stack, bottom to top. The surface itself is part of
/// the stack so children can be placed below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEntry {
	Parent,
	Child(wl::Handle<Surface>),
}

#[derive(Default)]
pub(crate) struct Pending {
	pub input_region: Option<Option<wl::Region>>,
	pub buffer_scale: Option<i32>,
	pub buffer_transform: Option<i32>,
	pub frame_callbacks: Vec<wl::Handle<wl::Callback>>,
	pub stack: Option<Vec<StackEntry>>,
}

pub struct Surface {
	/// Set by the compositor in place of buffer dimensions. An empty size means unmapped.
	pub size: Size,
	/// `None` means the whole surface accepts input.
	pub input_region: Option<wl::Region>,
	pub buffer_scale: i32,
	pub buffer_transform: i32,
	pub(crate) pending: Pending,
	pub(crate) frame_callbacks: Vec<wl::Handle<wl::Callback>>,
	pub stack: Vec<StackEntry>,
	pub subsurface: Option<wl::Handle<wl::SubSurface>>,
	pub parent: Option<wl::Handle<Surface>>,
	pub data_proxy: Option<wl::Handle<Surface>>,
	pub locked_pointer: Option<wl::Handle<wl::ZwpLockedPointerV1>>,
	pub confined_pointer: Option<wl::Handle<wl::ZwpConfinedPointerV1>>,
}

impl Surface {
	pub fn new() -> Self {
		Self {
			size: Size(0, 0),
			input_region: None,
			buffer_scale: 1,
			buffer_transform: 0,
			pending: Pending::default(),
			frame_callbacks: Vec::new(),
			stack: vec![StackEntry::Parent],
			subsurface: None,
			parent: None,
			data_proxy: None,
			locked_pointer: None,
			confined_pointer: None,
		}
	}

	pub fn children(&self) -> impl DoubleEndedIterator<Item = wl::Handle<Surface>> + '_ {
		self.stack.iter().filter_map(|x| match x {
			StackEntry::Parent => None,
			StackEntry::Child(x) => Some(*x),
		})
	}

	pub fn has_constraint(&self) -> bool {
		self.locked_pointer.is_some() || self.confined_pointer.is_some()
	}

	pub(crate) fn remove_child(&mut self, child: wl::Handle<Surface>) {
		self.stack.retain(|x| *x != StackEntry::Child(child));

		if let Some(x) = &mut self.pending.stack {
			x.retain(|x| *x != StackEntry::Child(child));
		}
	}
}

impl Default for Surface {
	fn default() -> Self {
		Self::new()
	}
}

impl wl::Object for Surface {
	const INTERFACE: &'static str = "wl_surface";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:attach
				let (_buffer, _x, _y): (Option<u32>, i32, i32) = wlm::decode::from_slice(params)?;
			}
			2 | 9 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:damage
				// https://wayland.app/protocols/wayland#wl_surface:request:damage_buffer
				let (_x, _y, _w, _h): (i32, i32, i32, i32) = wlm::decode::from_slice(params)?;
			}
			3 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:frame
				let id: wl::Id<wl::Callback> = wlm::decode::from_slice(params)?;

				let callback = display.create(this.client(), id, 1, wl::Callback)?;
				display
					.object_mut(this)?
					.pending
					.frame_callbacks
					.push(callback);
			}
			4 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:set_opaque_region
				let region: u32 = wlm::decode::from_slice(params)?;
				display.lookup_optional::<wl::Region>(this.client(), region)?;
			}
			5 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:set_input_region
				let region: u32 = wlm::decode::from_slice(params)?;

				let region = match display.lookup_optional::<wl::Region>(this.client(), region)? {
					Some(x) => Some(display.object(x)?.clone()),
					None => None,
				};

				display.object_mut(this)?.pending.input_region = Some(region);
			}
			6 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:commit
				crate::surface::commit(display, this)?;
			}
			7 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:set_buffer_transform
				let transform: i32 = wlm::decode::from_slice(params)?;

				if !(0..=7).contains(&transform) {
					return Err(crate::ProtocolError::new(
						this,
						INVALID_TRANSFORM,
						format!("invalid buffer transform {transform}"),
					)
					.into());
				}

				display.object_mut(this)?.pending.buffer_transform = Some(transform);
			}
			8 => {
				// https://wayland.app/protocols/wayland#wl_surface:request:set_buffer_scale
				let scale: i32 = wlm::decode::from_slice(params)?;

				if scale < 1 {
					return Err(crate::ProtocolError::new(
						this,
						INVALID_SCALE,
						format!("invalid buffer scale {scale}"),
					)
					.into());
				}

				display.object_mut(this)?.pending.buffer_scale = Some(scale);
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Surface"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}

	fn destroyed(self, display: &mut crate::Display, this: wl::Handle<Self>) -> Result<()> {
		for callback in self
			.frame_callbacks
			.iter()
			.chain(self.pending.frame_callbacks.iter())
		{
			display.destroy(*callback)?;
		}

		for child in self.children() {
			if let Some(x) = display.get_mut(child) {
				x.parent = None;
			}
		}

		if let Some(parent) = self.parent {
			if let Some(x) = display.get_mut(parent) {
				x.remove_child(this);
			}
		}

		if let Some(x) = self.subsurface {
			display.set_inert(x);
		}

		Ok(())
	}
}
