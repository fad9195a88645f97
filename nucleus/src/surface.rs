//! Surface tree queries and the compositor-side surface entry points.

use crate::{wl, Change, Display, Point, PointF, Rect, Result, Size};

pub fn set_surface_size(
	display: &mut Display,
	surface: wl::Handle<wl::Surface>,
	size: Size,
) -> Result<()> {
	display.object_mut(surface)?.size = size;
	Ok(())
}

/// Marks `proxy` as the surface that stands in for `surface` in nested setups.
pub fn set_data_proxy(
	display: &mut Display,
	surface: wl::Handle<wl::Surface>,
	proxy: Option<wl::Handle<wl::Surface>>,
) -> Result<()> {
	display.object_mut(surface)?.data_proxy = proxy;
	Ok(())
}

/// Position relative to the root of the sub-surface tree.
pub fn surface_position(display: &Display, surface: wl::Handle<wl::Surface>) -> Point {
	let mut ret = Point(0, 0);
	let mut current = surface;

	while let Some(subsurface) = display.get(current).and_then(|x| x.subsurface) {
		let Some(x) = display.get(subsurface) else {
			break;
		};

		ret += x.position;
		current = x.parent;
	}

	ret
}

pub fn root_surface(display: &Display, surface: wl::Handle<wl::Surface>) -> wl::Handle<wl::Surface> {
	let mut current = surface;

	while let Some(parent) = display.get(current).and_then(|x| x.parent) {
		current = parent;
	}

	current
}

/// Finds the surface of the tree below `position`, given in coordinates local to
/// `surface`. Children are searched top-most first.
pub fn input_surface_at(
	display: &Display,
	surface: wl::Handle<wl::Surface>,
	position: PointF,
) -> Option<wl::Handle<wl::Surface>> {
	let x = display.get(surface)?;

	if x.size.is_empty() {
		return None;
	}

	for entry in x.stack.iter().rev() {
		match entry {
			wl::StackEntry::Parent => {
				let bounds = Rect {
					position: Point(0, 0),
					size: x.size,
				};

				let accepts = x
					.input_region
					.as_ref()
					.map_or(true, |region| region.contains(position));

				if bounds.contains(position) && accepts {
					return Some(surface);
				}
			}
			wl::StackEntry::Child(child) => {
				let Some(offset) = display
					.get(*child)
					.and_then(|x| x.subsurface)
					.and_then(|x| display.get(x))
					.map(|x| x.position)
				else {
					continue;
				};

				if let Some(x) = input_surface_at(display, *child, position - offset.as_f64()) {
					return Some(x);
				}
			}
		}
	}

	None
}

/// Fires the committed frame callbacks of the whole surface tree.
pub fn frame_rendered(
	display: &mut Display,
	surface: wl::Handle<wl::Surface>,
	time: u32,
) -> Result<()> {
	let Some(x) = display.get_mut(surface) else {
		return Ok(());
	};

	let callbacks = std::mem::take(&mut x.frame_callbacks);
	let children = x.children().collect::<Vec<_>>();

	for callback in callbacks {
		wl::Callback::done(display, callback, time)?;
	}

	for child in children {
		frame_rendered(display, child, time)?;
	}

	Ok(())
}

pub(crate) fn commit(display: &mut Display, surface: wl::Handle<wl::Surface>) -> Result<()> {
	let x = display.object_mut(surface)?;
	let pending = std::mem::take(&mut x.pending);

	if let Some(region) = pending.input_region {
		x.input_region = region;
	}

	if let Some(scale) = pending.buffer_scale {
		x.buffer_scale = scale;
	}

	if let Some(transform) = pending.buffer_transform {
		x.buffer_transform = transform;
	}

	if let Some(stack) = pending.stack {
		x.stack = stack;
	}

	x.frame_callbacks.extend(pending.frame_callbacks);

	let children = x.children().collect::<Vec<_>>();
	let constraints = (x.locked_pointer, x.confined_pointer);

	// sub-surface positions are part of the parent's state
	for child in children {
		let Some(subsurface) = display.get(child).and_then(|x| x.subsurface) else {
			continue;
		};

		if let Some(x) = display.get_mut(subsurface) {
			if let Some(position) = x.pending_position.take() {
				x.position = position;
			}
		}
	}

	if let Some(x) = constraints.0 {
		if let Some(x) = display.get_mut(x) {
			x.apply_pending();
		}
	}

	if let Some(x) = constraints.1 {
		if let Some(x) = display.get_mut(x) {
			x.apply_pending();
		}
	}

	display.push_change(Change::SurfaceCommitted { surface });

	Ok(())
}
