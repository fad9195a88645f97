use crate::{wl, PointF, Rect, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOp {
	Add,
	Subtract,
}

/// Rectangles in the order the client added or subtracted them. Later operations win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
	pub rects: Vec<(RegionOp, Rect)>,
}

impl Region {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, rect: Rect) {
		self.rects.push((RegionOp::Add, rect));
	}

	pub fn subtract(&mut self, rect: Rect) {
		self.rects.push((RegionOp::Subtract, rect));
	}

	pub fn contains(&self, point: PointF) -> bool {
		self.rects
			.iter()
			.fold(false, |inside, (op, rect)| match op {
				RegionOp::Add if rect.contains(point) => true,
				RegionOp::Subtract if rect.contains(point) => false,
				_ => inside,
			})
	}
}

impl wl::Object for Region {
	const INTERFACE: &'static str = "wl_region";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_region:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_region:request:add
				let (x, y, w, h): (i32, i32, i32, i32) = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.add(Rect::new(x, y, w, h));
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_region:request:subtract
				let (x, y, w, h): (i32, i32, i32, i32) = wlm::decode::from_slice(params)?;
				display.object_mut(this)?.subtract(Rect::new(x, y, w, h));
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Region"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}
