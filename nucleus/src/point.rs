#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point(pub i32, pub i32);

impl Point {
	pub fn as_f64(&self) -> PointF {
		PointF(self.0 as f64, self.1 as f64)
	}
}

impl std::ops::Add for Point {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Self(self.0 + rhs.0, self.1 + rhs.1)
	}
}

impl std::ops::Sub for Point {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Self(self.0 - rhs.0, self.1 - rhs.1)
	}
}

impl std::ops::AddAssign for Point {
	fn add_assign(&mut self, rhs: Self) {
		self.0 += rhs.0;
		self.1 += rhs.1;
	}
}

/// Sub-pixel position, used for pointer and touch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF(pub f64, pub f64);

impl std::ops::Add for PointF {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Self(self.0 + rhs.0, self.1 + rhs.1)
	}
}

impl std::ops::Sub for PointF {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Self(self.0 - rhs.0, self.1 - rhs.1)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size(pub i32, pub i32);

impl Size {
	pub fn is_empty(&self) -> bool {
		self.0 <= 0 || self.1 <= 0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
	pub position: Point,
	pub size: Size,
}

impl Rect {
	pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
		Self {
			position: Point(x, y),
			size: Size(width, height),
		}
	}

	pub fn contains(&self, point: PointF) -> bool {
		let x = point.0 - self.position.0 as f64;
		let y = point.1 - self.position.1 as f64;

		x >= 0.0 && y >= 0.0 && x < self.size.0 as f64 && y < self.size.1 as f64
	}
}

/// Maps global coordinates into surface-local ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
	pub offset: PointF,
	pub scale: f64,
}

impl Default for Transformation {
	fn default() -> Self {
		Self {
			offset: PointF(0.0, 0.0),
			scale: 1.0,
		}
	}
}

impl Transformation {
	pub fn translate(x: f64, y: f64) -> Self {
		Self {
			offset: PointF(x, y),
			..Default::default()
		}
	}

	pub fn map(&self, point: PointF) -> PointF {
		PointF(
			(point.0 - self.offset.0) * self.scale,
			(point.1 - self.offset.1) * self.scale,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rect_contains_is_half_open() {
		let rect = Rect::new(10, 10, 5, 5);

		assert!(rect.contains(PointF(10.0, 10.0)));
		assert!(rect.contains(PointF(14.5, 14.5)));
		assert!(!rect.contains(PointF(15.0, 12.0)));
		assert!(!rect.contains(PointF(9.9, 12.0)));
	}

	#[test]
	fn transformation_maps_into_local_space() {
		let transformation = Transformation::translate(100.0, 50.0);
		assert_eq!(transformation.map(PointF(110.5, 60.0)), PointF(10.5, 10.0));

		let scaled = Transformation {
			offset: PointF(0.0, 0.0),
			scale: 2.0,
		};
		assert_eq!(scaled.map(PointF(3.0, 4.0)), PointF(6.0, 8.0));
	}
}
