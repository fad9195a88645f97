use fixed::types::I24F8;

/// 24.8 signed fixed point number as used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fixed(pub I24F8);

impl Fixed {
	pub const ZERO: Self = Self(I24F8::ZERO);

	pub fn from_f64(value: f64) -> Self {
		Self(I24F8::saturating_from_num(value))
	}

	pub fn to_f64(self) -> f64 {
		self.0.to_num()
	}

	pub fn from_bits(bits: i32) -> Self {
		Self(I24F8::from_bits(bits))
	}

	pub fn to_bits(self) -> i32 {
		self.0.to_bits()
	}
}

impl From<f64> for Fixed {
	fn from(value: f64) -> Self {
		Self::from_f64(value)
	}
}

impl From<i32> for Fixed {
	fn from(value: i32) -> Self {
		Self(I24F8::saturating_from_num(value))
	}
}

impl serde::Serialize for Fixed {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i32(self.to_bits())
	}
}

impl<'de> serde::Deserialize<'de> for Fixed {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		i32::deserialize(deserializer).map(Self::from_bits)
	}
}

/// Length prefixed byte array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Array(pub Vec<u8>);

impl serde::Serialize for Array {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_bytes(&self.0)
	}
}

impl<'de> serde::Deserialize<'de> for Array {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		struct Visitor;

		impl<'de> serde::de::Visitor<'de> for Visitor {
			type Value = Array;

			fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				f.write_str("a wayland array")
			}

			fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Array, E> {
				Ok(Array(v.to_vec()))
			}

			fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Array, E> {
				Ok(Array(v))
			}
		}

		deserializer.deserialize_byte_buf(Visitor)
	}
}

#[cfg(test)]
mod tests {
	use super::{Array, Fixed};

	#[test]
	fn fixed_is_24_8() {
		assert_eq!(Fixed::from_f64(1.0).to_bits(), 256);
		assert_eq!(Fixed::from_f64(-0.5).to_bits(), -128);
		assert_eq!(Fixed::from(3).to_f64(), 3.0);

		let bytes = crate::encode::to_vec(&Fixed::from_f64(10.25)).unwrap();
		assert_eq!(bytes, (10 * 256 + 64i32).to_ne_bytes());
	}

	#[test]
	fn array_is_padded() {
		let bytes = crate::encode::to_vec(&Array(vec![1, 2, 3, 4, 5])).unwrap();
		assert_eq!(bytes.len(), 4 + 8);

		let array: Array = crate::decode::from_slice(&bytes).unwrap();
		assert_eq!(array.0, [1, 2, 3, 4, 5]);
	}
}
