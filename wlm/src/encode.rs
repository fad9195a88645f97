use crate::error::{Error, Result};

pub struct Serializer {
	output: Vec<u8>,
}

pub fn to_vec(value: &impl serde::Serialize) -> Result<Vec<u8>> {
	let mut serializer = Serializer { output: Vec::new() };
	value.serialize(&mut serializer)?;

	Ok(serializer.output)
}

impl Serializer {
	fn pad(&mut self, size: u32) {
		if size % 4 != 0 {
			self.output.extend((0..(4 - (size % 4))).map(|_| 0u8));
		}
	}
}

impl<'a> serde::ser::Serializer for &'a mut Serializer {
	type Ok = ();

	type Error = Error;

	type SerializeSeq = serde::ser::Impossible<(), Error>;

	type SerializeTuple = Self;

	type SerializeTupleStruct = Self;

	type SerializeTupleVariant = serde::ser::Impossible<(), Error>;

	type SerializeMap = serde::ser::Impossible<(), Error>;

	type SerializeStruct = Self;

	type SerializeStructVariant = serde::ser::Impossible<(), Error>;

	fn serialize_bool(self, v: bool) -> Result<()> {
		self.serialize_u32(v as u32)
	}

	fn serialize_i8(self, v: i8) -> Result<()> {
		self.serialize_i32(v as i32)
	}

	fn serialize_i16(self, v: i16) -> Result<()> {
		self.serialize_i32(v as i32)
	}

	fn serialize_i32(self, v: i32) -> Result<()> {
		self.output.extend(v.to_ne_bytes());
		Ok(())
	}

	fn serialize_i64(self, _v: i64) -> Result<()> {
		Err(Error::Unsupported("i64"))
	}

	fn serialize_u8(self, v: u8) -> Result<()> {
		self.serialize_u32(v as u32)
	}

	fn serialize_u16(self, v: u16) -> Result<()> {
		self.serialize_u32(v as u32)
	}

	fn serialize_u32(self, v: u32) -> Result<()> {
		self.output.extend(v.to_ne_bytes());
		Ok(())
	}

	fn serialize_u64(self, _v: u64) -> Result<()> {
		Err(Error::Unsupported("u64"))
	}

	fn serialize_f32(self, _v: f32) -> Result<()> {
		Err(Error::Unsupported("f32"))
	}

	fn serialize_f64(self, _v: f64) -> Result<()> {
		Err(Error::Unsupported("f64"))
	}

	fn serialize_char(self, _v: char) -> Result<()> {
		Err(Error::Unsupported("char"))
	}

	fn serialize_str(self, v: &str) -> Result<()> {
		let size = v.len() as u32 + 1;

		self.output.extend(size.to_ne_bytes());

		self.output.extend(v.as_bytes());
		self.output.push(0);

		self.pad(size);

		Ok(())
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<()> {
		// https://wayland.freedesktop.org/docs/html/ch04.html#sect-Protocol-Wire-Format (array)
		let size = v.len() as u32;

		self.output.extend(size.to_ne_bytes());
		self.output.extend(v);

		self.pad(size);

		Ok(())
	}

	fn serialize_none(self) -> Result<()> {
		// null strings and null objects are both a zero word
		self.serialize_u32(0)
	}

	fn serialize_some<T: ?Sized>(self, value: &T) -> Result<()>
	where
		T: serde::Serialize,
	{
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<()> {
		Ok(())
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
		Ok(())
	}

	fn serialize_unit_variant(
		self,
		_name: &'static str,
		variant_index: u32,
		_variant: &'static str,
	) -> Result<()> {
		self.serialize_u32(variant_index)
	}

	fn serialize_newtype_struct<T: ?Sized>(self, _name: &'static str, value: &T) -> Result<()>
	where
		T: serde::Serialize,
	{
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized>(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<()>
	where
		T: serde::Serialize,
	{
		Err(Error::Unsupported("newtype variant"))
	}

	fn serialize_seq(
		self,
		_len: Option<usize>,
	) -> std::result::Result<Self::SerializeSeq, Self::Error> {
		Err(Error::Unsupported("sequence"))
	}

	fn serialize_tuple(self, _len: usize) -> std::result::Result<Self::SerializeTuple, Self::Error> {
		Ok(self)
	}

	fn serialize_tuple_struct(
		self,
		_name: &'static str,
		_len: usize,
	) -> std::result::Result<Self::SerializeTupleStruct, Self::Error> {
		Ok(self)
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> std::result::Result<Self::SerializeTupleVariant, Self::Error> {
		Err(Error::Unsupported("tuple variant"))
	}

	fn serialize_map(
		self,
		_len: Option<usize>,
	) -> std::result::Result<Self::SerializeMap, Self::Error> {
		Err(Error::Unsupported("map"))
	}

	fn serialize_struct(
		self,
		_name: &'static str,
		_len: usize,
	) -> std::result::Result<Self::SerializeStruct, Self::Error> {
		Ok(self)
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> std::result::Result<Self::SerializeStructVariant, Self::Error> {
		Err(Error::Unsupported("struct variant"))
	}

	fn is_human_readable(&self) -> bool {
		false
	}
}

impl<'a> serde::ser::SerializeTuple for &'a mut Serializer {
	type Ok = ();

	type Error = Error;

	fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
	where
		T: serde::Serialize,
	{
		value.serialize(&mut **self)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl<'a> serde::ser::SerializeTupleStruct for &'a mut Serializer {
	type Ok = ();

	type Error = Error;

	fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
	where
		T: serde::Serialize,
	{
		value.serialize(&mut **self)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl<'a> serde::ser::SerializeStruct for &'a mut Serializer {
	type Ok = ();

	type Error = Error;

	fn serialize_field<T: ?Sized>(&mut self, _key: &'static str, value: &T) -> Result<()>
	where
		T: serde::Serialize,
	{
		value.serialize(&mut **self)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	#[test]
	fn strings_are_nul_terminated_and_padded() {
		let bytes = super::to_vec(&"wl_seat").unwrap();

		assert_eq!(bytes.len(), 4 + 8);
		assert_eq!(u32::from_ne_bytes(bytes[..4].try_into().unwrap()), 8);
		assert_eq!(&bytes[4..11], b"wl_seat");
		assert_eq!(bytes[11], 0);

		let bytes = super::to_vec(&"copy").unwrap();
		assert_eq!(bytes.len(), 4 + 8);
		assert_eq!(u32::from_ne_bytes(bytes[..4].try_into().unwrap()), 5);
	}

	#[test]
	fn null_string_is_a_zero_word() {
		let bytes = super::to_vec(&(None::<&str>, 7u32)).unwrap();
		assert_eq!(bytes, [0u32.to_ne_bytes(), 7u32.to_ne_bytes()].concat());
	}

	#[test]
	fn wide_integers_are_rejected() {
		assert!(super::to_vec(&1u64).is_err());
	}
}
