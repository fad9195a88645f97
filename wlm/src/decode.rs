use crate::error::{Error, Result};

pub fn from_slice<'a, T: serde::Deserialize<'a>>(input: &'a [u8]) -> Result<T> {
	let mut deserializer = Deserializer { input };

	let ret = T::deserialize(&mut deserializer)?;

	if deserializer.input.is_empty() {
		Ok(ret)
	} else {
		Err(Error::TrailingData(deserializer.input.len()))
	}
}

pub struct Deserializer<'de> {
	input: &'de [u8],
}

impl<'de> Deserializer<'de> {
	fn take(&mut self, size: usize) -> Result<&'de [u8]> {
		if self.input.len() < size {
			return Err(Error::Truncated {
				wanted: size,
				left: self.input.len(),
			});
		}

		let (ret, rest) = self.input.split_at(size);
		self.input = rest;

		Ok(ret)
	}

	fn word(&mut self) -> Result<u32> {
		Ok(u32::from_ne_bytes(self.take(4)?.try_into()?))
	}

	fn peek_word(&self) -> Result<u32> {
		match self.input.get(..4) {
			Some(x) => Ok(u32::from_ne_bytes(x.try_into()?)),
			None => Err(Error::Truncated {
				wanted: 4,
				left: self.input.len(),
			}),
		}
	}

	fn skip_padding(&mut self, size: u32) -> Result<()> {
		if size % 4 != 0 {
			self.take((4 - (size % 4)) as usize)?;
		}

		Ok(())
	}

	fn string(&mut self) -> Result<&'de str> {
		let size = self.word()?;

		if size == 0 {
			return Err(Error::NullString);
		}

		let bytes = self.take(size as usize)?;
		self.skip_padding(size)?;

		let (last, value) = bytes.split_last().ok_or(Error::MissingNul)?;

		if *last != 0 {
			return Err(Error::MissingNul);
		}

		std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8)
	}

	fn array(&mut self) -> Result<&'de [u8]> {
		let size = self.word()?;

		let bytes = self.take(size as usize)?;
		self.skip_padding(size)?;

		Ok(bytes)
	}
}

macro_rules! unsupported {
	($($method:ident => $name:literal),* $(,)?) => {
		$(
			fn $method<V>(self, _visitor: V) -> std::result::Result<V::Value, Self::Error>
			where
				V: serde::de::Visitor<'de>,
			{
				Err(Error::Unsupported($name))
			}
		)*
	};
}

impl<'de, 'a> serde::de::Deserializer<'de> for &'a mut Deserializer<'de> {
	type Error = Error;

	unsupported! {
		deserialize_any => "any",
		deserialize_i64 => "i64",
		deserialize_u64 => "u64",
		deserialize_f32 => "f32",
		deserialize_f64 => "f64",
		deserialize_char => "char",
		deserialize_map => "map",
		deserialize_seq => "sequence",
		deserialize_identifier => "identifier",
		deserialize_ignored_any => "ignored",
	}

	fn deserialize_bool<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_bool(self.word()? != 0)
	}

	fn deserialize_i8<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		self.deserialize_i32(visitor)
	}

	fn deserialize_i16<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		self.deserialize_i32(visitor)
	}

	fn deserialize_i32<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		let value = i32::from_ne_bytes(self.take(4)?.try_into()?);
		visitor.visit_i32(value)
	}

	fn deserialize_u8<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		self.deserialize_u32(visitor)
	}

	fn deserialize_u16<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		self.deserialize_u32(visitor)
	}

	fn deserialize_u32<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		let value = self.word()?;
		visitor.visit_u32(value)
	}

	fn deserialize_str<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_borrowed_str(self.string()?)
	}

	fn deserialize_string<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_string(String::from(self.string()?))
	}

	fn deserialize_bytes<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_borrowed_bytes(self.array()?)
	}

	fn deserialize_byte_buf<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_byte_buf(self.array()?.to_vec())
	}

	fn deserialize_option<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		// a zero word is both the null object and the null string
		if self.peek_word()? == 0 {
			self.word()?;
			visitor.visit_none()
		} else {
			visitor.visit_some(self)
		}
	}

	fn deserialize_unit<V>(self, visitor: V) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_unit()
	}

	fn deserialize_unit_struct<V>(
		self,
		_name: &'static str,
		visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_unit()
	}

	fn deserialize_newtype_struct<V>(
		self,
		_name: &'static str,
		visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_tuple<V>(
		self,
		_len: usize,
		visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_seq(self)
	}

	fn deserialize_tuple_struct<V>(
		self,
		_name: &'static str,
		_len: usize,
		visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_seq(self)
	}

	fn deserialize_struct<V>(
		self,
		_name: &'static str,
		_fields: &'static [&'static str],
		visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		visitor.visit_seq(self)
	}

	fn deserialize_enum<V>(
		self,
		_name: &'static str,
		_variants: &'static [&'static str],
		_visitor: V,
	) -> std::result::Result<V::Value, Self::Error>
	where
		V: serde::de::Visitor<'de>,
	{
		Err(Error::Unsupported("enum"))
	}

	fn is_human_readable(&self) -> bool {
		false
	}
}

impl<'de, 'a> serde::de::SeqAccess<'de> for &'a mut Deserializer<'de> {
	type Error = Error;

	fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
	where
		T: serde::de::DeserializeSeed<'de>,
	{
		seed.deserialize(&mut **self).map(Some)
	}
}

#[cfg(test)]
mod tests {
	use crate::Error;

	fn words(x: &[u32]) -> Vec<u8> {
		x.iter().flat_map(|x| x.to_ne_bytes()).collect()
	}

	#[test]
	fn bind_arguments() {
		// name, interface, version, new_id
		let mut bytes = words(&[3, 8]);
		bytes.extend(b"wl_seat\0");
		bytes.extend(words(&[7, 9]));

		let (name, interface, version, id): (u32, String, u32, u32) =
			super::from_slice(&bytes).unwrap();

		assert_eq!(name, 3);
		assert_eq!(interface, "wl_seat");
		assert_eq!((version, id), (7, 9));
	}

	#[test]
	fn borrowed_string_and_null_object() {
		let mut bytes = words(&[5]);
		bytes.extend(b"text\0\0\0\0");
		bytes.extend(words(&[0]));

		let (mime, surface): (&str, Option<u32>) = super::from_slice(&bytes).unwrap();

		assert_eq!(mime, "text");
		assert_eq!(surface, None);
	}

	#[test]
	fn null_string_is_none() {
		let (mime,): (Option<String>,) = super::from_slice(&words(&[0])).unwrap();
		assert_eq!(mime, None);
	}

	#[test]
	fn truncated_input_is_an_error() {
		let ret = super::from_slice::<(u32, u32)>(&words(&[1]));
		assert_eq!(ret, Err(Error::Truncated { wanted: 4, left: 0 }));

		let mut bytes = words(&[16]);
		bytes.extend(b"short\0\0\0");
		assert!(super::from_slice::<(String,)>(&bytes).is_err());
	}

	#[test]
	fn trailing_data_is_an_error() {
		let ret = super::from_slice::<(u32,)>(&words(&[1, 2]));
		assert_eq!(ret, Err(Error::TrailingData(4)));
	}

	#[test]
	fn missing_nul_is_an_error() {
		let mut bytes = words(&[4]);
		bytes.extend(b"abcd");
		assert_eq!(
			super::from_slice::<(String,)>(&bytes),
			Err(Error::MissingNul)
		);
	}
}
