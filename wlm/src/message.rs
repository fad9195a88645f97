use crate::error::{Error, Result};

pub const HEADER_SIZE: usize = 8;

pub struct Message<T> {
	pub object_id: u32,
	pub op: u16,
	pub args: T,
}

impl<T: serde::Serialize> Message<T> {
	pub fn to_vec(&self) -> Result<Vec<u8>> {
		let args = crate::encode::to_vec(&self.args)?;

		let size = HEADER_SIZE + args.len();
		let size = u16::try_from(size).map_err(|_| Error::TooLarge(size))?;

		let mut ret = Vec::with_capacity(size as usize);

		ret.extend(self.object_id.to_ne_bytes());
		ret.extend(self.op.to_ne_bytes());
		ret.extend(size.to_ne_bytes());
		ret.extend(args);

		Ok(ret)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	pub object_id: u32,
	pub op: u16,
	pub size: u16,
}

impl Header {
	/// Parses the 8 byte message header. `size` includes the header itself.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < HEADER_SIZE {
			return Err(Error::Truncated {
				wanted: HEADER_SIZE,
				left: bytes.len(),
			});
		}

		let object_id = u32::from_ne_bytes(bytes[0..4].try_into()?);
		let op = u16::from_ne_bytes(bytes[4..6].try_into()?);
		let size = u16::from_ne_bytes(bytes[6..8].try_into()?);

		if (size as usize) < HEADER_SIZE {
			return Err(Error::Message(format!("message size {size} is below the header size")));
		}

		Ok(Self { object_id, op, size })
	}

	pub fn body_size(&self) -> usize {
		self.size as usize - HEADER_SIZE
	}
}

#[cfg(test)]
mod tests {
	use super::{Header, Message};

	#[test]
	fn header_matches_encoded_message() {
		let bytes = Message {
			object_id: 0xff000001,
			op: 3,
			args: (1u32, "x"),
		}
		.to_vec()
		.unwrap();

		let header = Header::parse(&bytes).unwrap();

		assert_eq!(header.object_id, 0xff000001);
		assert_eq!(header.op, 3);
		assert_eq!(header.size as usize, bytes.len());
		assert_eq!(header.body_size(), 12);
	}

	#[test]
	fn short_header_is_rejected() {
		assert!(Header::parse(&[0; 7]).is_err());

		let mut bytes = vec![0u8; 8];
		bytes[6..8].copy_from_slice(&4u16.to_ne_bytes());
		assert!(Header::parse(&bytes).is_err());
	}
}
