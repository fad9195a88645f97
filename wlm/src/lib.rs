//! Wayland wire format: a serde serializer and deserializer for message
//! arguments plus the message header.

pub mod decode;
pub mod encode;
mod error;
mod message;
mod types;

pub use error::{Error, Result};
pub use message::{Header, Message, HEADER_SIZE};
pub use types::{Array, Fixed};
