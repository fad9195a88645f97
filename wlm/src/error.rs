pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	Message(String),
	Truncated { wanted: usize, left: usize },
	TrailingData(usize),
	InvalidUtf8,
	MissingNul,
	NullString,
	TooLarge(usize),
	Unsupported(&'static str),
}

impl serde::ser::Error for Error {
	fn custom<T>(msg: T) -> Self
	where
		T: std::fmt::Display,
	{
		Self::Message(msg.to_string())
	}
}

impl serde::de::Error for Error {
	fn custom<T>(msg: T) -> Self
	where
		T: std::fmt::Display,
	{
		Self::Message(msg.to_string())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Message(x) => f.write_str(x),
			Self::Truncated { wanted, left } => {
				write!(f, "message truncated, wanted {wanted} bytes, {left} left")
			}
			Self::TrailingData(n) => write!(f, "{n} bytes of trailing data"),
			Self::InvalidUtf8 => f.write_str("string is not valid utf-8"),
			Self::MissingNul => f.write_str("string is not nul-terminated"),
			Self::NullString => f.write_str("null string where a string is required"),
			Self::TooLarge(n) => write!(f, "message of {n} bytes does not fit the header"),
			Self::Unsupported(x) => write!(f, "'{x}' has no wire representation"),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::array::TryFromSliceError> for Error {
	fn from(value: std::array::TryFromSliceError) -> Self {
		Self::Message(value.to_string())
	}
}
