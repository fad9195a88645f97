use crate::Result;
use color_eyre::eyre::{ContextCompat, WrapErr as _};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
	pub name: String,
	pub make: String,
	pub model: String,
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32,
	/// In mHz.
	pub refresh_rate: i32,
	/// In millimeters.
	pub physical_width: i32,
	pub physical_height: i32,
	pub scale: Option<i32>,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			name: String::from("HEADLESS-1"),
			make: String::from("nucleus"),
			model: String::from("headless"),
			x: 0,
			y: 0,
			width: 1920,
			height: 1080,
			refresh_rate: 60000,
			physical_width: 530,
			physical_height: 300,
			scale: None,
		}
	}
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Socket name inside `$XDG_RUNTIME_DIR`.
	pub socket: String,
	pub seat: String,
	pub output: OutputConfig,
	pub desktops: Vec<String>,
	pub desktop_rows: u32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			socket: String::from("wayland-1"),
			seat: String::from("seat0"),
			output: OutputConfig::default(),
			desktops: vec![String::from("Desktop 1"), String::from("Desktop 2")],
			desktop_rows: 1,
		}
	}
}

impl Config {
	/// Reads `path`, or the default location when `None`. A missing default file yields
	/// the defaults, a missing explicit one is an error.
	pub fn read(path: Option<&std::path::Path>) -> Result<Self> {
		let text = match path {
			Some(path) => std::fs::read_to_string(path)
				.wrap_err_with(|| format!("failed to read {}", path.display()))?,
			None => std::fs::read_to_string(Self::default_path()?)
				.unwrap_or_else(|_| String::from("{}")),
		};

		Self::parse(&text)
	}

	pub fn parse(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	fn default_path() -> Result<std::path::PathBuf> {
		let base = match std::env::var_os("XDG_CONFIG_HOME").filter(|x| !x.is_empty()) {
			Some(x) => std::path::PathBuf::from(x),
			None => {
				let home = std::env::var_os("HOME").context("failed to get home dir")?;
				std::path::PathBuf::from(home).join(".config")
			}
		};

		Ok(base.join("nucleus").join("config.json"))
	}
}

#[cfg(test)]
mod tests {
	use super::Config;

	#[test]
	fn missing_keys_fall_back_to_defaults() {
		let config = Config::parse(r#"{ "seat": "seat1", "output": { "width": 2560 } }"#).unwrap();

		assert_eq!(config.seat, "seat1");
		assert_eq!(config.output.width, 2560);
		assert_eq!(config.output.height, 1080);
		assert_eq!(config.socket, Config::default().socket);
	}

	#[test]
	fn unknown_files_are_an_error() {
		let path = std::path::Path::new("/nonexistent/nucleus/config.json");
		assert!(Config::read(Some(path)).is_err());
	}
}
