//! Per-seat input and data transfer state.
//!
//! A seat aggregates one logical pointer and one touch device. Every `wl_seat` bind of a
//! seat shares the state kept here; the protocol objects only hold a [`SeatKey`].

pub mod drag;
pub mod pointer;
pub mod selection;
pub mod touch;

use log::debug;

use crate::{wl, ClientId, Display, Result};

pub type SeatKey = crate::Key<Seat>;

bitflags::bitflags! {
	/// https://wayland.app/protocols/wayland#wl_seat:enum:capability
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct Capabilities: u32 {
		const POINTER = 1;
		const KEYBOARD = 2;
		const TOUCH = 4;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
	Clipboard,
	Primary,
}

/// Data source of either selection protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
	Data(wl::Handle<wl::DataSource>),
	Primary(wl::Handle<wl::ZwpPrimarySelectionSourceV1>),
}

impl Source {
	pub fn object(&self) -> wl::ObjectRef {
		match self {
			Self::Data(x) => x.object,
			Self::Primary(x) => x.object,
		}
	}

	pub fn client(&self) -> ClientId {
		self.object().client
	}

	pub fn mime_types(&self, display: &Display) -> Vec<String> {
		match self {
			Self::Data(x) => display
				.get(*x)
				.map(|x| x.mime_types.clone())
				.unwrap_or_default(),
			Self::Primary(x) => display
				.get(*x)
				.map(|x| x.mime_types.clone())
				.unwrap_or_default(),
		}
	}

	pub fn actions(&self, display: &Display) -> wl::DndActions {
		match self {
			Self::Data(x) => display.get(*x).map_or(wl::DndActions::empty(), |x| x.actions),
			Self::Primary(_) => wl::DndActions::empty(),
		}
	}

	/// Asks the source client to write `mime_type` into `fd`.
	pub fn request_data(
		&self,
		display: &mut Display,
		mime_type: &str,
		fd: std::os::fd::OwnedFd,
	) -> Result<()> {
		match self {
			Self::Data(x) => wl::DataSource::send_data(display, *x, mime_type, fd),
			Self::Primary(x) => wl::ZwpPrimarySelectionSourceV1::send_data(display, *x, mime_type, fd),
		}
	}

	pub fn cancel(&self, display: &mut Display) -> Result<()> {
		match self {
			Self::Data(x) => wl::DataSource::cancelled(display, *x)?,
			Self::Primary(x) => wl::ZwpPrimarySelectionSourceV1::cancelled(display, *x)?,
		}

		display.flush(self.client())
	}
}

pub struct Seat {
	pub name: String,
	pub capabilities: Capabilities,
	pub global: u32,
	/// Time in milliseconds attached to input events.
	pub timestamp: u32,
	pub pointer: pointer::PointerPool,
	pub touch: touch::TouchPool,
	pub drag: drag::Drag,
	pub(crate) selections: selection::Selections,
	/// Client receiving selections, the stand-in for keyboard focus.
	pub focus_client: Option<ClientId>,
}

impl Seat {
	pub fn has_pointer(&self) -> bool {
		self.capabilities.contains(Capabilities::POINTER)
	}

	pub fn has_touch(&self) -> bool {
		self.capabilities.contains(Capabilities::TOUCH)
	}
}

pub fn create_seat(
	display: &mut Display,
	name: &str,
	capabilities: Capabilities,
) -> Result<SeatKey> {
	// keyboards are not implemented
	let capabilities = capabilities - Capabilities::KEYBOARD;

	let key = display.seats.insert(Seat {
		name: name.to_owned(),
		capabilities,
		global: 0,
		timestamp: 0,
		pointer: Default::default(),
		touch: Default::default(),
		drag: Default::default(),
		selections: Default::default(),
		focus_client: None,
	});

	let global = display.add_global(wl::Seat::new(key))?;
	seat_mut(display, key)?.global = global;

	debug!("seat '{name}' created with {capabilities:?}");

	Ok(key)
}

pub fn remove_seat(display: &mut Display, seat: SeatKey) -> Result<()> {
	if seat_ref(display, seat)?.drag.is_active() {
		drag::drag_cancel(display, seat)?;
	}

	let global = seat_ref(display, seat)?.global;
	display.remove_global(global)?;
	display.seats.remove(seat);

	Ok(())
}

pub fn set_seat_timestamp(display: &mut Display, seat: SeatKey, time: u32) -> Result<()> {
	seat_mut(display, seat)?.timestamp = time;
	Ok(())
}

pub fn seat_ref(display: &Display, seat: SeatKey) -> Result<&Seat> {
	display
		.seats
		.get(seat)
		.ok_or_else(|| color_eyre::eyre::eyre!("seat {seat:?} does not exist"))
}

pub fn seat_mut(display: &mut Display, seat: SeatKey) -> Result<&mut Seat> {
	display
		.seats
		.get_mut(seat)
		.ok_or_else(|| color_eyre::eyre::eyre!("seat {seat:?} does not exist"))
}

/// Resources of type `T` bound to `seat` by `client`.
pub(crate) fn seat_objects<T: wl::Object + wl::SeatBound>(
	display: &Display,
	seat: SeatKey,
	client: ClientId,
) -> Vec<wl::Handle<T>> {
	display
		.objects::<T>(client)
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.seat() == seat))
		.collect()
}

/// Resources of type `T` bound to `seat` by any client.
pub(crate) fn all_seat_objects<T: wl::Object + wl::SeatBound>(
	display: &Display,
	seat: SeatKey,
) -> Vec<wl::Handle<T>> {
	display
		.all_objects::<T>()
		.into_iter()
		.filter(|x| display.get(*x).is_some_and(|x| x.seat() == seat))
		.collect()
}
