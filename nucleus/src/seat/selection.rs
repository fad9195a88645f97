//! Clipboard and primary selection of a seat.

use log::debug;

use crate::{
	seat::{self, SeatKey, SelectionKind, Source},
	signal, wl, Change, ClientId, Display, Result,
};

#[derive(Default)]
pub(crate) struct Selections {
	clipboard: Option<Source>,
	primary: Option<Source>,
	clipboard_connection: Option<signal::ConnectionId>,
	primary_connection: Option<signal::ConnectionId>,
}

impl Selections {
	pub fn get(&self, kind: SelectionKind) -> Option<Source> {
		match kind {
			SelectionKind::Clipboard => self.clipboard,
			SelectionKind::Primary => self.primary,
		}
	}

	fn slots(
		&mut self,
		kind: SelectionKind,
	) -> (&mut Option<Source>, &mut Option<signal::ConnectionId>) {
		match kind {
			SelectionKind::Clipboard => (&mut self.clipboard, &mut self.clipboard_connection),
			SelectionKind::Primary => (&mut self.primary, &mut self.primary_connection),
		}
	}
}

pub fn seat_selection(display: &Display, seat: SeatKey, kind: SelectionKind) -> Result<Option<Source>> {
	Ok(seat::seat_ref(display, seat)?.selections.get(kind))
}

/// Replaces the selection of `kind`. The previous source is cancelled and the focused
/// client is told about the new one.
pub fn set_seat_selection(
	display: &mut Display,
	seat: SeatKey,
	kind: SelectionKind,
	source: Option<Source>,
) -> Result<()> {
	let selections = &mut seat::seat_mut(display, seat)?.selections;

	if selections.get(kind) == source {
		return Ok(());
	}

	let (slot, connection) = selections.slots(kind);
	let old = std::mem::replace(slot, source);
	let old_connection = connection.take();

	if let Some(x) = old_connection {
		display.signals.disconnect(x);
	}

	if let Some(old) = old.filter(|x| display.is_alive(x.object())) {
		old.cancel(display)?;
	}

	// the seat owns this connection, the source dying is what ends it
	let connection = source.map(|x| {
		display.signals.connect(
			signal::Topic::Destroyed(x.object()),
			None,
			signal::Subscriber::SelectionSourceDestroyed { seat, kind },
		)
	});

	*seat::seat_mut(display, seat)?.selections.slots(kind).1 = connection;

	debug!("{kind:?} selection set to {source:?}");

	if let Some(client) = seat::seat_ref(display, seat)?.focus_client {
		send_selection(display, seat, kind, client)?;
	}

	display.push_change(Change::SelectionChanged { seat, kind });

	Ok(())
}

pub(crate) fn source_destroyed(display: &mut Display, seat: SeatKey, kind: SelectionKind) -> Result<()> {
	let Some(x) = display.seats.get_mut(seat) else {
		return Ok(());
	};

	let (slot, connection) = x.selections.slots(kind);
	*slot = None;
	*connection = None;

	if let Some(client) = x.focus_client {
		send_selection(display, seat, kind, client)?;
	}

	display.push_change(Change::SelectionChanged { seat, kind });

	Ok(())
}

/// Moves selection focus to `client`, which then receives both current selections.
pub fn set_selection_focus(
	display: &mut Display,
	seat: SeatKey,
	client: Option<ClientId>,
) -> Result<()> {
	let x = seat::seat_mut(display, seat)?;

	if x.focus_client == client {
		return Ok(());
	}

	x.focus_client = client;

	if let Some(client) = client {
		send_selection(display, seat, SelectionKind::Clipboard, client)?;
		send_selection(display, seat, SelectionKind::Primary, client)?;
	}

	Ok(())
}

/// A focused client that creates a new device learns the current selection right away.
pub(crate) fn device_created(
	display: &mut Display,
	seat: SeatKey,
	client: ClientId,
	kind: SelectionKind,
) -> Result<()> {
	if seat::seat_ref(display, seat)?.focus_client != Some(client) {
		return Ok(());
	}

	send_selection(display, seat, kind, client)
}

fn send_selection(
	display: &mut Display,
	seat: SeatKey,
	kind: SelectionKind,
	client: ClientId,
) -> Result<()> {
	let source = seat::seat_ref(display, seat)?
		.selections
		.get(kind)
		.filter(|x| display.is_alive(x.object()));

	match kind {
		SelectionKind::Clipboard => {
			for device in seat::seat_objects::<wl::DataDevice>(display, seat, client) {
				let offer = match source {
					Some(x) => Some(wl::DataDevice::create_offer(display, device, x)?),
					None => None,
				};

				wl::DataDevice::selection(display, device, offer)?;
			}
		}
		SelectionKind::Primary => {
			for device in seat::seat_objects::<wl::ZwpPrimarySelectionDeviceV1>(display, seat, client) {
				let offer = match source {
					Some(x) => Some(wl::ZwpPrimarySelectionDeviceV1::create_offer(
						display, device, x,
					)?),
					None => None,
				};

				wl::ZwpPrimarySelectionDeviceV1::selection(display, device, offer)?;
			}
		}
	}

	display.flush(client)
}
