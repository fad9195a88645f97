use crate::{output, seat, wl, ClientId};

/// Notifications for the policy layer. Requests from clients are never honoured by the
/// library itself; the compositor drains these with [`crate::Display::take_changes`] and
/// decides what to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
	ClientCreated(ClientId),
	ClientDestroyed(ClientId),
	DataDeviceCreated {
		seat: seat::SeatKey,
		device: wl::Handle<wl::DataDevice>,
	},
	DragStarted {
		seat: seat::SeatKey,
		device: wl::Handle<wl::DataDevice>,
	},
	DragDropped {
		seat: seat::SeatKey,
	},
	DragCancelled {
		seat: seat::SeatKey,
	},
	SelectionChanged {
		seat: seat::SeatKey,
		kind: seat::SelectionKind,
	},
	CursorChanged {
		pointer: wl::Handle<wl::Pointer>,
	},
	PointerConstraintCreated {
		surface: wl::Handle<wl::Surface>,
	},
	SurfaceCommitted {
		surface: wl::Handle<wl::Surface>,
	},
	DpmsModeRequested {
		output: output::OutputKey,
		mode: output::DpmsMode,
	},
	DesktopCreateRequested {
		name: String,
		position: u32,
	},
	DesktopRemoveRequested {
		id: String,
	},
	DesktopActivateRequested {
		id: String,
	},
}
