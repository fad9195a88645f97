//! Explicit observer registry.
//!
//! Peers never hold owning references to each other. Whoever needs to react to a change of
//! another object connects a [`Subscriber`] to a [`Topic`]. Connections are dropped either
//! explicitly through their [`ConnectionId`] or implicitly once the owner or the observed
//! object is destroyed.

use crate::{seat, wl, PointF, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
	PointerMoved(seat::SeatKey),
	TouchMoved(seat::SeatKey),
	SourceActionsChanged(wl::ObjectRef),
	OfferActionsChanged(wl::ObjectRef),
	Destroyed(wl::ObjectRef),
}

impl Topic {
	fn object(&self) -> Option<wl::ObjectRef> {
		match self {
			Self::PointerMoved(_) | Self::TouchMoved(_) => None,
			Self::SourceActionsChanged(x) | Self::OfferActionsChanged(x) | Self::Destroyed(x) => {
				Some(*x)
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
	None,
	Touch {
		id: i32,
		serial: u32,
		position: PointF,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscriber {
	PointerMotion {
		pointer: wl::Handle<wl::Pointer>,
	},
	PointerFocusDestroyed {
		pointer: wl::Handle<wl::Pointer>,
	},
	PointerListenerDestroyed {
		pointer: wl::Handle<wl::Pointer>,
		listener: wl::ObjectRef,
	},
	DragPointerMotion {
		device: wl::Handle<wl::DataDevice>,
	},
	DragTouchMotion {
		device: wl::Handle<wl::DataDevice>,
	},
	DragTargetDestroyed {
		device: wl::Handle<wl::DataDevice>,
	},
	DragSourceDestroyed {
		device: wl::Handle<wl::DataDevice>,
	},
	MatchDndActions {
		offer: wl::Handle<wl::DataOffer>,
		source: wl::Handle<wl::DataSource>,
	},
	SelectionSourceDestroyed {
		seat: seat::SeatKey,
		kind: seat::SelectionKind,
	},
}

impl Subscriber {
	pub(crate) fn call(self, display: &mut crate::Display, payload: &Payload) -> Result<()> {
		match self {
			Self::PointerMotion { pointer } => seat::pointer::route_motion(display, pointer),
			Self::PointerFocusDestroyed { pointer } => {
				seat::pointer::focus_destroyed(display, pointer)
			}
			Self::PointerListenerDestroyed { pointer, listener } => {
				seat::pointer::remove_listener(display, pointer, listener);
				Ok(())
			}
			Self::DragPointerMotion { device } => seat::drag::pointer_motion(display, device),
			Self::DragTouchMotion { device } => seat::drag::touch_motion(display, device, payload),
			Self::DragTargetDestroyed { device } => seat::drag::target_destroyed(display, device),
			Self::DragSourceDestroyed { device } => seat::drag::source_destroyed(display, device),
			Self::MatchDndActions { offer, source } => {
				seat::drag::match_actions(display, offer, source)
			}
			Self::SelectionSourceDestroyed { seat, kind } => {
				seat::selection::source_destroyed(display, seat, kind)
			}
		}
	}
}

struct Connection {
	topic: Topic,
	owner: Option<wl::ObjectRef>,
	subscriber: Subscriber,
}

#[derive(Default)]
pub struct Hub {
	next: u64,
	connections: std::collections::BTreeMap<ConnectionId, Connection>,
}

impl Hub {
	pub fn connect(
		&mut self,
		topic: Topic,
		owner: Option<wl::ObjectRef>,
		subscriber: Subscriber,
	) -> ConnectionId {
		self.next += 1;
		let id = ConnectionId(self.next);

		self.connections.insert(
			id,
			Connection {
				topic,
				owner,
				subscriber,
			},
		);

		id
	}

	pub fn disconnect(&mut self, id: ConnectionId) -> bool {
		self.connections.remove(&id).is_some()
	}

	pub fn is_connected(&self, id: ConnectionId) -> bool {
		self.connections.contains_key(&id)
	}

	/// Snapshot of the subscribers of `topic` in connection order.
	pub fn subscribers(&self, topic: &Topic) -> Vec<(ConnectionId, Subscriber)> {
		self.connections
			.iter()
			.filter(|(_, x)| x.topic == *topic)
			.map(|(id, x)| (*id, x.subscriber))
			.collect()
	}

	/// Drops every connection owned by `object` or observing it.
	pub fn forget(&mut self, object: wl::ObjectRef) {
		self.connections
			.retain(|_, x| x.owner != Some(object) && x.topic.object() != Some(object));
	}

	pub fn len(&self) -> usize {
		self.connections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.connections.is_empty()
	}

	pub fn count(&self, topic: &Topic) -> usize {
		self.connections
			.values()
			.filter(|x| x.topic == *topic)
			.count()
	}
}

#[cfg(test)]
mod tests {
	use super::{Hub, Subscriber, Topic};
	use crate::{wl, ClientId};

	fn object(id: u32) -> wl::ObjectRef {
		wl::ObjectRef {
			client: ClientId(1),
			id,
			generation: id,
		}
	}

	#[test]
	fn forget_drops_owned_and_observing_connections() {
		let mut hub = Hub::default();

		let device = wl::Handle::<wl::DataDevice>::new(object(3));
		let surface = object(4);
		let other = wl::Handle::<wl::DataDevice>::new(object(5));

		hub.connect(
			Topic::Destroyed(surface),
			Some(device.object),
			Subscriber::DragTargetDestroyed { device },
		);
		let kept = hub.connect(
			Topic::Destroyed(object(6)),
			Some(other.object),
			Subscriber::DragSourceDestroyed { device: other },
		);
		hub.connect(
			Topic::Destroyed(object(7)),
			Some(device.object),
			Subscriber::DragSourceDestroyed { device },
		);

		hub.forget(surface);
		assert_eq!(hub.len(), 2);

		hub.forget(device.object);
		assert_eq!(hub.len(), 1);
		assert!(hub.is_connected(kept));
	}

	#[test]
	fn subscribers_come_in_connection_order() {
		let mut hub = Hub::default();
		let topic = Topic::Destroyed(object(9));

		let a = hub.connect(
			topic,
			None,
			Subscriber::DragTargetDestroyed {
				device: wl::Handle::new(object(1)),
			},
		);
		let b = hub.connect(
			topic,
			None,
			Subscriber::DragTargetDestroyed {
				device: wl::Handle::new(object(2)),
			},
		);

		let ids = hub
			.subscribers(&topic)
			.into_iter()
			.map(|(id, _)| id)
			.collect::<Vec<_>>();
		assert_eq!(ids, [a, b]);

		assert!(hub.disconnect(a));
		assert!(!hub.disconnect(a));
		assert_eq!(hub.count(&topic), 1);
	}
}
