use crate::{seat::SeatKey, wl, ProtocolError, Result};

// https://wayland.app/protocols/wayland#wl_seat:enum:error
pub const MISSING_CAPABILITY: u32 = 0;

#[derive(Clone)]
pub struct Seat {
	pub seat: SeatKey,
}

impl Seat {
	pub fn new(seat: SeatKey) -> Self {
		Self { seat }
	}

	pub fn capabilities(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		capabilities: crate::seat::Capabilities,
	) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_seat:event:capabilities
		display.send(this, 0, capabilities.bits())
	}

	pub fn name(display: &mut crate::Display, this: wl::Handle<Self>, name: &str) -> Result<()> {
		// https://wayland.app/protocols/wayland#wl_seat:event:name
		display.send_since(this, 2, 1, name)
	}

	fn require(
		display: &crate::Display,
		this: wl::Handle<Self>,
		capability: crate::seat::Capabilities,
	) -> Result<SeatKey> {
		let seat = display.object(this)?.seat;

		if !crate::seat::seat_ref(display, seat)?
			.capabilities
			.contains(capability)
		{
			return Err(ProtocolError::new(
				this,
				MISSING_CAPABILITY,
				format!("seat has no {capability:?} capability"),
			)
			.into());
		}

		Ok(seat)
	}
}

impl wl::Object for Seat {
	const INTERFACE: &'static str = "wl_seat";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/wayland#wl_seat:request:get_pointer
				let id: wl::Id<wl::Pointer> = wlm::decode::from_slice(params)?;
				let seat = Self::require(display, this, crate::seat::Capabilities::POINTER)?;

				let pointer = display.create(this.client(), id, version, wl::Pointer::new(seat))?;
				crate::seat::pointer::pointer_created(display, pointer)?;
			}
			1 => {
				// https://wayland.app/protocols/wayland#wl_seat:request:get_keyboard
				let _id: u32 = wlm::decode::from_slice(params)?;
				Self::require(display, this, crate::seat::Capabilities::KEYBOARD)?;
			}
			2 => {
				// https://wayland.app/protocols/wayland#wl_seat:request:get_touch
				let id: wl::Id<wl::Touch> = wlm::decode::from_slice(params)?;
				let seat = Self::require(display, this, crate::seat::Capabilities::TOUCH)?;

				display.create(this.client(), id, version, wl::Touch::new(seat))?;
			}
			3 => {
				// https://wayland.app/protocols/wayland#wl_seat:request:release
				display.destroy(this)?;
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in Seat"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 3
	}
}

impl wl::Global for Seat {
	fn get_name(&self) -> &'static str {
		"wl_seat"
	}

	fn get_version(&self) -> u32 {
		5
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}

	fn bind(&self, display: &mut crate::Display, object: wl::ObjectRef) -> Result<()> {
		let this = wl::Handle::<Self>::new(object);
		let (capabilities, name) = {
			let seat = crate::seat::seat_ref(display, self.seat)?;
			(seat.capabilities, seat.name.clone())
		};

		Self::capabilities(display, this, capabilities)?;
		Self::name(display, this, &name)
	}
}
