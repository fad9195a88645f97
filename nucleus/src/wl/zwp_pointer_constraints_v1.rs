use crate::{wl, Change, ProtocolError, Result};

// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_pointer_constraints_v1:enum:error
pub const ALREADY_CONSTRAINED: u32 = 1;

/// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_pointer_constraints_v1:enum:lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
	/// Defunct after the first deactivation.
	Oneshot = 1,
	Persistent = 2,
}

impl Lifetime {
	fn from_u32(value: u32) -> Option<Self> {
		match value {
			1 => Some(Self::Oneshot),
			2 => Some(Self::Persistent),
			_ => None,
		}
	}
}

#[derive(Clone)]
pub struct ZwpPointerConstraintsV1;

struct Request {
	surface: wl::Handle<wl::Surface>,
	pointer: wl::Handle<wl::Pointer>,
	region: Option<wl::Region>,
	lifetime: Lifetime,
}

fn parse_request(
	display: &crate::Display,
	this: wl::Handle<ZwpPointerConstraintsV1>,
	surface: u32,
	pointer: u32,
	region: u32,
	lifetime: u32,
) -> Result<Request> {
	let surface = display.lookup::<wl::Surface>(this.client(), surface)?;
	let pointer = display.lookup::<wl::Pointer>(this.client(), pointer)?;
	let region = display.lookup_optional::<wl::Region>(this.client(), region)?;

	let Some(lifetime) = Lifetime::from_u32(lifetime) else {
		color_eyre::eyre::bail!("invalid constraint lifetime {lifetime}");
	};

	if display.object(surface)?.has_constraint() {
		return Err(ProtocolError::new(
			this,
			ALREADY_CONSTRAINED,
			"surface already has a pointer constraint",
		)
		.into());
	}

	let region = match region {
		Some(x) => Some(display.object(x)?.clone()),
		None => None,
	};

	Ok(Request {
		surface,
		pointer,
		region,
		lifetime,
	})
}

impl wl::Object for ZwpPointerConstraintsV1 {
	const INTERFACE: &'static str = "zwp_pointer_constraints_v1";

	fn handle(
		display: &mut crate::Display,
		this: wl::Handle<Self>,
		op: u16,
		params: &[u8],
	) -> Result<()> {
		let version = display.version(this);

		match op {
			0 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_pointer_constraints_v1:request:destroy
				display.destroy(this)?;
			}
			1 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_pointer_constraints_v1:request:lock_pointer
				let (id, surface, pointer, region, lifetime): (
					wl::Id<wl::ZwpLockedPointerV1>,
					u32,
					u32,
					u32,
					u32,
				) = wlm::decode::from_slice(params)?;

				let x = parse_request(display, this, surface, pointer, region, lifetime)?;

				let locked = display.create(
					this.client(),
					id,
					version,
					wl::ZwpLockedPointerV1::new(x.surface, x.pointer, x.region, x.lifetime),
				)?;

				display.object_mut(x.surface)?.locked_pointer = Some(locked);
				display.push_change(Change::PointerConstraintCreated { surface: x.surface });
			}
			2 => {
				// https://wayland.app/protocols/pointer-constraints-unstable-v1#zwp_pointer_constraints_v1:request:confine_pointer
				let (id, surface, pointer, region, lifetime): (
					wl::Id<wl::ZwpConfinedPointerV1>,
					u32,
					u32,
					u32,
					u32,
				) = wlm::decode::from_slice(params)?;

				let x = parse_request(display, this, surface, pointer, region, lifetime)?;

				let confined = display.create(
					this.client(),
					id,
					version,
					wl::ZwpConfinedPointerV1::new(x.surface, x.pointer, x.region, x.lifetime),
				)?;

				display.object_mut(x.surface)?.confined_pointer = Some(confined);
				display.push_change(Change::PointerConstraintCreated { surface: x.surface });
			}
			_ => color_eyre::eyre::bail!("unknown op '{op}' in ZwpPointerConstraintsV1"),
		}

		Ok(())
	}

	fn is_destructor(op: u16) -> bool {
		op == 0
	}
}

impl wl::Global for ZwpPointerConstraintsV1 {
	fn get_name(&self) -> &'static str {
		"zwp_pointer_constraints_v1"
	}

	fn get_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> wl::Resource {
		self.clone().into()
	}
}
