mod callback;
mod compositor;
mod data_device;
mod data_device_manager;
mod data_offer;
mod data_source;
mod display;
mod id;
mod org_kde_kwin_dpms;
mod org_kde_kwin_dpms_manager;
mod org_kde_plasma_virtual_desktop;
mod org_kde_plasma_virtual_desktop_management;
mod output;
mod pointer;
mod region;
mod registry;
mod resource;
mod seat;
mod sub_compositor;
mod sub_surface;
mod surface;
mod touch;
mod zwlr_output_configuration_v1;
mod zwlr_output_head_v1;
mod zwlr_output_manager_v1;
mod zwlr_output_mode_v1;
mod zwp_confined_pointer_v1;
mod zwp_locked_pointer_v1;
mod zwp_pointer_constraints_v1;
mod zwp_pointer_gesture_pinch_v1;
mod zwp_pointer_gesture_swipe_v1;
mod zwp_pointer_gestures_v1;
mod zwp_primary_selection_device_manager_v1;
mod zwp_primary_selection_device_v1;
mod zwp_primary_selection_offer_v1;
mod zwp_primary_selection_source_v1;
mod zwp_relative_pointer_manager_v1;
mod zwp_relative_pointer_v1;

pub use callback::*;
pub use compositor::*;
pub use data_device::*;
pub use data_device_manager::*;
pub use data_offer::*;
pub use data_source::*;
pub use display::*;
pub use id::*;
pub use org_kde_kwin_dpms::*;
pub use org_kde_kwin_dpms_manager::*;
pub use org_kde_plasma_virtual_desktop::*;
pub use org_kde_plasma_virtual_desktop_management::*;
pub use output::*;
pub use pointer::*;
pub use region::*;
pub use registry::*;
pub use resource::*;
pub use seat::*;
pub use sub_compositor::*;
pub use sub_surface::*;
pub use surface::*;
pub use touch::*;
pub use zwlr_output_configuration_v1::*;
pub use zwlr_output_head_v1::*;
pub use zwlr_output_manager_v1::*;
pub use zwlr_output_mode_v1::*;
pub use zwp_confined_pointer_v1::*;
pub use zwp_locked_pointer_v1::*;
pub use zwp_pointer_constraints_v1::*;
pub use zwp_pointer_gesture_pinch_v1::*;
pub use zwp_pointer_gesture_swipe_v1::*;
pub use zwp_pointer_gestures_v1::*;
pub use zwp_primary_selection_device_manager_v1::*;
pub use zwp_primary_selection_device_v1::*;
pub use zwp_primary_selection_offer_v1::*;
pub use zwp_primary_selection_source_v1::*;
pub use zwp_relative_pointer_manager_v1::*;
pub use zwp_relative_pointer_v1::*;

use crate::Result;

/// A capability advertised through `wl_registry`. Every bind instantiates a fresh
/// resource from the global and then runs `bind` to send the initial state.
pub trait Global {
	fn get_name(&self) -> &'static str;
	fn get_version(&self) -> u32;

	fn min_version(&self) -> u32 {
		1
	}

	fn instantiate(&self) -> Resource;

	fn bind(&self, _display: &mut crate::Display, _object: ObjectRef) -> Result<()> {
		Ok(())
	}
}

pub trait Object: Cast + Into<Resource> {
	const INTERFACE: &'static str;

	fn handle(display: &mut crate::Display, this: Handle<Self>, op: u16, params: &[u8]) -> Result<()>;

	fn is_destructor(_op: u16) -> bool {
		false
	}

	/// Runs after the resource left its client's store, before `Destroyed` observers fire.
	fn destroyed(self, _display: &mut crate::Display, _this: Handle<Self>) -> Result<()> {
		Ok(())
	}
}

/// Resources that belong to one seat.
pub trait SeatBound {
	fn seat(&self) -> crate::seat::SeatKey;
}

pub trait Cast: Sized {
	fn cast(resource: &Resource) -> Option<&Self>;
	fn cast_mut(resource: &mut Resource) -> Option<&mut Self>;
}
