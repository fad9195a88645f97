pub type Dispatch = fn(&mut crate::Display, crate::wl::ObjectRef, u16, &[u8]) -> crate::Result<()>;

macro_rules! implement {
    ($($children:ident),*$(,)?) => {
        pub enum Resource {
            $(
                $children(crate::wl::$children),
            )*
        }

        impl Resource {
            pub fn interface(&self) -> &'static str {
                match self {
                    $(
                        Self::$children(_) => <crate::wl::$children as crate::wl::Object>::INTERFACE,
                    )*
                }
            }

            pub fn dispatcher(&self) -> Dispatch {
                match self {
                    $(
                        Self::$children(_) => {
                            let f: Dispatch = |display, object, op, params| {
                                <crate::wl::$children as crate::wl::Object>::handle(display, crate::wl::Handle::new(object), op, params)
                            };
                            f
                        }
                    )*
                }
            }

            pub fn is_destructor(&self, op: u16) -> bool {
                match self {
                    $(
                        Self::$children(_) => <crate::wl::$children as crate::wl::Object>::is_destructor(op),
                    )*
                }
            }

            pub fn destroyed(self, display: &mut crate::Display, object: crate::wl::ObjectRef) -> crate::Result<()> {
                match self {
                    $(
                        Self::$children(x) => crate::wl::Object::destroyed(x, display, crate::wl::Handle::new(object)),
                    )*
                }
            }
        }

        $(
            impl From<crate::wl::$children> for Resource {
                fn from(x: crate::wl::$children) -> Self {
                    Self::$children(x)
                }
            }

            impl crate::wl::Cast for crate::wl::$children {
                fn cast(x: &Resource) -> Option<&Self> {
                    match x {
                        Resource::$children(x) => Some(x),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn cast_mut(x: &mut Resource) -> Option<&mut Self> {
                    match x {
                        Resource::$children(x) => Some(x),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    }
}

implement![
	Callback,
	Compositor,
	DataDevice,
	DataDeviceManager,
	DataOffer,
	DataSource,
	Display,
	OrgKdeKwinDpms,
	OrgKdeKwinDpmsManager,
	OrgKdePlasmaVirtualDesktop,
	OrgKdePlasmaVirtualDesktopManagement,
	Output,
	Pointer,
	Region,
	Registry,
	Seat,
	SubCompositor,
	SubSurface,
	Surface,
	Touch,
	ZwlrOutputConfigurationV1,
	ZwlrOutputHeadV1,
	ZwlrOutputManagerV1,
	ZwlrOutputModeV1,
	ZwpConfinedPointerV1,
	ZwpLockedPointerV1,
	ZwpPointerConstraintsV1,
	ZwpPointerGesturePinchV1,
	ZwpPointerGestureSwipeV1,
	ZwpPointerGesturesV1,
	ZwpPrimarySelectionDeviceManagerV1,
	ZwpPrimarySelectionDeviceV1,
	ZwpPrimarySelectionOfferV1,
	ZwpPrimarySelectionSourceV1,
	ZwpRelativePointerManagerV1,
	ZwpRelativePointerV1,
];
