//! Server side of the Wayland wire protocol: the resource, global and bind engine plus the
//! seat, data transfer, output and virtual desktop state machines built on top of it.
//!
//! The library never decides policy. Client requests that need a decision are queued as
//! [`Change`] values; the compositor drains them with [`Display::take_changes`] and answers
//! through the public entry points of [`seat`], [`output`] and [`virtual_desktop`].
//!
//! Everything is single-threaded. Calling into a [`Display`] from more than one thread is
//! not supported.

mod arena;
mod change;
mod client;
mod connection;
mod display;
mod point;
pub mod output;
pub mod rt;
pub mod seat;
pub mod signal;
mod store;
pub mod surface;
pub mod virtual_desktop;
pub mod wl;

pub use arena::*;
pub use change::*;
pub use client::*;
pub use connection::*;
pub use display::*;
pub use point::*;

pub type Result<T> = color_eyre::Result<T>;
