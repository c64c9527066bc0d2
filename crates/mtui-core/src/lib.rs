#![forbid(unsafe_code)]

//! Core: key codes and operations, window geometry, the notification bus,
//! terminal capabilities and the terminal session guard.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod notify;
pub mod terminal_capabilities;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

pub use event::{Input, KeyEvent, Keycode, MenuId, Op};
pub use geometry::{
    Extent, Orientation, SizePolicy, StateFlags, WindowActions, WindowId, WindowState,
};
pub use notify::{Event, EventTypes, NotifierId, NotifyBus, ObserverError, ObserverId};
