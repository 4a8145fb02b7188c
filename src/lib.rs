//! Window manager core for browser-style desktop simulators.
//!
//! [`window::WindowManager`] owns window geometry, stacking and lifecycle,
//! and drives pointer gestures against a [`surface::HostSurface`]. Everything
//! else in the crate is the terminal host that ships with the `desk-wm`
//! binary.

pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod focus;
pub mod geometry;
pub mod interaction;
pub mod keybindings;
pub mod panel;
pub mod runner;
pub mod snap;
pub mod state;
pub mod surface;
pub mod terminal_surface;
pub mod tracing_sub;
pub mod window;

pub use config::{Capabilities, WmConfig};
pub use error::{WmError, WmResult};
pub use geometry::{PointerPos, Position, Size, SnapSide, Viewport, WinRect};
pub use interaction::{HitZone, PointerEvent, ResizeEdge};
pub use surface::{BufferedSurface, FrameToken, HostSurface};
pub use window::{
    LifecycleState, SubscriptionId, WindowId, WindowManager, WindowMode, WindowNotice, WindowState,
};
