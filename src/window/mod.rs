pub mod decorator;
pub mod store;

mod window_manager;

use std::fmt;

use crate::config::Capabilities;
use crate::geometry::{Position, Size, SnapSide, Viewport, WinRect};

pub use window_manager::{SubscriptionId, WindowManager, WindowNotice};

/// Opaque handle for an open window. Ids come from a counter that only moves
/// forward, so an id is never handed out twice by the same manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Layout a window has when it is not minimized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowMode {
    #[default]
    Windowed,
    Maximized,
    Snapped(SnapSide),
}

impl WindowMode {
    /// Maximized and snapped layouts own a restore rectangle; windowed does
    /// not.
    pub fn holds_restore_rect(self) -> bool {
        !matches!(self, WindowMode::Windowed)
    }
}

/// The externally visible state of a window, including the terminal
/// `Closed` state for ids that are no longer open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Windowed,
    Maximized,
    Minimized,
    Snapped(SnapSide),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub(crate) id: WindowId,
    pub(crate) title: String,
    pub(crate) position: Position,
    pub(crate) size: Size,
    pub(crate) z_index: u64,
    pub(crate) mode: WindowMode,
    pub(crate) minimized: bool,
    pub(crate) restore_rect: Option<WinRect>,
}

impl WindowState {
    pub(crate) fn new(id: WindowId, title: String, rect: WinRect, z_index: u64) -> Self {
        Self {
            id,
            title,
            position: rect.position(),
            size: rect.size(),
            z_index,
            mode: WindowMode::Windowed,
            minimized: false,
            restore_rect: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rect(&self) -> WinRect {
        WinRect::from_parts(self.position, self.size)
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// A minimized window is never reported as maximized, even though it
    /// returns to the maximized layout when un-minimized.
    pub fn is_maximized(&self) -> bool {
        !self.minimized && self.mode == WindowMode::Maximized
    }

    pub fn snapped_side(&self) -> Option<SnapSide> {
        match self.mode {
            WindowMode::Snapped(side) if !self.minimized => Some(side),
            _ => None,
        }
    }

    pub fn restore_rect(&self) -> Option<WinRect> {
        self.restore_rect
    }

    pub fn lifecycle(&self) -> LifecycleState {
        if self.minimized {
            return LifecycleState::Minimized;
        }
        match self.mode {
            WindowMode::Windowed => LifecycleState::Windowed,
            WindowMode::Maximized => LifecycleState::Maximized,
            WindowMode::Snapped(side) => LifecycleState::Snapped(side),
        }
    }

    /// Rectangle the host should render. Maximized and touch layouts are two
    /// independent flags; the touch capability wins and fills the surface.
    pub fn effective_rect(&self, viewport: Viewport, min: Size, caps: Capabilities) -> WinRect {
        if caps.touch_layout {
            viewport.maximized_rect(min)
        } else {
            self.rect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WindowState {
        WindowState::new(
            WindowId::new(1),
            "Terminal".to_string(),
            WinRect::new(10, 20, 400, 300),
            1,
        )
    }

    #[test]
    fn lifecycle_reports_minimized_over_mode() {
        let mut s = sample();
        s.mode = WindowMode::Maximized;
        s.restore_rect = Some(WinRect::new(10, 20, 400, 300));
        assert!(s.is_maximized());
        s.minimized = true;
        assert!(!s.is_maximized());
        assert_eq!(s.lifecycle(), LifecycleState::Minimized);
        s.minimized = false;
        assert_eq!(s.lifecycle(), LifecycleState::Maximized);
    }

    #[test]
    fn effective_rect_fills_surface_in_touch_layout() {
        let s = sample();
        let vp = Viewport::new(800, 600, 40);
        let min = Size::new(300, 200);
        assert_eq!(
            s.effective_rect(vp, min, Capabilities::desktop()),
            WinRect::new(10, 20, 400, 300)
        );
        assert_eq!(
            s.effective_rect(vp, min, Capabilities::touch()),
            WinRect::new(0, 0, 800, 560)
        );
    }

    #[test]
    fn window_id_display() {
        assert_eq!(WindowId::new(7).to_string(), "w7");
    }
}
