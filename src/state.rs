use std::time::{Duration, Instant};

/// Presses closer together than this, on the same cell, count as one
/// multi-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy)]
struct LastPress {
    col: u16,
    row: u16,
    at: Instant,
    count: u8,
}

/// Host-side state that has no place in the window manager itself.
#[derive(Debug, Clone, Copy)]
pub struct DesktopState {
    mouse_capture_enabled: bool,
    mouse_capture_dirty: bool,
    last_press: Option<LastPress>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopState {
    pub fn new() -> Self {
        Self {
            mouse_capture_enabled: true,
            mouse_capture_dirty: false,
            last_press: None,
        }
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = true;
    }

    pub fn toggle_mouse_capture(&mut self) {
        let enabled = !self.mouse_capture_enabled;
        self.set_mouse_capture_enabled(enabled);
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        if self.mouse_capture_dirty {
            self.mouse_capture_dirty = false;
            Some(self.mouse_capture_enabled)
        } else {
            None
        }
    }

    /// Record a press and return its click count (1 for a single click, 2 for
    /// the second press of a double-click, and so on).
    pub fn register_press(&mut self, col: u16, row: u16, now: Instant) -> u8 {
        let count = match self.last_press {
            Some(last)
                if last.col == col
                    && last.row == row
                    && now.saturating_duration_since(last.at) <= DOUBLE_CLICK_WINDOW =>
            {
                last.count.saturating_add(1)
            }
            _ => 1,
        };
        self.last_press = Some(LastPress {
            col,
            row,
            at: now,
            count,
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_capture_toggle_and_take_change() {
        let mut s = DesktopState::new();
        assert!(s.mouse_capture_enabled());
        s.set_mouse_capture_enabled(true);
        assert!(s.take_mouse_capture_change().is_none());
        s.set_mouse_capture_enabled(false);
        assert_eq!(s.take_mouse_capture_change(), Some(false));
        assert!(s.take_mouse_capture_change().is_none());
        s.toggle_mouse_capture();
        assert!(s.mouse_capture_enabled());
    }

    #[test]
    fn click_counting() {
        let mut s = DesktopState::new();
        let t0 = Instant::now();
        assert_eq!(s.register_press(3, 4, t0), 1);
        assert_eq!(s.register_press(3, 4, t0 + Duration::from_millis(150)), 2);
        // Too slow.
        assert_eq!(s.register_press(3, 4, t0 + Duration::from_secs(2)), 1);
        // Different cell.
        assert_eq!(s.register_press(9, 4, t0 + Duration::from_millis(2100)), 1);
    }
}
