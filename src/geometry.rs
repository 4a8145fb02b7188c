//! Geometry primitives and the clamping rules every window write goes
//! through.
//!
//! Stored geometry is unsigned: a window origin can never be negative and the
//! clamp functions below are the only way signed, pointer-derived coordinates
//! are turned into stored ones.

use std::fmt;

/// Top-left corner of a window in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A window rectangle: position plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WinRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl WinRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn contains(&self, pos: PointerPos) -> bool {
        if self.width == 0 || self.height == 0 || pos.x < 0 || pos.y < 0 {
            return false;
        }
        let (px, py) = (pos.x as u64, pos.y as u64);
        px >= self.x as u64 && px < self.right() && py >= self.y as u64 && py < self.bottom()
    }
}

impl fmt::Display for WinRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Pointer coordinates as delivered by the host. Unlike stored geometry these
/// may be negative or beyond the viewport when the pointer leaves the
/// document mid-gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointerPos {
    pub x: i32,
    pub y: i32,
}

impl PointerPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapSide {
    Left,
    Right,
}

/// The drawable desktop area. `chrome_height` is reserved at the bottom for
/// the taskbar and is never covered by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub chrome_height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32, chrome_height: u32) -> Self {
        Self {
            width,
            height,
            chrome_height,
        }
    }

    pub fn usable_height(&self) -> u32 {
        self.height.saturating_sub(self.chrome_height)
    }

    /// Rectangle a maximized window occupies, never smaller than `min`.
    pub fn maximized_rect(&self, min: Size) -> WinRect {
        WinRect::new(
            0,
            0,
            self.width.max(min.width),
            self.usable_height().max(min.height),
        )
    }

    /// Full-height half of the viewport for a snapped window. When half the
    /// viewport is narrower than `min.width` the window keeps the minimum
    /// width and stays flush with its edge.
    pub fn half_rect(&self, side: SnapSide, min: Size) -> WinRect {
        let half = self.width / 2;
        let height = self.usable_height().max(min.height);
        match side {
            SnapSide::Left => WinRect::new(0, 0, half.max(min.width), height),
            SnapSide::Right => {
                let width = (self.width - half).max(min.width);
                WinRect::new(self.width.saturating_sub(width), 0, width, height)
            }
        }
    }
}

/// Clamp a requested origin so the window stays inside the viewport above the
/// reserved chrome. When the window is larger than the available space the
/// origin pins to 0.
pub fn clamp_position(x: i64, y: i64, size: Size, viewport: Viewport) -> Position {
    let max_x = viewport.width.saturating_sub(size.width) as i64;
    let max_y = viewport.usable_height().saturating_sub(size.height) as i64;
    Position::new(x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32)
}

/// Clamp a requested size against the minimum and the space remaining to the
/// right of and below `position`. The minimum always wins over the viewport.
pub fn clamp_size(
    position: Position,
    width: i64,
    height: i64,
    viewport: Viewport,
    min: Size,
) -> Size {
    let room_w = viewport.width.saturating_sub(position.x).max(min.width) as i64;
    let room_h = viewport
        .usable_height()
        .saturating_sub(position.y)
        .max(min.height) as i64;
    Size::new(
        width.clamp(min.width as i64, room_w) as u32,
        height.clamp(min.height as i64, room_h) as u32,
    )
}

/// Clamp a whole rectangle: size first (against a zero origin, so a window is
/// never larger than the viewport allows) then position against that size.
pub fn clamp_rect(rect: WinRect, viewport: Viewport, min: Size) -> WinRect {
    let size = clamp_size(
        Position::default(),
        rect.width as i64,
        rect.height as i64,
        viewport,
        min,
    );
    let position = clamp_position(rect.x as i64, rect.y as i64, size, viewport);
    WinRect::from_parts(position, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Size = Size::new(300, 200);

    fn vp() -> Viewport {
        Viewport::new(1280, 800, 40)
    }

    #[test]
    fn clamp_position_pins_to_edges() {
        let size = Size::new(400, 300);
        assert_eq!(clamp_position(-50, -10, size, vp()), Position::new(0, 0));
        assert_eq!(clamp_position(5000, 5000, size, vp()), Position::new(880, 460));
        assert_eq!(clamp_position(100, 100, size, vp()), Position::new(100, 100));
    }

    #[test]
    fn clamp_position_oversized_window_pins_to_origin() {
        let size = Size::new(2000, 2000);
        assert_eq!(clamp_position(30, 30, size, vp()), Position::new(0, 0));
    }

    #[test]
    fn clamp_size_enforces_minimum_and_room() {
        let pos = Position::new(1000, 600);
        // Room is 280x160, below the minimum: minimum wins.
        assert_eq!(clamp_size(pos, 0, 0, vp(), MIN), MIN);
        let pos = Position::new(100, 100);
        assert_eq!(clamp_size(pos, 9999, 9999, vp(), MIN), Size::new(1180, 660));
        assert_eq!(clamp_size(pos, -5, 250, vp(), MIN), Size::new(300, 250));
    }

    #[test]
    fn half_rect_covers_viewport_without_gap() {
        let v = Viewport::new(1001, 800, 40);
        let left = v.half_rect(SnapSide::Left, MIN);
        let right = v.half_rect(SnapSide::Right, MIN);
        assert_eq!(left, WinRect::new(0, 0, 500, 760));
        assert_eq!(right, WinRect::new(500, 0, 501, 760));
    }

    #[test]
    fn half_rect_respects_minimum_on_narrow_viewport() {
        let v = Viewport::new(500, 400, 40);
        let right = v.half_rect(SnapSide::Right, MIN);
        assert_eq!(right.width, 300);
        assert_eq!(right.x, 200);
        assert_eq!(v.maximized_rect(MIN), WinRect::new(0, 0, 500, 360));
    }

    #[test]
    fn contains_rejects_negative_and_edge() {
        let r = WinRect::new(10, 10, 20, 20);
        assert!(r.contains(PointerPos::new(10, 10)));
        assert!(!r.contains(PointerPos::new(30, 10)));
        assert!(!r.contains(PointerPos::new(-1, 15)));
    }
}
