use crate::geometry::{PointerPos, Size, Viewport, WinRect, clamp_position, clamp_size};
use crate::snap::SnapResolver;
use crate::window::WindowId;

/// Resize grips. All of them keep the top-left corner fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Right,
    Bottom,
    BottomRight,
}

impl ResizeEdge {
    fn grows_width(self) -> bool {
        matches!(self, ResizeEdge::Right | ResizeEdge::BottomRight)
    }

    fn grows_height(self) -> bool {
        matches!(self, ResizeEdge::Bottom | ResizeEdge::BottomRight)
    }
}

/// Part of a window under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitZone {
    TitleBar,
    Body,
    Resize(ResizeEdge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Pointer offset from the window origin, captured at pointer-down.
    Drag { offset_x: i64, offset_y: i64 },
    Resize {
        edge: ResizeEdge,
        start_pointer: PointerPos,
    },
}

/// State scoped to one gesture: created on pointer-down, dropped on
/// pointer-up or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureContext {
    pub id: WindowId,
    pub kind: GestureKind,
    /// Committed rectangle when the gesture started.
    pub start_rect: WinRect,
    /// Latest rectangle computed from the pointer; the next frame writes it.
    pub target: WinRect,
    pub moves: u64,
    pub frames_written: u64,
}

impl GestureContext {
    pub fn drag(id: WindowId, start_rect: WinRect, pointer: PointerPos) -> Self {
        Self {
            id,
            kind: GestureKind::Drag {
                offset_x: pointer.x as i64 - start_rect.x as i64,
                offset_y: pointer.y as i64 - start_rect.y as i64,
            },
            start_rect,
            target: start_rect,
            moves: 0,
            frames_written: 0,
        }
    }

    pub fn resize(
        id: WindowId,
        start_rect: WinRect,
        edge: ResizeEdge,
        pointer: PointerPos,
    ) -> Self {
        Self {
            id,
            kind: GestureKind::Resize {
                edge,
                start_pointer: pointer,
            },
            start_rect,
            target: start_rect,
            moves: 0,
            frames_written: 0,
        }
    }

    pub fn is_drag(&self) -> bool {
        matches!(self.kind, GestureKind::Drag { .. })
    }

    /// Recompute the target rectangle for a pointer position.
    pub fn retarget(&mut self, pointer: PointerPos, viewport: Viewport, min: Size) -> WinRect {
        self.target = match self.kind {
            GestureKind::Drag { offset_x, offset_y } => {
                apply_drag(self.start_rect, offset_x, offset_y, pointer, viewport)
            }
            GestureKind::Resize {
                edge,
                start_pointer,
            } => apply_resize(self.start_rect, edge, start_pointer, pointer, viewport, min),
        };
        self.moves += 1;
        self.target
    }

    /// Feed the pointer to the snap resolver. Resizes never snap.
    pub fn observe_snap(&self, snap: &mut SnapResolver, pointer: PointerPos, viewport: Viewport) {
        if self.is_drag() {
            snap.observe(pointer, viewport);
        }
    }
}

/// New rectangle for a drag: pointer minus the captured offset, clamped so the
/// window stays on screen. Size never changes.
pub fn apply_drag(
    start: WinRect,
    offset_x: i64,
    offset_y: i64,
    pointer: PointerPos,
    viewport: Viewport,
) -> WinRect {
    let position = clamp_position(
        pointer.x as i64 - offset_x,
        pointer.y as i64 - offset_y,
        start.size(),
        viewport,
    );
    WinRect::from_parts(position, start.size())
}

/// New rectangle for a resize anchored at the top-left corner.
pub fn apply_resize(
    start: WinRect,
    edge: ResizeEdge,
    start_pointer: PointerPos,
    pointer: PointerPos,
    viewport: Viewport,
    min: Size,
) -> WinRect {
    let dx = pointer.x as i64 - start_pointer.x as i64;
    let dy = pointer.y as i64 - start_pointer.y as i64;
    let mut width = start.width as i64;
    let mut height = start.height as i64;
    if edge.grows_width() {
        width += dx;
    }
    if edge.grows_height() {
        height += dy;
    }
    let origin = start.position();
    WinRect::from_parts(origin, clamp_size(origin, width, height, viewport, min))
}

/// Classify a pointer position inside `rect`. Resize grips are checked first
/// so they win over the title bar on short windows.
pub fn zone_at(
    rect: WinRect,
    pos: PointerPos,
    title_bar_height: u32,
    handle: u32,
    resizable: bool,
) -> Option<HitZone> {
    if !rect.contains(pos) {
        return None;
    }
    let px = pos.x as u64;
    let py = pos.y as u64;
    if resizable && handle > 0 {
        let handle = handle as u64;
        let on_right = px + handle >= rect.right();
        let on_bottom = py + handle >= rect.bottom();
        match (on_right, on_bottom) {
            (true, true) => return Some(HitZone::Resize(ResizeEdge::BottomRight)),
            (true, false) => return Some(HitZone::Resize(ResizeEdge::Right)),
            (false, true) => return Some(HitZone::Resize(ResizeEdge::Bottom)),
            (false, false) => {}
        }
    }
    if py < rect.y as u64 + title_bar_height as u64 {
        Some(HitZone::TitleBar)
    } else {
        Some(HitZone::Body)
    }
}
