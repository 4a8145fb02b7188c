//! Host surface backed by a terminal cell grid.
//!
//! The window manager works in pixels; the terminal can only draw whole cells.
//! Every rectangle written here is snapped to the grid (origin rounded down,
//! size rounded up) and `read_rect` reports the snapped value, so gesture
//! commits store what the user actually saw.

use std::collections::BTreeMap;

use ratatui::layout::Rect;

use crate::geometry::{PointerPos, WinRect};
use crate::surface::{FrameToken, HostSurface, SurfaceNode};
use crate::window::WindowId;

/// Pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub px_per_col: u32,
    pub px_per_row: u32,
}

impl CellScale {
    pub fn new(px_per_col: u32, px_per_row: u32) -> Self {
        Self {
            px_per_col: px_per_col.max(1),
            px_per_row: px_per_row.max(1),
        }
    }

    pub fn snap(&self, rect: WinRect) -> WinRect {
        let (sx, sy) = (self.px_per_col, self.px_per_row);
        WinRect::new(
            rect.x / sx * sx,
            rect.y / sy * sy,
            rect.width.div_ceil(sx) * sx,
            rect.height.div_ceil(sy) * sy,
        )
    }

    /// Cell rectangle covering a pixel rectangle, offset by the drawing origin.
    pub fn to_cells(&self, rect: WinRect, origin: Rect) -> Rect {
        let clamp = |v: u32| v.min(u16::MAX as u32) as u16;
        Rect::new(
            origin.x.saturating_add(clamp(rect.x / self.px_per_col)),
            origin.y.saturating_add(clamp(rect.y / self.px_per_row)),
            clamp(rect.width.div_ceil(self.px_per_col)),
            clamp(rect.height.div_ceil(self.px_per_row)),
        )
    }

    /// Pointer position for a cell: its centre, so edge cells land inside
    /// resize grips narrower than a cell.
    pub fn pointer_at(&self, col: u16, row: u16) -> PointerPos {
        let x = col as i64 * self.px_per_col as i64 + self.px_per_col as i64 / 2;
        let y = row as i64 * self.px_per_row as i64 + self.px_per_row as i64 / 2;
        PointerPos::new(
            x.min(i32::MAX as i64) as i32,
            y.min(i32::MAX as i64) as i32,
        )
    }

    pub fn viewport_px(&self, cols: u16, rows: u16) -> (u32, u32) {
        (
            cols as u32 * self.px_per_col,
            rows as u32 * self.px_per_row,
        )
    }
}

#[derive(Debug)]
pub struct TerminalSurface {
    scale: CellScale,
    nodes: BTreeMap<WindowId, SurfaceNode>,
    pending: Vec<FrameToken>,
    next_frame: u64,
}

impl TerminalSurface {
    pub fn new(scale: CellScale) -> Self {
        Self {
            scale,
            nodes: BTreeMap::new(),
            pending: Vec::new(),
            next_frame: 0,
        }
    }

    pub fn scale(&self) -> CellScale {
        self.scale
    }

    pub fn node(&self, id: WindowId) -> Option<SurfaceNode> {
        self.nodes.get(&id).copied()
    }

    /// Frames requested since the last render tick.
    pub fn take_due_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.pending)
    }

    fn node_mut(&mut self, id: WindowId) -> &mut SurfaceNode {
        self.nodes.entry(id).or_insert(SurfaceNode {
            rect: WinRect::default(),
            visible: true,
            transitions: true,
        })
    }
}

impl HostSurface for TerminalSurface {
    fn write_rect(&mut self, id: WindowId, rect: WinRect) {
        let snapped = self.scale.snap(rect);
        self.node_mut(id).rect = snapped;
    }

    fn read_rect(&self, id: WindowId) -> Option<WinRect> {
        self.nodes.get(&id).map(|n| n.rect)
    }

    fn set_visible(&mut self, id: WindowId, visible: bool) {
        self.node_mut(id).visible = visible;
    }

    fn set_transitions_enabled(&mut self, id: WindowId, enabled: bool) {
        self.node_mut(id).transitions = enabled;
    }

    fn remove(&mut self, id: WindowId) {
        self.nodes.remove(&id);
    }

    fn request_frame(&mut self) -> FrameToken {
        self.next_frame += 1;
        let token = FrameToken::new(self.next_frame);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_snap_to_cells() {
        let mut s = TerminalSurface::new(CellScale::new(8, 16));
        let id = WindowId::new(1);
        s.write_rect(id, WinRect::new(13, 30, 300, 200));
        assert_eq!(s.read_rect(id), Some(WinRect::new(8, 16, 304, 208)));
    }

    #[test]
    fn cells_and_pointer_agree() {
        let scale = CellScale::new(8, 16);
        let cells = scale.to_cells(WinRect::new(16, 32, 304, 208), Rect::new(0, 0, 80, 24));
        assert_eq!(cells, Rect::new(2, 2, 38, 13));
        assert_eq!(scale.pointer_at(2, 2), PointerPos::new(20, 40));
        assert_eq!(scale.viewport_px(80, 24), (640, 384));
    }

    #[test]
    fn zero_scale_is_raised() {
        assert_eq!(CellScale::new(0, 0), CellScale::new(1, 1));
    }
}
