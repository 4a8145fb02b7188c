//! Edge snapping during a window drag.
//!
//! The resolver only tracks a pending side while a drag is live. That pending
//! side is advisory: the host may draw a ghost preview from it, but nothing is
//! written to the geometry store until the drag ends.

use crate::geometry::{PointerPos, Size, SnapSide, Viewport, WinRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapResolver {
    threshold: u32,
    pending: Option<SnapSide>,
}

impl SnapResolver {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            pending: None,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// A threshold of zero disables snapping.
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
        if threshold == 0 {
            self.pending = None;
        }
    }

    /// Which edge, if any, the pointer is currently within the threshold of.
    pub fn side_for(&self, pointer: PointerPos, viewport: Viewport) -> Option<SnapSide> {
        if self.threshold == 0 || viewport.width == 0 {
            return None;
        }
        let t = self.threshold as i64;
        let x = pointer.x as i64;
        let right_distance = viewport.width as i64 - 1 - x;
        if x < t {
            Some(SnapSide::Left)
        } else if right_distance < t {
            Some(SnapSide::Right)
        } else {
            None
        }
    }

    /// Re-evaluate the pending side for the latest drag position. Leaving the
    /// threshold clears it.
    pub fn observe(&mut self, pointer: PointerPos, viewport: Viewport) -> Option<SnapSide> {
        let side = self.side_for(pointer, viewport);
        if side != self.pending {
            tracing::trace!(?side, x = pointer.x, "snap target changed");
        }
        self.pending = side;
        side
    }

    pub fn pending(&self) -> Option<SnapSide> {
        self.pending
    }

    /// Preview rectangle for the pending side.
    pub fn ghost(&self, viewport: Viewport, min: Size) -> Option<(SnapSide, WinRect)> {
        self.pending.map(|side| (side, viewport.half_rect(side, min)))
    }

    pub fn take(&mut self) -> Option<SnapSide> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
