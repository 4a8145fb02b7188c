//! The authoritative geometry store.
//!
//! Every write clamps before it lands, so readers never observe a window that
//! is off the viewport or below the minimum size. Writes to an id that is not
//! present change nothing and come back as [`WmError::UnknownWindow`].

use std::collections::BTreeMap;

use super::{WindowId, WindowState};
use crate::error::{WmError, WmResult};
use crate::geometry::{Position, Size, Viewport, WinRect, clamp_position, clamp_rect, clamp_size};

#[derive(Debug, Clone)]
pub struct GeometryModel {
    windows: BTreeMap<WindowId, WindowState>,
    viewport: Viewport,
    min_size: Size,
}

impl GeometryModel {
    pub fn new(viewport: Viewport, min_size: Size) -> Self {
        Self {
            windows: BTreeMap::new(),
            viewport,
            min_size,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowState> {
        self.windows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowState> {
        self.windows.values()
    }

    pub(crate) fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> WmResult<&mut WindowState> {
        self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))
    }

    pub(crate) fn insert(&mut self, state: WindowState) {
        self.windows.insert(state.id, state);
    }

    pub(crate) fn remove(&mut self, id: WindowId) -> WmResult<WindowState> {
        self.windows.remove(&id).ok_or(WmError::UnknownWindow(id))
    }

    /// Move a window, clamping x to `[0, viewport.width - width]` and y to
    /// `[0, usable_height - height]`.
    pub fn set_position(&mut self, id: WindowId, x: i64, y: i64) -> WmResult<Position> {
        let viewport = self.viewport;
        let window = self.get_mut(id)?;
        let position = clamp_position(x, y, window.size, viewport);
        if position.x as i64 != x || position.y as i64 != y {
            tracing::trace!(window_id = %id, x, y, ?position, "clamped position");
        }
        window.position = position;
        Ok(position)
    }

    /// Resize a window keeping its origin, clamping each dimension between the
    /// minimum and the room left to the viewport edge.
    pub fn set_size(&mut self, id: WindowId, width: i64, height: i64) -> WmResult<Size> {
        let viewport = self.viewport;
        let min = self.min_size;
        let window = self.get_mut(id)?;
        let size = clamp_size(window.position, width, height, viewport, min);
        if size.width as i64 != width || size.height as i64 != height {
            tracing::trace!(window_id = %id, width, height, ?size, "clamped size");
        }
        window.size = size;
        Ok(size)
    }

    /// Write a whole rectangle in one step, size first so the position clamp
    /// sees the final size.
    pub fn set_rect(&mut self, id: WindowId, rect: WinRect) -> WmResult<WinRect> {
        let clamped = clamp_rect(rect, self.viewport, self.min_size);
        let window = self.get_mut(id)?;
        window.position = clamped.position();
        window.size = clamped.size();
        Ok(clamped)
    }

    /// Write a rectangle the lifecycle already derived from the viewport
    /// (maximized or snapped layouts, restore snapshots). Only the minimum
    /// size is enforced.
    pub(crate) fn place(&mut self, id: WindowId, rect: WinRect) -> WmResult<()> {
        let min = self.min_size;
        let window = self.get_mut(id)?;
        window.position = rect.position();
        window.size = Size::new(rect.width.max(min.width), rect.height.max(min.height));
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let min = self.min_size;
        let mut seen_z = std::collections::BTreeSet::new();
        for w in self.windows.values() {
            assert!(
                w.size.width >= min.width && w.size.height >= min.height,
                "{} below minimum: {:?}",
                w.id,
                w.size
            );
            assert_eq!(
                w.restore_rect.is_some(),
                w.mode.holds_restore_rect(),
                "{} restore rect out of sync with {:?}",
                w.id,
                w.mode
            );
            assert!(seen_z.insert(w.z_index), "duplicate z-index {}", w.z_index);
        }
    }
}
