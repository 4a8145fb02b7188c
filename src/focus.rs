//! Stacking order.
//!
//! z-indices come from a single counter owned by the [`FocusManager`]. The
//! counter only increases, so two windows can never share a z-index and
//! raising one window never renumbers the others.

use crate::error::{WmError, WmResult};
use crate::window::WindowId;
use crate::window::store::GeometryModel;

#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    counter: u64,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next z-index. Used both for freshly opened windows and
    /// when raising an existing one.
    pub(crate) fn allocate(&mut self) -> u64 {
        self.counter = self.counter.saturating_add(1);
        self.counter
    }

    /// Highest z-index handed out so far.
    pub fn high_water(&self) -> u64 {
        self.counter
    }

    /// Raise `id` above every other window. Returns `Ok(false)` when it already
    /// holds the highest z-index, which makes repeated calls idempotent.
    pub fn focus(&mut self, model: &mut GeometryModel, id: WindowId) -> WmResult<bool> {
        let current = model.get(id).ok_or(WmError::UnknownWindow(id))?.z_index;
        let max = model.iter().map(|w| w.z_index).max().unwrap_or(0);
        if current == max {
            return Ok(false);
        }
        let z = self.allocate();
        model.get_mut(id)?.z_index = z;
        tracing::trace!(window_id = %id, z, "raised window");
        Ok(true)
    }

    /// The visible (non-minimized) window with the highest z-index.
    pub fn topmost(&self, model: &GeometryModel) -> Option<WindowId> {
        model
            .iter()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Visible windows ordered back to front, the order a host paints them.
    pub fn paint_order(&self, model: &GeometryModel) -> Vec<WindowId> {
        let mut visible: Vec<_> = model.iter().filter(|w| !w.is_minimized()).collect();
        visible.sort_by_key(|w| w.z_index);
        visible.into_iter().map(|w| w.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, Viewport, WinRect};
    use crate::window::WindowState;

    fn setup(n: u64) -> (FocusManager, GeometryModel) {
        let mut focus = FocusManager::new();
        let mut model = GeometryModel::new(Viewport::new(1280, 800, 40), Size::new(300, 200));
        for raw in 1..=n {
            let z = focus.allocate();
            model.insert(WindowState::new(
                WindowId::new(raw),
                format!("w{raw}"),
                WinRect::new(0, 0, 400, 300),
                z,
            ));
        }
        (focus, model)
    }

    #[test]
    fn focus_is_idempotent() {
        let (mut focus, mut model) = setup(2);
        let a = WindowId::new(1);
        assert_eq!(focus.focus(&mut model, a), Ok(true));
        let z = model.get(a).unwrap().z_index();
        assert_eq!(focus.focus(&mut model, a), Ok(false));
        assert_eq!(model.get(a).unwrap().z_index(), z);
        assert_eq!(focus.topmost(&model), Some(a));
    }

    #[test]
    fn focus_does_not_renumber_others() {
        let (mut focus, mut model) = setup(3);
        let before: Vec<_> = [2, 3]
            .iter()
            .map(|&r| model.get(WindowId::new(r)).unwrap().z_index())
            .collect();
        focus.focus(&mut model, WindowId::new(1)).unwrap();
        let after: Vec<_> = [2, 3]
            .iter()
            .map(|&r| model.get(WindowId::new(r)).unwrap().z_index())
            .collect();
        assert_eq!(before, after);
        assert_eq!(
            focus.paint_order(&model),
            vec![WindowId::new(2), WindowId::new(3), WindowId::new(1)]
        );
    }

    #[test]
    fn topmost_skips_minimized() {
        let (focus, mut model) = setup(2);
        model.get_mut(WindowId::new(2)).unwrap().minimized = true;
        assert_eq!(focus.topmost(&model), Some(WindowId::new(1)));
        model.get_mut(WindowId::new(1)).unwrap().minimized = true;
        assert_eq!(focus.topmost(&model), None);
    }

    #[test]
    fn unknown_id_is_reported() {
        let (mut focus, mut model) = setup(1);
        let ghost = WindowId::new(42);
        assert_eq!(
            focus.focus(&mut model, ghost),
            Err(WmError::UnknownWindow(ghost))
        );
    }
}
