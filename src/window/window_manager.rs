use std::collections::BTreeMap;

use super::store::GeometryModel;
use super::{LifecycleState, WindowId, WindowMode, WindowState};
use crate::config::{Capabilities, WmConfig};
use crate::constants::DOUBLE_CLICK_COUNT;
use crate::error::{WmError, WmResult};
use crate::focus::FocusManager;
use crate::geometry::{PointerPos, Position, Size, SnapSide, Viewport, WinRect, clamp_rect};
use crate::interaction::{
    GestureCommit, GestureKind, GestureStats, HitZone, InteractionEngine, PointerEvent,
    ResizeEdge, zone_at,
};
use crate::surface::{FrameToken, HostSurface};

/// Handle returned by [`WindowManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// What a subscriber is told. Notices only follow committed changes; live
/// drag and resize frames never produce one.
#[derive(Debug, Clone, Copy)]
pub enum WindowNotice<'a> {
    Changed(&'a WindowState),
    Closed(WindowId),
}

type Subscriber = Box<dyn FnMut(WindowNotice<'_>)>;

/// The window manager core: owns the geometry store and is the only writer
/// to it. Lifecycle transitions happen here, as does the single commit at
/// the end of every gesture.
pub struct WindowManager<S: HostSurface> {
    config: WmConfig,
    model: GeometryModel,
    focus: FocusManager,
    engine: InteractionEngine,
    surface: S,
    subscribers: BTreeMap<WindowId, Vec<(SubscriptionId, Subscriber)>>,
    next_window: u64,
    next_subscription: u64,
}

fn unknown(id: WindowId) -> WmError {
    tracing::debug!(window_id = %id, "operation on unknown window ignored");
    WmError::UnknownWindow(id)
}

impl<S: HostSurface> WindowManager<S> {
    pub fn new(config: WmConfig, surface: S) -> Self {
        Self {
            model: GeometryModel::new(config.viewport, config.min_size),
            focus: FocusManager::new(),
            engine: InteractionEngine::new(config.snap_threshold),
            config,
            surface,
            subscribers: BTreeMap::new(),
            next_window: 0,
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn model(&self) -> &GeometryModel {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn stats(&self) -> GestureStats {
        self.engine.stats()
    }

    pub fn viewport(&self) -> Viewport {
        self.model.viewport()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    fn window(&self, id: WindowId) -> WmResult<&WindowState> {
        self.model.get(id).ok_or_else(|| unknown(id))
    }

    fn window_mut(&mut self, id: WindowId) -> WmResult<&mut WindowState> {
        self.model.get_mut(id).map_err(|_| unknown(id))
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    pub fn get_state(&self, id: WindowId) -> Option<&WindowState> {
        self.model.get(id)
    }

    pub fn lifecycle(&self, id: WindowId) -> LifecycleState {
        self.model
            .get(id)
            .map_or(LifecycleState::Closed, WindowState::lifecycle)
    }

    pub fn topmost(&self) -> Option<WindowId> {
        self.focus.topmost(&self.model)
    }

    /// Every open window, minimized ones included, in id (open) order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowState> {
        self.model.iter()
    }

    /// Visible windows back to front.
    pub fn windows_in_z_order(&self) -> Vec<&WindowState> {
        self.focus
            .paint_order(&self.model)
            .into_iter()
            .filter_map(|id| self.model.get(id))
            .collect()
    }

    /// Rectangle the host should render for `id`, accounting for the touch
    /// layout.
    pub fn effective_rect(&self, id: WindowId) -> Option<WinRect> {
        let window = self.model.get(id)?;
        Some(window.effective_rect(
            self.model.viewport(),
            self.model.min_size(),
            self.config.capabilities,
        ))
    }

    /// Ghost rectangle for the edge the active drag would snap to.
    pub fn snap_preview(&self) -> Option<(SnapSide, WinRect)> {
        if !self.engine.is_active() {
            return None;
        }
        self.engine
            .snap()
            .ghost(self.model.viewport(), self.model.min_size())
    }

    // ----------------------------------------------------------------------
    // Subscriptions
    // ----------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, id: WindowId, callback: F) -> WmResult<SubscriptionId>
    where
        F: FnMut(WindowNotice<'_>) + 'static,
    {
        self.window(id)?;
        self.next_subscription += 1;
        let sub = SubscriptionId(self.next_subscription);
        self.subscribers
            .entry(id)
            .or_default()
            .push((sub, Box::new(callback)));
        Ok(sub)
    }

    pub fn unsubscribe(&mut self, id: WindowId, sub: SubscriptionId) -> bool {
        let Some(list) = self.subscribers.get_mut(&id) else {
            return false;
        };
        let before = list.len();
        list.retain(|(s, _)| *s != sub);
        before != list.len()
    }

    fn notify(&mut self, id: WindowId) {
        if let (Some(state), Some(list)) = (self.model.get(id), self.subscribers.get_mut(&id)) {
            for (_, callback) in list.iter_mut() {
                callback(WindowNotice::Changed(state));
            }
        }
    }

    fn sync_surface(&mut self, id: WindowId) {
        let Some(rect) = self.effective_rect(id) else {
            return;
        };
        let visible = self.model.get(id).is_some_and(|w| !w.is_minimized());
        self.surface.write_rect(id, rect);
        self.surface.set_visible(id, visible);
    }

    fn committed(&mut self, id: WindowId) {
        self.sync_surface(id);
        self.notify(id);
    }

    // ----------------------------------------------------------------------
    // Lifecycle
    // ----------------------------------------------------------------------

    /// Open a window. Missing size falls back to the configured default,
    /// missing position cascades from the configured origin. Both are clamped.
    pub fn open(
        &mut self,
        title: impl Into<String>,
        size: Option<Size>,
        position: Option<Position>,
    ) -> WindowId {
        self.next_window += 1;
        let id = WindowId::new(self.next_window);
        let size = size.unwrap_or(self.config.default_size);
        let position = position.unwrap_or_else(|| self.cascade_position(size));
        let rect = clamp_rect(
            WinRect::from_parts(position, size),
            self.model.viewport(),
            self.model.min_size(),
        );
        let z = self.focus.allocate();
        let title = title.into();
        tracing::debug!(window_id = %id, %title, %rect, z, "opened window");
        self.model.insert(WindowState::new(id, title, rect, z));
        self.sync_surface(id);
        id
    }

    fn cascade_position(&self, size: Size) -> Position {
        let origin = self.config.cascade_origin;
        let step = self.config.cascade_step;
        if step == 0 {
            return origin;
        }
        let vp = self.model.viewport();
        let room_x = vp
            .width
            .saturating_sub(origin.x.saturating_add(size.width))
            / step;
        let room_y = vp
            .usable_height()
            .saturating_sub(origin.y.saturating_add(size.height))
            / step;
        let slots = room_x.min(room_y).saturating_add(1);
        let k = self.model.len() as u32 % slots;
        Position::new(origin.x + k * step, origin.y + k * step)
    }

    /// Remove a window. Focus falls to the next-highest visible window
    /// without renumbering anything.
    pub fn close(&mut self, id: WindowId) -> WmResult<()> {
        self.window(id)?;
        if self.engine.active().is_some_and(|g| g.id == id) {
            self.engine.abort(&mut self.surface);
        }
        self.model.remove(id)?;
        self.surface.remove(id);
        if let Some(mut list) = self.subscribers.remove(&id) {
            for (_, callback) in list.iter_mut() {
                callback(WindowNotice::Closed(id));
            }
        }
        tracing::debug!(window_id = %id, next_focus = ?self.topmost(), "closed window");
        Ok(())
    }

    /// Hide a window. Its geometry and mode are frozen so un-minimizing
    /// reproduces the exact prior appearance.
    pub fn minimize(&mut self, id: WindowId) -> WmResult<()> {
        if self.window(id)?.is_minimized() {
            return Ok(());
        }
        self.settle_gesture_for(id);
        self.window_mut(id)?.minimized = true;
        tracing::debug!(window_id = %id, next_focus = ?self.topmost(), "minimized window");
        self.committed(id);
        Ok(())
    }

    /// Unhide without touching geometry, even when the viewport changed while
    /// the window was minimized.
    fn unminimize(&mut self, id: WindowId) -> WmResult<()> {
        self.window_mut(id)?.minimized = false;
        self.focus.focus(&mut self.model, id)?;
        tracing::debug!(window_id = %id, state = ?self.lifecycle(id), "unminimized window");
        self.committed(id);
        Ok(())
    }

    /// Fill the usable viewport. Ignored while minimized: a minimized window
    /// has to be restored to the state it left before it can change layout.
    pub fn maximize(&mut self, id: WindowId) -> WmResult<()> {
        let window = self.window(id)?;
        if window.is_minimized() {
            tracing::trace!(window_id = %id, "maximize ignored while minimized");
            return Ok(());
        }
        if window.mode() == WindowMode::Maximized {
            return Ok(());
        }
        self.settle_gesture_for(id);
        let full = self
            .model
            .viewport()
            .maximized_rect(self.model.min_size());
        let window = self.window_mut(id)?;
        // A snapped window keeps the pre-snap rectangle it already holds.
        if window.mode() == WindowMode::Windowed {
            window.restore_rect = Some(window.rect());
        }
        window.mode = WindowMode::Maximized;
        self.model.place(id, full)?;
        self.focus.focus(&mut self.model, id)?;
        tracing::debug!(window_id = %id, rect = %full, "maximized window");
        self.committed(id);
        Ok(())
    }

    /// Dock to half of the viewport. Shares the maximize path: the windowed
    /// rectangle is snapshotted first, and a window that is already
    /// maximized or snapped keeps its original snapshot.
    pub fn snap(&mut self, id: WindowId, side: SnapSide) -> WmResult<()> {
        let window = self.window(id)?;
        if window.is_minimized() {
            tracing::trace!(window_id = %id, "snap ignored while minimized");
            return Ok(());
        }
        if window.mode() == WindowMode::Snapped(side) {
            return Ok(());
        }
        self.settle_gesture_for(id);
        let half = self
            .model
            .viewport()
            .half_rect(side, self.model.min_size());
        let window = self.window_mut(id)?;
        if window.mode() == WindowMode::Windowed {
            window.restore_rect = Some(window.rect());
        }
        window.mode = WindowMode::Snapped(side);
        self.model.place(id, half)?;
        self.focus.focus(&mut self.model, id)?;
        tracing::debug!(window_id = %id, ?side, rect = %half, "snapped window");
        self.committed(id);
        Ok(())
    }

    /// Undo the most recent layout change: un-minimize back to whatever state
    /// the window was minimized from, otherwise return a maximized or snapped
    /// window to its saved rectangle.
    pub fn restore(&mut self, id: WindowId) -> WmResult<()> {
        let window = self.window(id)?;
        if window.is_minimized() {
            return self.unminimize(id);
        }
        if window.mode() == WindowMode::Windowed {
            return Ok(());
        }
        self.settle_gesture_for(id);
        let window = self.window_mut(id)?;
        let saved = window.restore_rect.take().unwrap_or_else(|| window.rect());
        window.mode = WindowMode::Windowed;
        let rect = self.model.set_rect(id, saved)?;
        if rect != saved {
            tracing::trace!(window_id = %id, %saved, %rect, "restore rect re-clamped");
        }
        self.focus.focus(&mut self.model, id)?;
        tracing::debug!(window_id = %id, %rect, "restored window");
        self.committed(id);
        Ok(())
    }

    /// Maximize button / title bar double-click. A maximized or snapped
    /// window goes back to its saved rectangle; triggering again maximizes.
    pub fn toggle_maximize(&mut self, id: WindowId) -> WmResult<()> {
        let window = self.window(id)?;
        if window.is_minimized() {
            return Ok(());
        }
        match window.mode() {
            WindowMode::Windowed => self.maximize(id),
            WindowMode::Maximized | WindowMode::Snapped(_) => self.restore(id),
        }
    }

    /// Raise `id` to the top of the stack. Calling it again is a no-op.
    pub fn focus(&mut self, id: WindowId) -> WmResult<()> {
        self.window(id)?;
        if self.focus.focus(&mut self.model, id)? {
            self.notify(id);
        }
        Ok(())
    }

    /// Raise the bottom-most visible window (`forward`) or the one directly
    /// under the current top (`!forward`).
    pub fn cycle_focus(&mut self, forward: bool) -> Option<WindowId> {
        let order = self.focus.paint_order(&self.model);
        let next = if forward {
            order.first().copied()
        } else {
            order.len().checked_sub(2).and_then(|i| order.get(i).copied())
        }?;
        self.focus(next).ok()?;
        Some(next)
    }

    /// Taskbar button semantics: restore a minimized window, minimize the
    /// focused one, otherwise bring it to the front.
    pub fn activate_from_taskbar(&mut self, id: WindowId) -> WmResult<()> {
        if self.window(id)?.is_minimized() {
            self.restore(id)
        } else if self.topmost() == Some(id) {
            self.minimize(id)
        } else {
            self.focus(id)
        }
    }

    /// Programmatic move with the same clamping as a drag. Ignored unless the
    /// window is visible and windowed.
    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> WmResult<()> {
        if !self.programmable(id)? {
            return Ok(());
        }
        self.settle_gesture_for(id);
        let before = self.window(id)?.position();
        let after = self.model.set_position(id, x as i64, y as i64)?;
        if before != after {
            self.committed(id);
        }
        Ok(())
    }

    /// Programmatic resize anchored at the top-left corner, clamped like a
    /// resize gesture.
    pub fn resize(&mut self, id: WindowId, width: i32, height: i32) -> WmResult<()> {
        if !self.programmable(id)? {
            return Ok(());
        }
        self.settle_gesture_for(id);
        let before = self.window(id)?.size();
        let after = self.model.set_size(id, width as i64, height as i64)?;
        if before != after {
            self.committed(id);
        }
        Ok(())
    }

    fn programmable(&self, id: WindowId) -> WmResult<bool> {
        let window = self.window(id)?;
        let ok = !window.is_minimized() && window.mode() == WindowMode::Windowed;
        if !ok {
            tracing::trace!(window_id = %id, state = ?window.lifecycle(), "geometry write ignored");
        }
        Ok(ok)
    }

    // ----------------------------------------------------------------------
    // Host-driven changes
    // ----------------------------------------------------------------------

    /// React to a viewport resize. Visible maximized and snapped windows are
    /// refitted, visible windowed ones re-clamped. Minimized windows keep
    /// their frozen geometry.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height, self.config.viewport.chrome_height);
        if viewport == self.model.viewport() {
            return;
        }
        tracing::debug!(width, height, "viewport changed");
        self.config.viewport = viewport;
        self.model.set_viewport(viewport);
        for id in self.model.ids() {
            if self.model.get(id).is_none_or(WindowState::is_minimized) {
                continue;
            }
            match self.refit(id) {
                Ok(true) => self.committed(id),
                _ => self.sync_surface(id),
            }
        }
    }

    /// Re-derive a window's rectangle from the current viewport: maximized
    /// and snapped layouts are recomputed, windowed ones re-clamped. Returns
    /// whether the rectangle changed.
    fn refit(&mut self, id: WindowId) -> WmResult<bool> {
        let viewport = self.model.viewport();
        let min = self.model.min_size();
        let window = self.window(id)?;
        let before = window.rect();
        match window.mode() {
            WindowMode::Windowed => {
                self.model.set_rect(id, before)?;
            }
            WindowMode::Maximized => self.model.place(id, viewport.maximized_rect(min))?,
            WindowMode::Snapped(side) => self.model.place(id, viewport.half_rect(side, min))?,
        }
        Ok(self.window(id)?.rect() != before)
    }

    /// Switch between desktop and touch layouts. Any live gesture is
    /// committed first; every window is re-rendered with its new effective
    /// rectangle.
    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        if capabilities == self.config.capabilities {
            return;
        }
        if !capabilities.manipulable() {
            self.cancel_gesture();
        }
        tracing::debug!(?capabilities, "capabilities changed");
        self.config.capabilities = capabilities;
        for id in self.model.ids() {
            self.sync_surface(id);
        }
    }

    pub fn set_snap_threshold(&mut self, threshold: u32) {
        self.config.snap_threshold = threshold;
        self.engine.snap_mut().set_threshold(threshold);
    }

    // ----------------------------------------------------------------------
    // Pointer input
    // ----------------------------------------------------------------------

    /// Topmost visible window under `pos` and the zone that was hit.
    pub fn hit_test(&self, pos: PointerPos) -> Option<(WindowId, HitZone)> {
        let caps = self.config.capabilities;
        self.windows_in_z_order().into_iter().rev().find_map(|window| {
            let rect = window.effective_rect(self.model.viewport(), self.model.min_size(), caps);
            let resizable = InteractionEngine::can_manipulate(window, caps);
            zone_at(
                rect,
                pos,
                self.config.title_bar_height,
                self.config.resize_handle,
                resizable,
            )
            .map(|zone| (window.id(), zone))
        })
    }

    /// Route one pointer event. Returns whether the event was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { pos, click_count } => self.pointer_down(pos, click_count),
            PointerEvent::Move { pos } => self.pointer_move(pos),
            PointerEvent::Up { pos } => self.end_gesture(pos),
            PointerEvent::Cancel => self.cancel_gesture(),
        }
    }

    fn pointer_down(&mut self, pos: PointerPos, click_count: u8) -> bool {
        // A down without the previous up means the release was lost.
        self.cancel_gesture();
        let Some((id, zone)) = self.hit_test(pos) else {
            return false;
        };
        if let Err(err) = self.focus(id) {
            tracing::debug!(window_id = %id, %err, "pointer down focus failed");
        }
        let outcome = match zone {
            HitZone::TitleBar if click_count >= DOUBLE_CLICK_COUNT => self.toggle_maximize(id),
            HitZone::TitleBar => self.begin_drag(id, pos).map(|_| ()),
            HitZone::Resize(edge) => self.begin_resize(id, edge, pos).map(|_| ()),
            HitZone::Body => Ok(()),
        };
        if let Err(err) = outcome {
            tracing::debug!(window_id = %id, %err, "pointer down dropped");
        }
        true
    }

    /// Start dragging `id` with the pointer at `pos`. Returns `Ok(false)` when
    /// the window cannot be dragged in its current state.
    pub fn begin_drag(&mut self, id: WindowId, pos: PointerPos) -> WmResult<bool> {
        self.cancel_gesture();
        let window = self.model.get(id).ok_or_else(|| unknown(id))?;
        Ok(self
            .engine
            .begin_drag(&mut self.surface, window, self.config.capabilities, pos))
    }

    pub fn begin_resize(
        &mut self,
        id: WindowId,
        edge: ResizeEdge,
        pos: PointerPos,
    ) -> WmResult<bool> {
        self.cancel_gesture();
        let window = self.model.get(id).ok_or_else(|| unknown(id))?;
        Ok(self.engine.begin_resize(
            &mut self.surface,
            window,
            self.config.capabilities,
            edge,
            pos,
        ))
    }

    pub fn pointer_move(&mut self, pos: PointerPos) -> bool {
        let viewport = self.model.viewport();
        let min = self.model.min_size();
        self.engine.pointer_move(&mut self.surface, pos, viewport, min)
    }

    /// Frame callback from the host.
    pub fn run_frame(&mut self, token: FrameToken) -> bool {
        self.engine.run_frame(&mut self.surface, token)
    }

    /// Pointer release. A release after movement lands the window under the
    /// release position; a release without any movement is a plain click and
    /// commits nothing new.
    pub fn end_gesture(&mut self, pos: PointerPos) -> bool {
        if !self.engine.is_active() {
            return false;
        }
        let viewport = self.model.viewport();
        let min = self.model.min_size();
        self.engine.pointer_release(pos, viewport, min);
        match self.engine.finish(&mut self.surface, false) {
            Some(commit) => {
                self.commit_gesture(commit);
                true
            }
            None => false,
        }
    }

    /// Pointer capture lost. Commits through the same path as a release, at
    /// the last seen pointer position.
    pub fn cancel_gesture(&mut self) -> bool {
        match self.engine.finish(&mut self.surface, true) {
            Some(commit) => {
                tracing::debug!(window_id = %commit.id, "gesture interrupted");
                self.commit_gesture(commit);
                true
            }
            None => false,
        }
    }

    fn settle_gesture_for(&mut self, id: WindowId) {
        if self.engine.active().is_some_and(|g| g.id == id) {
            self.cancel_gesture();
        }
    }

    /// The one authoritative write of a gesture.
    fn commit_gesture(&mut self, commit: GestureCommit) {
        let id = commit.id;
        if !self.model.contains(id) {
            return;
        }
        if let Some(side) = commit.snap {
            if let Err(err) = self.snap(id, side) {
                tracing::debug!(window_id = %id, ?side, %err, "gesture snap dropped");
            }
            return;
        }
        if !commit.changed() {
            self.sync_surface(id);
            return;
        }
        let rect = commit.rendered;
        let written = match commit.kind {
            GestureKind::Drag { .. } => self
                .model
                .set_position(id, rect.x as i64, rect.y as i64)
                .map(|_| ()),
            GestureKind::Resize { .. } => self
                .model
                .set_size(id, rect.width as i64, rect.height as i64)
                .map(|_| ()),
        };
        if written.is_ok() {
            tracing::debug!(window_id = %id, %rect, "gesture committed");
            self.committed(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::BufferedSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wm() -> WindowManager<BufferedSurface> {
        WindowManager::new(
            WmConfig::default().with_viewport(1280, 800),
            BufferedSurface::new(),
        )
    }

    fn open_at(wm: &mut WindowManager<BufferedSurface>, rect: WinRect) -> WindowId {
        wm.open("win", Some(rect.size()), Some(rect.position()))
    }

    #[test]
    fn open_assigns_increasing_z_and_focus() {
        let mut wm = wm();
        let a = wm.open("a", None, None);
        let b = wm.open("b", None, None);
        assert!(wm.get_state(b).unwrap().z_index() > wm.get_state(a).unwrap().z_index());
        assert_eq!(wm.topmost(), Some(b));
        assert_ne!(
            wm.get_state(a).unwrap().position(),
            wm.get_state(b).unwrap().position()
        );
        wm.model().assert_invariants();
    }

    #[test]
    fn open_clamps_requested_geometry() {
        let mut wm = wm();
        let id = wm.open("big", Some(Size::new(10, 10)), Some(Position::new(5000, 5000)));
        let state = wm.get_state(id).unwrap();
        assert_eq!(state.size(), Size::new(300, 200));
        assert_eq!(state.position(), Position::new(980, 560));
        assert_eq!(wm.surface().read_rect(id), Some(state.rect()));
    }

    #[test]
    fn maximize_then_restore_round_trips() {
        let mut wm = wm();
        let rect = WinRect::new(123, 77, 411, 299);
        let id = open_at(&mut wm, rect);
        wm.maximize(id).unwrap();
        assert_eq!(wm.lifecycle(id), LifecycleState::Maximized);
        assert_eq!(wm.get_state(id).unwrap().rect(), WinRect::new(0, 0, 1280, 760));
        assert_eq!(wm.get_state(id).unwrap().restore_rect(), Some(rect));
        wm.model().assert_invariants();
        wm.restore(id).unwrap();
        assert_eq!(wm.get_state(id).unwrap().rect(), rect);
        assert_eq!(wm.get_state(id).unwrap().restore_rect(), None);
        wm.model().assert_invariants();
    }

    #[test]
    fn minimized_cannot_maximize_directly() {
        let mut wm = wm();
        let id = open_at(&mut wm, WinRect::new(10, 10, 400, 300));
        wm.minimize(id).unwrap();
        wm.maximize(id).unwrap();
        assert_eq!(wm.lifecycle(id), LifecycleState::Minimized);
        wm.restore(id).unwrap();
        assert_eq!(wm.lifecycle(id), LifecycleState::Windowed);
    }

    #[test]
    fn toggle_while_snapped_restores_then_maximizes() {
        let mut wm = wm();
        let rect = WinRect::new(100, 100, 400, 300);
        let id = open_at(&mut wm, rect);
        wm.snap(id, SnapSide::Right).unwrap();
        assert_eq!(wm.get_state(id).unwrap().rect(), WinRect::new(640, 0, 640, 760));
        wm.toggle_maximize(id).unwrap();
        assert_eq!(wm.lifecycle(id), LifecycleState::Windowed);
        assert_eq!(wm.get_state(id).unwrap().rect(), rect);
        wm.toggle_maximize(id).unwrap();
        assert_eq!(wm.lifecycle(id), LifecycleState::Maximized);
        wm.model().assert_invariants();
    }

    #[test]
    fn explicit_maximize_from_snapped_keeps_windowed_snapshot() {
        let mut wm = wm();
        let rect = WinRect::new(100, 100, 400, 300);
        let id = open_at(&mut wm, rect);
        wm.snap(id, SnapSide::Left).unwrap();
        wm.maximize(id).unwrap();
        assert_eq!(wm.get_state(id).unwrap().restore_rect(), Some(rect));
        wm.restore(id).unwrap();
        assert_eq!(wm.get_state(id).unwrap().rect(), rect);
    }

    #[test]
    fn close_passes_focus_to_next_highest() {
        let mut wm = wm();
        let a = wm.open("a", None, None);
        let b = wm.open("b", None, None);
        let c = wm.open("c", None, None);
        wm.focus(a).unwrap();
        wm.close(a).unwrap();
        assert_eq!(wm.topmost(), Some(c));
        assert_eq!(wm.lifecycle(a), LifecycleState::Closed);
        assert_eq!(wm.close(a), Err(WmError::UnknownWindow(a)));
        assert!(wm.surface().node(a).is_none());
        wm.minimize(c).unwrap();
        assert_eq!(wm.topmost(), Some(b));
    }

    #[test]
    fn subscribers_see_commits_and_close() {
        let mut wm = wm();
        let id = open_at(&mut wm, WinRect::new(10, 10, 400, 300));
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        wm.subscribe(id, move |notice| {
            sink.borrow_mut().push(match notice {
                WindowNotice::Changed(state) => format!("changed {:?}", state.lifecycle()),
                WindowNotice::Closed(_) => "closed".to_string(),
            });
        })
        .unwrap();
        wm.minimize(id).unwrap();
        wm.restore(id).unwrap();
        wm.close(id).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["changed Minimized", "changed Windowed", "closed"]
        );
    }

    #[test]
    fn unsubscribe_stops_notices() {
        let mut wm = wm();
        let id = open_at(&mut wm, WinRect::new(10, 10, 400, 300));
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let sub = wm.subscribe(id, move |_| *c.borrow_mut() += 1).unwrap();
        wm.move_window(id, 50, 50).unwrap();
        assert!(wm.unsubscribe(id, sub));
        wm.move_window(id, 60, 60).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert!(!wm.unsubscribe(id, sub));
    }

    #[test]
    fn programmatic_move_ignored_while_maximized() {
        let mut wm = wm();
        let id = open_at(&mut wm, WinRect::new(10, 10, 400, 300));
        wm.maximize(id).unwrap();
        wm.move_window(id, 300, 300).unwrap();
        wm.resize(id, 500, 500).unwrap();
        assert_eq!(wm.get_state(id).unwrap().rect(), WinRect::new(0, 0, 1280, 760));
    }

    #[test]
    fn viewport_resize_refits_visible_and_freezes_minimized() {
        let mut wm = wm();
        let max = open_at(&mut wm, WinRect::new(10, 10, 400, 300));
        let min = open_at(&mut wm, WinRect::new(900, 500, 350, 250));
        let plain = open_at(&mut wm, WinRect::new(800, 400, 400, 300));
        wm.maximize(max).unwrap();
        wm.minimize(min).unwrap();
        wm.set_viewport(1000, 600);
        assert_eq!(wm.get_state(max).unwrap().rect(), WinRect::new(0, 0, 1000, 560));
        assert_eq!(wm.get_state(min).unwrap().rect(), WinRect::new(900, 500, 350, 250));
        assert_eq!(wm.get_state(plain).unwrap().rect(), WinRect::new(600, 260, 400, 300));
        // Un-minimizing shows the frozen rectangle as it was.
        wm.restore(min).unwrap();
        assert_eq!(wm.get_state(min).unwrap().rect(), WinRect::new(900, 500, 350, 250));
        assert_eq!(wm.surface().read_rect(min), Some(WinRect::new(900, 500, 350, 250)));
    }

    #[test]
    fn touch_layout_renders_full_surface_and_blocks_gestures() {
        let mut wm = wm();
        let rect = WinRect::new(100, 100, 400, 300);
        let id = open_at(&mut wm, rect);
        wm.set_capabilities(Capabilities::touch());
        assert_eq!(wm.surface().read_rect(id), Some(WinRect::new(0, 0, 1280, 760)));
        assert_eq!(wm.begin_drag(id, PointerPos::new(110, 110)), Ok(false));
        assert_eq!(wm.get_state(id).unwrap().rect(), rect);
        wm.set_capabilities(Capabilities::desktop());
        assert_eq!(wm.surface().read_rect(id), Some(rect));
    }

    #[test]
    fn pointer_down_focuses_before_dragging() {
        let mut wm = wm();
        let a = open_at(&mut wm, WinRect::new(100, 100, 400, 300));
        let _b = open_at(&mut wm, WinRect::new(700, 100, 400, 300));
        assert!(wm.handle_pointer(PointerEvent::Down {
            pos: PointerPos::new(150, 110),
            click_count: 1,
        }));
        assert_eq!(wm.topmost(), Some(a));
        assert_eq!(wm.engine().active().map(|g| g.id), Some(a));
    }

    #[test]
    fn double_click_title_toggles_maximize() {
        let mut wm = wm();
        let a = open_at(&mut wm, WinRect::new(100, 100, 400, 300));
        wm.handle_pointer(PointerEvent::Down {
            pos: PointerPos::new(150, 110),
            click_count: 2,
        });
        assert_eq!(wm.lifecycle(a), LifecycleState::Maximized);
        assert!(!wm.engine().is_active());
    }

    #[test]
    fn close_mid_drag_drops_gesture() {
        let mut wm = wm();
        let a = open_at(&mut wm, WinRect::new(100, 100, 400, 300));
        wm.begin_drag(a, PointerPos::new(150, 110)).unwrap();
        wm.pointer_move(PointerPos::new(400, 400));
        wm.close(a).unwrap();
        assert!(!wm.engine().is_active());
        assert!(!wm.end_gesture(PointerPos::new(400, 400)));
        assert!(wm.surface().pending_frames().is_empty());
    }

    #[test]
    fn taskbar_activation_cycles_states() {
        let mut wm = wm();
        let a = wm.open("a", None, None);
        let b = wm.open("b", None, None);
        wm.activate_from_taskbar(a).unwrap();
        assert_eq!(wm.topmost(), Some(a));
        wm.activate_from_taskbar(a).unwrap();
        assert_eq!(wm.lifecycle(a), LifecycleState::Minimized);
        assert_eq!(wm.topmost(), Some(b));
        wm.activate_from_taskbar(a).unwrap();
        assert_eq!(wm.lifecycle(a), LifecycleState::Windowed);
        assert_eq!(wm.topmost(), Some(a));
    }

    #[test]
    fn cycle_focus_raises_bottom_window() {
        let mut wm = wm();
        let a = wm.open("a", None, None);
        let _b = wm.open("b", None, None);
        let c = wm.open("c", None, None);
        assert_eq!(wm.cycle_focus(true), Some(a));
        assert_eq!(wm.topmost(), Some(a));
        assert_eq!(wm.cycle_focus(false), Some(c));
        assert_eq!(wm.topmost(), Some(c));
    }
}
