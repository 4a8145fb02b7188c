//! The rendering boundary.
//!
//! During a gesture the interaction engine writes rectangles straight to the
//! host surface from frame callbacks and never touches the geometry store.
//! When the gesture ends it reads back what was actually rendered and
//! commits that.
//!
//! Frame scheduling belongs to the host as well. The engine asks for a frame
//! with [`HostSurface::request_frame`] and the host later hands the token back
//! through `WindowManager::run_frame` (on the next vsync, animation frame or
//! render tick).

use std::collections::BTreeMap;

use crate::geometry::WinRect;
use crate::window::WindowId;

/// Handle for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

pub trait HostSurface {
    /// Write a rectangle directly to the rendered node for `id`.
    fn write_rect(&mut self, id: WindowId, rect: WinRect);

    /// The rectangle currently rendered for `id`. Hosts that snap to a grid or
    /// apply their own constraints report the adjusted rectangle here.
    fn read_rect(&self, id: WindowId) -> Option<WinRect>;

    fn set_visible(&mut self, _id: WindowId, _visible: bool) {}

    /// Toggle move/size animations on the node. Switched off for the length of
    /// a gesture so each write is instantaneous.
    fn set_transitions_enabled(&mut self, _id: WindowId, _enabled: bool) {}

    /// Drop the node for a closed window.
    fn remove(&mut self, _id: WindowId) {}

    fn request_frame(&mut self) -> FrameToken;

    fn cancel_frame(&mut self, token: FrameToken);
}

impl<T: HostSurface + ?Sized> HostSurface for &mut T {
    fn write_rect(&mut self, id: WindowId, rect: WinRect) {
        (**self).write_rect(id, rect)
    }

    fn read_rect(&self, id: WindowId) -> Option<WinRect> {
        (**self).read_rect(id)
    }

    fn set_visible(&mut self, id: WindowId, visible: bool) {
        (**self).set_visible(id, visible)
    }

    fn set_transitions_enabled(&mut self, id: WindowId, enabled: bool) {
        (**self).set_transitions_enabled(id, enabled)
    }

    fn remove(&mut self, id: WindowId) {
        (**self).remove(id)
    }

    fn request_frame(&mut self) -> FrameToken {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        (**self).cancel_frame(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceNode {
    pub rect: WinRect,
    pub visible: bool,
    pub transitions: bool,
}

/// In-memory host surface. Frames are queued until the owner drains them
/// with [`BufferedSurface::take_due_frames`], which stands in for a display
/// refresh.
#[derive(Debug, Default)]
pub struct BufferedSurface {
    nodes: BTreeMap<WindowId, SurfaceNode>,
    pending: Vec<FrameToken>,
    next_frame: u64,
    writes: u64,
    requested: u64,
}

impl BufferedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: WindowId) -> Option<SurfaceNode> {
        self.nodes.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total `write_rect` calls since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Total frames requested since creation.
    pub fn frames_requested(&self) -> u64 {
        self.requested
    }

    pub fn pending_frames(&self) -> &[FrameToken] {
        &self.pending
    }

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

impl HostSurface for BufferedSurface {
    fn write_rect(&mut self, id: WindowId, rect: WinRect) {
        self.writes += 1;
        self.node_mut(id).rect = rect;
    }

    fn read_rect(&self, id: WindowId) -> Option<WinRect> {
        self.nodes.get(&id).map(|node| node.rect)
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
        self.requested += 1;
        let token = FrameToken::new(self.next_frame);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}
