//! Pointer-driven drag and resize.
//!
//! Pointer moves can arrive far faster than the display refreshes. The engine
//! keeps at most one frame callback outstanding: a move either schedules one
//! or just overwrites the target the already-scheduled callback will write.
//! Nothing reaches the geometry store until the gesture ends, at which point
//! [`InteractionEngine::finish`] hands back a single [`GestureCommit`] built
//! from what the host surface actually rendered.

mod gesture;

pub use gesture::{
    GestureContext, GestureKind, HitZone, ResizeEdge, apply_drag, apply_resize, zone_at,
};

use crate::config::Capabilities;
use crate::geometry::{PointerPos, Size, SnapSide, Viewport, WinRect};
use crate::snap::SnapResolver;
use crate::surface::{FrameToken, HostSurface};
use crate::window::{WindowId, WindowMode, WindowState};

/// Raw pointer input in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// `click_count` follows the DOM `detail` convention: 2 for the second
    /// press of a double-click.
    Down { pos: PointerPos, click_count: u8 },
    Move { pos: PointerPos },
    Up { pos: PointerPos },
    /// Pointer capture was lost (window blur, pointer left the document).
    Cancel,
}

/// The single write a finished gesture asks the lifecycle to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureCommit {
    pub id: WindowId,
    pub kind: GestureKind,
    pub start_rect: WinRect,
    /// Rectangle read back from the host surface.
    pub rendered: WinRect,
    /// Edge the drag ended on, if it should snap instead of moving.
    pub snap: Option<SnapSide>,
    pub moves: u64,
    pub interrupted: bool,
}

impl GestureCommit {
    pub fn changed(&self) -> bool {
        self.snap.is_some() || self.rendered != self.start_rect
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureStats {
    pub gestures: u64,
    pub moves: u64,
    pub frames_requested: u64,
    pub frames_written: u64,
    pub commits: u64,
    pub interrupted: u64,
}

#[derive(Debug, Clone)]
pub struct InteractionEngine {
    gesture: Option<GestureContext>,
    pending_frame: Option<FrameToken>,
    snap: SnapResolver,
    stats: GestureStats,
}

impl InteractionEngine {
    pub fn new(snap_threshold: u32) -> Self {
        Self {
            gesture: None,
            pending_frame: None,
            snap: SnapResolver::new(snap_threshold),
            stats: GestureStats::default(),
        }
    }

    pub fn active(&self) -> Option<&GestureContext> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    pub fn snap(&self) -> &SnapResolver {
        &self.snap
    }

    pub fn snap_mut(&mut self) -> &mut SnapResolver {
        &mut self.snap
    }

    pub fn stats(&self) -> GestureStats {
        self.stats
    }

    /// Gestures only apply to visible windowed windows on hosts that allow
    /// manipulation. Maximized and snapped windows must be restored first.
    pub fn can_manipulate(window: &WindowState, caps: Capabilities) -> bool {
        caps.manipulable() && !window.is_minimized() && window.mode() == WindowMode::Windowed
    }

    pub fn begin_drag<S: HostSurface>(
        &mut self,
        surface: &mut S,
        window: &WindowState,
        caps: Capabilities,
        pointer: PointerPos,
    ) -> bool {
        if !Self::can_manipulate(window, caps) {
            tracing::trace!(window_id = %window.id(), "drag ignored");
            return false;
        }
        self.start(surface, GestureContext::drag(window.id(), window.rect(), pointer));
        true
    }

    pub fn begin_resize<S: HostSurface>(
        &mut self,
        surface: &mut S,
        window: &WindowState,
        caps: Capabilities,
        edge: ResizeEdge,
        pointer: PointerPos,
    ) -> bool {
        if !Self::can_manipulate(window, caps) {
            tracing::trace!(window_id = %window.id(), "resize ignored");
            return false;
        }
        let ctx = GestureContext::resize(window.id(), window.rect(), edge, pointer);
        self.start(surface, ctx);
        true
    }

    fn start<S: HostSurface>(&mut self, surface: &mut S, ctx: GestureContext) {
        debug_assert!(self.gesture.is_none(), "previous gesture not finished");
        surface.set_transitions_enabled(ctx.id, false);
        self.snap.clear();
        self.stats.gestures += 1;
        tracing::debug!(window_id = %ctx.id, kind = ?ctx.kind, "gesture started");
        self.gesture = Some(ctx);
    }

    /// Track a pointer move. Returns `false` when no gesture is active, in
    /// which case the event is ignored.
    pub fn pointer_move<S: HostSurface>(
        &mut self,
        surface: &mut S,
        pointer: PointerPos,
        viewport: Viewport,
        min: Size,
    ) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            tracing::trace!(x = pointer.x, y = pointer.y, "move without gesture ignored");
            return false;
        };
        gesture.retarget(pointer, viewport, min);
        gesture.observe_snap(&mut self.snap, pointer, viewport);
        self.stats.moves += 1;
        if self.pending_frame.is_none() {
            self.pending_frame = Some(surface.request_frame());
            self.stats.frames_requested += 1;
        }
        true
    }

    /// Fold the release position into a gesture that has already moved. A
    /// release without any prior move is a click: the target stays on the
    /// start rectangle and no snap is armed. Releases are not counted as
    /// moves and never request a frame, since `finish` flushes anyway.
    pub fn pointer_release(&mut self, pointer: PointerPos, viewport: Viewport, min: Size) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if gesture.moves == 0 {
            tracing::trace!(window_id = %gesture.id, "release without movement");
            return;
        }
        gesture.retarget(pointer, viewport, min);
        gesture.observe_snap(&mut self.snap, pointer, viewport);
    }

    /// Frame callback. Writes the latest target for the pending token; stale
    /// or unknown tokens are ignored.
    pub fn run_frame<S: HostSurface>(&mut self, surface: &mut S, token: FrameToken) -> bool {
        if self.pending_frame != Some(token) {
            return false;
        }
        self.pending_frame = None;
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        surface.write_rect(gesture.id, gesture.target);
        gesture.frames_written += 1;
        self.stats.frames_written += 1;
        true
    }

    /// End the active gesture. Any pending frame is cancelled and the latest
    /// target flushed synchronously, so the rendered rectangle always
    /// reflects the last pointer position before release.
    pub fn finish<S: HostSurface>(
        &mut self,
        surface: &mut S,
        interrupted: bool,
    ) -> Option<GestureCommit> {
        let gesture = self.gesture.take()?;
        if let Some(token) = self.pending_frame.take() {
            surface.cancel_frame(token);
        }
        if gesture.moves > 0 {
            surface.write_rect(gesture.id, gesture.target);
        }
        surface.set_transitions_enabled(gesture.id, true);
        let rendered = surface.read_rect(gesture.id).unwrap_or(gesture.target);
        let snap = if gesture.is_drag() {
            self.snap.take()
        } else {
            None
        };
        self.snap.clear();
        if interrupted {
            self.stats.interrupted += 1;
        }
        let commit = GestureCommit {
            id: gesture.id,
            kind: gesture.kind,
            start_rect: gesture.start_rect,
            rendered,
            snap,
            moves: gesture.moves,
            interrupted,
        };
        if commit.changed() {
            self.stats.commits += 1;
        }
        tracing::debug!(
            window_id = %gesture.id,
            moves = gesture.moves,
            frames = gesture.frames_written,
            %rendered,
            ?snap,
            interrupted,
            "gesture finished"
        );
        Some(commit)
    }

    /// Drop the active gesture without committing, used when its window is
    /// closed mid-gesture.
    pub fn abort<S: HostSurface>(&mut self, surface: &mut S) {
        if let Some(token) = self.pending_frame.take() {
            surface.cancel_frame(token);
        }
        if let Some(gesture) = self.gesture.take() {
            tracing::debug!(window_id = %gesture.id, "gesture aborted");
        }
        self.snap.clear();
    }
}
