//! Shared crate-wide constants.

/// Smallest width (in viewport pixels) any window may take, including while a
/// gesture is in progress.
pub const MIN_WIDTH: u32 = 300;

/// Smallest height (in viewport pixels) any window may take.
pub const MIN_HEIGHT: u32 = 200;

/// Distance from the left or right viewport edge, in pixels, at which a
/// dragging pointer arms a half-screen snap.
pub const DEFAULT_SNAP_THRESHOLD: u32 = 20;

/// Height of the taskbar strip reserved at the bottom of the viewport. Windows
/// never extend into it.
pub const DEFAULT_CHROME_HEIGHT: u32 = 40;

/// Height of the title bar hit zone measured from the window's top edge.
pub const DEFAULT_TITLE_BAR_HEIGHT: u32 = 32;

/// Thickness of the right/bottom resize strips and the size of the
/// bottom-right corner grip.
pub const DEFAULT_RESIZE_HANDLE: u32 = 8;

pub const DEFAULT_WINDOW_WIDTH: u32 = 640;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 420;

/// Origin of the first cascaded window when the caller does not pick a
/// position.
pub const CASCADE_ORIGIN: (u32, u32) = (48, 48);

/// Offset applied per already-open window when cascading new ones.
pub const CASCADE_STEP: u32 = 28;

/// Pointer-down `click_count` at which a title bar press counts as a
/// double-click.
pub const DOUBLE_CLICK_COUNT: u8 = 2;
