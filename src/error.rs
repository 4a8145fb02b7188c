use thiserror::Error;

use crate::window::WindowId;

/// Conditions reported back to callers of the window manager.
///
/// None of these are fatal: the failed operation is a no-op and the caller may
/// ignore the result entirely. Out-of-range geometry is never reported here;
/// it is clamped on write.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WmError {
    /// The operation referenced a window that is not open (for example a
    /// second `close` racing the first).
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
}

pub type WmResult<T> = Result<T, WmError>;
