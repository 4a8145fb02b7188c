use crate::constants::{
    CASCADE_ORIGIN, CASCADE_STEP, DEFAULT_CHROME_HEIGHT, DEFAULT_RESIZE_HANDLE,
    DEFAULT_SNAP_THRESHOLD, DEFAULT_TITLE_BAR_HEIGHT, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    MIN_HEIGHT, MIN_WIDTH,
};
use crate::geometry::{Position, Size, Viewport};

/// What the host is able to do with windows.
///
/// On touch or small-viewport hosts every window is rendered full-surface and
/// interactive drag/resize is switched off. The stored geometry is left alone
/// so switching back restores the desktop layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub touch_layout: bool,
}

impl Capabilities {
    pub const fn desktop() -> Self {
        Self {
            touch_layout: false,
        }
    }

    pub const fn touch() -> Self {
        Self { touch_layout: true }
    }

    /// Whether drag and resize gestures are accepted.
    pub fn manipulable(&self) -> bool {
        !self.touch_layout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmConfig {
    pub viewport: Viewport,
    pub min_size: Size,
    pub snap_threshold: u32,
    pub title_bar_height: u32,
    pub resize_handle: u32,
    pub default_size: Size,
    pub cascade_origin: Position,
    pub cascade_step: u32,
    pub capabilities: Capabilities,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280, 800, DEFAULT_CHROME_HEIGHT),
            min_size: Size::new(MIN_WIDTH, MIN_HEIGHT),
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            title_bar_height: DEFAULT_TITLE_BAR_HEIGHT,
            resize_handle: DEFAULT_RESIZE_HANDLE,
            default_size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            cascade_origin: Position::new(CASCADE_ORIGIN.0, CASCADE_ORIGIN.1),
            cascade_step: CASCADE_STEP,
            capabilities: Capabilities::desktop(),
        }
    }
}

impl WmConfig {
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    pub fn with_chrome_height(mut self, chrome_height: u32) -> Self {
        self.viewport.chrome_height = chrome_height;
        self
    }

    /// Override the minimum window size. Zero dimensions are raised to one
    /// pixel.
    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = Size::new(min_size.width.max(1), min_size.height.max(1));
        self
    }

    pub fn with_snap_threshold(mut self, threshold: u32) -> Self {
        self.snap_threshold = threshold;
        self
    }

    pub fn with_title_bar_height(mut self, height: u32) -> Self {
        self.title_bar_height = height;
        self
    }

    pub fn with_resize_handle(mut self, size: u32) -> Self {
        self.resize_handle = size;
        self
    }

    pub fn with_default_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    pub fn with_cascade(mut self, origin: Position, step: u32) -> Self {
        self.cascade_origin = origin;
        self.cascade_step = step;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = WmConfig::default()
            .with_viewport(1920, 1080)
            .with_chrome_height(0)
            .with_snap_threshold(12)
            .with_capabilities(Capabilities::touch());
        assert_eq!(cfg.viewport, Viewport::new(1920, 1080, 0));
        assert_eq!(cfg.snap_threshold, 12);
        assert!(!cfg.capabilities.manipulable());
        assert_eq!(cfg.min_size, Size::new(MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn zero_min_size_is_raised() {
        let cfg = WmConfig::default().with_min_size(Size::new(0, 0));
        assert_eq!(cfg.min_size, Size::new(1, 1));
    }
}
