use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

/// Buttons drawn at the right end of the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Minimize,
    Maximize,
    Close,
}

const BUTTONS: [(HeaderButton, &str); 3] = [
    (HeaderButton::Minimize, "[_]"),
    (HeaderButton::Maximize, "[^]"),
    (HeaderButton::Close, "[x]"),
];

/// Everything the decorator needs to know about one window.
#[derive(Debug, Clone, Copy)]
pub struct Chrome<'a> {
    pub title: &'a str,
    pub focused: bool,
    pub maximized: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Paint frame and header for a window whose cell rectangle is `rect`,
    /// clipped to `bounds`.
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, chrome: Chrome<'_>);

    /// Header button under a cell, if any.
    fn button_at(&self, rect: Rect, col: u16, row: u16) -> Option<HeaderButton>;
}

#[derive(Debug)]
pub struct DesktopDecorator;

impl DesktopDecorator {
    fn header_y(rect: Rect) -> u16 {
        rect.y.saturating_add(1)
    }

    /// Start column of each button, right-aligned inside the frame.
    fn button_columns(rect: Rect) -> Option<[u16; 3]> {
        let inner_right = rect.x.saturating_add(rect.width).checked_sub(1)?;
        let first = inner_right.checked_sub(9)?;
        if first <= rect.x {
            return None;
        }
        Some([first, first + 3, first + 6])
    }
}

impl WindowDecorator for DesktopDecorator {
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, chrome: Chrome<'_>) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let header_style = if chrome.focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);
        let body_style = Style::default().bg(Color::Black);

        let left = rect.x;
        let top = rect.y;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        let header_y = Self::header_y(rect);
        let inside = |x: u16, y: u16| {
            x >= bounds.x && x < bounds.right() && y >= bounds.y && y < bounds.bottom()
        };
        let mut put = |x: u16, y: u16, symbol: &str, style: Style| {
            if inside(x, y)
                && let Some(cell) = buffer.cell_mut((x, y))
            {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        };

        for y in top..=bottom {
            for x in left..=right {
                let symbol = match (x == left, x == right, y == top, y == bottom) {
                    (true, _, true, _) => "┌",
                    (_, true, true, _) => "┐",
                    (true, _, _, true) => "└",
                    (_, true, _, true) => "┘",
                    (_, _, true, _) | (_, _, _, true) => "─",
                    (true, _, _, _) | (_, true, _, _) => "│",
                    _ => " ",
                };
                let style = if symbol == " " {
                    if y == header_y { header_style } else { body_style }
                } else {
                    border_style
                };
                put(x, y, symbol, style);
            }
        }

        if header_y >= bottom {
            return;
        }
        let buttons = Self::button_columns(rect);
        let title_end = buttons.map_or(right, |cols| cols[0]);
        for (idx, ch) in chrome.title.chars().enumerate() {
            let x = left.saturating_add(2).saturating_add(idx as u16);
            if x >= title_end {
                break;
            }
            put(x, header_y, ch.encode_utf8(&mut [0; 4]), header_style);
        }
        if let Some(cols) = buttons {
            for ((button, label), col) in BUTTONS.iter().zip(cols) {
                let label = match button {
                    HeaderButton::Maximize if chrome.maximized => "[v]",
                    _ => label,
                };
                for (i, ch) in label.chars().enumerate() {
                    put(col + i as u16, header_y, ch.encode_utf8(&mut [0; 4]), header_style);
                }
            }
        }
    }

    fn button_at(&self, rect: Rect, col: u16, row: u16) -> Option<HeaderButton> {
        if row != Self::header_y(rect) {
            return None;
        }
        let cols = Self::button_columns(rect)?;
        BUTTONS
            .iter()
            .zip(cols)
            .find(|(_, start)| col >= *start && col < start + 3)
            .map(|((button, _), _)| *button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_right_aligned_on_header_row() {
        let d = DesktopDecorator;
        let rect = Rect::new(10, 5, 40, 12);
        // Frame ends at column 49; buttons occupy 40..49.
        assert_eq!(d.button_at(rect, 40, 6), Some(HeaderButton::Minimize));
        assert_eq!(d.button_at(rect, 45, 6), Some(HeaderButton::Maximize));
        assert_eq!(d.button_at(rect, 48, 6), Some(HeaderButton::Close));
        assert_eq!(d.button_at(rect, 49, 6), None);
        assert_eq!(d.button_at(rect, 48, 5), None);
        assert_eq!(d.button_at(rect, 20, 6), None);
    }

    #[test]
    fn renders_title_and_frame() {
        let d = DesktopDecorator;
        let area = Rect::new(0, 0, 30, 8);
        let mut buffer = Buffer::empty(area);
        let chrome = Chrome {
            title: "Notes",
            focused: true,
            maximized: false,
        };
        d.render_window(&mut buffer, Rect::new(0, 0, 30, 8), area, chrome);
        assert_eq!(buffer[(0, 0)].symbol(), "┌");
        assert_eq!(buffer[(29, 7)].symbol(), "┘");
        assert_eq!(buffer[(2, 1)].symbol(), "N");
        assert_eq!(buffer[(28, 1)].symbol(), "]");
    }

    #[test]
    fn tiny_windows_skip_buttons() {
        let d = DesktopDecorator;
        assert_eq!(d.button_at(Rect::new(0, 0, 8, 4), 5, 1), None);
    }
}
