//! The taskbar: the reserved chrome strip along the bottom of the desktop.
//!
//! It lists every open window, minimized ones included, and remembers where
//! each button was drawn so clicks can be routed back to a window id.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::window::WindowId;

#[derive(Debug, Clone, Copy)]
struct ButtonHit {
    id: WindowId,
    rect: Rect,
}

/// One taskbar button.
#[derive(Debug, Clone)]
pub struct TaskbarEntry<'a> {
    pub id: WindowId,
    pub title: &'a str,
    pub focused: bool,
    pub minimized: bool,
}

#[derive(Debug)]
pub struct Taskbar {
    height: u16,
    area: Rect,
    hits: Vec<ButtonHit>,
    hostname: Option<String>,
}

impl Taskbar {
    pub fn new(height: u16) -> Self {
        Self {
            height: height.max(1),
            area: Rect::default(),
            hits: Vec::new(),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .filter(|h| !h.is_empty()),
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Split `area` into the desktop (returned first) and the taskbar strip.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect) {
        let bar_h = self.height.min(area.height);
        let desktop = Rect {
            height: area.height - bar_h,
            ..area
        };
        let bar = Rect {
            y: area.y + desktop.height,
            height: bar_h,
            ..area
        };
        self.area = bar;
        (desktop, bar)
    }

    pub fn render(&mut self, buffer: &mut Buffer, entries: &[TaskbarEntry<'_>]) {
        self.hits.clear();
        let area = self.area.intersection(buffer.area);
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().bg(Color::Gray).fg(Color::Black);
        buffer.set_style(area, base);
        let row = area.y;
        let right = area.right();

        let label = self.hostname.as_deref().unwrap_or("desk-wm");
        let label_w = label.chars().count() as u16;
        let list_end = right.saturating_sub(label_w + 1);
        if label_w + 1 < area.width {
            buffer.set_string(list_end, row, label, base.add_modifier(Modifier::DIM));
        }

        let mut x = area.x;
        for entry in entries {
            let text = if entry.minimized {
                format!(" ({}) ", entry.title)
            } else {
                format!(" {} ", entry.title)
            };
            let width = (text.chars().count() as u16).min(24);
            if x >= list_end || x + width > list_end {
                break;
            }
            let style = if entry.focused {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                base
            };
            buffer.set_stringn(x, row, &text, width as usize, style);
            self.hits.push(ButtonHit {
                id: entry.id,
                rect: Rect::new(x, row, width, 1),
            });
            x += width + 1;
        }
    }

    /// Window whose button covers the cell, from the last render.
    pub fn hit(&self, col: u16, row: u16) -> Option<WindowId> {
        self.hits
            .iter()
            .find(|h| {
                col >= h.rect.x && col < h.rect.right() && row >= h.rect.y && row < h.rect.bottom()
            })
            .map(|h| h.id)
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let a = self.area;
        col >= a.x && col < a.right() && row >= a.y && row < a.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_reserves_bottom_rows() {
        let mut bar = Taskbar::new(1);
        let (desktop, strip) = bar.split_area(Rect::new(0, 0, 80, 24));
        assert_eq!(desktop, Rect::new(0, 0, 80, 23));
        assert_eq!(strip, Rect::new(0, 23, 80, 1));
        assert!(bar.contains(5, 23));
        assert!(!bar.contains(5, 22));
    }

    #[test]
    fn buttons_map_back_to_windows() {
        let mut bar = Taskbar::new(1);
        bar.hostname = None;
        bar.split_area(Rect::new(0, 0, 80, 24));
        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 24));
        let a = WindowId::new(1);
        let b = WindowId::new(2);
        bar.render(
            &mut buffer,
            &[
                TaskbarEntry {
                    id: a,
                    title: "one",
                    focused: false,
                    minimized: true,
                },
                TaskbarEntry {
                    id: b,
                    title: "two",
                    focused: true,
                    minimized: false,
                },
            ],
        );
        // " (one) " spans 0..7, gap at 7, " two " spans 8..13.
        assert_eq!(bar.hit(3, 23), Some(a));
        assert_eq!(bar.hit(7, 23), None);
        assert_eq!(bar.hit(9, 23), Some(b));
        assert_eq!(bar.hit(9, 22), None);
        assert_eq!(buffer[(2, 23)].symbol(), "o");
    }
}
