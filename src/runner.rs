//! The terminal desktop: glue between crossterm input, the window manager and
//! ratatui output.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::config::{Capabilities, WmConfig};
use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::geometry::SnapSide;
use crate::interaction::{HitZone, PointerEvent};
use crate::keybindings::{Action, KeyBindings};
use crate::panel::{Taskbar, TaskbarEntry};
use crate::state::DesktopState;
use crate::surface::HostSurface;
use crate::terminal_surface::{CellScale, TerminalSurface};
use crate::window::decorator::{Chrome, DesktopDecorator, HeaderButton, WindowDecorator};
use crate::window::{LifecycleState, WindowId, WindowManager, WindowMode};

const TASKBAR_ROWS: u16 = 1;

pub struct Desktop {
    wm: WindowManager<TerminalSurface>,
    taskbar: Taskbar,
    decorator: Box<dyn WindowDecorator>,
    keys: KeyBindings,
    state: DesktopState,
    opened: u64,
    /// Minimized windows, most recent last.
    minimized: Vec<WindowId>,
}

impl Desktop {
    /// Build a desktop for a `cols` x `rows` terminal. The viewport and the
    /// taskbar's chrome strip are derived from the cell scale.
    pub fn new(config: WmConfig, scale: CellScale, cols: u16, rows: u16) -> Self {
        let (width, height) = scale.viewport_px(cols, rows);
        let config = config
            .with_viewport(width, height)
            .with_chrome_height(TASKBAR_ROWS as u32 * scale.px_per_row);
        Self {
            wm: WindowManager::new(config, TerminalSurface::new(scale)),
            taskbar: Taskbar::new(TASKBAR_ROWS),
            decorator: Box::new(DesktopDecorator),
            keys: KeyBindings::desktop(),
            state: DesktopState::new(),
            opened: 0,
            minimized: Vec::new(),
        }
    }

    pub fn wm(&self) -> &WindowManager<TerminalSurface> {
        &self.wm
    }

    pub fn wm_mut(&mut self) -> &mut WindowManager<TerminalSurface> {
        &mut self.wm
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    fn scale(&self) -> CellScale {
        self.wm.surface().scale()
    }

    pub fn open_window(&mut self) -> WindowId {
        self.opened += 1;
        self.wm.open(format!("Window {}", self.opened), None, None)
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) if self.state.mouse_capture_enabled() => {
                self.handle_mouse(mouse, now)
            }
            Event::FocusLost => {
                self.wm.handle_pointer(PointerEvent::Cancel);
            }
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
        ControlFlow::Continue
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = self.scale().viewport_px(cols, rows);
        self.wm.set_viewport(width, height);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        let Some(action) = self.keys.action_for_key(key) else {
            return ControlFlow::Continue;
        };
        tracing::debug!(%action, "key action");
        if action == Action::Quit {
            return ControlFlow::Quit;
        }
        self.apply(action);
        ControlFlow::Continue
    }

    /// Run a desktop action against the focused window.
    pub fn apply(&mut self, action: Action) {
        let focused = self.wm.topmost();
        let result = match (action, focused) {
            (Action::NewWindow, _) => {
                self.open_window();
                Ok(())
            }
            (Action::FocusNext, _) => {
                self.wm.cycle_focus(true);
                Ok(())
            }
            (Action::FocusPrev, _) => {
                self.wm.cycle_focus(false);
                Ok(())
            }
            (Action::ToggleTouchLayout, _) => {
                let caps = if self.wm.capabilities().touch_layout {
                    Capabilities::desktop()
                } else {
                    Capabilities::touch()
                };
                self.wm.set_capabilities(caps);
                Ok(())
            }
            (Action::ToggleMouseCapture, _) => {
                self.state.toggle_mouse_capture();
                Ok(())
            }
            (Action::Restore, Some(id))
                if self.wm.get_state(id).is_some_and(|w| w.mode() != WindowMode::Windowed) =>
            {
                self.wm.restore(id)
            }
            (Action::Restore, _) => match self.minimized.pop() {
                Some(id) => self.wm.restore(id),
                None => Ok(()),
            },
            (_, None) => Ok(()),
            (Action::CloseWindow, Some(id)) => self.wm.close(id),
            (Action::ToggleMaximize, Some(id)) => self.wm.toggle_maximize(id),
            (Action::Minimize, Some(id)) => self.minimize(id),
            (Action::SnapLeft, Some(id)) => self.wm.snap(id, SnapSide::Left),
            (Action::SnapRight, Some(id)) => self.wm.snap(id, SnapSide::Right),
            (Action::Quit, Some(_)) => Ok(()),
        };
        if let Err(err) = result {
            tracing::debug!(%action, %err, "action failed");
        }
        self.forget_stale_minimized();
    }

    fn minimize(&mut self, id: WindowId) -> crate::error::WmResult<()> {
        self.wm.minimize(id)?;
        self.minimized.retain(|m| *m != id);
        self.minimized.push(id);
        Ok(())
    }

    fn forget_stale_minimized(&mut self) {
        let wm = &self.wm;
        self.minimized
            .retain(|id| wm.lifecycle(*id) == LifecycleState::Minimized);
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        let (col, row) = (mouse.column, mouse.row);
        let pos = self.scale().pointer_at(col, row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.taskbar.contains(col, row) {
                    if let Some(id) = self.taskbar.hit(col, row) {
                        if let Err(err) = self.wm.activate_from_taskbar(id) {
                            tracing::debug!(window_id = %id, %err, "taskbar click failed");
                        }
                        if self.wm.lifecycle(id) == LifecycleState::Minimized {
                            self.minimized.push(id);
                        }
                        self.forget_stale_minimized();
                    }
                    return;
                }
                if let Some((id, HitZone::TitleBar)) = self.wm.hit_test(pos)
                    && let Some(button) = self.button_at(id, col, row)
                {
                    self.press_button(id, button);
                    return;
                }
                let click_count = self.state.register_press(col, row, now);
                self.wm.handle_pointer(PointerEvent::Down { pos, click_count });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.wm.handle_pointer(PointerEvent::Move { pos });
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.wm.handle_pointer(PointerEvent::Up { pos });
            }
            _ => {}
        }
    }

    fn button_at(&self, id: WindowId, col: u16, row: u16) -> Option<HeaderButton> {
        let rect = self.wm.surface().read_rect(id)?;
        let cells = self.scale().to_cells(rect, Rect::default());
        self.decorator.button_at(cells, col, row)
    }

    fn press_button(&mut self, id: WindowId, button: HeaderButton) {
        let result = self.wm.focus(id).and_then(|_| match button {
            HeaderButton::Minimize => self.minimize(id),
            HeaderButton::Maximize => self.wm.toggle_maximize(id),
            HeaderButton::Close => self.wm.close(id),
        });
        if let Err(err) = result {
            tracing::debug!(window_id = %id, ?button, %err, "header button failed");
        }
    }

    /// Display refresh: run the frame callbacks the manager asked for.
    pub fn tick(&mut self) -> usize {
        let due = self.wm.surface_mut().take_due_frames();
        due.into_iter()
            .filter(|token| self.wm.run_frame(*token))
            .count()
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        self.render(frame.buffer_mut(), area);
    }

    /// Paint the desktop into `buffer`: background, snap ghost, windows back
    /// to front, then the taskbar.
    pub fn render(&mut self, buffer: &mut Buffer, area: Rect) {
        let (desktop, _) = self.taskbar.split_area(area);
        let scale = self.scale();
        buffer.set_style(desktop, Style::default().bg(Color::Cyan));

        if let Some((_, ghost)) = self.wm.snap_preview() {
            let cells = scale.to_cells(ghost, desktop).intersection(desktop);
            buffer.set_style(cells, Style::default().bg(Color::LightCyan));
        }

        let focused = self.wm.topmost();
        for window in self.wm.windows_in_z_order() {
            let Some(rect) = self.wm.surface().read_rect(window.id()) else {
                continue;
            };
            let cells = scale.to_cells(rect, desktop);
            self.decorator.render_window(
                buffer,
                cells,
                desktop,
                Chrome {
                    title: window.title(),
                    focused: focused == Some(window.id()),
                    maximized: window.is_maximized(),
                },
            );
            let info_row = cells.y.saturating_add(2);
            if info_row + 1 < cells.bottom() && info_row < desktop.bottom() && cells.width > 2 {
                let info = format!("{:?} {}", window.lifecycle(), window.rect());
                let x = cells.x + 1;
                if x < desktop.right() {
                    let room = (cells.width - 2).min(desktop.right() - x) as usize;
                    buffer.set_stringn(x, info_row, info, room, Style::default().fg(Color::Gray));
                }
            }
        }

        let entries: Vec<TaskbarEntry<'_>> = self
            .wm
            .windows()
            .map(|w| TaskbarEntry {
                id: w.id(),
                title: w.title(),
                focused: focused == Some(w.id()),
                minimized: w.is_minimized(),
            })
            .collect();
        self.taskbar.render(buffer, &entries);
    }
}

/// Drive `desktop` until a quit action, or until the driver runs dry when
/// `stop_when_idle` is set.
pub fn run_desktop<B, D>(
    terminal: &mut Terminal<B>,
    driver: D,
    desktop: &mut Desktop,
    poll_interval: Duration,
    stop_when_idle: bool,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop
        .driver()
        .set_mouse_capture(desktop.state().mouse_capture_enabled())?;

    event_loop.run(stop_when_idle, |driver, event| {
        let flow = match event {
            LoopEvent::Input(evt) => desktop.handle_event(&evt, Instant::now()),
            LoopEvent::Tick => {
                desktop.tick();
                terminal
                    .draw(|frame| desktop.draw(frame))
                    .map_err(|e| io::Error::other(e.to_string()))?;
                ControlFlow::Continue
            }
        };
        if let Some(enabled) = desktop.state.take_mouse_capture_change() {
            driver.set_mouse_capture(enabled)?;
        }
        Ok(flow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn desktop() -> Desktop {
        Desktop::new(WmConfig::default(), CellScale::new(8, 16), 120, 40)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn viewport_follows_terminal_size() {
        let d = desktop();
        let vp = d.wm().viewport();
        assert_eq!((vp.width, vp.height, vp.chrome_height), (960, 640, 16));
    }

    #[test]
    fn header_close_button_closes_window() {
        let mut d = desktop();
        let id = d.open_window();
        let cells = d
            .scale()
            .to_cells(d.wm().surface().read_rect(id).unwrap(), Rect::default());
        let close_col = cells.right() - 2;
        let now = Instant::now();
        d.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), close_col, cells.y + 1), now);
        assert_eq!(d.wm().lifecycle(id), LifecycleState::Closed);
    }

    #[test]
    fn minimize_and_restore_through_keys() {
        let mut d = desktop();
        let a = d.open_window();
        let b = d.open_window();
        d.apply(Action::Minimize);
        assert_eq!(d.wm().lifecycle(b), LifecycleState::Minimized);
        assert_eq!(d.wm().topmost(), Some(a));
        d.apply(Action::Restore);
        assert_eq!(d.wm().lifecycle(b), LifecycleState::Windowed);
        assert_eq!(d.wm().topmost(), Some(b));
    }

    #[test]
    fn quit_key_stops() {
        let mut d = desktop();
        let q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(matches!(d.handle_event(&q, Instant::now()), ControlFlow::Quit));
    }
}
