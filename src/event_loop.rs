use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// What the loop hands its handler.
#[derive(Debug)]
pub enum LoopEvent {
    Input(Event),
    /// The input queue is drained. This is the desktop's display refresh:
    /// pending frame callbacks run and the screen is redrawn.
    Tick,
}

/// Owns the UI thread: polls the driver, drains every queued event, then
/// ticks once. A burst of pointer moves therefore collapses into one redraw.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run until the handler asks to quit. With `stop_when_idle`, the loop
    /// also ends after the first tick that follows an empty poll, which is
    /// what scripted drivers want.
    pub fn run<F>(&mut self, stop_when_idle: bool, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, LoopEvent) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Tick)? {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                if stop_when_idle {
                    return Ok(());
                }
                continue;
            }
            loop {
                let event = self.driver.read()?;
                if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Input(event))? {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
