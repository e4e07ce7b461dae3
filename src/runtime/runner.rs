use crate::runtime::backend::BookingBackend;
use crate::runtime::driver::Driver;
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::{View, render};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_POLL: Duration = Duration::from_millis(120);

/// Interactive front end: pumps terminal input into the driver and redraws
/// after every change.
pub struct Runtime<B> {
    driver: Driver<B>,
    view: View,
    terminal: Terminal,
}

impl<B: BookingBackend> Runtime<B> {
    pub fn new(driver: Driver<B>, terminal: Terminal) -> Self {
        let view = View::new(driver.state());
        Self {
            driver,
            view,
            terminal,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.render()?;

            while !self.view.should_exit() {
                let now = Instant::now();
                if self.driver.advance(now) {
                    self.render()?;
                }

                let timeout = self.driver.poll_timeout(now, IDLE_POLL);
                match self.terminal.poll_event(timeout)? {
                    Some(TerminalEvent::Key(key)) => {
                        let commands = self.view.handle_key(key, self.driver.state());
                        for command in commands {
                            debug!(?command, "dispatch");
                            self.driver.dispatch(command, Instant::now());
                        }
                        self.render()?;
                    }
                    Some(TerminalEvent::Resize { .. }) => self.render()?,
                    None => {}
                }
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)
    }

    pub fn into_driver(self) -> Driver<B> {
        self.driver
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = render(self.driver.state(), &self.view);
        self.terminal.render_frame(&frame)
    }
}
