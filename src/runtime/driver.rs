use crate::core::BookingState;
use crate::runtime::backend::BookingBackend;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::reducer::{Reducer, Timings};
use crate::runtime::scheduler::Scheduler;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Owns one booking session and feeds commands through the reducer. Time is
/// passed in explicitly so the whole flow can run headless.
pub struct Driver<B> {
    state: BookingState,
    scheduler: Scheduler,
    backend: B,
    timings: Timings,
}

impl<B: BookingBackend> Driver<B> {
    pub fn new(state: BookingState, backend: B) -> Self {
        Self {
            state,
            scheduler: Scheduler::new(),
            backend,
            timings: Timings::default(),
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs `command` and everything it triggers synchronously. Returns
    /// whether the view needs redrawing.
    pub fn dispatch(&mut self, command: Command, now: Instant) -> bool {
        let mut render = false;
        let mut queue = VecDeque::from([command]);

        while let Some(command) = queue.pop_front() {
            for effect in Reducer::reduce(&mut self.state, command, &self.timings) {
                match effect {
                    Effect::Schedule(cmd) => self.scheduler.schedule(cmd, now),
                    Effect::Deliver {
                        generation,
                        request,
                    } => {
                        let result = self.backend.submit(&request);
                        queue.push_back(Command::SubmissionResolved { generation, result });
                    }
                    Effect::RequestRender => render = true,
                }
            }
        }

        render
    }

    /// Fires every scheduled command due at `now`.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut render = false;
        for command in self.scheduler.drain_ready(now) {
            render |= self.dispatch(command, now);
        }
        render
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }
}
