use crate::core::{BookingState, SubmitOutcome, Timer, TimerRequest};
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::scheduler::SchedulerCommand;
use std::time::Duration;
use tracing::debug;

/// Delays applied to the timers a booking arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub submit_delay: Duration,
    pub reset_delay: Duration,
    pub message_ttl: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(2000),
            reset_delay: Duration::from_millis(3000),
            message_ttl: Duration::from_millis(5000),
        }
    }
}

impl Timings {
    fn schedule(&self, request: TimerRequest) -> SchedulerCommand {
        match request {
            TimerRequest::Cancel(key) => SchedulerCommand::Cancel {
                key: key.to_string(),
            },
            TimerRequest::Arm(timer @ Timer::BannerExpiry(_)) => SchedulerCommand::Debounce {
                key: timer.key().to_string(),
                delay: self.message_ttl,
                command: Command::Timer(timer),
            },
            TimerRequest::Arm(timer) => {
                let delay = match timer {
                    Timer::SubmissionDue(_) => self.submit_delay,
                    _ => self.reset_delay,
                };
                SchedulerCommand::EmitAfter {
                    key: timer.key().to_string(),
                    delay,
                    command: Command::Timer(timer),
                }
            }
        }
    }
}

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut BookingState, command: Command, timings: &Timings) -> Vec<Effect> {
        let mut effects = Vec::new();

        let changed = match command {
            Command::PrevMonth => state.advance_month(-1),
            Command::NextMonth => state.advance_month(1),
            Command::SelectDate(date) => state.select_date(date),
            Command::SelectTime(slot) => state.select_time(slot),
            Command::SetField { id, value } => state.set_field(id, value),
            Command::TypeChar { id, ch } => state.push_char(id, ch),
            Command::Backspace(id) => state.pop_char(id),
            Command::CycleOption { id, forward } => state.cycle_option(id, forward),
            Command::BlurField(id) => {
                if let Err(err) = state.blur_field(id) {
                    debug!(field = ?id, error = %err, "field invalid");
                }
                true
            }
            Command::ToggleConsent(id) => state.toggle_consent(id),
            Command::Submit => !matches!(state.submit(), SubmitOutcome::Ignored),
            Command::Reset => {
                state.reset();
                true
            }
            Command::Timer(Timer::SubmissionDue(generation)) => {
                if let Some(request) = state.take_pending(generation) {
                    effects.push(Effect::Deliver {
                        generation,
                        request,
                    });
                }
                false
            }
            Command::Timer(Timer::AutoReset(generation)) => state.auto_reset(generation),
            Command::Timer(Timer::BannerExpiry(id)) => state.expire_banner(id),
            Command::SubmissionResolved { generation, result } => {
                state.finish_submission(generation, result)
            }
            Command::Noop => false,
        };

        effects.extend(
            state
                .take_timer_requests()
                .into_iter()
                .map(|request| Effect::Schedule(timings.schedule(request))),
        );
        if changed {
            effects.push(Effect::RequestRender);
        }

        effects
    }
}
