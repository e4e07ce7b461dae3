use crate::core::{BookingRequest, Generation};
use crate::runtime::scheduler::SchedulerCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Schedule(SchedulerCommand),
    /// Hand the booking to the backend; its answer comes back as
    /// `Command::SubmissionResolved` for the same generation.
    Deliver {
        generation: Generation,
        request: BookingRequest,
    },
    RequestRender,
}
