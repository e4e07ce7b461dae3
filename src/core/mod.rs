pub mod calendar;
pub mod form;
pub mod slots;
pub mod state;
pub mod validation;

pub use calendar::{CalendarCell, CalendarCursor, Clock, Date, DayCell, FixedClock, SystemClock};
pub use form::{BookingForm, BookingRequest, ConsentId, Consents, FieldId};
pub use slots::{
    AlwaysAvailable, AvailabilityProvider, FixedAvailability, RandomAvailability, SlotCell,
    TimeSlot,
};
pub use state::{
    Banner, BookingState, Generation, MessageKind, Phase, SubmissionError, SubmitOutcome, Timer,
    TimerRequest,
};
pub use validation::{FieldKind, ValidationError, validate_field};
