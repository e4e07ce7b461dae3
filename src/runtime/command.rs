use crate::core::{ConsentId, Date, FieldId, Generation, SubmissionError, TimeSlot, Timer};

/// Everything that can change a booking: user interactions from the view
/// layer and the delayed events coming back out of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PrevMonth,
    NextMonth,
    SelectDate(Date),
    SelectTime(TimeSlot),
    SetField { id: FieldId, value: String },
    TypeChar { id: FieldId, ch: char },
    Backspace(FieldId),
    CycleOption { id: FieldId, forward: bool },
    BlurField(FieldId),
    ToggleConsent(ConsentId),
    Submit,
    Reset,
    Timer(Timer),
    SubmissionResolved {
        generation: Generation,
        result: Result<(), SubmissionError>,
    },
    Noop,
}
