use crate::core::calendar::{
    CalendarCell, CalendarCursor, Clock, Date, SystemClock, is_bookable, month_cells,
};
use crate::core::form::{BookingForm, BookingRequest, ConsentId, FieldId};
use crate::core::slots::{
    AvailabilityProvider, RandomAvailability, SlotCell, TimeSlot, build_slot_panel,
};
use crate::core::validation::ValidationError;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SUBMIT_LABEL: &str = "Book IT Support";
pub const BUSY_LABEL: &str = "Submitting...";
pub const SUCCESS_MESSAGE: &str = "Your IT support booking has been successfully submitted! We will contact you shortly to confirm your appointment.";
pub const RESET_MESSAGE: &str = "Form has been reset successfully.";
pub const FIELDS_MESSAGE: &str = "Please correct the highlighted fields.";

const TRAIL_LIMIT: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("booking service unavailable: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

/// Token carried by delayed work. Reset (and editing after a success) moves
/// the state to a new generation; work tagged with an older one is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    SubmissionDue(Generation),
    AutoReset(Generation),
    BannerExpiry(u64),
}

impl Timer {
    pub fn key(&self) -> &'static str {
        match self {
            Timer::SubmissionDue(_) => SUBMISSION_KEY,
            Timer::AutoReset(_) => AUTO_RESET_KEY,
            Timer::BannerExpiry(_) => MESSAGE_KEY,
        }
    }
}

pub const SUBMISSION_KEY: &str = "submission";
pub const AUTO_RESET_KEY: &str = "auto-reset";
pub const MESSAGE_KEY: &str = "message";

/// Delayed work the state wants armed or dropped. The runtime owns the actual
/// delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    Arm(Timer),
    Cancel(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form is busy with an earlier submission.
    Ignored,
    /// Validation failed; carries the systemic reason shown in the banner, if any.
    Rejected(Option<ValidationError>),
    Started(Generation),
}

pub struct BookingState {
    clock: Box<dyn Clock>,
    availability: Box<dyn AvailabilityProvider>,
    cursor: CalendarCursor,
    selected_date: Option<Date>,
    selected_time: Option<TimeSlot>,
    slot_panel: Option<Vec<SlotCell>>,
    selected_date_time: String,
    form: BookingForm,
    phase: Phase,
    trail: Vec<Phase>,
    banner: Option<Banner>,
    next_banner_id: u64,
    generation: Generation,
    pending: Option<BookingRequest>,
    timer_requests: Vec<TimerRequest>,
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new(SystemClock, RandomAvailability::default())
    }
}

impl BookingState {
    pub fn new(
        clock: impl Clock + 'static,
        availability: impl AvailabilityProvider + 'static,
    ) -> Self {
        let cursor = CalendarCursor::from_date(clock.today());
        Self {
            clock: Box::new(clock),
            availability: Box::new(availability),
            cursor,
            selected_date: None,
            selected_time: None,
            slot_panel: None,
            selected_date_time: String::new(),
            form: BookingForm::new(),
            phase: Phase::Idle,
            trail: vec![Phase::Idle],
            banner: None,
            next_banner_id: 0,
            generation: Generation::default(),
            pending: None,
            timer_requests: Vec::new(),
        }
    }

    pub fn with_availability(mut self, availability: impl AvailabilityProvider + 'static) -> Self {
        self.availability = Box::new(availability);
        self
    }

    pub fn with_cursor(mut self, cursor: CalendarCursor) -> Self {
        self.cursor = cursor;
        self
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn month_label(&self) -> String {
        self.cursor.label()
    }

    pub fn calendar_cells(&self) -> Vec<CalendarCell> {
        month_cells(self.cursor, self.today(), self.selected_date)
    }

    pub fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<TimeSlot> {
        self.selected_time
    }

    /// `None` while the slot panel is hidden.
    pub fn slot_panel(&self) -> Option<&[SlotCell]> {
        self.slot_panel.as_deref()
    }

    pub fn selected_date_time(&self) -> &str {
        &self.selected_date_time
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Recent phases, oldest first.
    pub fn trail(&self) -> &[Phase] {
        &self.trail
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() { BUSY_LABEL } else { SUBMIT_LABEL }
    }

    pub fn take_timer_requests(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.timer_requests)
    }

    // ── Calendar & slots ─────────────────────────────────────────────────────

    pub fn advance_month(&mut self, delta: i32) -> bool {
        if self.is_busy() {
            debug!("month navigation ignored while submitting");
            return false;
        }
        self.touch();
        self.cursor.advance(delta);
        debug!(month = %self.cursor.label(), "calendar moved");
        true
    }

    pub fn select_date(&mut self, date: Date) -> bool {
        if self.is_busy() {
            return false;
        }
        if !is_bookable(date, self.today()) {
            debug!(date = %date.to_iso(), "date not bookable");
            return false;
        }
        self.touch();
        self.selected_date = Some(date);
        self.selected_time = None;
        self.selected_date_time.clear();
        self.slot_panel = Some(build_slot_panel(date, &mut *self.availability));
        debug!(date = %date.to_iso(), "date selected");
        true
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(date) = self.selected_date else {
            return false;
        };
        let available = self
            .slot_panel
            .as_deref()
            .and_then(|panel| panel.iter().find(|cell| cell.slot == slot))
            .is_some_and(|cell| cell.available);
        if !available {
            debug!(slot = slot.label(), "slot not available");
            return false;
        }
        self.touch();
        self.selected_time = Some(slot);
        self.selected_date_time = format!("{} at {}", date.to_display_string(), slot.label());
        debug!(value = %self.selected_date_time, "time selected");
        true
    }

    // ── Form ─────────────────────────────────────────────────────────────────

    pub fn set_field(&mut self, id: FieldId, value: impl Into<String>) -> bool {
        self.edit(|form| form.set_value(id, value))
    }

    pub fn push_char(&mut self, id: FieldId, ch: char) -> bool {
        self.edit(|form| form.push_char(id, ch))
    }

    pub fn pop_char(&mut self, id: FieldId) -> bool {
        self.edit(|form| form.pop_char(id))
    }

    pub fn cycle_option(&mut self, id: FieldId, forward: bool) -> bool {
        self.edit(|form| form.cycle_option(id, forward))
    }

    pub fn set_consent(&mut self, id: ConsentId, value: bool) -> bool {
        self.edit(|form| form.set_consent(id, value))
    }

    pub fn toggle_consent(&mut self, id: ConsentId) -> bool {
        self.edit(|form| form.toggle_consent(id))
    }

    /// Focus left a field: validate it on its own.
    pub fn blur_field(&mut self, id: FieldId) -> Result<(), ValidationError> {
        if self.form.validate(id) {
            Ok(())
        } else {
            Err(self.form.error(id).unwrap_or(ValidationError::RequiredField))
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut BookingForm)) -> bool {
        if self.is_busy() {
            return false;
        }
        self.touch();
        apply(&mut self.form);
        true
    }

    // ── Submission ───────────────────────────────────────────────────────────

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_busy() {
            debug!("submit ignored, already submitting");
            return SubmitOutcome::Ignored;
        }
        self.touch();
        self.transition(Phase::Validating);

        let fields_ok = self.form.validate_all();
        let date_time_ok = self.selected_date.is_some() && self.selected_time.is_some();
        let consent_ok = self.form.consents().mandatory_given();

        if !(fields_ok && date_time_ok && consent_ok) {
            let reason = if !date_time_ok {
                Some(ValidationError::MissingDateTime)
            } else if !consent_ok {
                Some(ValidationError::MissingConsent)
            } else {
                None
            };
            let text = reason.map_or_else(|| FIELDS_MESSAGE.to_string(), |r| r.to_string());
            self.show_message(MessageKind::Error, text);
            self.transition(Phase::Invalid);
            self.transition(Phase::Idle);
            return SubmitOutcome::Rejected(reason);
        }

        let request = self.form.to_request(self.selected_date_time.clone());
        info!(email = %request.email, when = %request.selected_date_time, "submitting booking");
        self.pending = Some(request);
        self.transition(Phase::Submitting);
        self.timer_requests
            .push(TimerRequest::Arm(Timer::SubmissionDue(self.generation)));
        SubmitOutcome::Started(self.generation)
    }

    /// Hands out the in-flight request once its round-trip delay has elapsed.
    pub fn take_pending(&mut self, generation: Generation) -> Option<BookingRequest> {
        if generation != self.generation || self.phase != Phase::Submitting {
            debug!(?generation, current = ?self.generation, "stale submission dropped");
            return None;
        }
        self.pending.take()
    }

    pub fn finish_submission(
        &mut self,
        generation: Generation,
        result: Result<(), SubmissionError>,
    ) -> bool {
        if generation != self.generation || self.phase != Phase::Submitting {
            debug!(?generation, "stale submission result dropped");
            return false;
        }
        match result {
            Ok(()) => {
                self.transition(Phase::Succeeded);
                self.show_message(MessageKind::Success, SUCCESS_MESSAGE);
                self.timer_requests
                    .push(TimerRequest::Arm(Timer::AutoReset(self.generation)));
            }
            Err(err) => {
                warn!(error = %err, "booking submission failed");
                self.transition(Phase::Failed);
                self.show_message(
                    MessageKind::Error,
                    format!("We could not submit your booking ({err}). Please try again."),
                );
            }
        }
        true
    }

    pub fn auto_reset(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.phase != Phase::Succeeded {
            debug!(?generation, "stale auto-reset dropped");
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.form.clear();
        self.selected_date = None;
        self.selected_time = None;
        self.slot_panel = None;
        self.selected_date_time.clear();
        self.pending = None;
        self.banner = None;
        self.generation = self.generation.next();
        self.timer_requests.push(TimerRequest::Cancel(SUBMISSION_KEY));
        self.timer_requests.push(TimerRequest::Cancel(AUTO_RESET_KEY));
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle);
        }
        self.show_message(MessageKind::Success, RESET_MESSAGE);
        debug!(generation = ?self.generation, "booking reset");
    }

    // ── Banner ───────────────────────────────────────────────────────────────

    pub fn show_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.next_banner_id += 1;
        let id = self.next_banner_id;
        self.banner = Some(Banner {
            id,
            kind,
            text: text.into(),
        });
        self.timer_requests
            .push(TimerRequest::Arm(Timer::BannerExpiry(id)));
    }

    pub fn expire_banner(&mut self, id: u64) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.id == id) {
            self.banner = None;
            true
        } else {
            false
        }
    }

    // ── Internals ────────────────────────────────────────────────────────────

    /// Any interaction after a finished submission starts a fresh booking, so
    /// a pending auto-reset must not fire into it.
    fn touch(&mut self) {
        match self.phase {
            Phase::Succeeded => {
                self.generation = self.generation.next();
                self.timer_requests.push(TimerRequest::Cancel(AUTO_RESET_KEY));
                self.transition(Phase::Idle);
            }
            Phase::Failed => self.transition(Phase::Idle),
            _ => {}
        }
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
        if self.trail.len() == TRAIL_LIMIT {
            self.trail.remove(0);
        }
        self.trail.push(next);
    }
}
