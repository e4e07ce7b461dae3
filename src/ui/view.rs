use crate::core::calendar::{CalendarCursor, Date, is_bookable};
use crate::core::{BookingState, ConsentId, FieldId, TimeSlot};
use crate::runtime::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

pub const SLOT_COLUMNS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Calendar,
    Slots,
    Field(FieldId),
    Consent(ConsentId),
    Submit,
    Reset,
}

fn focus_ring() -> Vec<Focus> {
    let mut ring = vec![Focus::Calendar, Focus::Slots];
    ring.extend(FieldId::all().map(Focus::Field));
    ring.extend(ConsentId::ALL.into_iter().map(Focus::Consent));
    ring.extend([Focus::Submit, Focus::Reset]);
    ring
}

/// Presentation-only state: what has focus and where the grid cursors sit.
/// Everything that matters to the booking goes out as a [`Command`].
#[derive(Debug, Clone)]
pub struct View {
    focus: Focus,
    day_cursor: Date,
    slot_cursor: usize,
    exit: bool,
}

impl View {
    pub fn new(state: &BookingState) -> Self {
        let today = state.today();
        let cursor = state.cursor();
        let day_cursor = if cursor.contains(today) {
            today
        } else {
            cursor.first_day()
        };
        Self {
            focus: Focus::Calendar,
            day_cursor,
            slot_cursor: 0,
            exit: false,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn day_cursor(&self) -> Date {
        self.day_cursor
    }

    pub fn slot_cursor(&self) -> usize {
        self.slot_cursor
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &BookingState) -> Vec<Command> {
        if key.code == KeyCode::Esc || key.is_ctrl('c') {
            self.exit = true;
            return Vec::new();
        }

        match key.code {
            KeyCode::Tab => return self.move_focus(1),
            KeyCode::BackTab => return self.move_focus(-1),
            _ => {}
        }

        match self.focus {
            Focus::Calendar => self.calendar_key(key, state),
            Focus::Slots => self.slots_key(key, state),
            Focus::Field(id) => self.field_key(id, key),
            Focus::Consent(id) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => vec![Command::ToggleConsent(id)],
                _ => Vec::new(),
            },
            Focus::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => vec![Command::Submit],
                _ => Vec::new(),
            },
            Focus::Reset => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.slot_cursor = 0;
                    vec![Command::Reset]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Leaving a text field validates it.
    fn move_focus(&mut self, step: isize) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Focus::Field(id) = self.focus {
            commands.push(Command::BlurField(id));
        }
        let ring = focus_ring();
        let current = ring.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(ring.len() as isize) as usize;
        self.focus = ring[next];
        commands
    }

    fn calendar_key(&mut self, key: KeyEvent, state: &BookingState) -> Vec<Command> {
        let target = match key.code {
            KeyCode::Left => self.day_cursor.add_days(-1),
            KeyCode::Right => self.day_cursor.add_days(1),
            KeyCode::Up => self.day_cursor.add_days(-7),
            KeyCode::Down => self.day_cursor.add_days(7),
            KeyCode::PageUp | KeyCode::Char('[') => shift_month(self.day_cursor, -1),
            KeyCode::PageDown | KeyCode::Char(']') => shift_month(self.day_cursor, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if is_bookable(self.day_cursor, state.today()) {
                    self.slot_cursor = 0;
                    self.focus = Focus::Slots;
                }
                return vec![Command::SelectDate(self.day_cursor)];
            }
            _ => return Vec::new(),
        };
        self.day_cursor = target;
        follow_month(state.cursor(), target)
    }

    fn slots_key(&mut self, key: KeyEvent, state: &BookingState) -> Vec<Command> {
        let Some(panel) = state.slot_panel() else {
            return Vec::new();
        };
        let last = panel.len().saturating_sub(1);
        match key.code {
            KeyCode::Left => self.slot_cursor = self.slot_cursor.saturating_sub(1),
            KeyCode::Right => self.slot_cursor = (self.slot_cursor + 1).min(last),
            KeyCode::Up => self.slot_cursor = self.slot_cursor.saturating_sub(SLOT_COLUMNS),
            KeyCode::Down => self.slot_cursor = (self.slot_cursor + SLOT_COLUMNS).min(last),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return TimeSlot::new(self.slot_cursor)
                    .map(Command::SelectTime)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }
        Vec::new()
    }

    fn field_key(&mut self, id: FieldId, key: KeyEvent) -> Vec<Command> {
        let choice = !id.spec().options.is_empty();
        match key.code {
            KeyCode::Left | KeyCode::Right if choice => vec![Command::CycleOption {
                id,
                forward: key.code == KeyCode::Right,
            }],
            KeyCode::Char(ch) if !choice && !is_chord(key) => vec![Command::TypeChar { id, ch }],
            KeyCode::Backspace if !choice => vec![Command::Backspace(id)],
            KeyCode::Enter => self.move_focus(1),
            _ => Vec::new(),
        }
    }
}

/// Ctrl or Alt held. Shift alone still types.
fn is_chord(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
}

fn shift_month(date: Date, delta: i32) -> Date {
    let cursor = CalendarCursor::from_date(date).advanced(delta);
    cursor
        .date(date.day.min(cursor.days()))
        .unwrap_or_else(|| cursor.first_day())
}

/// Commands that bring the displayed month to the one holding `date`.
fn follow_month(shown: CalendarCursor, date: Date) -> Vec<Command> {
    let target = CalendarCursor::from_date(date);
    let delta = (target.year - shown.year) * 12 + target.month as i32 - shown.month as i32;
    let step = if delta > 0 {
        Command::NextMonth
    } else {
        Command::PrevMonth
    };
    std::iter::repeat_n(step, delta.unsigned_abs() as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlwaysAvailable, FixedClock};

    const TODAY: Date = Date {
        year: 2026,
        month: 10,
        day: 16,
    };

    fn state() -> BookingState {
        BookingState::new(FixedClock(TODAY), AlwaysAvailable)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn calendar_cursor_crossing_month_navigates() {
        let state = state();
        let mut view = View::new(&state);
        assert_eq!(view.day_cursor(), TODAY);
        let commands = view.handle_key(key(KeyCode::Down), &state);
        assert!(commands.is_empty());
        let commands = view.handle_key(key(KeyCode::Down), &state);
        assert!(commands.is_empty());
        let commands = view.handle_key(key(KeyCode::Down), &state);
        assert_eq!(commands, vec![Command::NextMonth]);
        assert_eq!(view.day_cursor().month, 11);
    }

    #[test]
    fn enter_on_bookable_day_moves_to_slots() {
        let state = state();
        let mut view = View::new(&state);
        let commands = view.handle_key(key(KeyCode::Enter), &state);
        assert_eq!(commands, vec![Command::SelectDate(TODAY)]);
        assert_eq!(view.focus(), Focus::Slots);
    }

    #[test]
    fn leaving_a_field_blurs_it() {
        let state = state();
        let mut view = View::new(&state);
        view.handle_key(key(KeyCode::Tab), &state);
        view.handle_key(key(KeyCode::Tab), &state);
        assert_eq!(view.focus(), Focus::Field(FieldId::Name));
        assert_eq!(
            view.handle_key(key(KeyCode::Char('x')), &state),
            vec![Command::TypeChar {
                id: FieldId::Name,
                ch: 'x'
            }]
        );
        assert_eq!(
            view.handle_key(key(KeyCode::Tab), &state),
            vec![Command::BlurField(FieldId::Name)]
        );
    }

    #[test]
    fn modifier_chords_are_not_typed() {
        let state = state();
        let mut view = View::new(&state);
        view.handle_key(key(KeyCode::Tab), &state);
        view.handle_key(key(KeyCode::Tab), &state);
        assert_eq!(view.focus(), Focus::Field(FieldId::Name));

        assert!(view.handle_key(KeyEvent::ctrl('a'), &state).is_empty());
        let alt_x = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::ALT,
        };
        assert!(view.handle_key(alt_x, &state).is_empty());
        let shift_a = KeyEvent {
            code: KeyCode::Char('A'),
            modifiers: KeyModifiers::SHIFT,
        };
        assert_eq!(
            view.handle_key(shift_a, &state),
            vec![Command::TypeChar {
                id: FieldId::Name,
                ch: 'A'
            }]
        );
    }

    #[test]
    fn back_tab_wraps_to_reset() {
        let state = state();
        let mut view = View::new(&state);
        view.handle_key(key(KeyCode::BackTab), &state);
        assert_eq!(view.focus(), Focus::Reset);
    }

    #[test]
    fn escape_exits() {
        let state = state();
        let mut view = View::new(&state);
        assert!(view.handle_key(key(KeyCode::Esc), &state).is_empty());
        assert!(view.should_exit());
    }

    #[test]
    fn follow_month_spans_years() {
        let shown = CalendarCursor::new(2026, 11);
        let date = Date {
            year: 2027,
            month: 2,
            day: 1,
        };
        assert_eq!(follow_month(shown, date).len(), 2);
        assert_eq!(follow_month(CalendarCursor::new(2027, 1), TODAY).len(), 4);
    }
}
