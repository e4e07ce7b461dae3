use crate::core::calendar::{CalendarCell, WEEKDAY_NAMES};
use crate::core::{BookingState, ConsentId, FieldId, MessageKind, Phase};
use crate::ui::frame::{Frame, Line};
use crate::ui::span::{Span, pad_to};
use crate::ui::style::{Color, Style};
use crate::ui::view::{Focus, SLOT_COLUMNS, View};

const FIELD_WIDTH: usize = 32;
const LABEL_WIDTH: usize = 14;
const HINT: &str = "Tab/Shift-Tab move • Enter select • [ ] month • ←/→ options • Space toggle • Esc quit";

pub fn render(state: &BookingState, view: &View) -> Frame {
    let mut frame = Frame::new();
    frame.push(Line::from_spans([Span::styled(
        "IT Support Booking",
        Style::new().bold().color(Color::Cyan),
    )]));
    frame.blank();

    render_banner(state, &mut frame);
    render_calendar(state, view, &mut frame);
    frame.blank();
    render_slots(state, view, &mut frame);
    render_form(state, view, &mut frame);
    frame.blank();
    render_controls(state, view, &mut frame);
    frame.blank();
    frame.push(Line::from_spans([Span::styled(HINT, Style::new().dim())]));
    frame
}

fn focus_style(view: &View, focus: Focus) -> Style {
    if view.focus() == focus {
        Style::new().bold().color(Color::Yellow)
    } else {
        Style::new()
    }
}

fn render_banner(state: &BookingState, frame: &mut Frame) {
    let Some(banner) = state.banner() else {
        return;
    };
    let style = match banner.kind {
        MessageKind::Success => Style::new().color(Color::Green).bold(),
        MessageKind::Error => Style::new().color(Color::Red).bold(),
    };
    frame.push(Line::from_spans([Span::styled(banner.text.clone(), style)]));
    frame.blank();
}

fn render_calendar(state: &BookingState, view: &View, frame: &mut Frame) {
    let header_style = focus_style(view, Focus::Calendar);
    frame.push(Line::from_spans([
        Span::styled("◀ ", Style::new().dim()),
        Span::styled(state.month_label(), header_style.bold()),
        Span::styled(" ▶", Style::new().dim()),
    ]));

    let mut headers = Line::new();
    for name in WEEKDAY_NAMES {
        headers.push(Span::styled(format!("{name:>4}"), Style::new().dim()));
    }
    frame.push(headers);

    let calendar_focused = view.focus() == Focus::Calendar;
    for week in state.calendar_cells().chunks(7) {
        let mut line = Line::new();
        for cell in week {
            match cell {
                CalendarCell::Blank => line.push(Span::new("    ")),
                CalendarCell::Day(day) => {
                    let mut style = Style::new();
                    if !day.available {
                        style = style.color(Color::DarkGrey).dim();
                    }
                    if day.today {
                        style = style.underline();
                    }
                    if day.selected {
                        style = style.color(Color::Green).bold();
                    }
                    if calendar_focused && day.date == view.day_cursor() {
                        style = style.reverse();
                    }
                    line.push(Span::new("  "));
                    line.push(Span::styled(format!("{:>2}", day.date.day), style));
                }
            }
        }
        frame.push(line);
    }
}

fn render_slots(state: &BookingState, view: &View, frame: &mut Frame) {
    let Some(panel) = state.slot_panel() else {
        return;
    };
    let title = state
        .selected_date()
        .map(|date| format!("Available times for {}", date.to_display_string()))
        .unwrap_or_else(|| "Available times".to_string());
    frame.push(Line::from_spans([Span::styled(
        title,
        focus_style(view, Focus::Slots).bold(),
    )]));

    let slots_focused = view.focus() == Focus::Slots;
    for (row, chunk) in panel.chunks(SLOT_COLUMNS).enumerate() {
        let mut line = Line::new();
        for (col, cell) in chunk.iter().enumerate() {
            let index = row * SLOT_COLUMNS + col;
            let mut style = if cell.available {
                Style::new()
            } else {
                Style::new().color(Color::DarkGrey).dim()
            };
            if state.selected_time() == Some(cell.slot) {
                style = style.color(Color::Green).bold();
            }
            if slots_focused && index == view.slot_cursor() {
                style = style.reverse();
            }
            let text = if cell.available {
                cell.slot.label().to_string()
            } else {
                format!("{}×", cell.slot.label())
            };
            line.push(Span::new(" "));
            line.push(Span::styled(pad_to(&text, 6), style));
        }
        frame.push(line);
    }
    if !state.selected_date_time().is_empty() {
        frame.push(Line::from_spans([
            Span::styled("Appointment: ", Style::new().dim()),
            Span::new(state.selected_date_time()),
        ]));
    }
    frame.blank();
}

fn render_form(state: &BookingState, view: &View, frame: &mut Frame) {
    let form = state.form();
    for id in FieldId::all() {
        let spec = id.spec();
        let marker = if spec.required { "*" } else { "" };
        let label = pad_to(&format!("{}{marker}", spec.label), LABEL_WIDTH);
        let value = form.value(id);
        let shown = if !spec.options.is_empty() && value.is_empty() {
            "‹ choose ›".to_string()
        } else if !spec.options.is_empty() {
            format!("‹ {value} ›")
        } else {
            value.to_string()
        };

        let mut line = Line::new();
        line.push(Span::styled(label, focus_style(view, Focus::Field(id))));
        let mut value_style = Style::new().underline();
        if form.error(id).is_some() {
            value_style = value_style.color(Color::Red);
        }
        line.push(Span::styled(pad_to(&shown, FIELD_WIDTH), value_style));
        if let Some(err) = form.error(id) {
            line.push(Span::styled(
                format!("  {err}"),
                Style::new().color(Color::Red).bold(),
            ));
        }
        frame.push(line);
    }

    frame.blank();
    let consents = form.consents();
    for id in ConsentId::ALL {
        let mark = if consents.get(id) { "[x]" } else { "[ ]" };
        frame.push(Line::from_spans([
            Span::styled(mark, focus_style(view, Focus::Consent(id))),
            Span::new(" "),
            Span::new(id.label()),
        ]));
    }
}

fn render_controls(state: &BookingState, view: &View, frame: &mut Frame) {
    let mut submit_style = focus_style(view, Focus::Submit).reverse();
    if state.is_busy() {
        submit_style = Style::new().dim();
    }
    let mut line = Line::new();
    line.push(Span::styled(format!(" {} ", state.submit_label()), submit_style));
    line.push(Span::new("   "));
    line.push(Span::styled(" Reset ", focus_style(view, Focus::Reset).reverse()));
    if state.phase() == Phase::Failed {
        line.push(Span::styled("   (retry by submitting again)", Style::new().dim()));
    }
    frame.push(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlwaysAvailable, Date, FixedClock, TimeSlot};

    fn state() -> BookingState {
        BookingState::new(
            FixedClock(Date {
                year: 2026,
                month: 10,
                day: 16,
            }),
            AlwaysAvailable,
        )
    }

    #[test]
    fn hidden_slot_panel_is_not_drawn() {
        let state = state();
        let view = View::new(&state);
        let text = render(&state, &view).text();
        assert!(text.contains("October 2026"));
        assert!(text.contains(" Sun Mon Tue Wed Thu Fri Sat"));
        assert!(!text.contains("Available times"));
        assert!(text.contains(" Book IT Support "));
    }

    #[test]
    fn selected_slot_shows_appointment_line() {
        let mut state = state();
        state.select_date(Date {
            year: 2026,
            month: 10,
            day: 19,
        });
        state.select_time(TimeSlot::from_label("15:30").expect("slot"));
        let view = View::new(&state);
        let text = render(&state, &view).text();
        assert!(text.contains("Available times for Mon Oct 19 2026"));
        assert!(text.contains("Appointment: Mon Oct 19 2026 at 15:30"));
    }

    #[test]
    fn field_errors_are_drawn_inline() {
        let mut state = state();
        state.set_field(FieldId::Email, "nope");
        let _ = state.blur_field(FieldId::Email);
        let view = View::new(&state);
        let text = render(&state, &view).text();
        assert!(text.contains("Please enter a valid email address"));
    }
}
