use booking_desk::core::{
    AlwaysAvailable, BookingState, ConsentId, Date, FieldId, FixedAvailability, FixedClock,
    MessageKind, Phase, TimeSlot,
};
use booking_desk::runtime::{Command, Driver, SimulatedBackend, Timings};
use std::time::{Duration, Instant};

const TODAY: Date = Date {
    year: 2026,
    month: 10,
    day: 16,
};
const NEXT_WEDNESDAY: Date = Date {
    year: 2026,
    month: 10,
    day: 21,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn slot(label: &str) -> TimeSlot {
    TimeSlot::from_label(label).expect("known slot")
}

fn driver() -> Driver<SimulatedBackend> {
    Driver::new(
        BookingState::new(FixedClock(TODAY), AlwaysAvailable),
        SimulatedBackend::new(),
    )
}

fn fill_and_pick(driver: &mut Driver<SimulatedBackend>, now: Instant) {
    let commands = [
        Command::SetField {
            id: FieldId::Name,
            value: "Linus Torvalds".into(),
        },
        Command::SetField {
            id: FieldId::Email,
            value: "linus@example.org".into(),
        },
        Command::SetField {
            id: FieldId::Company,
            value: "Kernel Ltd".into(),
        },
        Command::CycleOption {
            id: FieldId::IssueType,
            forward: true,
        },
        Command::SetField {
            id: FieldId::Description,
            value: "Laptop will not boot".into(),
        },
        Command::CycleOption {
            id: FieldId::Urgency,
            forward: false,
        },
        Command::ToggleConsent(ConsentId::DataProcessing),
        Command::ToggleConsent(ConsentId::DataStorage),
        Command::SelectDate(NEXT_WEDNESDAY),
        Command::SelectTime(slot("11:30")),
    ];
    for command in commands {
        driver.dispatch(command, now);
    }
}

#[test]
fn happy_path_submits_then_auto_resets() {
    let start = Instant::now();
    let mut driver = driver();
    fill_and_pick(&mut driver, start);

    assert!(driver.dispatch(Command::Submit, start));
    assert_eq!(driver.state().phase(), Phase::Submitting);
    assert_eq!(driver.state().submit_label(), "Submitting...");

    driver.advance(start + ms(1999));
    assert_eq!(driver.state().phase(), Phase::Submitting);
    assert!(driver.backend().submitted().is_empty());

    let resolved_at = start + ms(2000);
    assert!(driver.advance(resolved_at));
    assert_eq!(driver.state().phase(), Phase::Succeeded);
    assert_eq!(driver.backend().submitted().len(), 1);
    let request = &driver.backend().submitted()[0];
    assert_eq!(request.selected_date_time, "Wed Oct 21 2026 at 11:30");
    assert_eq!(request.issue_type, "Hardware");
    assert_eq!(request.urgency, "Critical");
    assert!(request.consents.data_processing && request.consents.data_storage);
    assert!(!request.consents.marketing);

    driver.advance(resolved_at + ms(3000));
    let state = driver.state();
    assert_eq!(
        &state.trail()[..5],
        &[
            Phase::Idle,
            Phase::Validating,
            Phase::Submitting,
            Phase::Succeeded,
            Phase::Idle
        ]
    );
    assert_eq!(state.selected_date(), None);
    assert_eq!(state.selected_time(), None);
    assert!(state.slot_panel().is_none());
    assert_eq!(state.selected_date_time(), "");
    assert_eq!(
        state.banner().map(|b| b.text.as_str()),
        Some("Form has been reset successfully.")
    );
}

#[test]
fn reset_during_submission_drops_the_round_trip() {
    let start = Instant::now();
    let mut driver = driver();
    fill_and_pick(&mut driver, start);
    driver.dispatch(Command::Submit, start);
    driver.dispatch(Command::Reset, start + ms(500));

    driver.advance(start + ms(10_000));
    assert!(driver.backend().submitted().is_empty());
    assert_eq!(driver.state().phase(), Phase::Idle);
}

#[test]
fn new_selection_after_success_survives_auto_reset_delay() {
    let start = Instant::now();
    let mut driver = driver();
    fill_and_pick(&mut driver, start);
    driver.dispatch(Command::Submit, start);
    driver.advance(start + ms(2000));

    driver.dispatch(Command::SelectDate(NEXT_WEDNESDAY), start + ms(2500));
    driver.advance(start + ms(6000));
    assert_eq!(driver.state().selected_date(), Some(NEXT_WEDNESDAY));
    assert_eq!(driver.state().phase(), Phase::Idle);
}

#[test]
fn month_navigation_after_success_keeps_the_form() {
    let start = Instant::now();
    let mut driver = driver();
    fill_and_pick(&mut driver, start);
    driver.dispatch(Command::Submit, start);
    driver.advance(start + ms(2000));
    assert_eq!(driver.state().phase(), Phase::Succeeded);
    let generation = driver.state().generation();

    assert!(driver.dispatch(Command::NextMonth, start + ms(2500)));
    assert_ne!(driver.state().generation(), generation);

    driver.advance(start + ms(6000));
    let state = driver.state();
    assert_eq!(state.month_label(), "November 2026");
    assert_eq!(state.form().value(FieldId::Name), "Linus Torvalds");
    assert_eq!(state.selected_date(), Some(NEXT_WEDNESDAY));
    assert_eq!(state.selected_date_time(), "Wed Oct 21 2026 at 11:30");
    assert_eq!(
        &state.trail()[..5],
        &[
            Phase::Idle,
            Phase::Validating,
            Phase::Submitting,
            Phase::Succeeded,
            Phase::Idle
        ]
    );
    assert_ne!(
        state.banner().map(|b| b.text.as_str()),
        Some("Form has been reset successfully.")
    );
}

#[test]
fn failed_backend_allows_manual_retry() {
    let start = Instant::now();
    let mut driver = Driver::new(
        BookingState::new(FixedClock(TODAY), AlwaysAvailable),
        SimulatedBackend::failing(),
    );
    fill_and_pick(&mut driver, start);
    driver.dispatch(Command::Submit, start);
    driver.advance(start + ms(2000));
    assert_eq!(driver.state().phase(), Phase::Failed);
    assert_eq!(driver.state().banner().map(|b| b.kind), Some(MessageKind::Error));

    driver.backend_mut().set_failing(false);
    let retry_at = start + ms(2100);
    driver.dispatch(Command::Submit, retry_at);
    driver.advance(retry_at + ms(2000));
    assert_eq!(driver.state().phase(), Phase::Succeeded);
    assert_eq!(driver.backend().submitted().len(), 1);
}

#[test]
fn banners_expire_after_ttl() {
    let start = Instant::now();
    let mut driver = driver().with_timings(Timings {
        message_ttl: ms(100),
        ..Timings::default()
    });
    driver.dispatch(Command::Submit, start);
    assert!(driver.state().banner().is_some());

    driver.dispatch(Command::Submit, start + ms(60));
    driver.advance(start + ms(120));
    assert!(driver.state().banner().is_some(), "second banner re-armed the expiry");
    driver.advance(start + ms(160));
    assert!(driver.state().banner().is_none());
}

#[test]
fn unavailable_slot_cannot_be_booked() {
    let start = Instant::now();
    let mut driver = Driver::new(
        BookingState::new(FixedClock(TODAY), FixedAvailability::from_labels(["11:30"])),
        SimulatedBackend::new(),
    );
    fill_and_pick(&mut driver, start);
    assert_eq!(driver.state().selected_time(), None);

    driver.dispatch(Command::Submit, start);
    assert_eq!(driver.state().phase(), Phase::Idle);
    assert_eq!(
        driver.state().banner().map(|b| b.text.as_str()),
        Some("Please select a date and time for your appointment.")
    );
}
