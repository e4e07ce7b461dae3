use crate::core::calendar::Date;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::HashSet;

pub const SLOT_LABELS: [&str; 17] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00",
];

pub const DEFAULT_UNAVAILABLE_PROBABILITY: f64 = 0.3;

/// Index into [`SLOT_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub fn new(index: usize) -> Option<Self> {
        (index < SLOT_LABELS.len()).then_some(Self(index as u8))
    }

    pub fn from_label(label: &str) -> Option<Self> {
        SLOT_LABELS
            .iter()
            .position(|l| *l == label)
            .and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..SLOT_LABELS.len()).filter_map(Self::new)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn label(self) -> &'static str {
        SLOT_LABELS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCell {
    pub slot: TimeSlot,
    pub available: bool,
}

/// Decides whether a slot can be booked on a date. Called once per slot every
/// time the slot panel is built, so answers need not be stable across calls.
pub trait AvailabilityProvider {
    fn is_available(&mut self, date: Date, slot: TimeSlot) -> bool;
}

impl<F> AvailabilityProvider for F
where
    F: FnMut(Date, TimeSlot) -> bool,
{
    fn is_available(&mut self, date: Date, slot: TimeSlot) -> bool {
        self(date, slot)
    }
}

/// Simulated scheduling load: each slot is independently unavailable with a
/// fixed probability.
#[derive(Debug, Clone)]
pub struct RandomAvailability {
    rng: Pcg64,
    unavailable_probability: f64,
}

/// Clamps into [0, 1]; NaN and infinities fall back to the default rate.
fn sanitize_probability(probability: f64) -> f64 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        DEFAULT_UNAVAILABLE_PROBABILITY
    }
}

impl RandomAvailability {
    pub fn new(unavailable_probability: f64) -> Self {
        Self {
            rng: Pcg64::from_entropy(),
            unavailable_probability: sanitize_probability(unavailable_probability),
        }
    }

    pub fn seeded(seed: u64, unavailable_probability: f64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
            unavailable_probability: sanitize_probability(unavailable_probability),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg64::seed_from_u64(seed);
    }

    pub fn unavailable_probability(&self) -> f64 {
        self.unavailable_probability
    }
}

impl Default for RandomAvailability {
    fn default() -> Self {
        Self::new(DEFAULT_UNAVAILABLE_PROBABILITY)
    }
}

impl AvailabilityProvider for RandomAvailability {
    fn is_available(&mut self, _date: Date, _slot: TimeSlot) -> bool {
        !self.rng.gen_bool(self.unavailable_probability)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl AvailabilityProvider for AlwaysAvailable {
    fn is_available(&mut self, _date: Date, _slot: TimeSlot) -> bool {
        true
    }
}

/// Fixture provider: the listed slots are unavailable on every date.
#[derive(Debug, Clone, Default)]
pub struct FixedAvailability {
    unavailable: HashSet<TimeSlot>,
}

impl FixedAvailability {
    pub fn new(unavailable: impl IntoIterator<Item = TimeSlot>) -> Self {
        Self {
            unavailable: unavailable.into_iter().collect(),
        }
    }

    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(labels.into_iter().filter_map(TimeSlot::from_label))
    }
}

impl AvailabilityProvider for FixedAvailability {
    fn is_available(&mut self, _date: Date, slot: TimeSlot) -> bool {
        !self.unavailable.contains(&slot)
    }
}

pub fn build_slot_panel(date: Date, provider: &mut dyn AvailabilityProvider) -> Vec<SlotCell> {
    TimeSlot::all()
        .map(|slot| SlotCell {
            slot,
            available: provider.is_available(date, slot),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Date = Date {
        year: 2026,
        month: 10,
        day: 19,
    };

    #[test]
    fn labels_cover_nine_to_five_in_half_hours() {
        assert_eq!(SLOT_LABELS.len(), 17);
        assert_eq!(TimeSlot::all().next().map(TimeSlot::label), Some("09:00"));
        assert_eq!(TimeSlot::all().last().map(TimeSlot::label), Some("17:00"));
        assert_eq!(TimeSlot::from_label("13:30").map(TimeSlot::index), Some(9));
        assert_eq!(TimeSlot::from_label("17:30"), None);
        assert_eq!(TimeSlot::new(17), None);
    }

    #[test]
    fn fixed_provider_marks_listed_slots() {
        let mut provider = FixedAvailability::from_labels(["09:00", "12:30"]);
        let panel = build_slot_panel(DAY, &mut provider);
        let unavailable: Vec<&str> = panel
            .iter()
            .filter(|c| !c.available)
            .map(|c| c.slot.label())
            .collect();
        assert_eq!(unavailable, vec!["09:00", "12:30"]);
    }

    #[test]
    fn closures_act_as_providers() {
        let mut provider = |_date: Date, slot: TimeSlot| slot.index() % 2 == 0;
        let panel = build_slot_panel(DAY, &mut provider);
        assert_eq!(panel.iter().filter(|c| c.available).count(), 9);
    }

    #[test]
    fn seeded_provider_is_reproducible() {
        let mut a = RandomAvailability::seeded(42, 0.3);
        let mut b = RandomAvailability::seeded(42, 0.3);
        assert_eq!(build_slot_panel(DAY, &mut a), build_slot_panel(DAY, &mut b));
    }

    #[test]
    fn random_unavailable_rate_converges() {
        let mut provider = RandomAvailability::seeded(7, DEFAULT_UNAVAILABLE_PROBABILITY);
        let renders = 2_000;
        let unavailable: usize = (0..renders)
            .map(|_| {
                build_slot_panel(DAY, &mut provider)
                    .iter()
                    .filter(|c| !c.available)
                    .count()
            })
            .sum();
        let rate = unavailable as f64 / (renders * SLOT_LABELS.len()) as f64;
        assert!((rate - 0.3).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn non_finite_probability_uses_default() {
        for probability in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut provider = RandomAvailability::seeded(3, probability);
            assert_eq!(
                provider.unavailable_probability(),
                DEFAULT_UNAVAILABLE_PROBABILITY
            );
            assert_eq!(build_slot_panel(DAY, &mut provider).len(), 17);
        }
        assert_eq!(RandomAvailability::seeded(3, 4.0).unavailable_probability(), 1.0);
        assert_eq!(RandomAvailability::seeded(3, -1.0).unavailable_probability(), 0.0);
    }

    #[test]
    fn consecutive_renders_differ() {
        let mut provider = RandomAvailability::seeded(11, 0.3);
        let first = build_slot_panel(DAY, &mut provider);
        let differs = (0..20).any(|_| build_slot_panel(DAY, &mut provider) != first);
        assert!(differs);
    }
}
