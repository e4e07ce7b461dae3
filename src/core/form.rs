use crate::core::validation::{FieldKind, ValidationError, validate_field};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Name,
    Email,
    Phone,
    Company,
    IssueType,
    Description,
    Urgency,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Non-empty for choice fields; the value must be one of these.
    pub options: &'static [&'static str],
}

pub const ISSUE_TYPES: &[&str] = &[
    "Hardware",
    "Software",
    "Network",
    "Account & Access",
    "Email",
    "Other",
];

pub const URGENCY_LEVELS: &[&str] = &["Low", "Medium", "High", "Critical"];

pub static FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        id: FieldId::Name,
        label: "Full name",
        kind: FieldKind::Text,
        required: true,
        options: &[],
    },
    FieldSpec {
        id: FieldId::Email,
        label: "Email",
        kind: FieldKind::Email,
        required: true,
        options: &[],
    },
    FieldSpec {
        id: FieldId::Phone,
        label: "Phone",
        kind: FieldKind::Phone,
        required: false,
        options: &[],
    },
    FieldSpec {
        id: FieldId::Company,
        label: "Company",
        kind: FieldKind::Text,
        required: false,
        options: &[],
    },
    FieldSpec {
        id: FieldId::IssueType,
        label: "Issue type",
        kind: FieldKind::Text,
        required: true,
        options: ISSUE_TYPES,
    },
    FieldSpec {
        id: FieldId::Description,
        label: "Description",
        kind: FieldKind::Text,
        required: true,
        options: &[],
    },
    FieldSpec {
        id: FieldId::Urgency,
        label: "Urgency",
        kind: FieldKind::Text,
        required: true,
        options: URGENCY_LEVELS,
    },
];

impl FieldId {
    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }

    pub fn all() -> impl Iterator<Item = FieldId> {
        FIELDS.iter().map(|f| f.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentId {
    DataProcessing,
    DataStorage,
    Marketing,
}

impl ConsentId {
    pub const ALL: [ConsentId; 3] = [
        ConsentId::DataProcessing,
        ConsentId::DataStorage,
        ConsentId::Marketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConsentId::DataProcessing => "I consent to the processing of my personal data (required)",
            ConsentId::DataStorage => "I consent to my data being stored for this booking (required)",
            ConsentId::Marketing => "Send me news and offers (optional)",
        }
    }

    pub fn mandatory(self) -> bool {
        !matches!(self, ConsentId::Marketing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consents {
    pub data_processing: bool,
    pub data_storage: bool,
    pub marketing: bool,
}

impl Consents {
    pub fn get(&self, id: ConsentId) -> bool {
        match id {
            ConsentId::DataProcessing => self.data_processing,
            ConsentId::DataStorage => self.data_storage,
            ConsentId::Marketing => self.marketing,
        }
    }

    pub fn set(&mut self, id: ConsentId, value: bool) {
        match id {
            ConsentId::DataProcessing => self.data_processing = value,
            ConsentId::DataStorage => self.data_storage = value,
            ConsentId::Marketing => self.marketing = value,
        }
    }

    pub fn mandatory_given(&self) -> bool {
        ConsentId::ALL
            .into_iter()
            .filter(|id| id.mandatory())
            .all(|id| self.get(id))
    }
}

/// The booking handed to the backend. Built only when a submission starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub issue_type: String,
    pub description: String,
    pub urgency: String,
    pub selected_date_time: String,
    pub consents: Consents,
}

/// Field values, consent flags and the inline error annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    values: IndexMap<FieldId, String>,
    errors: IndexMap<FieldId, ValidationError>,
    consents: Consents,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self {
            values: FieldId::all().map(|id| (id, String::new())).collect(),
            errors: IndexMap::new(),
            consents: Consents::default(),
        }
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or_default()
    }

    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    pub fn push_char(&mut self, id: FieldId, ch: char) {
        self.values.entry(id).or_default().push(ch);
    }

    pub fn pop_char(&mut self, id: FieldId) {
        if let Some(value) = self.values.get_mut(&id) {
            value.pop();
        }
    }

    /// Steps a choice field through its options, starting from the first one
    /// when the field is empty or holds a value outside the list.
    pub fn cycle_option(&mut self, id: FieldId, forward: bool) {
        let options = id.spec().options;
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|o| *o == self.value(id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.set_value(id, options[next]);
    }

    pub fn consents(&self) -> Consents {
        self.consents
    }

    pub fn set_consent(&mut self, id: ConsentId, value: bool) {
        self.consents.set(id, value);
    }

    pub fn toggle_consent(&mut self, id: ConsentId) {
        let current = self.consents.get(id);
        self.consents.set(id, !current);
    }

    pub fn error(&self, id: FieldId) -> Option<ValidationError> {
        self.errors.get(&id).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (FieldId, ValidationError)> + '_ {
        self.errors.iter().map(|(id, err)| (*id, *err))
    }

    /// Validates one field and attaches or clears its annotation.
    pub fn validate(&mut self, id: FieldId) -> bool {
        let spec = id.spec();
        let value = self.value(id);
        let trimmed = value.trim();
        let result = validate_field(value, spec.kind, spec.required).and_then(|()| {
            // An unknown choice counts as no choice.
            if spec.options.is_empty() || trimmed.is_empty() || spec.options.contains(&trimmed) {
                Ok(())
            } else {
                Err(ValidationError::RequiredField)
            }
        });
        match result {
            Ok(()) => {
                self.errors.shift_remove(&id);
                true
            }
            Err(err) => {
                self.errors.insert(id, err);
                false
            }
        }
    }

    /// Validates every field without stopping at the first failure, so each
    /// invalid field gets its annotation.
    pub fn validate_all(&mut self) -> bool {
        FieldId::all().fold(true, |valid, id| self.validate(id) && valid)
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn to_request(&self, selected_date_time: impl Into<String>) -> BookingRequest {
        let text = |id| self.value(id).trim().to_string();
        BookingRequest {
            name: text(FieldId::Name),
            email: text(FieldId::Email),
            phone: text(FieldId::Phone),
            company: text(FieldId::Company),
            issue_type: text(FieldId::IssueType),
            description: text(FieldId::Description),
            urgency: text(FieldId::Urgency),
            selected_date_time: selected_date_time.into(),
            consents: self.consents,
        }
    }
}
