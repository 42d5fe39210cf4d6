use crate::model::Record;
use serde::Serialize;

/// Label of the sentinel choice that heads every resolved choice list.
pub const EMPTY_CHOICE_LABEL: &str = "---------";

/// One `(value, label)` pair offered by a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The `("", "---------")` sentinel.
    pub fn empty() -> Self {
        Self::new("", EMPTY_CHOICE_LABEL)
    }

    pub fn placeholder(label: impl Into<String>) -> Self {
        Self::new("", label)
    }

    pub fn from_record(record: &Record) -> Self {
        Self::new(record.pk().to_form_value(), record.to_string())
    }
}

pub type ChoiceList = Vec<Choice>;

/// The sentinel choice followed by one choice per record, in the records' order.
pub fn choices_from_records<'a, I>(records: I) -> ChoiceList
where
    I: IntoIterator<Item = &'a Record>,
{
    std::iter::once(Choice::empty())
        .chain(records.into_iter().map(Choice::from_record))
        .collect()
}
