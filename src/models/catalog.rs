use serde::Serialize;

/// Descriptive classification of a day ("Presence", "Vacation", ...).
/// Has no effect on computed hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    pub id: i64,
    pub name: String,
}

/// Named signed adjustment, in minutes, added to a day's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modifier {
    pub id: i64,
    pub name: String,
    pub minutes: Option<i64>,
}

impl Modifier {
    /// Detached modifier, used when only the offset matters.
    pub fn offset(minutes: i64) -> Self {
        Self {
            id: 0,
            name: String::new(),
            minutes: Some(minutes),
        }
    }
}
