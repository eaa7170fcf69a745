use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{parse_amount, Displayable, Identifiable, NamedEntity};
use crate::errors::LedgerError;

/// Closed set of entry categories. `Income` is reserved for money coming in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    A,
    B,
    C,
    Income,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::Income];

    /// Labels a weekly limit can be attached to.
    pub const TRACKABLE: [Label; 3] = [Label::A, Label::B, Label::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::A => "a",
            Label::B => "b",
            Label::C => "c",
            Label::Income => "income",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Label::Income)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::Income => "Income",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| LedgerError::InvalidInput(format!("unknown category `{}`", s.trim())))
    }
}

/// A single income or spending record.
///
/// Positive amounts are income, negative amounts are spending. Entries are
/// immutable once recorded; the only lifecycle change is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub amount: f64,
    #[serde(rename = "label")]
    pub category: Label,
    #[serde(default)]
    pub comment: String,
    pub time_added: DateTime<Utc>,
    pub name: String,
}

impl Entry {
    pub fn new(
        amount: f64,
        category: Label,
        comment: impl Into<String>,
        time_added: DateTime<Utc>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            comment: comment.into(),
            time_added,
            name: name.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_spending(&self) -> bool {
        self.amount < 0.0
    }
}

impl Identifiable for Entry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Entry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        if self.comment.trim().is_empty() {
            format!("{} [{}] {:.2}", self.name, self.category, self.amount)
        } else {
            format!(
                "{} [{}] {:.2} ({})",
                self.name,
                self.category,
                self.amount,
                self.comment.trim()
            )
        }
    }
}

/// User input for a new entry before the ledger assigns id, time, and name.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub amount: f64,
    pub category: Label,
    pub comment: String,
}

impl EntryDraft {
    pub fn new(amount: f64, category: Label, comment: impl Into<String>) -> Self {
        Self {
            amount,
            category,
            comment: comment.into(),
        }
    }

    /// Builds a draft from raw form text; `None` when the amount is not a number.
    pub fn parse(amount_text: &str, category: Label, comment: impl Into<String>) -> Option<Self> {
        parse_amount(amount_text).map(|amount| Self::new(amount, category, comment))
    }

    /// Rejects amounts that cannot be persisted as JSON numbers.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_finite() {
            return Err(LedgerError::InvalidInput(
                "amount must be a finite number".into(),
            ));
        }
        Ok(())
    }

    pub fn into_entry(self, time_added: DateTime<Utc>, name: impl Into<String>) -> Entry {
        Entry::new(self.amount, self.category, self.comment, time_added, name)
    }
}
