use serde::{Deserialize, Serialize};

use crate::domain::entry::Label;
use crate::errors::LedgerError;

/// User budget preferences: which category is watched, its weekly limit, and
/// who gets mailed when the limit is exceeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub selected_category: Label,
    pub weekly_limit: f64,
    #[serde(default)]
    pub notification_emails: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_category: Label::A,
            weekly_limit: 0.0,
            notification_emails: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new(
        selected_category: Label,
        weekly_limit: f64,
        notification_emails: Vec<String>,
    ) -> Result<Self, LedgerError> {
        let settings = Self {
            selected_category,
            weekly_limit,
            notification_emails,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.selected_category.is_income() {
            return Err(LedgerError::InvalidInput(
                "income cannot carry a weekly limit".into(),
            ));
        }
        if !self.weekly_limit.is_finite() {
            return Err(LedgerError::InvalidInput(
                "weekly limit must be a finite number".into(),
            ));
        }
        Ok(())
    }

    /// Notification addresses with blank slots dropped, in entry order.
    pub fn recipients(&self) -> Vec<String> {
        self.notification_emails
            .iter()
            .map(|email| email.trim())
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_is_not_a_trackable_category() {
        let err = Settings::new(Label::Income, 50.0, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("income"));
    }

    #[test]
    fn recipients_skip_blank_slots() {
        let settings = Settings::new(
            Label::B,
            10.0,
            vec!["".into(), " me@example.com ".into(), "   ".into()],
        )
        .unwrap();
        assert_eq!(settings.recipients(), vec!["me@example.com".to_string()]);
    }
}
