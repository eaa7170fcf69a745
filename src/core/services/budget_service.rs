use chrono::TimeZone;
use serde::Serialize;

use crate::core::services::summary_service::SummaryService;
use crate::currency::AmountFormatter;
use crate::domain::{Entry, Label, Settings};
use crate::ledger::CalendarContext;

/// Weekly budget position for the watched category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: Label,
    pub weekly_limit: f64,
    pub weekly_total: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

/// Over-budget alert lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlertState {
    #[default]
    Normal,
    AlertPending,
    AlertDismissed,
}

/// How the user answered a pending alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertResponse {
    Send,
    Cancel,
}

impl AlertState {
    /// Next state after the budget was re-evaluated following a mutation.
    pub fn recompute(self, status: &BudgetStatus) -> Self {
        match (self, status.over_budget) {
            (AlertState::AlertPending, _) => AlertState::AlertPending,
            (_, true) => AlertState::AlertPending,
            (_, false) => AlertState::Normal,
        }
    }

    /// Next state after the user answered. Only a pending alert can be answered.
    pub fn respond(self) -> Self {
        match self {
            AlertState::AlertPending => AlertState::AlertDismissed,
            other => other,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, AlertState::AlertPending)
    }
}

/// Mail handed to the notifier when the user chooses to send an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// What happened to the alert once the user answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDelivery {
    /// The notifier accepted the mail for every listed recipient.
    Sent(Vec<String>),
    /// Send was chosen but no non-blank address is configured.
    NoRecipients,
    /// The notifier reported an error; the alert is dismissed regardless.
    Failed(String),
    Cancelled,
    /// There was no pending alert to answer.
    NotPending,
}

pub struct BudgetService;

impl BudgetService {
    /// Limit plus the (usually negative) weekly total.
    pub fn remaining_budget(weekly_limit: f64, weekly_total: f64) -> f64 {
        weekly_limit + weekly_total
    }

    pub fn is_over_budget(remaining: f64) -> bool {
        remaining < 0.0
    }

    pub fn evaluate<Tz: TimeZone>(
        entries: &[Entry],
        settings: &Settings,
        calendar: &CalendarContext<Tz>,
    ) -> BudgetStatus {
        let weekly_total =
            SummaryService::weekly_total(entries, settings.selected_category, calendar);
        let remaining = Self::remaining_budget(settings.weekly_limit, weekly_total);
        BudgetStatus {
            category: settings.selected_category,
            weekly_limit: settings.weekly_limit,
            weekly_total,
            remaining,
            over_budget: Self::is_over_budget(remaining),
        }
    }

    pub fn alert_message(
        status: &BudgetStatus,
        settings: &Settings,
        formatter: &AmountFormatter,
    ) -> AlertMessage {
        let category = status.category.display_name();
        AlertMessage {
            recipients: settings.recipients(),
            subject: format!("Budget Buddy: weekly limit exceeded for category {category}"),
            body: format!(
                "Spending in category {category} has gone over this week's limit of {limit}.\n\
                 Spent this week: {spent}\n\
                 Remaining budget: {remaining}\n",
                limit = formatter.compact(status.weekly_limit),
                spent = formatter.compact(-status.weekly_total),
                remaining = formatter.compact(status.remaining),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Utc, Weekday};

    fn status(remaining: f64) -> BudgetStatus {
        BudgetStatus {
            category: Label::A,
            weekly_limit: 30.0,
            weekly_total: remaining - 30.0,
            remaining,
            over_budget: BudgetService::is_over_budget(remaining),
        }
    }

    #[test]
    fn remaining_is_limit_plus_weekly_total() {
        assert_eq!(BudgetService::remaining_budget(50.0, -40.0), 10.0);
        assert_eq!(BudgetService::remaining_budget(30.0, -40.0), -10.0);
        assert!(!BudgetService::is_over_budget(0.0));
        assert!(BudgetService::is_over_budget(-0.01));
    }

    #[test]
    fn alert_goes_pending_on_negative_recompute() {
        let state = AlertState::Normal.recompute(&status(-10.0));
        assert_eq!(state, AlertState::AlertPending);
        assert_eq!(state.recompute(&status(5.0)), AlertState::AlertPending);
    }

    #[test]
    fn dismissed_alert_rearms_on_next_negative_recompute() {
        let dismissed = AlertState::AlertPending.respond();
        assert_eq!(dismissed, AlertState::AlertDismissed);
        assert_eq!(dismissed.recompute(&status(-1.0)), AlertState::AlertPending);
        assert_eq!(dismissed.recompute(&status(1.0)), AlertState::Normal);
    }

    #[test]
    fn respond_without_pending_alert_is_noop() {
        assert_eq!(AlertState::Normal.respond(), AlertState::Normal);
    }

    #[test]
    fn alert_message_interpolates_compact_values() {
        let settings = Settings::new(Label::A, 30.0, vec!["me@example.com".into(), "".into()])
            .unwrap();
        let now = Utc::now();
        let entries = vec![Entry::new(-40.0, Label::A, "", now, "Goal 1")];
        let calendar = CalendarContext::new(now, Weekday::Sun);
        let status = BudgetService::evaluate(&entries, &settings, &calendar);
        let message = BudgetService::alert_message(&status, &settings, &AmountFormatter::default());
        assert_eq!(message.recipients, vec!["me@example.com".to_string()]);
        assert!(message.subject.contains("category A"));
        assert!(message.body.contains("Remaining budget: -10.0$"));
        assert!(message.body.contains("Spent this week: 40.0$"));
    }
}
