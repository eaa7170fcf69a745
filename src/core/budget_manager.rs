use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Weekday};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::core::events::{LedgerChange, LedgerEvent, LedgerEventSink};
use crate::core::services::{
    AlertDelivery, AlertMessage, AlertResponse, AlertState, BudgetService, BudgetStatus,
    EntryGroup, LedgerTotals, SummaryService,
};
use crate::currency::AmountFormatter;
use crate::domain::{common::parse_amount, EntryDraft, Label, Settings};
use crate::errors::LedgerError;
use crate::ledger::{CalendarContext, Ledger, LedgerStore};
use crate::notify::Notifier;
use crate::storage::{load_settings, save_settings, KeyValueStore};
use crate::time::Clock;

/// Everything a dashboard or list view needs, computed at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<FixedOffset>,
    pub totals: LedgerTotals,
    pub today_total: f64,
    pub budget: BudgetStatus,
    pub alert: AlertState,
    pub groups: Vec<EntryGroup>,
}

/// Result of answering an alert: how delivery went and the state afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertOutcome {
    pub delivery: AlertDelivery,
    pub snapshot: DashboardSnapshot,
}

/// Facade that coordinates the persisted ledger, the user's settings, budget
/// evaluation, and alert delivery.
///
/// Every mutation persists, re-evaluates the budget, advances the alert state,
/// emits a [`LedgerEvent`], and returns the fresh [`DashboardSnapshot`].
/// When persisting fails the in-memory change is kept, the budget is still
/// re-evaluated and the event still emitted, and the storage error is returned.
pub struct BudgetManager {
    ledger: LedgerStore,
    settings: Settings,
    storage: Arc<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    sinks: Vec<Arc<dyn LedgerEventSink>>,
    first_weekday: Weekday,
    formatter: AmountFormatter,
    alert: AlertState,
}

impl BudgetManager {
    /// Loads ledger and settings from `storage`. Unreadable data falls back
    /// to empty defaults.
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let ledger = LedgerStore::load(Arc::clone(&storage));
        let settings = load_settings(storage.as_ref());
        let defaults = Config::default();
        info!(
            entries = ledger.ledger().len(),
            category = %settings.selected_category,
            weekly_limit = settings.weekly_limit,
            "budget manager opened"
        );
        Self {
            ledger,
            settings,
            storage,
            clock,
            notifier,
            sinks: Vec::new(),
            first_weekday: defaults.first_weekday,
            formatter: defaults.formatter(),
            alert: AlertState::Normal,
        }
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.first_weekday = config.first_weekday;
        self.formatter = config.formatter();
        self
    }

    pub fn subscribe(&mut self, sink: Arc<dyn LedgerEventSink>) {
        self.sinks.push(sink);
    }

    pub fn ledger(&self) -> &Ledger {
        self.ledger.ledger()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert
    }

    pub fn formatter(&self) -> &AmountFormatter {
        &self.formatter
    }

    pub fn calendar(&self) -> CalendarContext<FixedOffset> {
        CalendarContext::new(self.clock.now(), self.first_weekday)
    }

    pub fn budget_status(&self) -> BudgetStatus {
        BudgetService::evaluate(self.ledger().entries(), &self.settings, &self.calendar())
    }

    /// Read-only view of the current state. Does not touch the alert state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let calendar = self.calendar();
        let entries = self.ledger().entries();
        DashboardSnapshot {
            generated_at: *calendar.now(),
            totals: SummaryService::totals(entries),
            today_total: SummaryService::today_total(entries, &calendar),
            budget: BudgetService::evaluate(entries, &self.settings, &calendar),
            alert: self.alert,
            groups: SummaryService::group_entries(entries, &calendar),
        }
    }

    /// Records a new entry stamped with the current time and the next
    /// "Goal N" name.
    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<DashboardSnapshot, LedgerError> {
        draft.validate()?;
        let name = self.ledger().next_goal_name();
        let entry = draft.into_entry(self.clock.now_utc(), name);
        let id = self.ledger.insert(entry)?;
        info!(%id, "entry added");
        let saved = self.ledger.save();
        self.finish_mutation(LedgerChange::EntryAdded(id), saved)
    }

    /// Form-style submission. Non-numeric amount text is silently ignored and
    /// yields `Ok(None)`.
    pub fn submit_entry(
        &mut self,
        amount_text: &str,
        category: Label,
        comment: &str,
    ) -> Result<Option<DashboardSnapshot>, LedgerError> {
        match EntryDraft::parse(amount_text, category, comment) {
            Some(draft) => self.add_entry(draft).map(Some),
            None => {
                debug!(amount = amount_text, "non-numeric amount; entry not recorded");
                Ok(None)
            }
        }
    }

    pub fn remove_entry(&mut self, id: Uuid) -> Result<DashboardSnapshot, LedgerError> {
        let removed = self.ledger.take(id)?;
        info!(%id, name = %removed.name, "entry removed");
        let saved = self.ledger.save();
        self.finish_mutation(LedgerChange::EntryRemoved(id), saved)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<DashboardSnapshot, LedgerError> {
        settings.validate()?;
        self.settings = settings;
        info!(
            category = %self.settings.selected_category,
            weekly_limit = self.settings.weekly_limit,
            recipients = self.settings.recipients().len(),
            "settings updated"
        );
        let saved = save_settings(self.storage.as_ref(), &self.settings);
        self.finish_mutation(LedgerChange::SettingsUpdated, saved)
    }

    /// Form-style settings submission. Non-numeric limit text is silently
    /// ignored and yields `Ok(None)`.
    pub fn submit_settings(
        &mut self,
        category: Label,
        limit_text: &str,
        notification_emails: Vec<String>,
    ) -> Result<Option<DashboardSnapshot>, LedgerError> {
        let Some(weekly_limit) = parse_amount(limit_text) else {
            debug!(limit = limit_text, "non-numeric weekly limit; settings not saved");
            return Ok(None);
        };
        let settings = Settings::new(category, weekly_limit, notification_emails)?;
        self.update_settings(settings).map(Some)
    }

    /// Message that would be sent for the pending alert, if there is one.
    pub fn pending_alert(&self) -> Option<AlertMessage> {
        self.alert.is_pending().then(|| {
            BudgetService::alert_message(&self.budget_status(), &self.settings, &self.formatter)
        })
    }

    /// Answers a pending alert. `Send` hands the mail to the notifier. The
    /// alert is dismissed whatever the delivery result, which is reported in
    /// the returned [`AlertOutcome`]. Without a pending alert this is a no-op.
    pub fn respond_to_alert(&mut self, response: AlertResponse) -> AlertOutcome {
        if !self.alert.is_pending() {
            debug!(?response, "no pending alert to answer");
            return AlertOutcome {
                delivery: AlertDelivery::NotPending,
                snapshot: self.snapshot(),
            };
        }
        let delivery = match response {
            AlertResponse::Send => self.dispatch_alert(),
            AlertResponse::Cancel => AlertDelivery::Cancelled,
        };
        self.alert = self.alert.respond();
        let snapshot = self.snapshot();
        self.emit(LedgerChange::AlertAnswered(response), &snapshot);
        AlertOutcome { delivery, snapshot }
    }

    fn dispatch_alert(&self) -> AlertDelivery {
        let message =
            BudgetService::alert_message(&self.budget_status(), &self.settings, &self.formatter);
        if message.recipients.is_empty() {
            warn!("no notification emails configured; alert not sent");
            return AlertDelivery::NoRecipients;
        }
        match self
            .notifier
            .notify(&message.recipients, &message.subject, &message.body)
        {
            Ok(()) => {
                info!(recipients = message.recipients.len(), "budget alert dispatched");
                AlertDelivery::Sent(message.recipients)
            }
            Err(err) => {
                warn!(error = %err, "budget alert could not be delivered");
                AlertDelivery::Failed(err.to_string())
            }
        }
    }

    /// Recomputes and emits for a change already applied in memory, then
    /// reports the outcome of persisting it.
    fn finish_mutation(
        &mut self,
        change: LedgerChange,
        saved: Result<(), LedgerError>,
    ) -> Result<DashboardSnapshot, LedgerError> {
        let snapshot = self.recompute(change);
        match saved {
            Ok(()) => Ok(snapshot),
            Err(err) => {
                warn!(error = %err, "change kept in memory but not persisted");
                Err(err)
            }
        }
    }

    fn recompute(&mut self, change: LedgerChange) -> DashboardSnapshot {
        let status = self.budget_status();
        let previous = self.alert;
        self.alert = previous.recompute(&status);
        if self.alert.is_pending() && !previous.is_pending() {
            info!(
                category = %status.category,
                remaining = status.remaining,
                "weekly limit exceeded"
            );
        }
        let snapshot = self.snapshot();
        self.emit(change, &snapshot);
        snapshot
    }

    fn emit(&self, change: LedgerChange, snapshot: &DashboardSnapshot) {
        if self.sinks.is_empty() {
            return;
        }
        let event = LedgerEvent {
            change,
            snapshot: snapshot.clone(),
        };
        for sink in &self.sinks {
            sink.emit(&event);
        }
    }
}
