use serde_json::Value;
use tracing::warn;

use super::{KeyValueStore, Result};
use crate::domain::{Label, Settings};

pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
pub const SPENDING_LIMIT_KEY: &str = "spendingLimit";
pub const NOTIFICATION_EMAILS_KEY: &str = "notificationEmails";

/// Loads settings key by key. A missing or malformed key falls back to that
/// field's default without affecting the others.
pub fn load_settings(storage: &dyn KeyValueStore) -> Settings {
    let defaults = Settings::default();
    let selected_category = read_key(storage, SELECTED_CATEGORY_KEY, parse_category)
        .unwrap_or(defaults.selected_category);
    let weekly_limit =
        read_key(storage, SPENDING_LIMIT_KEY, parse_limit).unwrap_or(defaults.weekly_limit);
    let notification_emails = read_key(storage, NOTIFICATION_EMAILS_KEY, parse_emails)
        .unwrap_or(defaults.notification_emails);
    Settings {
        selected_category,
        weekly_limit,
        notification_emails,
    }
}

/// Persists the three settings keys. The limit is written in string form.
pub fn save_settings(storage: &dyn KeyValueStore, settings: &Settings) -> Result<()> {
    storage.set(
        SELECTED_CATEGORY_KEY,
        &Value::String(settings.selected_category.as_str().to_string()),
    )?;
    storage.set(
        SPENDING_LIMIT_KEY,
        &Value::String(settings.weekly_limit.to_string()),
    )?;
    storage.set(
        NOTIFICATION_EMAILS_KEY,
        &serde_json::to_value(&settings.notification_emails)?,
    )?;
    Ok(())
}

fn read_key<T>(
    storage: &dyn KeyValueStore,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = match storage.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "setting unreadable; using default");
            return None;
        }
    };
    let parsed = parse(&value);
    if parsed.is_none() {
        warn!(key, value = %value, "setting malformed; using default");
    }
    parsed
}

fn parse_category(value: &Value) -> Option<Label> {
    value
        .as_str()
        .and_then(|raw| raw.parse::<Label>().ok())
        .filter(|label| !label.is_income())
}

fn parse_limit(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => crate::domain::common::parse_amount(text),
        _ => None,
    }
}

fn parse_emails(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}
