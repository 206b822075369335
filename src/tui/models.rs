//! # View Model
//!
//! All mutable UI state in one place: input buffers, focus, pane contents
//! and transient alerts. The model is synchronous and has no I/O, which
//! keeps every behavior here unit-testable; the controller feeds it
//! command events and completed API responses.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::tui::events::{AlertKind, InputField, Pane};
use crate::tui::services::{ApiError, DeleteReceipt, Listing, SaveReceipt, StatsSnapshot};

/// How long an alert stays on screen before auto-dismissing.
pub const ALERT_TTL: Duration = Duration::from_secs(5);

/// Placeholder shown instead of an empty JSON object.
pub const EMPTY_LISTING_PLACEHOLDER: &str = "Database is empty";

const MSG_SAVE_VALIDATION: &str = "Please enter both key and value";
const MSG_DELETE_VALIDATION: &str = "Please enter a key to delete";
const MSG_LISTING_LOADED: &str = "Data loaded successfully!";
const MSG_LISTING_FAILED: &str = "Failed to load data";
const MSG_STATS_LOADED: &str = "Statistics loaded!";
const MSG_STATS_FAILED: &str = "Failed to load statistics";

/// A transient notification bound to one pane.
#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    raised_at: Instant,
}

impl Alert {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= ALERT_TTL
    }
}

/// Work the controller must do after a response is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    None,
    /// The store changed; reload the full listing once.
    RefreshEntries,
}

/// Mutable state behind the dashboard.
pub struct ViewModel {
    save_key: String,
    save_value: String,
    delete_key: String,
    focused: InputField,
    entries_display: String,
    total_requests_display: String,
    database_size_display: String,
    stats_display: String,
    alerts: HashMap<Pane, Alert>,
    dirty: bool,
}

impl ViewModel {
    pub fn new() -> Self {
        Self {
            save_key: String::new(),
            save_value: String::new(),
            delete_key: String::new(),
            focused: InputField::SaveKey,
            entries_display: String::new(),
            total_requests_display: "-".to_string(),
            database_size_display: "-".to_string(),
            stats_display: String::new(),
            alerts: HashMap::new(),
            dirty: true,
        }
    }

    // --- accessors used by the renderer ---

    pub fn focused(&self) -> InputField {
        self.focused
    }

    pub fn input(&self, field: InputField) -> &str {
        match field {
            InputField::SaveKey => &self.save_key,
            InputField::SaveValue => &self.save_value,
            InputField::DeleteKey => &self.delete_key,
        }
    }

    pub fn entries_display(&self) -> &str {
        &self.entries_display
    }

    pub fn total_requests_display(&self) -> &str {
        &self.total_requests_display
    }

    pub fn database_size_display(&self) -> &str {
        &self.database_size_display
    }

    pub fn stats_display(&self) -> &str {
        &self.stats_display
    }

    pub fn alert(&self, pane: Pane) -> Option<&Alert> {
        self.alerts.get(&pane)
    }

    // --- editing ---

    pub fn insert_char(&mut self, ch: char) {
        self.focused_input_mut().push(ch);
        self.dirty = true;
    }

    pub fn delete_char(&mut self) {
        self.focused_input_mut().pop();
        self.dirty = true;
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        self.dirty = true;
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
        self.dirty = true;
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focused {
            InputField::SaveKey => &mut self.save_key,
            InputField::SaveValue => &mut self.save_value,
            InputField::DeleteKey => &mut self.delete_key,
        }
    }

    // --- submissions ---

    /// Validate the save form. Returns the trimmed key/value pair to send,
    /// or raises a validation alert and returns `None` — in which case no
    /// request must be issued.
    pub fn prepare_save(&mut self) -> Option<(String, String)> {
        let key = self.save_key.trim().to_string();
        let value = self.save_value.trim().to_string();
        if key.is_empty() || value.is_empty() {
            self.show_alert(Pane::Save, AlertKind::Error, MSG_SAVE_VALIDATION);
            return None;
        }
        Some((key, value))
    }

    /// Validate the delete form. Same contract as [`prepare_save`].
    ///
    /// [`prepare_save`]: ViewModel::prepare_save
    pub fn prepare_delete(&mut self) -> Option<String> {
        let key = self.delete_key.trim().to_string();
        if key.is_empty() {
            self.show_alert(Pane::Delete, AlertKind::Error, MSG_DELETE_VALIDATION);
            return None;
        }
        Some(key)
    }

    // --- response application ---

    /// Apply a completed save. Success clears both inputs and asks for
    /// exactly one listing refresh.
    pub fn apply_save_result(&mut self, result: Result<SaveReceipt, ApiError>) -> FollowUp {
        match result {
            Ok(receipt) => {
                self.save_key.clear();
                self.save_value.clear();
                self.show_alert(
                    Pane::Save,
                    AlertKind::Success,
                    &format!("{}: {}", receipt.status, receipt.key),
                );
                FollowUp::RefreshEntries
            }
            Err(err) => {
                self.show_alert(Pane::Save, AlertKind::Error, &err.to_string());
                FollowUp::None
            }
        }
    }

    /// Apply a completed listing fetch.
    pub fn apply_entries_result(&mut self, result: Result<Listing, ApiError>) -> FollowUp {
        match result {
            Ok(listing) => {
                self.entries_display = if listing.is_empty() {
                    EMPTY_LISTING_PLACEHOLDER.to_string()
                } else {
                    serde_json::to_string_pretty(&listing)
                        .unwrap_or_else(|_| format!("{listing:?}"))
                };
                self.show_alert(Pane::Entries, AlertKind::Success, MSG_LISTING_LOADED);
            }
            Err(ApiError::Transport(description)) => {
                self.entries_display = format!("Error: {description}");
                self.show_alert(
                    Pane::Entries,
                    AlertKind::Error,
                    &ApiError::Transport(description).to_string(),
                );
            }
            Err(_) => {
                self.show_alert(Pane::Entries, AlertKind::Error, MSG_LISTING_FAILED);
            }
        }
        FollowUp::None
    }

    /// Apply a completed delete. Success clears the input and asks for
    /// exactly one listing refresh.
    pub fn apply_delete_result(&mut self, result: Result<DeleteReceipt, ApiError>) -> FollowUp {
        match result {
            Ok(receipt) => {
                self.delete_key.clear();
                self.show_alert(
                    Pane::Delete,
                    AlertKind::Success,
                    &format!("{}: {}", receipt.status, receipt.key),
                );
                FollowUp::RefreshEntries
            }
            Err(err) => {
                self.show_alert(Pane::Delete, AlertKind::Error, &err.to_string());
                FollowUp::None
            }
        }
    }

    /// Apply a completed stats fetch, updating the three display targets.
    pub fn apply_stats_result(&mut self, result: Result<StatsSnapshot, ApiError>) -> FollowUp {
        match result {
            Ok(snapshot) => {
                self.total_requests_display = snapshot.total_requests.to_string();
                self.database_size_display = snapshot.database_size.to_string();
                self.stats_display = serde_json::to_string_pretty(&snapshot.raw)
                    .unwrap_or_else(|_| snapshot.raw.to_string());
                self.show_alert(Pane::Stats, AlertKind::Success, MSG_STATS_LOADED);
            }
            Err(err @ ApiError::Transport(_)) => {
                self.show_alert(Pane::Stats, AlertKind::Error, &err.to_string());
            }
            Err(_) => {
                self.show_alert(Pane::Stats, AlertKind::Error, MSG_STATS_FAILED);
            }
        }
        FollowUp::None
    }

    // --- alerts ---

    /// Raise an alert on a pane, replacing any previous one there.
    pub fn show_alert(&mut self, pane: Pane, kind: AlertKind, message: &str) {
        tracing::debug!("alert on {pane:?} ({kind:?}): {message}");
        self.alerts.insert(
            pane,
            Alert {
                kind,
                message: message.to_string(),
                raised_at: Instant::now(),
            },
        );
        self.dirty = true;
    }

    /// Drop alerts past their deadline. Returns true if any were removed.
    pub fn expire_alerts(&mut self, now: Instant) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|_, alert| !alert.expired(now));
        let changed = self.alerts.len() != before;
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Consume the dirty flag; the renderer redraws when this is true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn listing(pairs: &[(&str, &str)]) -> Listing {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>()
    }

    #[test]
    fn test_typing_goes_to_focused_input() {
        let mut model = ViewModel::new();
        model.insert_char('a');
        model.focus_next();
        model.insert_char('b');
        model.focus_next();
        model.insert_char('c');
        assert_eq!(model.input(InputField::SaveKey), "a");
        assert_eq!(model.input(InputField::SaveValue), "b");
        assert_eq!(model.input(InputField::DeleteKey), "c");
    }

    #[test]
    fn test_delete_char_shortens_focused_input() {
        let mut model = ViewModel::new();
        model.insert_char('h');
        model.insert_char('i');
        model.delete_char();
        assert_eq!(model.input(InputField::SaveKey), "h");
        // Deleting from an empty input is a no-op.
        model.delete_char();
        model.delete_char();
        assert_eq!(model.input(InputField::SaveKey), "");
    }

    #[test]
    fn test_prepare_save_rejects_empty_key() {
        let mut model = ViewModel::new();
        model.focus_next();
        model.insert_char('v');
        assert_eq!(model.prepare_save(), None);
        let alert = model.alert(Pane::Save).expect("validation alert");
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Please enter both key and value");
    }

    #[test]
    fn test_prepare_save_rejects_empty_value() {
        let mut model = ViewModel::new();
        model.insert_char('k');
        assert_eq!(model.prepare_save(), None);
        assert!(model.alert(Pane::Save).is_some());
    }

    #[test]
    fn test_prepare_save_rejects_whitespace_only_input() {
        let mut model = ViewModel::new();
        model.insert_char(' ');
        model.focus_next();
        model.insert_char('v');
        assert_eq!(model.prepare_save(), None);
    }

    #[test]
    fn test_prepare_save_trims_and_returns_pair() {
        let mut model = ViewModel::new();
        for ch in " k ".chars() {
            model.insert_char(ch);
        }
        model.focus_next();
        model.insert_char('v');
        assert_eq!(model.prepare_save(), Some(("k".to_string(), "v".to_string())));
        assert!(model.alert(Pane::Save).is_none());
    }

    #[test]
    fn test_prepare_delete_rejects_empty_key() {
        let mut model = ViewModel::new();
        model.focus_previous();
        assert_eq!(model.focused(), InputField::DeleteKey);
        assert_eq!(model.prepare_delete(), None);
        let alert = model.alert(Pane::Delete).expect("validation alert");
        assert_eq!(alert.message, "Please enter a key to delete");
    }

    #[test]
    fn test_save_success_clears_inputs_and_requests_one_refresh() {
        let mut model = ViewModel::new();
        model.insert_char('k');
        model.focus_next();
        model.insert_char('v');
        let follow_up = model.apply_save_result(Ok(SaveReceipt {
            status: "created".to_string(),
            key: "k".to_string(),
        }));
        assert_eq!(follow_up, FollowUp::RefreshEntries);
        assert_eq!(model.input(InputField::SaveKey), "");
        assert_eq!(model.input(InputField::SaveValue), "");
        let alert = model.alert(Pane::Save).expect("success alert");
        assert_eq!(alert.kind, AlertKind::Success);
        assert_eq!(alert.message, "created: k");
    }

    #[test]
    fn test_save_failure_keeps_inputs_and_requests_nothing() {
        let mut model = ViewModel::new();
        model.insert_char('k');
        let follow_up = model.apply_save_result(Err(ApiError::Server {
            status: 400,
            message: "Both 'key' and 'value' are required".to_string(),
        }));
        assert_eq!(follow_up, FollowUp::None);
        assert_eq!(model.input(InputField::SaveKey), "k");
        assert_eq!(
            model.alert(Pane::Save).unwrap().message,
            "Both 'key' and 'value' are required"
        );
    }

    #[test]
    fn test_empty_listing_renders_placeholder() {
        let mut model = ViewModel::new();
        model.apply_entries_result(Ok(listing(&[])));
        assert_eq!(model.entries_display(), "Database is empty");
        assert_eq!(model.alert(Pane::Entries).unwrap().kind, AlertKind::Success);
    }

    #[test]
    fn test_listing_renders_pretty_json() {
        let mut model = ViewModel::new();
        model.apply_entries_result(Ok(listing(&[("a", "1"), ("b", "2")])));
        let display = model.entries_display();
        assert!(display.contains("\"a\": \"1\""));
        assert!(display.contains("\"b\": \"2\""));
    }

    #[test]
    fn test_listing_transport_failure_writes_error_into_display() {
        let mut model = ViewModel::new();
        model.apply_entries_result(Err(ApiError::Transport("connection refused".to_string())));
        assert_eq!(model.entries_display(), "Error: connection refused");
        let alert = model.alert(Pane::Entries).unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert!(alert.message.contains("connection refused"));
    }

    #[test]
    fn test_listing_server_failure_leaves_display_alone() {
        let mut model = ViewModel::new();
        model.apply_entries_result(Ok(listing(&[("a", "1")])));
        let before = model.entries_display().to_string();
        model.apply_entries_result(Err(ApiError::Server {
            status: 500,
            message: "oops".to_string(),
        }));
        assert_eq!(model.entries_display(), before);
        assert_eq!(model.alert(Pane::Entries).unwrap().message, "Failed to load data");
    }

    #[test]
    fn test_delete_not_found_message_names_the_key() {
        let mut model = ViewModel::new();
        let follow_up = model.apply_delete_result(Err(ApiError::NotFound {
            key: "ghost".to_string(),
        }));
        assert_eq!(follow_up, FollowUp::None);
        let alert = model.alert(Pane::Delete).unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Key \"ghost\" not found");
    }

    #[test]
    fn test_delete_success_clears_input_and_requests_refresh() {
        let mut model = ViewModel::new();
        model.focus_previous();
        model.insert_char('k');
        let follow_up = model.apply_delete_result(Ok(DeleteReceipt {
            status: "deleted".to_string(),
            key: "k".to_string(),
        }));
        assert_eq!(follow_up, FollowUp::RefreshEntries);
        assert_eq!(model.input(InputField::DeleteKey), "");
        assert_eq!(model.alert(Pane::Delete).unwrap().message, "deleted: k");
    }

    #[test]
    fn test_stats_update_all_three_display_targets() {
        let mut model = ViewModel::new();
        let raw: serde_json::Value =
            serde_json::from_str(r#"{"total_requests":3,"database_size":2}"#).unwrap();
        model.apply_stats_result(Ok(StatsSnapshot {
            total_requests: 3,
            database_size: 2,
            raw,
        }));
        assert_eq!(model.total_requests_display(), "3");
        assert_eq!(model.database_size_display(), "2");
        assert!(model.stats_display().contains("\"total_requests\": 3"));
        assert!(model.stats_display().contains("\"database_size\": 2"));
        assert_eq!(model.alert(Pane::Stats).unwrap().message, "Statistics loaded!");
    }

    #[test]
    fn test_stats_transport_failure_raises_descriptive_alert() {
        let mut model = ViewModel::new();
        model.apply_stats_result(Err(ApiError::Transport("dns failure".to_string())));
        let alert = model.alert(Pane::Stats).unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Network error: dns failure");
    }

    #[test]
    fn test_alerts_expire_after_ttl() {
        let mut model = ViewModel::new();
        model.show_alert(Pane::Save, AlertKind::Success, "done");
        let now = Instant::now();
        assert!(!model.expire_alerts(now));
        assert!(model.alert(Pane::Save).is_some());
        assert!(model.expire_alerts(now + ALERT_TTL + Duration::from_millis(1)));
        assert!(model.alert(Pane::Save).is_none());
    }

    #[test]
    fn test_newer_alert_replaces_older_on_same_pane() {
        let mut model = ViewModel::new();
        model.show_alert(Pane::Save, AlertKind::Error, "first");
        model.show_alert(Pane::Save, AlertKind::Success, "second");
        let alert = model.alert(Pane::Save).unwrap();
        assert_eq!(alert.kind, AlertKind::Success);
        assert_eq!(alert.message, "second");
    }

    #[test]
    fn test_take_dirty_consumes_flag() {
        let mut model = ViewModel::new();
        assert!(model.take_dirty());
        assert!(!model.take_dirty());
        model.insert_char('x');
        assert!(model.take_dirty());
    }
}
