//! Selection and session state for account views.
//!
//! Dialog targets are stored as `Option<String>` and the "is open" flags
//! are derived from them, so a dialog can never be open without a target
//! account (or hold a target while closed).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ranking::AccountFilter;

/// How the account list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<String>,
    add_dialog_open: bool,
    details_account_id: Option<String>,
    device_account_id: Option<String>,
    current_account_id: Option<String>,
    view_mode: ViewMode,
    search_query: String,
    filter: AccountFilter,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // Selection

    pub fn select(&mut self, id: &str) {
        if !self.selected.contains(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.remove(id);
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Replace the selection wholesale with `ids`.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Header-checkbox behaviour for the visible page: deselect the page
    /// when all of it is selected, otherwise add the whole page.
    pub fn toggle_page(&mut self, page_ids: &[&str]) {
        let all_selected = page_ids.iter().all(|id| self.selected.contains(*id));
        for id in page_ids {
            if all_selected {
                self.selected.remove(*id);
            } else {
                self.selected.insert((*id).to_string());
            }
        }
    }

    /// Drop selected ids that no longer exist after an account list refresh.
    pub fn retain_known<'a>(&mut self, known_ids: impl IntoIterator<Item = &'a str>) {
        let known: HashSet<&str> = known_ids.into_iter().collect();
        self.selected.retain(|id| known.contains(id.as_str()));
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    // Dialogs

    pub fn open_add_dialog(&mut self) {
        self.add_dialog_open = true;
    }

    pub fn close_add_dialog(&mut self) {
        self.add_dialog_open = false;
    }

    pub const fn is_add_dialog_open(&self) -> bool {
        self.add_dialog_open
    }

    pub fn open_details_dialog(&mut self, account_id: impl Into<String>) {
        self.details_account_id = Some(account_id.into());
    }

    pub fn close_details_dialog(&mut self) {
        self.details_account_id = None;
    }

    pub const fn is_details_dialog_open(&self) -> bool {
        self.details_account_id.is_some()
    }

    pub fn details_account_id(&self) -> Option<&str> {
        self.details_account_id.as_deref()
    }

    pub fn open_device_dialog(&mut self, account_id: impl Into<String>) {
        self.device_account_id = Some(account_id.into());
    }

    pub fn close_device_dialog(&mut self) {
        self.device_account_id = None;
    }

    pub const fn is_device_dialog_open(&self) -> bool {
        self.device_account_id.is_some()
    }

    pub fn device_account_id(&self) -> Option<&str> {
        self.device_account_id.as_deref()
    }

    // Session

    pub fn set_current_account(&mut self, account_id: Option<String>) {
        self.current_account_id = account_id;
    }

    pub fn current_account_id(&self) -> Option<&str> {
        self.current_account_id.as_deref()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Changing the search query clears the selection.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.selected.clear();
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Changing the tier filter clears the selection.
    pub fn set_filter(&mut self, filter: AccountFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.selected.clear();
        }
    }

    pub const fn filter(&self) -> AccountFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(state: &SelectionState) -> Vec<String> {
        let mut ids: Vec<String> = state.selected_ids().iter().cloned().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_select_and_deselect_are_idempotent() {
        let mut state = SelectionState::new();
        state.select("a");
        state.select("a");
        assert_eq!(state.selected_count(), 1);

        state.deselect("missing");
        assert_eq!(sorted(&state), vec!["a"]);

        state.deselect("a");
        state.deselect("a");
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut state = SelectionState::new();
        state.toggle("a");
        assert!(state.is_selected("a"));
        state.toggle("a");
        assert!(!state.is_selected("a"));
    }

    #[test]
    fn test_select_all_replaces() {
        let mut state = SelectionState::new();
        state.select_all(["a", "b"]);
        state.select_all(["a"]);
        assert_eq!(sorted(&state), vec!["a"]);

        state.select_all(Vec::<String>::new());
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn test_toggle_page() {
        let mut state = SelectionState::new();
        state.select("x");
        state.select("a");

        state.toggle_page(&["a", "b"]);
        assert_eq!(sorted(&state), vec!["a", "b", "x"]);

        state.toggle_page(&["a", "b"]);
        assert_eq!(sorted(&state), vec!["x"]);
    }

    #[test]
    fn test_retain_known() {
        let mut state = SelectionState::new();
        state.select_all(["a", "b", "c"]);
        state.retain_known(["a", "c", "d"]);
        assert_eq!(sorted(&state), vec!["a", "c"]);
    }

    #[test]
    fn test_details_dialog_flag_and_target_move_together() {
        let mut state = SelectionState::new();
        assert!(!state.is_details_dialog_open());
        assert_eq!(state.details_account_id(), None);

        state.open_details_dialog("x");
        assert!(state.is_details_dialog_open());
        assert_eq!(state.details_account_id(), Some("x"));

        state.close_details_dialog();
        assert!(!state.is_details_dialog_open());
        assert_eq!(state.details_account_id(), None);
    }

    #[test]
    fn test_device_dialog_independent_of_details() {
        let mut state = SelectionState::new();
        state.open_details_dialog("x");
        state.open_device_dialog("y");
        state.close_device_dialog();

        assert!(!state.is_device_dialog_open());
        assert_eq!(state.device_account_id(), None);
        assert_eq!(state.details_account_id(), Some("x"));
    }

    #[test]
    fn test_add_dialog() {
        let mut state = SelectionState::new();
        state.open_add_dialog();
        assert!(state.is_add_dialog_open());
        state.close_add_dialog();
        assert!(!state.is_add_dialog_open());
    }

    #[test]
    fn test_search_and_filter_changes_clear_selection() {
        let mut state = SelectionState::new();
        state.select_all(["a", "b"]);

        state.set_search_query("");
        assert_eq!(state.selected_count(), 2, "unchanged query keeps selection");

        state.set_search_query("alice");
        assert_eq!(state.selected_count(), 0);

        state.select("a");
        state.set_filter(AccountFilter::Pro);
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.filter(), AccountFilter::Pro);
    }

    #[test]
    fn test_session_fields() {
        let mut state = SelectionState::new();
        assert_eq!(state.view_mode(), ViewMode::Table);
        state.set_current_account(Some("acc-1".into()));
        state.set_view_mode(ViewMode::Grid);
        assert_eq!(state.current_account_id(), Some("acc-1"));
        assert_eq!(state.view_mode(), ViewMode::Grid);
    }

    #[test]
    fn test_view_mode_wire_names() {
        assert_eq!(serde_json::to_value(ViewMode::Table).ok(), Some(serde_json::json!("table")));
        assert_eq!(serde_json::from_str::<ViewMode>("\"grid\"").ok(), Some(ViewMode::Grid));
    }
}
