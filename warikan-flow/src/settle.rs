//! Settle screen state
//!
//! All editing-screen fields live in one record and change only through
//! the transition methods below, so the pre-sync validation and the
//! derived subtotal/tax/total views always agree with what the user
//! sees. The record is local to one screen instance and mutated on a
//! single thread; nothing here is shared across tasks.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    Assignment, AssignmentMap, Group, GroupUser, ReceiptItem, SettlementPayload,
};
use shared::settle::{self, CostSplit, SettleError};
use shared::{ListResponse, ReceiptParseResult, TransactionResponse, UserCost};
use warikan_client::{ClientError, HttpClient};

/// Sync lifecycle of the settle button
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No sync in flight; the button is enabled
    #[default]
    Idle,
    /// A sync (with retries) is running; the button is disabled
    Syncing,
    /// The last sync exhausted its retries; an alert is showing
    Failed(String),
}

/// Result of driving one sync attempt to completion
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Transaction posted; navigate back to the previous screen
    NavigateBack,
    /// A pre-sync check failed; show a blocking dialog, nothing was sent
    ValidationFailed(SettleError),
    /// Every retry attempt failed; show a dismissible alert
    SyncFailed(String),
    /// A sync is already in flight; ignore the duplicate trigger
    AlreadySyncing,
}

/// Posting seam so the screen logic can be tested with a scripted stub
#[async_trait]
pub trait TransactionSync {
    async fn sync_transaction(
        &self,
        payload: &SettlementPayload,
    ) -> Result<TransactionResponse, ClientError>;
}

#[async_trait]
impl TransactionSync for HttpClient {
    async fn sync_transaction(
        &self,
        payload: &SettlementPayload,
    ) -> Result<TransactionResponse, ClientError> {
        HttpClient::sync_transaction(self, payload).await
    }
}

/// State of the receipt editing screen
#[derive(Debug, Clone, Default)]
pub struct SettleScreen {
    pub groups: Vec<Group>,
    pub selected_group: Option<i64>,
    pub users: Vec<GroupUser>,
    pub paying_member: Option<i64>,
    pub items: Vec<ReceiptItem>,
    pub assignments: AssignmentMap,
    pub tax_percentage: f64,
    /// Total from the upload response; displayed verbatim when present
    pub server_total: Option<f64>,
    pub purpose: String,
    pub receipt_date: Option<NaiveDate>,
    pub receipt_image_url: Option<String>,
    pub sync: SyncState,
}

impl SettleScreen {
    /// Build the screen from the upload result carried in navigation
    /// parameters; malformed JSON falls back to the sample dataset
    pub fn from_navigation(json: &str) -> Self {
        Self::from_parse_result(ReceiptParseResult::from_navigation(json))
    }

    pub fn from_parse_result(parsed: ReceiptParseResult) -> Self {
        let mut items = parsed.items;
        items.sort_by_key(|item| item.order);

        Self {
            items,
            server_total: parsed.total,
            receipt_date: parsed.receipt_date,
            receipt_image_url: parsed.image_url,
            ..Self::default()
        }
    }

    // ========== Group / user transitions ==========

    /// Store the fetched group list, defaulting to the last group
    pub fn set_groups(&mut self, groups: ListResponse<Group>) {
        self.selected_group = groups.last().map(|g| g.id);
        self.groups = groups.items;
    }

    /// Switch the selected group
    ///
    /// Users, payer, and the assignment map all refer to the previous
    /// group's members, so they are invalidated here and not as a side
    /// effect of the next fetch.
    pub fn select_group(&mut self, group_id: i64) {
        self.selected_group = Some(group_id);
        self.users.clear();
        self.paying_member = None;
        self.assignments.clear();
    }

    pub fn set_users(&mut self, users: ListResponse<GroupUser>) {
        self.users = users.items;
    }

    pub fn select_payer(&mut self, user_id: i64) {
        self.paying_member = Some(user_id);
    }

    // ========== Item edits ==========

    /// Apply a user-edited cost field; lenient parse, clamped to ≥ 0
    pub fn set_item_cost(&mut self, index: usize, text: &str) {
        if let Some(item) = self.items.get_mut(index) {
            item.cost = shared::parse::parse_amount(text);
        }
    }

    /// Apply a user-edited quantity field
    pub fn set_item_quantity(&mut self, index: usize, text: &str) {
        if let Some(item) = self.items.get_mut(index) {
            item.quantity = shared::parse::parse_count(text);
        }
    }

    /// Apply a user-edited tax percentage field
    pub fn set_tax_percentage(&mut self, text: &str) {
        self.tax_percentage = shared::parse::parse_percent(text);
    }

    pub fn set_purpose(&mut self, purpose: impl Into<String>) {
        self.purpose = purpose.into();
    }

    pub fn assign_item(&mut self, index: usize, user_id: i64) {
        self.assignments.assign(index, Assignment::User(user_id));
    }

    pub fn share_item(&mut self, index: usize) {
        self.assignments.assign(index, Assignment::Shared);
    }

    // ========== Derived views ==========

    pub fn subtotal(&self) -> f64 {
        settle::subtotal(&self.items)
    }

    pub fn tax_amount(&self) -> f64 {
        settle::tax_amount(self.subtotal(), self.tax_percentage)
    }

    /// Total computed from local edits; shown only for transparency
    pub fn local_total(&self) -> f64 {
        settle::local_total(self.subtotal(), self.tax_amount())
    }

    /// Total shown on screen and sent to the server
    ///
    /// When the upload response carried a total it is authoritative:
    /// local edits to items or tax never change it. The local
    /// computation is the fallback for receipts entered by hand.
    pub fn displayed_total(&self) -> f64 {
        self.server_total.unwrap_or_else(|| self.local_total())
    }

    // ========== Validation and payload ==========

    /// Run the pre-sync checks in order, touching no network
    pub fn validate(&self) -> Result<(), SettleError> {
        self.prepare().map(|_| ())
    }

    fn prepare(&self) -> Result<(i64, i64, CostSplit), SettleError> {
        let group_id = self.selected_group.ok_or(SettleError::NoGroupSelected)?;
        let payer = self.paying_member.ok_or(SettleError::NoPayerSelected)?;

        if let Some(index) = self.assignments.first_unassigned(self.items.len()) {
            return Err(SettleError::UnassignedItem { index });
        }

        let split = settle::split_costs(&self.items, &self.assignments)?;
        if split.per_user.is_empty() && split.shared_items.is_empty() {
            return Err(SettleError::NothingToSettle);
        }

        Ok((group_id, payer, split))
    }

    /// Build the settlement payload, constructed once per sync
    pub fn build_payload(&self) -> Result<SettlementPayload, SettleError> {
        let (group_id, paying_member_id, split) = self.prepare()?;
        let CostSplit {
            per_user,
            shared_items,
        } = split;

        Ok(SettlementPayload {
            purpose: self.purpose.clone(),
            group_id,
            paying_member_id,
            tax_percentage: self.tax_percentage,
            total_amount: self.displayed_total(),
            member_costs: per_user,
            split_receipt_items: shared_items,
            receipt_date: self.receipt_date,
            receipt_image_url: self.receipt_image_url.clone(),
        })
    }

    // ========== Sync state machine ==========

    /// Enter the Syncing state; false when a sync is already in flight
    pub fn begin_sync(&mut self) -> bool {
        if self.sync == SyncState::Syncing {
            return false;
        }
        self.sync = SyncState::Syncing;
        true
    }

    pub fn sync_succeeded(&mut self) {
        self.sync = SyncState::Idle;
    }

    pub fn sync_failed(&mut self, message: impl Into<String>) {
        self.sync = SyncState::Failed(message.into());
    }

    /// Dismiss the failure alert, returning the button to Idle
    pub fn dismiss_failure(&mut self) {
        if matches!(self.sync, SyncState::Failed(_)) {
            self.sync = SyncState::Idle;
        }
    }

    /// Validate, build the payload once, and post it with retries
    ///
    /// Validation failures abort before any network call and leave the
    /// state untouched. The payload is identical across retry attempts.
    pub async fn run_sync<S: TransactionSync + ?Sized>(&mut self, client: &S) -> SyncOutcome {
        if !self.begin_sync() {
            return SyncOutcome::AlreadySyncing;
        }

        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("Sync blocked by validation: {e}");
                self.sync = SyncState::Idle;
                return SyncOutcome::ValidationFailed(e);
            }
        };

        match client.sync_transaction(&payload).await {
            Ok(_) => {
                self.sync_succeeded();
                SyncOutcome::NavigateBack
            }
            Err(e) => {
                let message = e.to_string();
                self.sync_failed(message.clone());
                SyncOutcome::SyncFailed(message)
            }
        }
    }

    /// Per-user totals for on-screen display, yen-rounded
    pub fn user_total_labels(&self) -> Vec<(i64, String)> {
        settle::split_costs(&self.items, &self.assignments)
            .map(|split| {
                split
                    .per_user
                    .iter()
                    .map(|UserCost { user_id, amount }| (*user_id, settle::format_yen(*amount)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
