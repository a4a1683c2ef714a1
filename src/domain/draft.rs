use crate::domain::merchant::RecipientRecord;

/// Lifecycle of the in-progress transaction. Advances monotonically
/// `Draft -> Confirmed -> Submitted`; only an explicit reset goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftStatus {
    #[default]
    Draft,
    Confirmed,
    Submitted,
}

/// The accumulating transaction: one instance per active session, filled in
/// step by step by the wizard and read back by the review screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionDraft {
    pub recipient: Option<RecipientRecord>,
    /// Transfer amount in currency minor units.
    pub amount: Option<u64>,
    pub notes: Option<String>,
    /// Computed at confirmation; zero until then.
    pub admin_fee: u64,
    pub status: DraftStatus,
}

impl TransactionDraft {
    pub fn has_recipient(&self) -> bool {
        self.recipient.is_some()
    }

    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }

    /// Amount plus admin fee, as shown on the review screen.
    pub fn total(&self) -> u64 {
        self.amount.unwrap_or(0) + self.admin_fee
    }
}

/// Token returned by the submission service on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt(pub String);
