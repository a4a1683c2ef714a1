use crate::config::DraftPolicy;
use crate::domain::draft::{DraftStatus, SubmissionReceipt, TransactionDraft};
use crate::domain::merchant::RecipientRecord;
use crate::domain::ports::SubmissionGatewayArc;
use crate::error::{PayError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Session-scoped shared state for the in-progress transaction.
///
/// `Clone` hands out another handle to the same draft, so independently
/// rendered wizard steps all see one instance. Each step writes a disjoint
/// subset of the draft's fields through the operations below; reads are
/// unrestricted.
#[derive(Clone)]
pub struct TransactionDraftStore {
    draft: Arc<RwLock<TransactionDraft>>,
    policy: DraftPolicy,
    gateway: SubmissionGatewayArc,
    submit_timeout: Duration,
}

impl TransactionDraftStore {
    pub fn new(policy: DraftPolicy, gateway: SubmissionGatewayArc) -> Self {
        Self {
            draft: Arc::new(RwLock::new(TransactionDraft::default())),
            policy,
            gateway,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn policy(&self) -> &DraftPolicy {
        &self.policy
    }

    /// Current state of the draft, for rendering a summary on any step.
    pub async fn snapshot(&self) -> TransactionDraft {
        self.draft.read().await.clone()
    }

    /// Destination-step commit. Overwrites the recipient without touching an
    /// already-entered amount or notes, so changing the recipient keeps the
    /// rest of the form intact.
    pub async fn set_recipient(&self, recipient: RecipientRecord) -> Result<()> {
        let mut draft = self.draft.write().await;
        if draft.status != DraftStatus::Draft {
            return Err(PayError::AlreadyConfirmed);
        }
        debug!(recipient = %recipient.display_name, "recipient set");
        draft.recipient = Some(recipient);
        Ok(())
    }

    /// Amount-step commit. Empty notes are stored as absent.
    pub async fn set_amount_and_notes(&self, amount: u64, notes: Option<String>) -> Result<()> {
        if amount < self.policy.min_transfer_amount {
            return Err(PayError::InvalidAmount {
                amount,
                minimum: self.policy.min_transfer_amount,
            });
        }
        let mut draft = self.draft.write().await;
        if draft.status != DraftStatus::Draft {
            return Err(PayError::AlreadyConfirmed);
        }
        draft.amount = Some(amount);
        draft.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    /// Review-step commit: computes the admin fee and seals the draft.
    pub async fn confirm(&self) -> Result<()> {
        let mut draft = self.draft.write().await;
        if !draft.has_recipient() {
            return Err(PayError::IncompleteDraft("recipient"));
        }
        if !draft.has_amount() {
            return Err(PayError::IncompleteDraft("amount"));
        }
        draft.admin_fee = self.policy.admin_fee;
        draft.status = DraftStatus::Confirmed;
        debug!(total = draft.total(), "draft confirmed");
        Ok(())
    }

    /// Submits the confirmed draft to the external service.
    ///
    /// On failure the draft stays `Confirmed` with all fields intact, so the
    /// user can retry. On success the draft reaches `Submitted` and is then
    /// cleared for a new session; the receipt carries the outcome.
    pub async fn submit(&self) -> Result<SubmissionReceipt> {
        let confirmed = {
            let draft = self.draft.read().await;
            if draft.status != DraftStatus::Confirmed {
                return Err(PayError::NotConfirmed);
            }
            draft.clone()
        };

        let receipt = match tokio::time::timeout(
            self.submit_timeout,
            self.gateway.submit(&confirmed),
        )
        .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(err)) => {
                warn!(%err, "submission failed, draft kept for retry");
                return Err(err);
            }
            Err(_) => {
                warn!("submission timed out, draft kept for retry");
                return Err(PayError::Submission("timed out".to_string()));
            }
        };

        let mut draft = self.draft.write().await;
        draft.status = DraftStatus::Submitted;
        info!(receipt = %receipt.0, total = confirmed.total(), "transfer submitted");
        *draft = TransactionDraft::default();
        Ok(receipt)
    }

    /// Explicit cancellation: back to an empty draft, usable at any step.
    pub async fn reset(&self) {
        *self.draft.write().await = TransactionDraft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::TransactionDraft;
    use crate::domain::ports::SubmissionGateway;
    use async_trait::async_trait;

    struct NullGateway;

    #[async_trait]
    impl SubmissionGateway for NullGateway {
        async fn submit(&self, _draft: &TransactionDraft) -> Result<SubmissionReceipt> {
            Ok(SubmissionReceipt("SUB-0001".to_string()))
        }
    }

    fn store() -> TransactionDraftStore {
        TransactionDraftStore::new(DraftPolicy::default(), Arc::new(NullGateway))
    }

    fn recipient() -> RecipientRecord {
        RecipientRecord::manual("Toko Budi", "T001", "a1b2c3d4-e5f6-7890-abcd-ef1234567890")
    }

    #[tokio::test]
    async fn test_amount_below_minimum_rejected() {
        let store = store();
        let err = store
            .set_amount_and_notes(5_000, Some(String::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PayError::InvalidAmount {
                amount: 5_000,
                minimum: 10_000
            }
        ));
    }

    #[tokio::test]
    async fn test_amount_at_minimum_accepted() {
        let store = store();
        store
            .set_amount_and_notes(10_000, Some(String::new()))
            .await
            .unwrap();
        let draft = store.snapshot().await;
        assert_eq!(draft.amount, Some(10_000));
        // Empty notes are normalized away
        assert_eq!(draft.notes, None);
    }

    #[tokio::test]
    async fn test_confirm_on_empty_draft_fails() {
        let store = store();
        let err = store.confirm().await.unwrap_err();
        assert!(matches!(err, PayError::IncompleteDraft("recipient")));
    }

    #[tokio::test]
    async fn test_confirm_without_amount_fails() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        let err = store.confirm().await.unwrap_err();
        assert!(matches!(err, PayError::IncompleteDraft("amount")));
    }

    #[tokio::test]
    async fn test_confirm_computes_fee_and_seals() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store.set_amount_and_notes(25_000, None).await.unwrap();
        store.confirm().await.unwrap();

        let draft = store.snapshot().await;
        assert_eq!(draft.status, DraftStatus::Confirmed);
        assert_eq!(draft.admin_fee, 1_000);
        assert_eq!(draft.total(), 26_000);
    }

    #[tokio::test]
    async fn test_no_edits_after_confirm() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store.set_amount_and_notes(25_000, None).await.unwrap();
        store.confirm().await.unwrap();

        assert!(matches!(
            store.set_recipient(recipient()).await.unwrap_err(),
            PayError::AlreadyConfirmed
        ));
        assert!(matches!(
            store.set_amount_and_notes(30_000, None).await.unwrap_err(),
            PayError::AlreadyConfirmed
        ));
    }

    #[tokio::test]
    async fn test_change_recipient_keeps_amount() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store
            .set_amount_and_notes(50_000, Some("lunch".to_string()))
            .await
            .unwrap();

        let other = RecipientRecord::manual("Warung Sari", "T002", "088812194203");
        store.set_recipient(other.clone()).await.unwrap();

        let draft = store.snapshot().await;
        assert_eq!(draft.recipient, Some(other));
        assert_eq!(draft.amount, Some(50_000));
        assert_eq!(draft.notes, Some("lunch".to_string()));
    }

    #[tokio::test]
    async fn test_submit_requires_confirmation() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store.set_amount_and_notes(25_000, None).await.unwrap();
        assert!(matches!(
            store.submit().await.unwrap_err(),
            PayError::NotConfirmed
        ));
    }

    #[tokio::test]
    async fn test_submit_clears_draft() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store.set_amount_and_notes(25_000, None).await.unwrap();
        store.confirm().await.unwrap();

        let receipt = store.submit().await.unwrap();
        assert_eq!(receipt.0, "SUB-0001");
        assert_eq!(store.snapshot().await, TransactionDraft::default());
    }

    #[tokio::test]
    async fn test_reset_from_any_state() {
        let store = store();
        store.set_recipient(recipient()).await.unwrap();
        store.set_amount_and_notes(25_000, None).await.unwrap();
        store.confirm().await.unwrap();

        store.reset().await;
        assert_eq!(store.snapshot().await, TransactionDraft::default());
    }
}
