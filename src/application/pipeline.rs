use crate::application::draft_store::TransactionDraftStore;
use crate::application::scanner::ScanController;
use crate::application::wizard::{WizardCoordinator, WizardStep};
use crate::domain::code::{self, ValidationOutcome};
use crate::domain::draft::SubmissionReceipt;
use crate::domain::merchant::{MerchantRecord, RecipientRecord};
use crate::domain::ports::MerchantLookupArc;
use crate::domain::scan::ScanResult;
use crate::error::{PayError, ResolutionError, Result};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Ties the whole flow together: one decode -> validate -> resolve path for
/// every acquisition source, feeding the shared draft store and the wizard.
///
/// Resolution is only ever attempted on a code that passed validation, and
/// the lookup call is bounded by a timeout. On success the resolved
/// recipient is committed to the draft and the wizard advances to the
/// amount step, which is the hand-off to the payment view.
pub struct PaymentPipeline {
    scanner: ScanController,
    lookup: MerchantLookupArc,
    store: TransactionDraftStore,
    wizard: WizardCoordinator,
    lookup_timeout: Duration,
}

impl PaymentPipeline {
    pub fn new(
        scanner: ScanController,
        lookup: MerchantLookupArc,
        store: TransactionDraftStore,
    ) -> Self {
        Self {
            scanner,
            lookup,
            store,
            wizard: WizardCoordinator::new(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn store(&self) -> &TransactionDraftStore {
        &self.store
    }

    pub fn scanner_mut(&mut self) -> &mut ScanController {
        &mut self.scanner
    }

    pub fn current_step(&self) -> WizardStep {
        self.wizard.current()
    }

    /// Runs a camera session until its first hit and feeds the result
    /// through validation and resolution. On an invalid code the camera has
    /// already been released and a fresh session can simply be started.
    pub async fn scan_from_camera(&mut self) -> Result<MerchantRecord> {
        self.scanner.start_camera_session().await?;
        let scan = self.scanner.wait_for_scan().await?;
        self.accept_scan(scan).await
    }

    /// Decodes an uploaded image and feeds it through the same path.
    pub async fn scan_from_upload(&mut self, bytes: &[u8]) -> Result<MerchantRecord> {
        let scan = self.scanner.decode_uploaded_image(bytes).await?;
        self.accept_scan(scan).await
    }

    /// A code typed or pasted by the user, skipping acquisition entirely.
    pub async fn resolve_code(&mut self, raw: &str) -> Result<MerchantRecord> {
        self.validate_and_resolve(raw).await
    }

    /// Destination chosen by hand (saved contact or manual entry); no
    /// validation or lookup involved.
    pub async fn select_manual_recipient(&mut self, recipient: RecipientRecord) -> Result<()> {
        self.store.set_recipient(recipient).await?;
        self.advance(WizardStep::EnterAmount).await;
        Ok(())
    }

    /// Amount-step commit plus the move to review.
    pub async fn set_amount_and_notes(&mut self, amount: u64, notes: Option<String>) -> Result<()> {
        self.store.set_amount_and_notes(amount, notes).await?;
        self.advance(WizardStep::Review).await;
        Ok(())
    }

    /// Review-step commit plus the move to the confirmation page.
    pub async fn confirm(&mut self) -> Result<()> {
        self.store.confirm().await?;
        self.advance(WizardStep::Confirm).await;
        Ok(())
    }

    /// Final submission; the wizard only reaches `Done` when it succeeds.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt> {
        let receipt = self.store.submit().await?;
        self.wizard.finish();
        Ok(receipt)
    }

    /// Explicit cancellation from any step: releases the camera if a session
    /// is live, clears the draft, and returns to the first step.
    pub async fn cancel(&mut self) {
        self.scanner.stop_session().await;
        self.store.reset().await;
        self.wizard.reset();
    }

    /// Re-evaluates step entry against the current draft, landing on the
    /// earliest unmet prerequisite when the request is premature.
    pub async fn go_to(&mut self, requested: WizardStep) -> WizardStep {
        self.advance(requested).await
    }

    async fn accept_scan(&mut self, scan: ScanResult) -> Result<MerchantRecord> {
        info!(source = ?scan.source, "scan acquired");
        self.validate_and_resolve(&scan.raw_text).await
    }

    async fn validate_and_resolve(&mut self, raw: &str) -> Result<MerchantRecord> {
        let code = match code::validate(raw) {
            ValidationOutcome::Valid(code) => code,
            ValidationOutcome::Invalid { reason } => {
                warn!(%reason, "rejected merchant code");
                return Err(PayError::InvalidCode(reason));
            }
        };

        let merchant = match timeout(self.lookup_timeout, self.lookup.resolve(&code)).await {
            Ok(resolved) => resolved?,
            Err(_) => return Err(ResolutionError::Timeout.into()),
        };
        info!(merchant = %merchant.name, "code resolved");

        self.store
            .set_recipient(RecipientRecord::from_merchant(&merchant))
            .await?;
        self.advance(WizardStep::EnterAmount).await;
        Ok(merchant)
    }

    async fn advance(&mut self, requested: WizardStep) -> WizardStep {
        let snapshot = self.store.snapshot().await;
        self.wizard.go_to(requested, &snapshot)
    }
}
