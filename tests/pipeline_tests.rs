use qrispay::application::draft_store::TransactionDraftStore;
use qrispay::application::pipeline::PaymentPipeline;
use qrispay::application::scanner::ScanController;
use qrispay::application::wizard::WizardStep;
use qrispay::config::DraftPolicy;
use qrispay::domain::code::QrisCode;
use qrispay::domain::draft::DraftStatus;
use qrispay::domain::merchant::{MerchantRecord, RecipientRecord};
use qrispay::domain::scan::Frame;
use qrispay::error::{PayError, ResolutionError};
use qrispay::infrastructure::in_memory::{
    InMemoryMerchantDirectory, RecordingGateway, ScriptedCamera, TextFrameDecoder,
};
use std::sync::Arc;
use std::time::Duration;

const SAMPLE: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";
const UNKNOWN: &str = "00000000-0000-0000-0000-000000000000";

fn sample_merchant() -> MerchantRecord {
    MerchantRecord {
        name: "Toko Budi".to_string(),
        merchant_id: "N123".to_string(),
        terminal_id: "T001".to_string(),
        amount: None,
        image_path: "/images/toko-budi.png".to_string(),
        address: "Jl. Melati No. 4".to_string(),
        raw_code: QrisCode::try_from(SAMPLE).unwrap(),
    }
}

struct Setup {
    pipeline: PaymentPipeline,
    store: TransactionDraftStore,
    directory: InMemoryMerchantDirectory,
    gateway: RecordingGateway,
    camera: ScriptedCamera,
}

async fn setup(frames: Vec<Frame>) -> Setup {
    let directory = InMemoryMerchantDirectory::new();
    directory.insert(sample_merchant()).await;
    let gateway = RecordingGateway::new();
    let store = TransactionDraftStore::new(DraftPolicy::default(), Arc::new(gateway.clone()));
    let camera = ScriptedCamera::single_device(frames);
    let scanner = ScanController::new(Arc::new(camera.clone()), Arc::new(TextFrameDecoder));
    let pipeline = PaymentPipeline::new(scanner, Arc::new(directory.clone()), store.clone());
    Setup {
        pipeline,
        store,
        directory,
        gateway,
        camera,
    }
}

fn frame(text: &str) -> Frame {
    Frame(text.as_bytes().to_vec())
}

#[tokio::test]
async fn test_end_to_end_camera_flow() {
    let mut s = setup(vec![Frame(Vec::new()), frame(SAMPLE)]).await;

    let merchant = s.pipeline.scan_from_camera().await.unwrap();
    assert_eq!(merchant.name, "Toko Budi");
    assert_eq!(merchant.terminal_id, "T001");
    assert_eq!(merchant.merchant_id, "N123");
    assert_eq!(merchant.amount, None);

    let draft = s.store.snapshot().await;
    let recipient = draft.recipient.unwrap();
    assert_eq!(recipient.wallet_or_bank, "T001");
    assert_eq!(recipient.account_number, SAMPLE);
    assert_eq!(s.pipeline.current_step(), WizardStep::EnterAmount);
    assert!(s.camera.tracker().all_released());
}

#[tokio::test]
async fn test_invalid_code_never_reaches_resolver() {
    let mut s = setup(vec![frame("not-a-real-code")]).await;

    let err = s.pipeline.scan_from_camera().await.unwrap_err();
    assert!(matches!(err, PayError::InvalidCode(_)));
    assert_eq!(s.directory.resolve_calls(), 0);
    assert!(s.camera.tracker().all_released());
    assert_eq!(s.pipeline.current_step(), WizardStep::SelectDestination);

    // The flow stays usable: an upload straight after succeeds.
    let merchant = s.pipeline.scan_from_upload(SAMPLE.as_bytes()).await.unwrap();
    assert_eq!(merchant.name, "Toko Budi");
    assert_eq!(s.directory.resolve_calls(), 1);
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let mut s = setup(Vec::new()).await;

    let err = s.pipeline.resolve_code(UNKNOWN).await.unwrap_err();
    assert!(matches!(
        err,
        PayError::Resolution(ResolutionError::NotFound)
    ));
    let draft = s.store.snapshot().await;
    assert!(draft.recipient.is_none());
    assert_eq!(s.pipeline.current_step(), WizardStep::SelectDestination);
}

#[tokio::test]
async fn test_lookup_timeout() {
    let directory = InMemoryMerchantDirectory::new().with_delay(Duration::from_millis(200));
    directory.insert(sample_merchant()).await;
    let store = TransactionDraftStore::new(
        DraftPolicy::default(),
        Arc::new(RecordingGateway::new()),
    );
    let scanner = ScanController::new(
        Arc::new(ScriptedCamera::new(Vec::new())),
        Arc::new(TextFrameDecoder),
    );
    let mut pipeline = PaymentPipeline::new(scanner, Arc::new(directory), store)
        .with_lookup_timeout(Duration::from_millis(10));

    let err = pipeline.resolve_code(SAMPLE).await.unwrap_err();
    assert!(matches!(
        err,
        PayError::Resolution(ResolutionError::Timeout)
    ));
}

#[tokio::test]
async fn test_upload_flow() {
    let mut s = setup(Vec::new()).await;

    let merchant = s.pipeline.scan_from_upload(SAMPLE.as_bytes()).await.unwrap();
    assert_eq!(merchant.name, "Toko Budi");
    assert_eq!(s.pipeline.current_step(), WizardStep::EnterAmount);
    // Upload never touches the camera.
    assert_eq!(s.camera.tracker().opened(), 0);
}

#[tokio::test]
async fn test_manual_recipient_to_submission() {
    let mut s = setup(Vec::new()).await;

    let recipient = RecipientRecord::manual("Felin Agustina", "OVO", "088812194203");
    s.pipeline
        .select_manual_recipient(recipient)
        .await
        .unwrap();
    assert_eq!(s.pipeline.current_step(), WizardStep::EnterAmount);
    assert_eq!(s.directory.resolve_calls(), 0);

    s.pipeline
        .set_amount_and_notes(50_000, Some("pulsa".to_string()))
        .await
        .unwrap();
    assert_eq!(s.pipeline.current_step(), WizardStep::Review);

    s.pipeline.confirm().await.unwrap();
    assert_eq!(s.pipeline.current_step(), WizardStep::Confirm);

    let receipt = s.pipeline.submit().await.unwrap();
    assert!(!receipt.0.is_empty());
    assert_eq!(s.pipeline.current_step(), WizardStep::Done);

    let submissions = s.gateway.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].amount, Some(50_000));
    assert_eq!(submissions[0].admin_fee, 1_000);
    assert_eq!(submissions[0].status, DraftStatus::Confirmed);
}

#[tokio::test]
async fn test_premature_step_entry_redirects() {
    let mut s = setup(Vec::new()).await;

    // Nothing entered yet: every request lands on the first step.
    assert_eq!(
        s.pipeline.go_to(WizardStep::Review).await,
        WizardStep::SelectDestination
    );

    s.pipeline
        .select_manual_recipient(RecipientRecord::manual("A", "OVO", "1"))
        .await
        .unwrap();
    assert_eq!(
        s.pipeline.go_to(WizardStep::Confirm).await,
        WizardStep::EnterAmount
    );
}

#[tokio::test]
async fn test_cancel_resets_everything() {
    let mut s = setup(vec![Frame(Vec::new()); 10_000]).await;

    s.pipeline.resolve_code(SAMPLE).await.unwrap();
    s.pipeline
        .set_amount_and_notes(25_000, None)
        .await
        .unwrap();
    // Leave a camera session running, then abandon the flow.
    s.pipeline.scanner_mut().start_camera_session().await.unwrap();

    s.pipeline.cancel().await;

    let draft = s.store.snapshot().await;
    assert!(draft.recipient.is_none());
    assert!(draft.amount.is_none());
    assert_eq!(draft.status, DraftStatus::Draft);
    assert_eq!(s.pipeline.current_step(), WizardStep::SelectDestination);
    assert!(s.camera.tracker().all_released());
}

#[tokio::test]
async fn test_preset_amount_passes_through() {
    let mut s = setup(Vec::new()).await;
    let mut preset = sample_merchant();
    preset.amount = Some(20_000);
    s.directory.insert(preset).await;

    let merchant = s.pipeline.resolve_code(SAMPLE).await.unwrap();
    assert_eq!(merchant.amount, Some(20_000));
}
