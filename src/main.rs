use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use qrispay::application::draft_store::TransactionDraftStore;
use qrispay::application::pipeline::PaymentPipeline;
use qrispay::application::scanner::ScanController;
use qrispay::config::{DraftPolicy, ServiceConfig};
use qrispay::domain::code::QrisCode;
use qrispay::domain::merchant::MerchantRecord;
use qrispay::domain::ports::{MerchantLookupArc, SubmissionGatewayArc};
use qrispay::infrastructure::http::{HttpMerchantLookup, HttpSubmissionGateway};
use qrispay::infrastructure::in_memory::{
    InMemoryMerchantDirectory, RecordingGateway, ScriptedCamera, TextFrameDecoder,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raw merchant code, as read off a QRIS sticker
    code: Option<String>,

    /// Decode the code from an image file instead
    #[arg(long, conflicts_with = "code")]
    image: Option<PathBuf>,

    /// Transfer amount in currency minor units
    #[arg(long)]
    amount: u64,

    /// Optional note attached to the transfer
    #[arg(long)]
    notes: Option<String>,

    /// Service base URL. Without it, a built-in demo merchant directory and
    /// an in-process submission gateway are used.
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the merchant lookup and submission services
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let (lookup, gateway): (MerchantLookupArc, SubmissionGatewayArc) =
        if let Some(base_url) = cli.base_url.clone() {
            let config = ServiceConfig {
                base_url,
                token: cli.token.clone(),
                ..ServiceConfig::default()
            };
            (
                Arc::new(HttpMerchantLookup::new(config.clone()).into_diagnostic()?),
                Arc::new(HttpSubmissionGateway::new(config).into_diagnostic()?),
            )
        } else {
            (Arc::new(demo_directory().await), Arc::new(RecordingGateway::new()))
        };

    let store = TransactionDraftStore::new(DraftPolicy::default(), gateway);
    let scanner = ScanController::new(
        Arc::new(ScriptedCamera::new(Vec::new())),
        Arc::new(TextFrameDecoder),
    );
    let mut pipeline = PaymentPipeline::new(scanner, lookup, store.clone());

    let merchant = match (&cli.code, &cli.image) {
        (Some(code), _) => pipeline.resolve_code(code).await.into_diagnostic()?,
        (None, Some(path)) => {
            let bytes = tokio::fs::read(path).await.into_diagnostic()?;
            pipeline.scan_from_upload(&bytes).await.into_diagnostic()?
        }
        (None, None) => {
            return Err(miette!("provide a merchant code or --image <path>"));
        }
    };

    pipeline
        .set_amount_and_notes(cli.amount, cli.notes.clone())
        .await
        .into_diagnostic()?;
    pipeline.confirm().await.into_diagnostic()?;

    let draft = store.snapshot().await;
    println!("Recipient : {} / {}", merchant.name, merchant.terminal_id);
    println!("Address   : {}", merchant.address);
    println!("Amount    : Rp {}", draft.amount.unwrap_or(0));
    println!("Admin fee : Rp {}", draft.admin_fee);
    println!("Notes     : {}", draft.notes.as_deref().unwrap_or("-"));
    println!("Total     : Rp {}", draft.total());

    let receipt = pipeline.submit().await.into_diagnostic()?;
    println!("Receipt   : {}", receipt.0);

    Ok(())
}

/// Directory used when no service URL is given, seeded with one merchant so
/// the whole flow can be exercised offline.
async fn demo_directory() -> InMemoryMerchantDirectory {
    let directory = InMemoryMerchantDirectory::new();
    if let Ok(code) = QrisCode::try_from("a1b2c3d4-e5f6-7890-abcd-ef1234567890") {
        directory
            .insert(MerchantRecord {
                name: "Toko Budi".to_string(),
                merchant_id: "N123".to_string(),
                terminal_id: "T001".to_string(),
                amount: None,
                image_path: "/images/toko-budi.png".to_string(),
                address: "Jl. Melati No. 4, Yogyakarta".to_string(),
                raw_code: code,
            })
            .await;
    }
    directory
}
