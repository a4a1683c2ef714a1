//! Application layer orchestrating the scan-to-pay flow.
//!
//! `ScanController` owns the camera session lifecycle, `TransactionDraftStore`
//! holds the session's shared draft state, `WizardCoordinator` gates the step
//! sequence, and `PaymentPipeline` ties them together behind one
//! decode -> validate -> resolve path.

pub mod draft_store;
pub mod pipeline;
pub mod scanner;
pub mod wizard;
