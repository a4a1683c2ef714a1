use crate::domain::code::QrisCode;

/// Merchant data resolved from a scanned code by the lookup service.
///
/// Immutable once constructed; a fresh resolution replaces the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantRecord {
    pub name: String,
    /// National merchant id (`nmid` on the wire).
    pub merchant_id: String,
    pub terminal_id: String,
    /// Preset amount, when one is encoded into the code.
    pub amount: Option<u64>,
    pub image_path: String,
    pub address: String,
    /// The code that resolved to this merchant.
    pub raw_code: QrisCode,
}

/// Canonical recipient shape consumed by the transfer wizard, regardless of
/// whether it came from a scan or was entered manually.
///
/// Immutable once constructed; updates replace the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipientRecord {
    pub display_name: String,
    /// Wallet or bank label shown under the name; the terminal id for a
    /// scanned merchant.
    pub wallet_or_bank: String,
    pub account_number: String,
    pub number_destination: String,
    pub avatar_url: String,
}

impl RecipientRecord {
    /// Maps a resolved merchant into the wizard's recipient shape.
    pub fn from_merchant(merchant: &MerchantRecord) -> Self {
        Self {
            display_name: merchant.name.clone(),
            wallet_or_bank: merchant.terminal_id.clone(),
            account_number: merchant.raw_code.as_str().to_string(),
            number_destination: merchant.merchant_id.clone(),
            avatar_url: merchant.image_path.clone(),
        }
    }

    /// Recipient entered by hand, bypassing the scan path entirely.
    pub fn manual(
        display_name: impl Into<String>,
        wallet_or_bank: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        let account_number = account_number.into();
        Self {
            display_name: display_name.into(),
            wallet_or_bank: wallet_or_bank.into(),
            number_destination: account_number.clone(),
            account_number,
            avatar_url: String::new(),
        }
    }
}
