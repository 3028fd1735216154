use crate::error::{MomoError, Result};
use crate::extractor;
use crate::models::{ParsedMessage, TxType};

// ---------------------------------------------------------------------------
// Rule chain — enum dispatch, evaluated strictly in this order
// ---------------------------------------------------------------------------

/// Precedence of the categories. Templates overlap lexically, so
/// reordering this list changes classification results.
pub const RULE_CHAIN: &[TxType] = &[
    TxType::Receive,
    TxType::Payment,
    TxType::CodePay,
    TxType::Deposit,
    TxType::Airtime,
    TxType::Transfer,
    TxType::Withdraw,
    TxType::Otp,
    TxType::Other,
];

impl TxType {
    /// Whether the body carries this category's primary signal.
    pub fn detect(&self, body: &str) -> bool {
        match self {
            Self::Receive => extractor::receive_signal().is_match(body),
            Self::Payment => extractor::payment_signal().is_match(body),
            Self::CodePay => extractor::code_pay_signal().is_match(body),
            Self::Deposit => extractor::deposit_signal().is_match(body),
            Self::Airtime => extractor::airtime_signal().is_match(body),
            Self::Transfer => extractor::transfer_signal().is_match(body),
            Self::Withdraw => extractor::has_withdraw_wording(body),
            Self::Otp => extractor::has_otp_wording(body),
            Self::Other => true,
        }
    }

    pub fn extract(&self, body: &str) -> Result<ParsedMessage> {
        match self {
            Self::Receive => extractor::receive(body),
            Self::Payment => extractor::payment(body),
            Self::CodePay => extractor::code_pay(body),
            Self::Deposit => extractor::deposit(body),
            Self::Airtime => extractor::airtime(body),
            Self::Transfer => extractor::transfer(body),
            Self::Withdraw => extractor::withdraw(body),
            Self::Otp | Self::Other => Ok(ParsedMessage::bare(*self, body)),
        }
    }
}

/// First category in [`RULE_CHAIN`] whose primary signal matches.
pub fn detect(body: &str) -> TxType {
    RULE_CHAIN
        .iter()
        .find(|t| t.detect(body))
        .copied()
        .unwrap_or(TxType::Other)
}

/// Classify a body and extract its fields. A `MalformedMessage` error means
/// the signal matched but a mandatory field did not; callers decide how to
/// degrade it.
pub fn classify(body: &str) -> Result<ParsedMessage> {
    detect(body).extract(body)
}

/// Like [`classify`], but a malformed message becomes a bare `other`
/// record. The error is handed back so callers can report it.
pub fn classify_or_other(body: &str) -> (ParsedMessage, Option<MomoError>) {
    match classify(body) {
        Ok(parsed) => (parsed, None),
        Err(e) => (ParsedMessage::bare(TxType::Other, body), Some(e)),
    }
}
