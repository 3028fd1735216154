use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MomoError;

/// Transaction category. Serialized with the tags downstream consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "receive")]
    Receive,
    #[serde(rename = "payment")]
    Payment,
    #[serde(rename = "codePay")]
    CodePay,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "airtime")]
    Airtime,
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "withdraw")]
    Withdraw,
    #[serde(rename = "otp")]
    Otp,
    #[serde(rename = "other")]
    Other,
}

impl TxType {
    pub const ALL: [TxType; 9] = [
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

    pub fn key(&self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::Payment => "payment",
            Self::CodePay => "codePay",
            Self::Deposit => "deposit",
            Self::Airtime => "airtime",
            Self::Transfer => "transfer",
            Self::Withdraw => "withdraw",
            Self::Otp => "otp",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TxType {
    type Err = MomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TxType::ALL
            .iter()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| MomoError::UnknownType(s.to_string()))
    }
}

/// Output of the classifier for one message body, before the pipeline
/// attaches an id and the export's display date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedMessage {
    pub transaction_id: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub timestamp: Option<String>,
    pub balance: Option<String>,
    pub fee: Option<String>,
    pub raw_body: String,
}

impl ParsedMessage {
    /// A message carrying only its category and trimmed body.
    pub fn bare(tx_type: TxType, body: &str) -> Self {
        ParsedMessage {
            transaction_id: None,
            tx_type,
            amount: None,
            sender: None,
            receiver: None,
            timestamp: None,
            balance: None,
            fee: None,
            raw_body: body.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub amount: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub timestamp: Option<String>,
    pub balance: Option<String>,
    pub fee: Option<String>,
    pub raw_body: String,
    pub id: u64,
    pub raw_date: Option<String>,
}

impl TransactionRecord {
    pub fn from_parsed(id: u64, raw_date: Option<String>, parsed: ParsedMessage) -> Self {
        TransactionRecord {
            transaction_id: parsed.transaction_id,
            tx_type: parsed.tx_type,
            amount: parsed.amount,
            sender: parsed.sender,
            receiver: parsed.receiver,
            timestamp: parsed.timestamp,
            balance: parsed.balance,
            fee: parsed.fee,
            raw_body: parsed.raw_body,
            id,
            raw_date,
        }
    }
}

/// One `sms` element from the export document.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsMessage {
    pub body: String,
    pub readable_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_type_parses_case_insensitively() {
        assert_eq!("codePay".parse::<TxType>().unwrap(), TxType::CodePay);
        assert_eq!("CODEPAY".parse::<TxType>().unwrap(), TxType::CodePay);
        assert_eq!(" withdraw ".parse::<TxType>().unwrap(), TxType::Withdraw);
        assert!("refund".parse::<TxType>().is_err());
    }

    #[test]
    fn test_record_serializes_nulls_and_type_tag() {
        let parsed = ParsedMessage::bare(TxType::Otp, "  Your OTP is 1234  ");
        let record = TransactionRecord::from_parsed(7, Some("10 May 2024 4:30:58 PM".into()), parsed);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "otp");
        assert_eq!(value["id"], 7);
        assert_eq!(value["raw_body"], "Your OTP is 1234");
        assert!(value["amount"].is_null());
        assert!(value.as_object().unwrap().contains_key("fee"));
    }

    #[test]
    fn test_record_deserializes_code_pay_tag() {
        let json = r#"{"transaction_id":"1","type":"codePay","amount":"10","sender":null,
            "receiver":"Shop 1","timestamp":null,"balance":null,"fee":"0",
            "raw_body":"x","id":3,"raw_date":null}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tx_type, TxType::CodePay);
        assert_eq!(record.receiver.as_deref(), Some("Shop 1"));
    }
}
