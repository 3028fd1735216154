use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{MomoError, Result};
use crate::models::{ParsedMessage, TxType};

// Amounts keep their digit grouping exactly as written: 2000, 2,000, 1,500.00, 1.500,00
const AMOUNT: &str = r"\d+(?:[.,]\d+)*";
const TIMESTAMP: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}";

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("invalid extractor regex")
}

// ---------------------------------------------------------------------------
// Primary signals
// ---------------------------------------------------------------------------

pub fn receive_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"received ({AMOUNT}) RWF from (.+?) \(")))
}

/// `TxId:<id>` or `TxId <id>`; the codePay template puts a space after the colon.
/// The receiver ends before the merchant code, ` has been`, ` at <ts>`, or the first `.`/`,`.
pub fn payment_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile(format!(
            r"TxId[: ](\d+).+ Your payment of ({AMOUNT}) RWF to ([^.,]+?)(?: \d+)?(?: has been| with | at {TIMESTAMP}|[.,]|$)"
        ))
    })
}

pub fn code_pay_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile(format!(
            r"(?i)TxId[: ] (\d+)\. Your payment of ({AMOUNT}) RWF to (.+?)(?: (\d+))? has been completed at ({TIMESTAMP})"
        ))
    })
}

pub fn deposit_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"deposit of ({AMOUNT}) RWF.*at ({TIMESTAMP})")))
}

pub fn airtime_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile(format!(
            r"(?i)TxId[: ](\d+).*payment of ({AMOUNT}) RWF to Airtime.*at ({TIMESTAMP})"
        ))
    })
}

pub fn transfer_signal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"({AMOUNT}) RWF transferred to (.+?) \(")))
}

fn withdraw_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"withdrawn ({AMOUNT}) RWF.*at ({TIMESTAMP})")))
}

pub fn has_withdraw_wording(body: &str) -> bool {
    body.to_lowercase().contains("withdrawn")
}

pub fn has_otp_wording(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("one-time password") || lower.contains("otp")
}

// ---------------------------------------------------------------------------
// Optional sub-fields
// ---------------------------------------------------------------------------

fn balance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"(?i)balance\s*:?\s*({AMOUNT})\s*RWF")))
}

fn fee_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"(?i)fee (?:was|paid)\s*:?\s*({AMOUNT})\s*RWF")))
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(format!(r"at ({TIMESTAMP})")))
}

fn financial_tx_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"Financial Transaction Id: (\d+)".to_string()))
}

fn first_group(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn group(caps: &Captures, i: usize) -> Option<String> {
    caps.get(i).map(|m| m.as_str().trim().to_string())
}

fn required(value: Option<String>, category: TxType, field: &'static str) -> Result<String> {
    value.ok_or(MomoError::MalformedMessage {
        category: category.key(),
        field,
    })
}

fn signal_captures<'b>(re: &Regex, body: &'b str, category: TxType) -> Result<Captures<'b>> {
    re.captures(body).ok_or(MomoError::MalformedMessage {
        category: category.key(),
        field: "primary signal",
    })
}

fn balance(body: &str) -> Option<String> {
    first_group(balance_re(), body)
}

fn fee(body: &str) -> Option<String> {
    first_group(fee_re(), body)
}

fn timestamp(body: &str) -> Option<String> {
    first_group(timestamp_re(), body)
}

// ---------------------------------------------------------------------------
// Per-category extractors
// ---------------------------------------------------------------------------

pub fn receive(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(receive_signal(), body, TxType::Receive)?;
    let mut msg = ParsedMessage::bare(TxType::Receive, body);
    msg.amount = group(&caps, 1);
    msg.sender = group(&caps, 2);
    msg.transaction_id = first_group(financial_tx_id_re(), body);
    msg.balance = balance(body);
    msg.timestamp = Some(required(timestamp(body), TxType::Receive, "timestamp")?);
    Ok(msg)
}

pub fn payment(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(payment_signal(), body, TxType::Payment)?;
    let mut msg = ParsedMessage::bare(TxType::Payment, body);
    msg.transaction_id = group(&caps, 1);
    msg.amount = group(&caps, 2);
    msg.receiver = group(&caps, 3);
    msg.balance = balance(body);
    msg.timestamp = Some(required(timestamp(body), TxType::Payment, "timestamp")?);
    msg.fee = fee(body);
    Ok(msg)
}

pub fn code_pay(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(code_pay_signal(), body, TxType::CodePay)?;
    let mut msg = ParsedMessage::bare(TxType::CodePay, body);
    msg.transaction_id = group(&caps, 1);
    msg.amount = group(&caps, 2);
    let name = group(&caps, 3).unwrap_or_default();
    msg.receiver = Some(match group(&caps, 4) {
        Some(code) => format!("{name} {code}").trim().to_string(),
        None => name,
    });
    msg.timestamp = group(&caps, 5);
    msg.balance = balance(body);
    msg.fee = Some(fee(body).unwrap_or_else(|| "0".to_string()));
    Ok(msg)
}

pub fn deposit(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(deposit_signal(), body, TxType::Deposit)?;
    let mut msg = ParsedMessage::bare(TxType::Deposit, body);
    msg.amount = group(&caps, 1);
    msg.timestamp = group(&caps, 2);
    msg.balance = balance(body);
    Ok(msg)
}

pub fn airtime(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(airtime_signal(), body, TxType::Airtime)?;
    let mut msg = ParsedMessage::bare(TxType::Airtime, body);
    msg.transaction_id = group(&caps, 1);
    msg.amount = group(&caps, 2);
    msg.receiver = Some("Airtime".to_string());
    msg.timestamp = group(&caps, 3);
    msg.fee = Some(fee(body).unwrap_or_else(|| "0".to_string()));
    msg.balance = balance(body);
    Ok(msg)
}

pub fn transfer(body: &str) -> Result<ParsedMessage> {
    let caps = signal_captures(transfer_signal(), body, TxType::Transfer)?;
    let mut msg = ParsedMessage::bare(TxType::Transfer, body);
    msg.amount = group(&caps, 1);
    msg.receiver = group(&caps, 2);
    msg.timestamp = Some(required(timestamp(body), TxType::Transfer, "timestamp")?);
    msg.fee = fee(body);
    msg.balance = balance(body);
    Ok(msg)
}

pub fn withdraw(body: &str) -> Result<ParsedMessage> {
    let caps = withdraw_re().captures(body).ok_or(MomoError::MalformedMessage {
        category: TxType::Withdraw.key(),
        field: "amount and timestamp",
    })?;
    let mut msg = ParsedMessage::bare(TxType::Withdraw, body);
    msg.amount = group(&caps, 1);
    msg.timestamp = group(&caps, 2);
    msg.balance = balance(body);
    msg.fee = fee(body);
    Ok(msg)
}
