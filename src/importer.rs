use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::classifier::classify_or_other;
use crate::error::{MomoError, Result};
use crate::models::{SmsMessage, TransactionRecord};
use crate::store::save_records;

// ---------------------------------------------------------------------------
// Source document
// ---------------------------------------------------------------------------

fn unreadable(path: &Path, detail: impl std::fmt::Display) -> MomoError {
    MomoError::UnreadableSource(format!("{}: {detail}", path.display()))
}

fn read_sms_attrs(element: &BytesStart, path: &Path) -> Result<SmsMessage> {
    let mut body = None;
    let mut readable_date = None;
    for attr in element.attributes() {
        let attr = attr.map_err(|e| unreadable(path, e))?;
        match attr.key.as_ref() {
            b"body" => body = Some(attr.unescape_value().map_err(|e| unreadable(path, e))?.into_owned()),
            b"readable_date" => {
                readable_date = Some(attr.unescape_value().map_err(|e| unreadable(path, e))?.into_owned())
            }
            _ => {}
        }
    }
    Ok(SmsMessage {
        body: body.unwrap_or_default(),
        readable_date,
    })
}

/// Parse an SMS export document. Only `sms` elements that are direct
/// children of the root element are read, in document order.
pub fn parse_sms_xml(content: &str, path: &Path) -> Result<Vec<SmsMessage>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut messages = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 1 && e.name().as_ref() == b"sms" {
                    messages.push(read_sms_attrs(&e, path)?);
                }
                saw_root = true;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 && e.name().as_ref() == b"sms" {
                    messages.push(read_sms_attrs(&e, path)?);
                }
                saw_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => {
                if depth != 0 {
                    return Err(unreadable(path, "unexpected end of document"));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                return Err(unreadable(
                    path,
                    format!("XML error at byte {}: {e}", reader.buffer_position()),
                ))
            }
        }
    }

    if !saw_root {
        return Err(unreadable(path, "no root element"));
    }
    Ok(messages)
}

pub fn read_source(path: &Path) -> Result<Vec<SmsMessage>> {
    let content = std::fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
    parse_sms_xml(&content, path)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct IngestOutcome {
    pub records: Vec<TransactionRecord>,
    /// Ids of messages whose signal matched but whose fields could not be read.
    pub malformed: Vec<(u64, MomoError)>,
}

/// Classify every message in order. Ids are the 1-based input positions;
/// malformed messages degrade to `other` records instead of failing the run.
pub fn ingest(messages: Vec<SmsMessage>) -> IngestOutcome {
    let mut records = Vec::with_capacity(messages.len());
    let mut malformed = Vec::new();

    for (idx, sms) in messages.into_iter().enumerate() {
        let id = idx as u64 + 1;
        let (parsed, error) = classify_or_other(&sms.body);
        if let Some(e) = error {
            tracing::warn!(id, error = %e, "malformed message recorded as other");
            malformed.push((id, e));
        }
        tracing::debug!(id, tx_type = %parsed.tx_type, "classified message");
        records.push(TransactionRecord::from_parsed(id, sms.readable_date, parsed));
    }

    IngestOutcome { records, malformed }
}

#[derive(Debug)]
pub struct ImportResult {
    pub total: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub malformed: Vec<u64>,
    pub output: PathBuf,
}

/// Read the export, classify every message, and write the records once.
/// Nothing is written when the source cannot be read.
pub fn import_file(source: &Path, output: &Path) -> Result<ImportResult> {
    let messages = read_source(source)?;
    tracing::info!(source = %source.display(), count = messages.len(), "read SMS export");

    let outcome = ingest(messages);
    save_records(output, &outcome.records)?;
    tracing::info!(output = %output.display(), count = outcome.records.len(), "saved records");

    let mut by_type = BTreeMap::new();
    for record in &outcome.records {
        *by_type.entry(record.tx_type.key()).or_insert(0) += 1;
    }

    Ok(ImportResult {
        total: outcome.records.len(),
        by_type,
        malformed: outcome.malformed.iter().map(|(id, _)| *id).collect(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxType;
    use crate::store::load_records;

    const EXPORT: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<smses count="4">
  <sms protocol="0" address="M-Money" type="1" body="You have received 2000 RWF from Jane Smith (*********013) on your mobile money account at 2024-05-10 16:30:51. Message from sender: . Your new balance:2000 RWF. Financial Transaction Id: 76662021700." readable_date="10 May 2024 4:30:58 PM" />
  <sms protocol="0" address="M-Money" type="1" body="You have received 500 RWF from Bob (250700000000). Your new balance:2500 RWF." readable_date="10 May 2024 5:00:00 PM" />
  <sms protocol="0" address="M-Money" type="1" body="Your one-time password is 8812 &amp; expires soon" readable_date="11 May 2024 8:00:00 AM" />
  <sms protocol="0" address="M-Money" type="1" body="*165*S*10000 RWF transferred to Samuel Carter (250791666666) from 36521838 at 2024-05-11 20:34:47 . Fee was: 100 RWF. New balance: 28300 RWF." />
</smses>
"#;

    fn msg(body: &str) -> SmsMessage {
        SmsMessage {
            body: body.to_string(),
            readable_date: Some("1 Jan 2024".to_string()),
        }
    }

    #[test]
    fn test_parse_sms_xml_reads_attributes_in_order() {
        let messages = parse_sms_xml(EXPORT, Path::new("export.xml")).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].readable_date.as_deref(), Some("10 May 2024 4:30:58 PM"));
        assert_eq!(messages[2].body, "Your one-time password is 8812 & expires soon");
        assert_eq!(messages[3].readable_date, None);
    }

    #[test]
    fn test_parse_sms_xml_ignores_nested_sms() {
        let xml = r#"<smses><sms body="top" readable_date="d"/><group><sms body="nested"/></group></smses>"#;
        let messages = parse_sms_xml(xml, Path::new("x.xml")).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "top");
    }

    #[test]
    fn test_parse_sms_xml_missing_body_is_empty() {
        let messages = parse_sms_xml(r#"<smses><sms readable_date="d"></sms></smses>"#, Path::new("x.xml")).unwrap();
        assert_eq!(messages[0].body, "");
    }

    #[test]
    fn test_parse_sms_xml_rejects_garbage() {
        let err = parse_sms_xml("<smses><sms body=\"a\"></smses>", Path::new("x.xml")).unwrap_err();
        assert!(matches!(err, MomoError::UnreadableSource(_)));
        let err = parse_sms_xml("", Path::new("x.xml")).unwrap_err();
        assert!(matches!(err, MomoError::UnreadableSource(_)));
    }

    #[test]
    fn test_parse_sms_xml_rejects_truncated_export() {
        let xml = r#"<smses count="3"><sms body="Your OTP is 1" readable_date="d"/>"#;
        let err = parse_sms_xml(xml, Path::new("x.xml")).unwrap_err();
        assert!(matches!(err, MomoError::UnreadableSource(ref m) if m.contains("unexpected end")));
    }

    #[test]
    fn test_import_file_truncated_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sms.xml");
        let output = dir.path().join("transactions.json");
        std::fs::write(&source, r#"<smses><sms body="Your OTP is 1" readable_date="d"/>"#).unwrap();
        assert!(import_file(&source, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_ingest_assigns_contiguous_ids() {
        let messages: Vec<SmsMessage> = (0..25).map(|i| msg(&format!("message {i}"))).collect();
        let outcome = ingest(messages);
        let ids: Vec<u64> = outcome.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=25).collect::<Vec<u64>>());
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn test_ingest_degrades_malformed_and_continues() {
        let outcome = ingest(vec![
            msg("You have received 500 RWF from Bob (2507). No date here."),
            msg("Your OTP is 1234"),
        ]);
        assert_eq!(outcome.records.len(), 2);
        let first = &outcome.records[0];
        assert_eq!(first.tx_type, TxType::Other);
        assert_eq!(first.amount, None);
        assert_eq!(first.raw_date.as_deref(), Some("1 Jan 2024"));
        assert_eq!(outcome.malformed.len(), 1);
        assert_eq!(outcome.malformed[0].0, 1);
        assert_eq!(outcome.records[1].tx_type, TxType::Otp);
        assert_eq!(outcome.records[1].id, 2);
    }

    #[test]
    fn test_import_file_writes_records() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sms.xml");
        let output = dir.path().join("out").join("transactions.json");
        std::fs::write(&source, EXPORT).unwrap();

        let result = import_file(&source, &output).unwrap();
        assert_eq!(result.total, 4);
        assert_eq!(result.malformed, vec![2]);
        assert_eq!(result.by_type.get("receive"), Some(&1));
        assert_eq!(result.by_type.get("other"), Some(&1));
        assert_eq!(result.by_type.get("otp"), Some(&1));
        assert_eq!(result.by_type.get("transfer"), Some(&1));

        let records = load_records(&output).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].sender.as_deref(), Some("Jane Smith"));
        assert_eq!(records[3].receiver.as_deref(), Some("Samuel Carter"));
        assert_eq!(records[3].raw_date, None);
    }

    #[test]
    fn test_import_file_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("transactions.json");
        let err = import_file(&dir.path().join("nope.xml"), &output).unwrap_err();
        assert!(matches!(err, MomoError::UnreadableSource(_)));
        assert!(!output.exists());
    }
}
