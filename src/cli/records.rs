use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::classifier::classify_or_other;
use crate::error::Result;
use crate::models::{ParsedMessage, TransactionRecord, TxType};
use crate::settings::records_path;
use crate::store::{RecordEdit, RecordStore};

fn open(file: Option<&str>) -> Result<RecordStore> {
    RecordStore::open(&records_path(file))
}

pub fn list(tx_type: Option<&str>, file: Option<&str>) -> Result<()> {
    let filter = tx_type.map(str::parse::<TxType>).transpose()?;
    let store = open(file)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Amount", "Party", "Timestamp", "Tx ID"]);
    let mut shown = 0usize;
    for r in store.all() {
        if filter.is_some_and(|t| t != r.tx_type) {
            continue;
        }
        let party = r.sender.as_deref().or(r.receiver.as_deref()).unwrap_or_default();
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(r.tx_type),
            Cell::new(r.amount.as_deref().unwrap_or_default()),
            Cell::new(party),
            Cell::new(r.timestamp.as_deref().unwrap_or_default()),
            Cell::new(r.transaction_id.as_deref().unwrap_or_default()),
        ]);
        shown += 1;
    }
    println!("Transactions ({shown})\n{table}");
    Ok(())
}

pub fn show(id: u64, file: Option<&str>) -> Result<()> {
    let store = open(file)?;
    println!("{}", serde_json::to_string_pretty(store.get(id)?)?);
    Ok(())
}

fn classify_body(body: &str) -> ParsedMessage {
    let (parsed, error) = classify_or_other(body);
    if let Some(e) = error {
        tracing::warn!(error = %e, "malformed message recorded as other");
    }
    parsed
}

pub fn add(body: &str, date: Option<&str>, file: Option<&str>) -> Result<()> {
    let mut store = open(file)?;
    let parsed = classify_body(body);
    let tx_type = parsed.tx_type;
    let id = store.add(TransactionRecord::from_parsed(0, date.map(str::to_string), parsed));
    store.save()?;
    println!("Added record {id} ({tx_type})");
    Ok(())
}

pub fn edit(id: u64, tx_type: Option<&str>, amount: Option<&str>, file: Option<&str>) -> Result<()> {
    let edit = RecordEdit {
        tx_type: tx_type.map(str::parse::<TxType>).transpose()?,
        amount: amount.map(str::to_string),
    };
    let mut store = open(file)?;
    let updated = store.edit(id, edit)?.clone();
    store.save()?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

/// Reclassify a new body into an existing record, keeping its id.
pub fn replace(id: u64, body: &str, date: Option<&str>, file: Option<&str>) -> Result<()> {
    let mut store = open(file)?;
    let record = TransactionRecord::from_parsed(id, date.map(str::to_string), classify_body(body));
    let updated = store.update(id, record)?.clone();
    store.save()?;
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

pub fn delete(id: u64, file: Option<&str>) -> Result<()> {
    let mut store = open(file)?;
    let removed = store.remove(id)?;
    store.save()?;
    println!("{}", format!("Deleted record {} ({})", removed.id, removed.tx_type).red());
    Ok(())
}
