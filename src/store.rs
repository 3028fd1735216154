use std::path::{Path, PathBuf};

use crate::error::{MomoError, Result};
use crate::models::{TransactionRecord, TxType};

fn unwritable(path: &Path, detail: impl std::fmt::Display) -> MomoError {
    MomoError::UnwritableDestination(format!("{}: {detail}", path.display()))
}

/// Load a record file. A missing file is an empty collection.
pub fn load_records(path: &Path) -> Result<Vec<TransactionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| MomoError::UnreadableSource(format!("{}: {e}", path.display())))
}

/// Write the whole collection in one step: serialize to a sibling temp file,
/// then rename over the destination. A failed write leaves the old file intact.
pub fn save_records(path: &Path, records: &[TransactionRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| unwritable(path, e))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| unwritable(path, e))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| unwritable(path, "not a file path"))?;
    let tmp = parent.join(format!(".{file_name}.tmp"));
    std::fs::write(&tmp, format!("{json}\n")).map_err(|e| unwritable(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        unwritable(path, e)
    })?;
    Ok(())
}

/// Changes applied by `RecordStore::edit`.
#[derive(Debug, Default, Clone)]
pub struct RecordEdit {
    pub tx_type: Option<TxType>,
    pub amount: Option<String>,
}

/// Id-keyed access to a saved record file.
pub struct RecordStore {
    path: PathBuf,
    records: Vec<TransactionRecord>,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(RecordStore {
            path: path.to_path_buf(),
            records: load_records(path)?,
        })
    }

    pub fn all(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Result<&TransactionRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(MomoError::NotFound(id))
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(MomoError::NotFound(id))
    }

    /// Append a record under the next free id (one past the largest).
    pub fn add(&mut self, mut record: TransactionRecord) -> u64 {
        let id = self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        record.id = id;
        self.records.push(record);
        id
    }

    pub fn edit(&mut self, id: u64, edit: RecordEdit) -> Result<&TransactionRecord> {
        let idx = self.position(id)?;
        let record = &mut self.records[idx];
        if let Some(tx_type) = edit.tx_type {
            record.tx_type = tx_type;
        }
        if let Some(amount) = edit.amount {
            record.amount = Some(amount);
        }
        Ok(&self.records[idx])
    }

    /// Replace a record wholesale; the stored id is kept.
    pub fn update(&mut self, id: u64, mut record: TransactionRecord) -> Result<&TransactionRecord> {
        let idx = self.position(id)?;
        record.id = id;
        self.records[idx] = record;
        Ok(&self.records[idx])
    }

    pub fn remove(&mut self, id: u64) -> Result<TransactionRecord> {
        let idx = self.position(id)?;
        Ok(self.records.remove(idx))
    }

    pub fn save(&self) -> Result<()> {
        save_records(&self.path, &self.records)
    }
}
