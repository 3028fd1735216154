use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::importer::import_file;
use crate::models::TxType;
use crate::settings::load_settings;

pub fn run(source: Option<&str>, output: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let source = source.map(PathBuf::from).unwrap_or_else(|| settings.source_path());
    let output = output.map(PathBuf::from).unwrap_or_else(|| settings.output_path());

    let result = import_file(&source, &output)?;

    let mut table = Table::new();
    table.set_header(vec!["Type", "Count"]);
    for tx_type in TxType::ALL {
        let count = result.by_type.get(tx_type.key()).copied().unwrap_or(0);
        if count > 0 {
            table.add_row(vec![Cell::new(tx_type.key()), Cell::new(count)]);
        }
    }
    println!("{table}");
    println!("Saved {} transactions to {}", result.total, result.output.display());

    if !result.malformed.is_empty() {
        let ids: Vec<String> = result.malformed.iter().map(|id| id.to_string()).collect();
        println!(
            "{}",
            format!("{} malformed, stored as other: {}", ids.len(), ids.join(", ")).yellow()
        );
    }
    Ok(())
}
