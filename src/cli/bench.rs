use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bench::compare;
use crate::error::Result;
use crate::settings::{load_settings, records_path};
use crate::store::load_records;

pub fn run(trials: Option<usize>, seed: Option<u64>, file: Option<&str>) -> Result<()> {
    let trials = trials.unwrap_or_else(|| load_settings().bench_trials);
    let records = load_records(&records_path(file))?;
    println!("Loaded {} transactions.", records.len());

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let report = compare(&records, trials, &mut rng)?;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("records_tested"), Cell::new(report.records_tested)]);
    table.add_row(vec![Cell::new("trials"), Cell::new(report.trials)]);
    table.add_row(vec![Cell::new("linear_total_time_s"), Cell::new(report.linear_total_s)]);
    table.add_row(vec![Cell::new("map_total_time_s"), Cell::new(report.map_total_s)]);
    table.add_row(vec![Cell::new("linear_avg_ms"), Cell::new(report.linear_avg_ms)]);
    table.add_row(vec![Cell::new("map_avg_ms"), Cell::new(report.map_avg_ms)]);
    println!("Linear search vs hash lookup\n{table}");
    Ok(())
}
