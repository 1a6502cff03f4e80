// Statistics reporting for trace replay

use crate::replay::ReplayResult;
use serde::Serialize;
use std::path::Path;

/// One row of the CSV export
#[derive(Debug, Clone, Serialize)]
pub struct CsvResultRow {
    pub small_capacity: usize,
    pub main_capacity: usize,
    pub ghost_capacity: usize,
    pub hot_threshold: u8,
    pub decrement_on_promotion: bool,
    pub ops: u64,
    pub store_reads: u64,
    pub store_writes: u64,
    pub hit_ratio: f64,
    pub simulation_time_ms: u64,
    pub ops_per_sec: f64,
    pub promotions: u64,
    pub ghost_promotions: u64,
    pub requeues: u64,
    pub small_evictions: u64,
    pub main_evictions: u64,
}

/// Cache shape recorded alongside the results
#[derive(Debug, Clone, Copy)]
pub struct CacheShape {
    pub small_capacity: usize,
    pub main_capacity: usize,
    pub ghost_capacity: usize,
    pub hot_threshold: u8,
    pub decrement_on_promotion: bool,
}

fn counter(result: &ReplayResult, name: &str) -> u64 {
    result.metrics.get(name).copied().unwrap_or(0.0) as u64
}

impl CsvResultRow {
    /// Builds a row from a finished replay
    pub fn new(shape: CacheShape, result: &ReplayResult) -> Self {
        let secs = result.duration.as_secs_f64();
        Self {
            small_capacity: shape.small_capacity,
            main_capacity: shape.main_capacity,
            ghost_capacity: shape.ghost_capacity,
            hot_threshold: shape.hot_threshold,
            decrement_on_promotion: shape.decrement_on_promotion,
            ops: result.ops,
            store_reads: result.store_reads,
            store_writes: result.store_writes,
            hit_ratio: result.hit_ratio(),
            simulation_time_ms: result.duration.as_millis() as u64,
            ops_per_sec: if secs > 0.0 {
                result.ops as f64 / secs
            } else {
                0.0
            },
            promotions: counter(result, "promotions"),
            ghost_promotions: counter(result, "ghost_promotions"),
            requeues: counter(result, "requeues"),
            small_evictions: counter(result, "small_evictions"),
            main_evictions: counter(result, "main_evictions"),
        }
    }
}

/// Prints the hit ratio line followed by every engine metric
pub fn print_summary(result: &ReplayResult) {
    println!("Hit ratio: {}", result.hit_ratio());
    println!();
    println!("Operations: {}", result.ops);
    println!("Store reads: {}", result.store_reads);
    println!("Store writes: {}", result.store_writes);
    println!("Replay time: {:.2?}", result.duration);
    println!();
    println!("{:<24} {:>16}", "Metric", "Value");
    println!("{}", "-".repeat(41));
    for (name, value) in &result.metrics {
        println!("{name:<24} {value:>16.4}");
    }
}

/// Export results to a CSV file
pub fn export_csv(path: &Path, row: &CsvResultRow) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}
