mod algorithms;
mod common;

use anyhow::Result;
use libket_core::{Runtime, SimdCapability};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("SIMD: {}", SimdCapability::detect().name());

    let rt = Runtime::new()?;
    println!("Engine: {}\n", rt);

    let mut results = Vec::new();
    algorithms::run_all(&rt, &mut results);

    common::print_benchmark_table(&results);
    common::print_summary(&results);

    Ok(())
}
