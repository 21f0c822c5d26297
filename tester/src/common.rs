use libket_core::{Circuit, Runtime, State};
use libket_visualizer::{HorizontalRenderer, Visualizer};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};

pub struct BenchmarkResult {
    pub name: String,
    pub pool_time: Duration,
    pub rayon_time: Duration,
    pub results_match: bool,
}

pub fn benchmark_circuit<F>(name: &str, circuit_builder: F) -> BenchmarkResult
where
    F: Fn() -> Circuit,
{
    let pool_rt = Runtime::new().expect("pool runtime");
    let rayon_rt = Runtime::rayon();

    let mut circuit_pool = circuit_builder();
    let mut circuit_rayon = circuit_builder();

    let mut rng = StdRng::seed_from_u64(0xB0B);
    let start = Instant::now();
    circuit_pool
        .compute_with_rng(&pool_rt, &mut rng)
        .expect("pool compute");
    let pool_time = start.elapsed();

    let mut rng = StdRng::seed_from_u64(0xB0B);
    let start = Instant::now();
    circuit_rayon
        .compute_with_rng(&rayon_rt, &mut rng)
        .expect("rayon compute");
    let rayon_time = start.elapsed();

    let results_match = states_equal(
        circuit_pool.compute_with(&pool_rt).expect("cached"),
        circuit_rayon.compute_with(&rayon_rt).expect("cached"),
    );

    BenchmarkResult {
        name: name.to_string(),
        pool_time,
        rayon_time,
        results_match,
    }
}

pub fn states_equal(a: &State, b: &State) -> bool {
    if a.size() != b.size() {
        return false;
    }
    a.amplitudes()
        .iter()
        .zip(b.amplitudes())
        .all(|(x, y)| (*x - *y).magnitude() < 1e-9)
}

pub fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.3}s", d.as_secs_f64())
    } else if d.as_millis() > 0 {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.3}us", d.as_secs_f64() * 1_000_000.0)
    }
}

pub fn print_section(title: &str) {
    let width: usize = 61;
    let padding = width.saturating_sub(title.len() + 2);
    println!("┌{}┐", "─".repeat(width));
    println!("│ {}{} │", title, " ".repeat(padding));
    println!("└{}┘\n", "─".repeat(width));
}

pub fn print_circuit(circuit: &Circuit) {
    println!("{}", HorizontalRenderer::new(circuit).export());
}

pub fn print_benchmark_table(results: &[BenchmarkResult]) {
    const C1: usize = 30;
    const C2: usize = 12;
    const C3: usize = 12;
    const C4: usize = 10;
    const C5: usize = 5;

    let rule = |l: &str, mid: &str, r: &str| {
        format!(
            "{}{}{mid}{}{mid}{}{mid}{}{mid}{}{}",
            l,
            "═".repeat(C1 + 2),
            "═".repeat(C2 + 2),
            "═".repeat(C3 + 2),
            "═".repeat(C4 + 2),
            "═".repeat(C5 + 2),
            r,
            mid = mid,
        )
    };

    println!("\n{}", rule("╔", "╤", "╗"));
    println!(
        "║ {:<C1$} │ {:^C2$} │ {:^C3$} │ {:^C4$} │ {:^C5$} ║",
        "Circuit", "Pool", "Rayon", "Speedup", "Match",
    );
    println!("{}", rule("╠", "╪", "╣"));

    for r in results {
        let speedup = r.pool_time.as_secs_f64() / r.rayon_time.as_secs_f64();
        let match_str = if r.results_match { "✓" } else { "✗" };

        println!(
            "║ {:<C1$} │ {:>C2$} │ {:>C3$} │ {:>C4$} │ {:^C5$} ║",
            r.name,
            format_duration(r.pool_time),
            format_duration(r.rayon_time),
            format!("{:.2}x", speedup),
            match_str,
        );
    }

    println!("{}", rule("╚", "╧", "╝"));
}

pub fn print_summary(results: &[BenchmarkResult]) {
    let all_match = results.iter().all(|r| r.results_match);
    println!();
    if all_match {
        println!("✓ All circuits produced identical states on both backends!");
    } else {
        println!("✗ WARNING: some circuits diverged between backends!");
    }

    let total_pool: Duration = results.iter().map(|r| r.pool_time).sum();
    let total_rayon: Duration = results.iter().map(|r| r.rayon_time).sum();
    println!(
        "Total time - Pool: {} | Rayon: {}",
        format_duration(total_pool),
        format_duration(total_rayon),
    );
}
