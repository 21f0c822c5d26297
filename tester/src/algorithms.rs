use crate::common::{benchmark_circuit, print_circuit, print_section, BenchmarkResult};
use libket_core::{grover_iterations, Circuit, Runtime};
use rand::{rngs::StdRng, SeedableRng};

pub fn run_all(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     ALGORITHM DEMOS");
    println!("═══════════════════════════════════════════════════════════════\n");

    demo_bell(rt, results);
    demo_ghz(rt, results);
    demo_grover(rt, results);
    demo_qft_round_trip(rt, results);
    demo_bernstein_vazirani(rt, results);
    demo_loader(rt);
}

fn demo_bell(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    print_section("Bell State");

    let builder = || {
        let mut circuit = Circuit::new(2);
        circuit.h(0).cnot(0, 1);
        circuit
    };

    let mut circuit = builder();
    print_circuit(&circuit);
    circuit.compute_with(rt).expect("bell state");
    println!("{}", circuit);

    results.push(benchmark_circuit("Bell state (2 qubits)", builder));
}

fn demo_ghz(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    print_section("GHZ State");

    let builder = || {
        let mut circuit = Circuit::new(3);
        circuit.ghz();
        circuit
    };

    let mut circuit = builder();
    print_circuit(&circuit);
    circuit.compute_with(rt).expect("ghz state");
    println!("{}", circuit);
    circuit.print_probabilities(rt).expect("ghz probabilities");
    println!();

    results.push(benchmark_circuit("GHZ state (3 qubits)", builder));
}

fn demo_grover(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    print_section("Grover Search");

    let marked = 6;
    let builder = move || {
        let mut circuit = Circuit::new(3);
        circuit.grover_search(marked);
        circuit
    };

    let mut circuit = builder();
    print_circuit(&circuit);
    let probability = circuit.probability(rt, marked).expect("grover");
    println!(
        "{} rounds amplify |{}> to probability {:.4}\n",
        grover_iterations(3),
        marked,
        probability
    );

    results.push(benchmark_circuit("Grover search (3 qubits)", builder));
}

fn demo_qft_round_trip(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    print_section("QFT + Inverse QFT");

    let builder = || {
        let mut circuit = Circuit::new(3);
        circuit.x(0).x(2); // prepare |5>
        circuit.qft().inverse_qft();
        circuit
    };

    let mut circuit = builder();
    let probability = circuit.probability(rt, 5).expect("qft round trip");
    println!("QFT then inverse QFT returns |5> with probability {:.6}\n", probability);

    results.push(benchmark_circuit("QFT round trip (3 qubits)", builder));
}

fn demo_bernstein_vazirani(rt: &Runtime, results: &mut Vec<BenchmarkResult>) {
    print_section("Bernstein-Vazirani");

    let hidden = 0b1011;
    let builder = move || {
        let mut circuit = Circuit::new(5);
        circuit.bernstein_vazirani(hidden);
        circuit
    };

    let mut circuit = builder();
    let recovered = circuit.most_likely_state(rt).expect("bv") & 0xF;
    println!("hidden string {:04b}, recovered {:04b}\n", hidden, recovered);

    results.push(benchmark_circuit("Bernstein-Vazirani (4+1 qubits)", builder));
}

fn demo_loader(rt: &Runtime) {
    print_section("Circuit Loader");

    let document = r#"
        qubits = 2
        shots = 1000

        [[gates]]
        name = "h"
        targets = [0]

        [[gates]]
        name = "cnot"
        targets = [0, 1]
    "#;

    let mut circuit = libket_io::load_str(document).expect("circuit document");
    print_circuit(&circuit);

    let mut rng = StdRng::seed_from_u64(7);
    let counts = circuit.run_shots(rt, 1000, &mut rng).expect("shots");
    for (state, count) in counts.iter().enumerate() {
        if *count > 0 {
            println!("|{:02b}>: {}", state, count);
        }
    }
    println!();
}
