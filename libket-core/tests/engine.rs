use libket_core::{
    gates, grover_iterations, Circuit, Complex, Runtime, State,
};
use rand::{rngs::StdRng, SeedableRng};
use std::f64::consts::FRAC_1_SQRT_2;

fn max_amplitude_diff(a: &[Complex<f64>], b: &[Complex<f64>]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (*x - *y).magnitude())
        .fold(0.0, f64::max)
}

#[test]
fn single_qubit_hadamard_superposition() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(1).unwrap();
    rt.apply_1q(&mut state, &gates::HADAMARD, 0).unwrap();

    let amps = state.amplitudes();
    assert!((amps[0].re - FRAC_1_SQRT_2).abs() < 1e-9);
    assert!((amps[1].re - FRAC_1_SQRT_2).abs() < 1e-9);
    assert!((state.probability(0) - 0.5).abs() < 1e-6);
    assert!((state.probability(1) - 0.5).abs() < 1e-6);
}

#[test]
fn bell_state() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(2).unwrap();
    rt.apply_1q(&mut state, &gates::HADAMARD, 0).unwrap();
    rt.apply_2q(&mut state, &gates::CNOT, 0, 1).unwrap();

    let amps = state.amplitudes();
    assert!((amps[0].re - FRAC_1_SQRT_2).abs() < 1e-9);
    assert!(amps[1].magnitude() < 1e-12);
    assert!(amps[2].magnitude() < 1e-12);
    assert!((amps[3].re - FRAC_1_SQRT_2).abs() < 1e-9);
}

#[test]
fn ghz_state() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(3).unwrap();
    rt.apply_1q(&mut state, &gates::HADAMARD, 0).unwrap();
    rt.apply_2q(&mut state, &gates::CNOT, 0, 1).unwrap();
    rt.apply_2q(&mut state, &gates::CNOT, 0, 2).unwrap();

    let amps = state.amplitudes();
    assert!((amps[0].re - FRAC_1_SQRT_2).abs() < 1e-9);
    assert!((amps[7].re - FRAC_1_SQRT_2).abs() < 1e-9);
    for i in 1..7 {
        assert!(amps[i].magnitude() < 1e-12);
    }
}

#[test]
fn grover_amplifies_the_marked_state() {
    let rt = Runtime::new().unwrap();
    let marked = 6;
    let mut state = State::new(3).unwrap();

    for t in 0..3 {
        rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();
    }
    assert_eq!(grover_iterations(3), 2);
    for _ in 0..grover_iterations(3) {
        rt.phase_flip(&mut state, marked).unwrap();
        rt.diffusion(&mut state).unwrap();
        rt.normalize(&mut state).unwrap();
    }

    assert!(state.probability(marked) > 0.9);
    assert!((state.norm_sq() - 1.0).abs() < 1e-6);
}

#[test]
fn qft_inverse_round_trip() {
    let rt = Runtime::new().unwrap();

    // Replay against |5> rather than the ground state.
    let mut state = State::new(3).unwrap();
    state.set_basis(5).unwrap();
    let mut reference = Circuit::new(3);
    reference.qft().inverse_qft();
    for op in reference.operations() {
        match *op {
            libket_core::GateOp::H(t) => rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap(),
            libket_core::GateOp::Cp(c, t, theta) => rt
                .apply_2q(&mut state, &gates::cp_matrix(theta), c, t)
                .unwrap(),
            _ => unreachable!("QFT uses only H and CP"),
        }
    }

    assert!(state.probability(5) > 1.0 - 1e-6);
    for i in 0..8 {
        if i != 5 {
            assert!(state.amplitudes()[i].magnitude() < 1e-6);
        }
    }
}

#[test]
fn bernstein_vazirani_recovers_every_hidden_string() {
    let rt = Runtime::new().unwrap();
    for hidden in 0..16 {
        let mut circuit = Circuit::new(5);
        circuit.bernstein_vazirani(hidden);
        let most_likely = circuit.most_likely_state(&rt).unwrap();
        assert_eq!(most_likely & 0xF, hidden, "hidden string {}", hidden);
    }
}

#[test]
fn hadamard_twice_is_identity() {
    let rt = Runtime::new().unwrap();
    for n in 1..=4 {
        for t in 0..n {
            let mut state = State::new(n).unwrap();
            state.set_basis((1 << n) - 1).unwrap();
            let before: Vec<_> = state.amplitudes().to_vec();

            rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();
            rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();

            assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-9);
        }
    }
}

#[test]
fn x_twice_is_identity() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(3).unwrap();
    for t in 0..3 {
        rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();
    }
    let before: Vec<_> = state.amplitudes().to_vec();

    for t in 0..3 {
        rt.apply_1q(&mut state, &gates::PAULI_X, t).unwrap();
        rt.apply_1q(&mut state, &gates::PAULI_X, t).unwrap();
    }
    assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-12);
}

#[test]
fn cnot_twice_is_identity() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(3).unwrap();
    for t in 0..3 {
        rt.apply_1q(&mut state, &gates::rx_matrix(0.3 + t as f64), t)
            .unwrap();
    }
    let before: Vec<_> = state.amplitudes().to_vec();

    for (c, t) in [(0, 1), (1, 0), (2, 0), (0, 2), (1, 2), (2, 1)] {
        rt.apply_2q(&mut state, &gates::CNOT, c, t).unwrap();
        rt.apply_2q(&mut state, &gates::CNOT, c, t).unwrap();
    }
    assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-12);
}

#[test]
fn gate_application_preserves_the_norm() {
    let rt = Runtime::new().unwrap();
    let mut state = State::new(5).unwrap();

    for t in 0..5 {
        rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();
        assert!((state.norm_sq() - 1.0).abs() < 1e-9);
    }
    rt.apply_1q(&mut state, &gates::ry_matrix(1.234), 2).unwrap();
    assert!((state.norm_sq() - 1.0).abs() < 1e-9);
}

#[test]
fn phase_gate_round_trip() {
    let rt = Runtime::new().unwrap();
    let theta = 0.83;
    let mut state = State::new(4).unwrap();
    for t in 0..4 {
        rt.apply_1q(&mut state, &gates::HADAMARD, t).unwrap();
    }
    let before: Vec<_> = state.amplitudes().to_vec();

    rt.apply_1q(&mut state, &gates::p_matrix(theta), 1).unwrap();
    rt.apply_1q(&mut state, &gates::p_matrix(-theta), 1).unwrap();

    assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-9);
}

#[test]
fn rotation_round_trips() {
    let rt = Runtime::new().unwrap();
    let theta = 1.37;
    let mut state = State::new(3).unwrap();
    state.set_basis(3).unwrap();
    let before: Vec<_> = state.amplitudes().to_vec();

    rt.apply_1q(&mut state, &gates::rx_matrix(theta), 0).unwrap();
    rt.apply_1q(&mut state, &gates::rx_matrix(-theta), 0).unwrap();
    rt.apply_1q(&mut state, &gates::ry_matrix(theta), 1).unwrap();
    rt.apply_1q(&mut state, &gates::ry_matrix(-theta), 1).unwrap();
    rt.apply_1q(&mut state, &gates::rz_matrix(theta), 2).unwrap();
    rt.apply_1q(&mut state, &gates::rz_matrix(-theta), 2).unwrap();

    assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-9);
}

#[test]
fn controlled_phase_round_trip() {
    let rt = Runtime::new().unwrap();
    let theta = 2.1;
    let mut state = State::new(2).unwrap();
    rt.apply_1q(&mut state, &gates::HADAMARD, 0).unwrap();
    rt.apply_1q(&mut state, &gates::HADAMARD, 1).unwrap();
    let before: Vec<_> = state.amplitudes().to_vec();

    rt.apply_2q(&mut state, &gates::cp_matrix(theta), 0, 1).unwrap();
    rt.apply_2q(&mut state, &gates::cp_matrix(-theta), 0, 1)
        .unwrap();

    assert!(max_amplitude_diff(state.amplitudes(), &before) < 1e-9);
}

#[test]
fn backends_agree_on_a_deep_circuit() {
    let pool_rt = Runtime::new().unwrap();
    let rayon_rt = Runtime::rayon();
    let simd_rt = Runtime::new().unwrap().simd();

    let build = || {
        let mut c = Circuit::new(6);
        c.qft();
        c.grover_search(11);
        c
    };

    let mut rng = StdRng::seed_from_u64(1);
    let mut a = build();
    let mut b = build();
    let mut c = build();
    let pool_state: Vec<_> = a
        .compute_with_rng(&pool_rt, &mut rng)
        .unwrap()
        .amplitudes()
        .to_vec();
    let rayon_state: Vec<_> = b
        .compute_with_rng(&rayon_rt, &mut rng)
        .unwrap()
        .amplitudes()
        .to_vec();
    let simd_state: Vec<_> = c
        .compute_with_rng(&simd_rt, &mut rng)
        .unwrap()
        .amplitudes()
        .to_vec();

    assert!(max_amplitude_diff(&pool_state, &rayon_state) < 1e-9);
    assert!(max_amplitude_diff(&pool_state, &simd_state) < 1e-9);
}

#[test]
fn grover_recipe_matches_direct_kernels() {
    let rt = Runtime::new().unwrap();
    let mut circuit = Circuit::new(3);
    circuit.grover_search(6);
    assert!(circuit.probability(&rt, 6).unwrap() > 0.9);
    assert_eq!(circuit.most_likely_state(&rt).unwrap(), 6);
}
