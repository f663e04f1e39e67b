//! End-to-end scenarios on a 64×64 field over a domain of side 20.

use cognitive_field_sim::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn field() -> FluidField {
    init_logger();
    FluidField::new(FieldConfig::with_grid(64, 64)).unwrap()
}

fn assert_normalized(field: &FluidField, context: &str) {
    let norm = field.norm();
    assert!(
        (norm - 1.0).abs() < 1e-6,
        "norm drifted to {} after {}",
        norm,
        context
    );
}

// ── Invariants across a call sequence ──────────────────────────────────

#[test]
fn norm_holds_after_every_public_call() {
    let mut f = field();
    assert_normalized(&f, "construction");

    f.evolve(15);
    assert_normalized(&f, "evolve");
    f.set_barrier((1.0, -2.0), 1.5, 1.0, Some("wall")).unwrap();
    f.evolve(5);
    assert_normalized(&f, "evolve behind a barrier");
    f.add_coupling("Heart", "Logic", 3.0).unwrap();
    f.excite_mode(3, 2.0).unwrap();
    assert_normalized(&f, "excite_mode");
    f.store((-2.0, 1.0), 0.7, -0.5).unwrap();
    assert_normalized(&f, "store");
    f.set_viscosity(0.8);
    f.evolve(10);
    assert_normalized(&f, "viscous evolve");
    f.meditate(20);
    assert_normalized(&f, "meditate");
    f.recall((0.0, 0.0), 10);
    assert_normalized(&f, "recall");
}

#[test]
fn energy_vector_is_always_a_distribution() {
    let mut f = field();
    let check = |f: &FluidField| {
        let e = f.mode_energies();
        assert_eq!(e.len(), 16);
        assert!(e.iter().all(|&v| v >= 0.0), "negative energy in {:?}", e);
        assert!((e.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    };

    check(&f);
    f.excite_mode(9, 3.0).unwrap();
    check(&f);
    f.evolve(40);
    check(&f);
    f.store((4.0, -3.0), 1.2, 0.3).unwrap();
    check(&f);
    f.meditate(10);
    check(&f);
}

// ── Landscape ──────────────────────────────────────────────────────────

#[test]
fn repeated_keyed_barrier_is_idempotent() {
    let mut f = field();
    f.set_barrier((0.0, 0.0), 0.5, 2.0, Some("brain_shield")).unwrap();
    let once = f.total_potential().to_vec();
    for _ in 0..4 {
        f.set_barrier((0.0, 0.0), 0.5, 2.0, Some("brain_shield")).unwrap();
    }
    assert_eq!(f.total_potential(), once.as_slice());
    assert_eq!(f.landscape().barrier_count(), 1);
}

#[test]
fn coupling_accumulates() {
    let mut f = field();
    let base = f.total_potential().to_vec();

    f.add_coupling("Intuition", "Logic", 5.0).unwrap();
    let once: Vec<f64> = f
        .total_potential()
        .iter()
        .zip(&base)
        .map(|(t, b)| t - b)
        .collect();

    f.add_coupling("Intuition", "Logic", 5.0).unwrap();
    for ((t, b), d) in f.total_potential().iter().zip(&base).zip(&once) {
        assert!((t - b - 2.0 * d).abs() < 1e-9);
    }
}

#[test]
fn unknown_mode_leaves_potential_bit_for_bit() {
    let mut f = field();
    f.add_coupling("Heart", "Soul", 2.0).unwrap();
    let before = f.total_potential().to_vec();

    let err = f.add_coupling("Intuition", "Daydream", 5.0);
    assert_eq!(err, Err(FieldError::ModeNotFound("Daydream".into())));
    assert_eq!(f.total_potential(), before.as_slice());
}

// ── Dynamics ───────────────────────────────────────────────────────────

#[test]
fn quiescent_field_stays_coherent_without_damping() {
    init_logger();
    let mut f = FluidField::new(FieldConfig::with_grid(64, 64).with_gamma(0.0)).unwrap();
    let before = f.coherence();
    f.evolve(100);
    let after = f.coherence();
    assert!(
        (after - before).abs() <= 0.05 * before,
        "coherence moved from {} to {}",
        before,
        after
    );
}

#[test]
fn excited_mode_gains_share() {
    let mut f = field();
    let before = f.mode_energies()[0];
    f.excite_mode(0, 3.0).unwrap();
    f.evolve(200);
    let after = f.mode_energies()[0];
    assert!(after > before, "mode 0 share went from {} to {}", before, after);
    assert!((f.time() - 2.0).abs() < 1e-9);
}

#[test]
fn recall_finds_a_stored_memory_nearby() {
    let mut f = field();
    f.store((3.0, 4.0), 0.9, 1.0).unwrap();
    f.evolve(20);

    let memories = f.recall((3.2, 4.1), 50);
    assert!(!memories.is_empty());
    assert!(memories.len() <= 5);
    let nearest = memories
        .iter()
        .map(|m| ((m.position.0 - 3.0).powi(2) + (m.position.1 - 4.0).powi(2)).sqrt())
        .fold(f64::INFINITY, f64::min);
    assert!(nearest < 1.0, "closest peak is {} away from (3, 4)", nearest);
}

#[test]
fn identical_call_sequences_reproduce_the_field() {
    let run = || {
        let mut f = field();
        f.set_barrier((2.0, 2.0), 1.0, 1.5, None).unwrap();
        f.add_coupling("Memory", "Learner", 1.0).unwrap();
        f.excite_mode(1, 1.5).unwrap();
        f.evolve(30);
        f.meditate(5);
        f.vote()
    };
    assert_eq!(run(), run());
}
