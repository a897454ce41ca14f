// Statistical timing evidence for the decapsulation path: implicit rejection
// must be indistinguishable from honest decapsulation, and a fixed key must
// process arbitrary ciphertexts in uniform time. The t-statistic reported by
// dudect-bencher staying in the single digits as n grows is the pass signal.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use mlkem::ml_kem_512;
use mlkem::traits::{Decaps, Encaps, KeyGen, SerDes};
use rand_core::RngCore;

use crate::ml_kem_512::{CipherText, DecapsKey};

// Left: ciphertexts that decapsulate honestly. Right: the same ciphertexts
// with one flipped bit, forcing the implicit-rejection assignment.
fn decaps_accept_vs_reject(runner: &mut CtRunner, rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek, dk) = ml_kem_512::KG::keygen_from_seed([11u8; 32], [22u8; 32]);

    let mut inputs: Vec<(DecapsKey, CipherText)> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        let mut m = [0u8; 32];
        rng.fill_bytes(&mut m);
        let (_ssk, ct) = ek.encaps_from_seed(&m);
        let mut tampered_bytes = ct.clone().into_bytes();
        tampered_bytes[0] ^= 1;
        let tampered = CipherText::try_from_bytes(tampered_bytes).unwrap();

        inputs.push((dk.clone(), ct));
        classes.push(Class::Left);
        inputs.push((dk.clone(), tampered));
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = input.0.try_decaps(&input.1);
            }
        });
    }
}

// Left/Right: one fixed ciphertext each, decapsulated under the same key.
fn decaps_fixed_vs_fixed(runner: &mut CtRunner, _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (ek, dk) = ml_kem_512::KG::keygen_from_seed([33u8; 32], [44u8; 32]);
    let (_ssk1, ct1) = ek.encaps_from_seed(&[55u8; 32]);
    let (_ssk2, ct2) = ek.encaps_from_seed(&[66u8; 32]);

    let mut inputs: Vec<(DecapsKey, CipherText)> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push((dk.clone(), ct1.clone()));
        classes.push(Class::Left);
        inputs.push((dk.clone(), ct2.clone()));
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = input.0.try_decaps(&input.1);
            }
        });
    }
}

ctbench_main!(decaps_accept_vs_reject, decaps_fixed_vs_fixed);

/*
See https://docs.rs/dudect-bencher/latest/dudect_bencher/

$ cargo run --release -- --continuous decaps_accept_vs_reject
*/
