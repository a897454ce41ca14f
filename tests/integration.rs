use mlkem::traits::{Decaps, Encaps, KeyGen, SerDes};
use mlkem::{ml_kem_1024, ml_kem_512, ml_kem_768};
use rand_chacha::rand_core::SeedableRng;

// The three flows below are identical apart from the parameter set; macros
// would obscure more than they save at this size.

#[test]
fn expected_flow_512() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for _i in 0..50 {
        // Alice runs KeyGen and serializes the encaps key for Bob
        let (alice_ek, alice_dk) = ml_kem_512::KG::try_keygen_with_rng(&mut rng).unwrap();
        let alice_ek_bytes = alice_ek.into_bytes();

        // Bob deserializes, runs Encaps, and serializes the ciphertext
        let bob_ek = ml_kem_512::EncapsKey::try_from_bytes(alice_ek_bytes).unwrap();
        let (bob_ssk, bob_ct) = bob_ek.try_encaps_with_rng(&mut rng).unwrap();
        let bob_ct_bytes = bob_ct.into_bytes();

        // Alice deserializes and runs Decaps
        let alice_ct = ml_kem_512::CipherText::try_from_bytes(bob_ct_bytes).unwrap();
        let alice_ssk = alice_dk.try_decaps(&alice_ct).unwrap();

        // Both parties now hold the same shared secret
        assert_eq!(bob_ssk, alice_ssk);

        // The serialized keypair corresponds
        let alice_dk_bytes = alice_dk.into_bytes();
        assert!(ml_kem_512::KG::validate_keypair_vartime(&alice_ek_bytes, &alice_dk_bytes));
    }
}

#[test]
fn expected_flow_768() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
    for _i in 0..50 {
        let (alice_ek, alice_dk) = ml_kem_768::KG::try_keygen_with_rng(&mut rng).unwrap();
        let alice_ek_bytes = alice_ek.into_bytes();

        let bob_ek = ml_kem_768::EncapsKey::try_from_bytes(alice_ek_bytes).unwrap();
        let (bob_ssk, bob_ct) = bob_ek.try_encaps_with_rng(&mut rng).unwrap();
        let bob_ct_bytes = bob_ct.into_bytes();

        let alice_ct = ml_kem_768::CipherText::try_from_bytes(bob_ct_bytes).unwrap();
        let alice_ssk = alice_dk.try_decaps(&alice_ct).unwrap();

        assert_eq!(bob_ssk, alice_ssk);

        let alice_dk_bytes = alice_dk.into_bytes();
        assert!(ml_kem_768::KG::validate_keypair_vartime(&alice_ek_bytes, &alice_dk_bytes));
    }
}

#[test]
fn expected_flow_1024() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
    for _i in 0..50 {
        let (alice_ek, alice_dk) = ml_kem_1024::KG::try_keygen_with_rng(&mut rng).unwrap();
        let alice_ek_bytes = alice_ek.into_bytes();

        let bob_ek = ml_kem_1024::EncapsKey::try_from_bytes(alice_ek_bytes).unwrap();
        let (bob_ssk, bob_ct) = bob_ek.try_encaps_with_rng(&mut rng).unwrap();
        let bob_ct_bytes = bob_ct.into_bytes();

        let alice_ct = ml_kem_1024::CipherText::try_from_bytes(bob_ct_bytes).unwrap();
        let alice_ssk = alice_dk.try_decaps(&alice_ct).unwrap();

        assert_eq!(bob_ssk, alice_ssk);

        let alice_dk_bytes = alice_dk.into_bytes();
        assert!(ml_kem_1024::KG::validate_keypair_vartime(&alice_ek_bytes, &alice_dk_bytes));
    }
}

#[test]
fn round_trip_through_slices() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1010);
    let (ek, dk) = ml_kem_768::KG::try_keygen_with_rng(&mut rng).unwrap();
    let ek_bytes = ek.into_bytes();
    let dk_bytes = dk.into_bytes();

    // slice-based deserialization accepts exactly the right lengths
    let ek2 = ml_kem_768::EncapsKey::try_from(&ek_bytes[..]).unwrap();
    let dk2 = ml_kem_768::DecapsKey::try_from(&dk_bytes[..]).unwrap();

    let (ssk2, ct) = ek2.try_encaps_with_rng(&mut rng).unwrap();
    let ct_bytes = ct.into_bytes();
    let ct2 = ml_kem_768::CipherText::try_from(&ct_bytes[..]).unwrap();
    let ssk1 = dk2.try_decaps(&ct2).unwrap();
    assert_eq!(ssk1, ssk2);
}

// $ cargo test -- --ignored
#[ignore]
#[test]
fn round_trip_forever() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for i in 0..u64::MAX {
        let (ek, dk) = ml_kem_768::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2, "shared secret mismatch on iteration {i}");
    }
}
