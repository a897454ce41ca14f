#![no_main]
// Drives the serialization boundary and the full KEM flow with
// attacker-shaped bytes: keys and ciphertexts are generated honestly from
// fuzzer seeds, XOR-mutated, and pushed back through validation and
// decapsulation. Nothing here may panic; mutated ciphertexts must still
// decapsulate (implicit rejection), while mutated keys either deserialize to
// something usable or are cleanly refused.

use libfuzzer_sys::fuzz_target;
use mlkem::ml_kem_512;
use mlkem::traits::{Decaps, Encaps, KeyGen, SerDes};

#[derive(arbitrary::Arbitrary, Debug)]
struct FuzzInput {
    d: [u8; 32],
    z: [u8; 32],
    m: [u8; 32],
    ek_xor: [u8; ml_kem_512::EK_LEN],
    dk_xor: [u8; ml_kem_512::DK_LEN],
    ct_xor: [u8; ml_kem_512::CT_LEN],
}

fuzz_target!(|input: FuzzInput| {
    let (ek, dk) = ml_kem_512::KG::keygen_from_seed(input.d, input.z);

    // mutated encaps key: must validate cleanly or refuse cleanly
    let mut ek_bytes = ek.into_bytes();
    ek_bytes.iter_mut().zip(input.ek_xor.iter()).for_each(|(x1, x2)| *x1 ^= x2);
    let Ok(ek) = ml_kem_512::EncapsKey::try_from_bytes(ek_bytes) else {
        return;
    };

    // mutated decaps key likewise
    let mut dk_bytes = dk.into_bytes();
    dk_bytes.iter_mut().zip(input.dk_xor.iter()).for_each(|(x1, x2)| *x1 ^= x2);
    let Ok(dk) = ml_kem_512::DecapsKey::try_from_bytes(dk_bytes) else {
        return;
    };

    // a mutated ciphertext of the right length always decapsulates
    let (_ssk, ct) = ek.encaps_from_seed(&input.m);
    let mut ct_bytes = ct.into_bytes();
    ct_bytes.iter_mut().zip(input.ct_xor.iter()).for_each(|(x1, x2)| *x1 ^= x2);
    let ct = ml_kem_512::CipherText::try_from_bytes(ct_bytes).unwrap();
    let _ssk = dk.try_decaps(&ct).unwrap();
});
