use mlkem::traits::{KeyGen, SerDes};
use mlkem::{ml_kem_512, ml_kem_768, KemError};
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;

#[test]
fn random_key_bytes_are_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for _i in 0..50 {
        // a random 12-bit block exceeds q with probability ~0.19, so some of
        // the 512 blocks in an ek are essentially always non-canonical
        let mut bad_ek_bytes = [0u8; ml_kem_512::EK_LEN];
        rng.fill_bytes(&mut bad_ek_bytes);
        let bad_ek = ml_kem_512::EncapsKey::try_from_bytes(bad_ek_bytes);
        assert!(matches!(bad_ek, Err(KemError::InvalidKey)));

        let mut bad_dk_bytes = [0u8; ml_kem_512::DK_LEN];
        rng.fill_bytes(&mut bad_dk_bytes);
        let bad_dk = ml_kem_512::DecapsKey::try_from_bytes(bad_dk_bytes);
        assert!(matches!(bad_dk, Err(KemError::InvalidKey)));

        // the random key halves do not correspond either
        assert!(!ml_kem_512::KG::validate_keypair_vartime(&bad_ek_bytes, &bad_dk_bytes));
    }
}

#[test]
fn planted_oversized_coefficient_is_rejected() {
    let (ek, _dk) = ml_kem_768::KG::keygen_from_seed([5u8; 32], [6u8; 32]);
    let mut ek_bytes = ek.into_bytes();

    // overwrite the first encoded coefficient with 0xFFF = 4095 > q
    ek_bytes[0] = 0xFF;
    ek_bytes[1] |= 0x0F;
    let res = ml_kem_768::EncapsKey::try_from_bytes(ek_bytes);
    assert!(matches!(res, Err(KemError::InvalidKey)));
}

#[test]
fn wrong_length_slices_are_rejected() {
    let (ek, dk) = ml_kem_768::KG::keygen_from_seed([5u8; 32], [6u8; 32]);
    let ek_bytes = ek.into_bytes();
    let dk_bytes = dk.into_bytes();

    let short_ek = ml_kem_768::EncapsKey::try_from(&ek_bytes[..ml_kem_768::EK_LEN - 1]);
    assert!(matches!(short_ek, Err(KemError::InvalidKey)));

    let short_dk = ml_kem_768::DecapsKey::try_from(&dk_bytes[..ml_kem_768::DK_LEN - 1]);
    assert!(matches!(short_dk, Err(KemError::InvalidKey)));

    let ct_bytes = [0u8; ml_kem_768::CT_LEN];
    let short_ct = ml_kem_768::CipherText::try_from(&ct_bytes[..ml_kem_768::CT_LEN - 1]);
    assert!(matches!(short_ct, Err(KemError::InvalidCiphertext)));

    let long_ct_bytes = [0u8; ml_kem_768::CT_LEN + 1];
    let long_ct = ml_kem_768::CipherText::try_from(&long_ct_bytes[..]);
    assert!(matches!(long_ct, Err(KemError::InvalidCiphertext)));
}

#[test]
fn tampered_decaps_key_hash_is_rejected() {
    let (ek, dk) = ml_kem_768::KG::keygen_from_seed([5u8; 32], [6u8; 32]);
    let ek_bytes = ek.into_bytes();
    let mut dk_bytes = dk.into_bytes();

    // corrupt one byte of the stored H(ek)
    dk_bytes[768 * 3 + 32] ^= 0xA5;
    assert!(!ml_kem_768::KG::validate_keypair_vartime(&ek_bytes, &dk_bytes));
    let res = ml_kem_768::DecapsKey::try_from_bytes(dk_bytes);
    assert!(matches!(res, Err(KemError::InvalidKey)));
}
