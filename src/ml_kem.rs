use crate::byte_fns::{byte_decode, byte_encode};
use crate::errors::KemError;
use crate::helpers::{ensure, g, h, j};
use crate::k_pke::{k_pke_decrypt, k_pke_encrypt, k_pke_key_gen};
use crate::SharedSecretKey;
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;


/// Algorithm 16 `ML-KEM.KeyGen_internal(d, z)`: deterministic key expansion
/// from the two 32-byte seeds. The decaps key is
/// `dk_PKE ‖ ek ‖ H(ek) ‖ z`, carrying everything decapsulation needs.
pub(crate) fn ml_kem_key_gen_internal<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], z: &[u8; 32], ek: &mut [u8], dk: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "Alg 16: ek len not 384 * K + 32");
    debug_assert_eq!(dk.len(), 768 * K + 96, "Alg 16: dk len not 768 * K + 96");

    // the KEM encaps key is exactly the PKE encryption key
    let p1 = 384 * K;
    k_pke_key_gen::<K, ETA1_64>(d, ek, &mut dk[..p1])?;

    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(z);
    Ok(())
}


/// Algorithm 17 `ML-KEM.Encaps_internal(ek, m)`: derives `(K, r)` from
/// `G(m ‖ H(ek))` and encrypts `m` under `r`. Callers have validated `ek`.
fn ml_kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, m: &[u8; 32], ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, KemError> {
    let h_ek = h(ek);
    let (k, mut r) = g(&[m, &h_ek]);
    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, m, &r, ct)?;
    r.zeroize();
    Ok(SharedSecretKey(k))
}


/// Algorithm 18 `ML-KEM.Decaps_internal(dk, c)`: decrypts, re-derives the
/// encryption randomness, re-encrypts, and selects between the honest secret
/// `K'` and the implicit-rejection value `K_bar = J(z ‖ c)` with a
/// constant-time mask. Both candidate secrets exist before the selection and
/// no branch depends on the comparison outcome.
#[allow(clippy::similar_names)]
fn ml_kem_decaps_internal<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, KemError> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "Alg 18: dk len not 768 * K + 96");

    let dk_pke = &dk[0..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let hash_ek = &dk[768 * K + 32..768 * K + 64];
    let z = &dk[768 * K + 64..768 * K + 96];

    // m' <- K-PKE.Decrypt(dk_PKE, c)
    let mut m_prime = k_pke_decrypt::<K>(du, dv, dk_pke, ct)?;

    // (K', r') <- G(m' ‖ h); K_bar <- J(z ‖ c)
    let (mut k_prime, mut r_prime) = g(&[&m_prime, hash_ek]);
    let mut k_bar = j(z, ct);

    // c' <- K-PKE.Encrypt(ek_PKE, m', r'), the re-encryption check
    let mut c_prime = [0u8; CT_LEN];
    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &r_prime, &mut c_prime)?;
    m_prime.zeroize();
    r_prime.zeroize();

    // on mismatch, implicitly reject by taking K_bar
    k_prime.conditional_assign(&k_bar, ct.ct_ne(&c_prime));
    k_bar.zeroize();
    c_prime.zeroize();
    Ok(SharedSecretKey(k_prime))
}


/// Algorithm 19 `ML-KEM.KeyGen()`: draws the seeds `d` and `z` from the
/// caller's RNG and runs the internal key generation.
pub(crate) fn ml_kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), KemError> {
    let mut d = [0u8; 32];
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| KemError::RngFailure)?;
    rng.try_fill_bytes(&mut z).map_err(|_| KemError::RngFailure)?;
    let res = ml_kem_key_gen_internal::<K, ETA1_64>(&d, &z, ek, dk);
    d.zeroize();
    z.zeroize();
    res
}


/// Algorithm 20 `ML-KEM.Encaps(ek)`: checks that each 12-bit block of the
/// encaps key re-encodes to the same bytes (the modulus check), draws the
/// 32-byte message from the caller's RNG, and encapsulates.
pub(crate) fn ml_kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, KemError> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "Alg 20: ek len not 384 * K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "Alg 20: ct len not 32 * (DU * K + DV)"
    );

    // modulus check: ek == ByteEncode_12(ByteDecode_12(ek)); a key produced
    // by try_from_bytes() has already passed, but keys can also arrive here
    // through internal flows, and the check is cheap relative to encryption
    let mut pass = true;
    for i in 0..K {
        let mut ek_tilde = [0u8; 384];
        let ek_hat = byte_decode(12, &ek[384 * i..384 * (i + 1)]);
        byte_encode(12, &ek_hat, &mut ek_tilde)?;
        pass &= ek_tilde == ek[384 * i..384 * (i + 1)];
    }
    ensure!(pass, KemError::InvalidKey);

    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m).map_err(|_| KemError::RngFailure)?;
    let res = ml_kem_encaps_internal::<K, ETA1_64, ETA2_64>(du, dv, &m, ek, ct);
    m.zeroize();
    res
}


/// Algorithm 21 `ML-KEM.Decaps(dk, c)`: decapsulation entry point. The
/// ciphertext and decaps key arrive in fixed-size buffers, so the length
/// checks hold by construction; any correct-length ciphertext yields a
/// 32-byte secret, pseudorandom when the re-encryption check fails.
pub(crate) fn ml_kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, KemError> {
    debug_assert_eq!(ct.len(), 32 * (du as usize * K + dv as usize), "Alg 21: ct len mismatch");
    ml_kem_decaps_internal::<K, ETA1_64, ETA2_64, CT_LEN>(du, dv, dk, ct)
}


#[cfg(test)]
mod tests {
    use super::{ml_kem_decaps, ml_kem_encaps, ml_kem_key_gen};
    use rand_core::SeedableRng;

    // ML-KEM-512 constants
    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    fn keygen_encaps_decaps_agree() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        ml_kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk1 = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        let ssk2 = ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();
        assert!(ssk1 == ssk2);
    }

    #[test]
    fn encaps_rejects_oversized_coefficients() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        let ff_ek = [0xFFu8; EK_LEN]; // every 12-bit block reads 0xFFF > q
        let mut ct = [0u8; CT_LEN];
        let res = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ff_ek, &mut ct);
        assert!(res.is_err());
    }
}
