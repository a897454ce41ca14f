use crate::byte_fns::{byte_decode, byte_encode};
use crate::errors::KemError;
use crate::helpers::{
    add_vecs, compress_vector, decompress_vector, dot_t_prod, g, mul_mat_t_vec, mul_mat_vec, prf,
    xof,
};
use crate::ntt::{ntt, ntt_inv};
use crate::sampling::{sample_ntt, sample_poly_cbd};
use crate::types::Z;
use zeroize::Zeroize;


/// Algorithm 13 `K-PKE.KeyGen(d)`: expands the 32-byte seed `d` into an
/// encryption key `ek_PKE = ByteEncode_12(t_hat) ‖ rho` and a decryption key
/// `dk_PKE = ByteEncode_12(s_hat)`, where `t_hat = A_hat ∘ s_hat + e_hat` is a
/// Module-LWE sample held in the NTT domain.
#[allow(clippy::similar_names)]
pub(crate) fn k_pke_key_gen<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], ek_pke: &mut [u8], dk_pke: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "Alg 13: ek_pke not 384 * K + 32");
    debug_assert_eq!(dk_pke.len(), 384 * K, "Alg 13: dk_pke not 384 * K");

    // (rho, sigma) <- G(d ‖ k); the trailing parameter-set byte is the
    // domain separator introduced in the final standard
    let mut d_k = [0u8; 33];
    d_k[0..32].copy_from_slice(d);
    d_k[32] = K.to_le_bytes()[0];
    let (rho, mut sigma) = g(&[&d_k]);
    d_k.zeroize();

    // A_hat[i][j] <- SampleNTT(rho ‖ j ‖ i), public derivation
    let a_hat = gen_a_hat::<K>(&rho);

    // s and e from the centered binomial distribution, PRF counter N running
    // across both vectors
    let mut n = 0;
    let mut s: [[Z; 256]; K] = core::array::from_fn(|_| {
        let mut b = prf::<ETA1_64>(&sigma, n);
        let x = sample_poly_cbd(&b);
        b.zeroize();
        n += 1;
        x
    });
    let mut e: [[Z; 256]; K] = core::array::from_fn(|_| {
        let mut b = prf::<ETA1_64>(&sigma, n);
        let x = sample_poly_cbd(&b);
        b.zeroize();
        n += 1;
        x
    });
    sigma.zeroize();

    let mut s_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&s[i]));
    let mut e_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&e[i]));
    s.zeroize();
    e.zeroize();

    // t_hat <- A_hat ∘ s_hat + e_hat
    let t_hat = add_vecs(&mul_mat_vec(&a_hat, &s_hat), &e_hat);
    e_hat.zeroize();

    for (i, chunk) in ek_pke.chunks_mut(384).enumerate().take(K) {
        byte_encode(12, &t_hat[i], chunk)?;
    }
    ek_pke[384 * K..].copy_from_slice(&rho);

    for (i, chunk) in dk_pke.chunks_mut(384).enumerate() {
        byte_encode(12, &s_hat[i], chunk)?;
    }
    s_hat.zeroize();
    Ok(())
}


/// Derivation of the `K×K` matrix `A_hat` in the NTT domain, shared between
/// key generation and encryption. Entry `(i, j)` draws from SHAKE-128 over
/// `rho ‖ j ‖ i` (column byte before row byte).
fn gen_a_hat<const K: usize>(rho: &[u8; 32]) -> [[[Z; 256]; K]; K] {
    core::array::from_fn(|i| {
        core::array::from_fn(|j| sample_ntt(xof(rho, j.to_le_bytes()[0], i.to_le_bytes()[0])))
    })
}


/// Algorithm 14 `K-PKE.Encrypt(ek_PKE, m, r)`: encrypts the 32-byte message
/// `m` under the derived randomness `r`, producing
/// `ct = ByteEncode_du(Compress_du(u)) ‖ ByteEncode_dv(Compress_dv(v))`.
#[allow(clippy::similar_names, clippy::many_single_char_names)]
pub(crate) fn k_pke_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], m: &[u8; 32], r: &[u8; 32], ct: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "Alg 14: ek len not 384 * K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "Alg 14: ct len not 32 * (DU * K + DV)"
    );

    // t_hat and rho from the encryption key; the key was validated on entry,
    // so the 12-bit decode is already canonical
    let mut t_hat = [[Z::default(); 256]; K];
    for (i, chunk) in ek_pke.chunks(384).enumerate().take(K) {
        t_hat[i] = byte_decode(12, chunk);
    }
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&ek_pke[384 * K..384 * K + 32]);

    let a_hat = gen_a_hat::<K>(&rho);

    // y from eta1, e1 and e2 from eta2; counter N runs across all draws
    let mut n = 0;
    let mut y: [[Z; 256]; K] = core::array::from_fn(|_| {
        let mut b = prf::<ETA1_64>(r, n);
        let x = sample_poly_cbd(&b);
        b.zeroize();
        n += 1;
        x
    });
    let mut e1: [[Z; 256]; K] = core::array::from_fn(|_| {
        let mut b = prf::<ETA2_64>(r, n);
        let x = sample_poly_cbd(&b);
        b.zeroize();
        n += 1;
        x
    });
    let mut e2 = sample_poly_cbd(&prf::<ETA2_64>(r, n));

    let mut y_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&y[i]));
    y.zeroize();

    // u <- NTT^-1(A_hat^T ∘ y_hat) + e1
    let mut u = mul_mat_t_vec(&a_hat, &y_hat);
    for u_i in &mut u {
        *u_i = ntt_inv(u_i);
    }
    u = add_vecs(&u, &e1);

    // mu <- Decompress_1(ByteDecode_1(m))
    let mut mu = byte_decode(1, m);
    decompress_vector(1, &mut mu);

    // v <- NTT^-1(t_hat^T ∘ y_hat) + e2 + mu
    let mut v = ntt_inv(&dot_t_prod(&t_hat, &y_hat));
    v = add_vecs(&add_vecs(&[v], &[e2]), &[mu])[0];
    y_hat.zeroize();
    e1.zeroize();
    e2.zeroize();
    mu.zeroize();

    // c1 ‖ c2, both lossily compressed
    let step = 32 * du as usize;
    for (i, chunk) in ct.chunks_mut(step).enumerate().take(K) {
        compress_vector(du, &mut u[i]);
        byte_encode(du, &u[i], chunk)?;
    }
    compress_vector(dv, &mut v);
    byte_encode(dv, &v, &mut ct[K * step..])?;
    Ok(())
}


/// Algorithm 15 `K-PKE.Decrypt(dk_PKE, c)`: recovers the 32-byte message as
/// `ByteEncode_1(Compress_1(v' − NTT^-1(s_hat ∘ NTT(u'))))`.
#[allow(clippy::similar_names)]
pub(crate) fn k_pke_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], KemError> {
    debug_assert_eq!(dk_pke.len(), 384 * K, "Alg 15: dk len not 384 * K");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "Alg 15: ct len not 32 * (DU * K + DV)"
    );

    let c1 = &ct[0..32 * du as usize * K];
    let c2 = &ct[32 * du as usize * K..];

    // u' <- Decompress_du(ByteDecode_du(c1))
    let mut u = [[Z::default(); 256]; K];
    for (i, chunk) in c1.chunks(32 * du as usize).enumerate().take(K) {
        u[i] = byte_decode(du, chunk);
        decompress_vector(du, &mut u[i]);
    }

    // v' <- Decompress_dv(ByteDecode_dv(c2))
    let mut v = byte_decode(dv, c2);
    decompress_vector(dv, &mut v);

    let mut s_hat = [[Z::default(); 256]; K];
    for (i, chunk) in dk_pke.chunks(384).enumerate() {
        s_hat[i] = byte_decode(12, chunk);
    }

    // w <- v' − NTT^-1(s_hat ∘ NTT(u'))
    let u_hat: [[Z; 256]; K] = core::array::from_fn(|i| ntt(&u[i]));
    let mut su = ntt_inv(&dot_t_prod(&s_hat, &u_hat));
    s_hat.zeroize();
    let mut w: [Z; 256] = core::array::from_fn(|i| v[i].sub(su[i]));
    su.zeroize();

    // m <- ByteEncode_1(Compress_1(w))
    compress_vector(1, &mut w);
    let mut m = [0u8; 32];
    byte_encode(1, &w, &mut m)?;
    w.zeroize();
    Ok(m)
}


#[cfg(test)]
mod tests {
    use super::{k_pke_decrypt, k_pke_encrypt, k_pke_key_gen};
    use rand_core::{RngCore, SeedableRng};

    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 384 * K;
    const CT_LEN: usize = 768;

    #[test]
    fn encrypt_then_decrypt_recovers_message() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        for _i in 0..10 {
            let mut d = [0u8; 32];
            let mut m = [0u8; 32];
            let mut r = [0u8; 32];
            rng.fill_bytes(&mut d);
            rng.fill_bytes(&mut m);
            rng.fill_bytes(&mut r);

            k_pke_key_gen::<K, ETA1_64>(&d, &mut ek, &mut dk).unwrap();
            k_pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ek, &m, &r, &mut ct).unwrap();
            let m2 = k_pke_decrypt::<K>(DU, DV, &dk, &ct).unwrap();
            assert_eq!(m, m2);
        }
    }
}
