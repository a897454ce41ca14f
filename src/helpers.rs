use crate::ntt::multiply_ntts;
use crate::types::Z;
use crate::Q;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};


/// If the condition is not met, return early with the given error. Borrowed
/// from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// Vector addition: `z_hat` = `u_hat` + `v_hat`, element-wise over K rows.
#[must_use]
pub(crate) fn add_vecs<const K: usize>(
    vec_a: &[[Z; 256]; K], vec_b: &[[Z; 256]; K],
) -> [[Z; 256]; K] {
    core::array::from_fn(|k| core::array::from_fn(|n| vec_a[k][n].add(vec_b[k][n])))
}


/// Matrix by vector multiplication in the NTT domain: `w_hat` = `A_hat` ∘ `u_hat`.
#[must_use]
pub(crate) fn mul_mat_vec<const K: usize>(
    a_hat: &[[[Z; 256]; K]; K], u_hat: &[[Z; 256]; K],
) -> [[Z; 256]; K] {
    let mut w_hat = [[Z::default(); 256]; K];
    for i in 0..K {
        #[allow(clippy::needless_range_loop)] // the iterator form obscures the indexing
        for j in 0..K {
            let tmp = multiply_ntts(&a_hat[i][j], &u_hat[j]);
            for n in 0..256 {
                w_hat[i][n] = w_hat[i][n].add(tmp[n]);
            }
        }
    }
    w_hat
}


/// Transposed matrix by vector multiplication: `y_hat` = `A_hat`^T ∘ `u_hat`.
/// The transpose is an indexing choice, not a data movement.
#[must_use]
pub(crate) fn mul_mat_t_vec<const K: usize>(
    a_hat: &[[[Z; 256]; K]; K], u_hat: &[[Z; 256]; K],
) -> [[Z; 256]; K] {
    let mut y_hat = [[Z::default(); 256]; K];
    #[allow(clippy::needless_range_loop)] // the iterator form obscures the indexing
    for i in 0..K {
        for j in 0..K {
            let tmp = multiply_ntts(&a_hat[j][i], &u_hat[j]); // i,j swapped vs above fn
            for n in 0..256 {
                y_hat[i][n] = y_hat[i][n].add(tmp[n]);
            }
        }
    }
    y_hat
}


/// Vector dot product in the NTT domain: `z_hat` = `u_hat`^T ∘ `v_hat`.
#[must_use]
pub(crate) fn dot_t_prod<const K: usize>(u_hat: &[[Z; 256]; K], v_hat: &[[Z; 256]; K]) -> [Z; 256] {
    let mut result = [Z::default(); 256];
    for j in 0..K {
        let tmp = multiply_ntts(&u_hat[j], &v_hat[j]);
        for n in 0..256 {
            result[n] = result[n].add(tmp[n]);
        }
    }
    result
}


/// Function `PRF_eta(s, b)`: SHAKE-256 over the 32-byte seed and a one-byte
/// domain separator, squeezed to `64·eta` bytes.
#[must_use]
pub(crate) fn prf<const ETA_64: usize>(s: &[u8; 32], b: u8) -> [u8; ETA_64] {
    let mut hasher = Shake256::default();
    hasher.update(s);
    hasher.update(&[b]);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; ETA_64];
    reader.read(&mut result);
    result
}


/// The matrix-entry XOF: SHAKE-128 over `rho` and two index bytes. Entry
/// `(i, j)` of `A_hat` absorbs the column byte `j` before the row byte `i`.
#[must_use]
pub(crate) fn xof(rho: &[u8; 32], j: u8, i: u8) -> impl XofReader {
    let mut hasher = Shake128::default();
    hasher.update(rho);
    hasher.update(&[j]);
    hasher.update(&[i]);
    hasher.finalize_xof()
}


/// Function `G`: SHA3-512 split into two 32-byte halves. Callers pass the
/// operands as a list of slices to avoid a prior concatenation.
pub(crate) fn g(bytes: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    bytes.iter().for_each(|b| Digest::update(&mut hasher, b));
    let digest = hasher.finalize();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a.copy_from_slice(&digest[0..32]);
    b.copy_from_slice(&digest[32..64]);
    (a, b)
}


/// Function `H`: SHA3-256.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    let digest = hasher.finalize();
    digest.into()
}


/// Function `J`: SHAKE-256 truncated to 32 bytes; the implicit-rejection key
/// derivation over `z ‖ ct`.
#[must_use]
pub(crate) fn j(z: &[u8], ct: &[u8]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(z);
    hasher.update(ct);
    let mut reader = hasher.finalize_xof();
    let mut result = [0u8; 32];
    reader.read(&mut result);
    result
}


/// `Compress<d>`: x → round(x · 2^d / q) mod 2^d, rounding half away from
/// zero. The division is a Barrett multiply by M = ⌈2^36 / q⌉, exact for the
/// operand range here, so no value-dependent branch exists.
#[allow(clippy::cast_possible_truncation)] // masked result fits u16
pub(crate) fn compress_vector(d: u32, inout: &mut [Z]) {
    const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
    let mask = (1u32 << d) - 1;
    for x_ref in &mut *inout {
        let dividend = (x_ref.get_u32() << d) + (Q >> 1);
        let quot = ((u64::from(dividend) * M) >> 36) as u32;
        x_ref.set_u16((quot & mask) as u16);
    }
}


/// `Decompress<d>`: y → round(y · q / 2^d), rounding half away from zero.
#[allow(clippy::cast_possible_truncation)] // result < q fits u16
pub(crate) fn decompress_vector(d: u32, inout: &mut [Z]) {
    for y_ref in &mut *inout {
        let qy = Q * y_ref.get_u32() + (1 << (d - 1));
        y_ref.set_u16((qy >> d) as u16);
    }
}


#[cfg(test)]
mod tests {
    use super::{compress_vector, decompress_vector};
    use crate::types::Z;
    use crate::Q;

    // centered distance in Z_q
    fn dist(a: u32, b: u32) -> u32 {
        let diff = (a + Q - b) % Q;
        diff.min(Q - diff)
    }

    #[test]
    fn compress_round_trip_stays_within_bound() {
        for d in [1u32, 4, 5, 10, 11] {
            let bound = (Q + (1 << (d + 1)) - 1) >> (d + 1); // ceil(q / 2^(d+1))
            for x in 0..Q {
                let mut v = [Z(x as u16)];
                compress_vector(d, &mut v);
                assert!(u32::from(v[0].get_u16()) < (1 << d));
                decompress_vector(d, &mut v);
                assert!(
                    dist(u32::from(v[0].get_u16()), x) <= bound,
                    "d {d}: x {x} came back as {}",
                    v[0].get_u16()
                );
            }
        }
    }

    #[test]
    fn compress_round_trip_spot_values_at_four_bits() {
        // worst-case error at d = 4 is 104
        for x in [0u32, 1, Q / 2, Q - 1] {
            let mut v = [Z(x as u16)];
            compress_vector(4, &mut v);
            decompress_vector(4, &mut v);
            assert!(dist(u32::from(v[0].get_u16()), x) <= 104);
        }
    }

    #[test]
    fn decompress_of_one_bit() {
        let mut v = [Z(0), Z(1)];
        decompress_vector(1, &mut v);
        assert_eq!(v[0].get_u16(), 0);
        assert_eq!(v[1].get_u16(), 1665); // round(q / 2)
    }
}
