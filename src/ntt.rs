use crate::types::Z;
use crate::{Q, ZETA};


/// Algorithm 9 `NTT(f)`: maps a standard-form polynomial in `R_q` to its NTT
/// representation via 7 layers of Cooley-Tukey butterflies, twiddles drawn in
/// bit-reversed order.
#[must_use]
#[allow(clippy::module_name_repetitions)]
pub(crate) fn ntt(array_f: &[Z; 256]) -> [Z; 256] {
    let mut f_hat: [Z; 256] = *array_f;
    let mut i = 1;
    for len in [128, 64, 32, 16, 8, 4, 2] {
        for start in (0..256).step_by(2 * len) {
            // zeta^BitRev7(i) sits at the even table indices
            let zeta = ZETA_TABLE[i << 1];
            i += 1;
            for j in start..(start + len) {
                let t = f_hat[j + len].mul(zeta);
                f_hat[j + len] = f_hat[j].sub(t);
                f_hat[j] = f_hat[j].add(t);
            }
        }
    }
    f_hat
}


/// Algorithm 10 `NTT^-1(f_hat)`: inverse transform via Gentleman-Sande
/// butterflies, walking the twiddles in the reverse order, with the final
/// scaling by 3303 = 128^-1 mod q.
#[must_use]
#[allow(clippy::module_name_repetitions)]
pub(crate) fn ntt_inv(f_hat: &[Z; 256]) -> [Z; 256] {
    let mut f: [Z; 256] = *f_hat;
    let mut i = 127;
    for len in [2, 4, 8, 16, 32, 64, 128] {
        for start in (0..256).step_by(2 * len) {
            let zeta = ZETA_TABLE[i << 1];
            i -= 1;
            for j in start..(start + len) {
                let t = f[j];
                f[j] = t.add(f[j + len]);
                f[j + len] = zeta.mul(f[j + len].sub(t));
            }
        }
    }
    let n_inv = Z(3303);
    f.iter_mut().for_each(|item| *item = item.mul(n_inv));
    f
}


/// Algorithm 11 `MultiplyNTTs(f_hat, g_hat)`: coefficient-wise product in the
/// NTT domain, treating the 256 entries as 128 degree-one polynomials reduced
/// modulo `X^2 - gamma_i`.
#[must_use]
pub(crate) fn multiply_ntts(f_hat: &[Z; 256], g_hat: &[Z; 256]) -> [Z; 256] {
    let mut h_hat: [Z; 256] = [Z::default(); 256];
    for i in 0..128 {
        // gamma_i = zeta^(2 BitRev7(i) + 1) occupies the upper table half
        let gamma = ZETA_TABLE[i | 0x80];
        let (h0, h1) = base_case_multiply(
            f_hat[2 * i],
            f_hat[2 * i + 1],
            g_hat[2 * i],
            g_hat[2 * i + 1],
            gamma,
        );
        h_hat[2 * i] = h0;
        h_hat[2 * i + 1] = h1;
    }
    h_hat
}


/// Algorithm 12 `BaseCaseMultiply(a0, a1, b0, b1, gamma)`: product of
/// `a0 + a1 X` and `b0 + b1 X` modulo `X^2 - gamma`.
#[must_use]
pub(crate) fn base_case_multiply(a0: Z, a1: Z, b0: Z, b1: Z, gamma: Z) -> (Z, Z) {
    let c0 = a0.mul(b0).add(a1.mul(b1).mul(gamma));
    let c1 = a0.mul(b1).add(a1.mul(b0));
    (c0, c1)
}


// A single 256-entry table built at compile time covers every power of zeta
// the transforms need: storing zeta^x at index BitRev8(x) puts the NTT
// twiddles zeta^BitRev7(i) at even indices 2i and the base-case constants
// zeta^(2 BitRev7(i) + 1) at indices i + 128.
#[allow(clippy::cast_possible_truncation)] // const fn, values < q
const fn gen_zeta_table() -> [Z; 256] {
    let mut table = [Z(0); 256];
    let mut pow = 1u32;
    let mut x = 0u32;
    while x < 256 {
        table[(x as u8).reverse_bits() as usize] = Z(pow as u16);
        pow = (pow * ZETA) % Q;
        x += 1;
    }
    table
}

pub(crate) static ZETA_TABLE: [Z; 256] = gen_zeta_table();


#[cfg(test)]
mod tests {
    use super::{multiply_ntts, ntt, ntt_inv, ZETA_TABLE};
    use crate::types::Z;
    use rand::{Rng, SeedableRng};

    #[test]
    fn zeta_table_spot_values() {
        assert_eq!(ZETA_TABLE[0].get_u16(), 1); // zeta^0
        assert_eq!(ZETA_TABLE[4].get_u16(), 2580); // zeta^32
        assert_eq!(ZETA_TABLE[128].get_u16(), 17); // zeta^1, first base-case gamma
    }

    #[test]
    fn ntt_round_trips() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(321);
        for _i in 0..50 {
            let f: [Z; 256] = core::array::from_fn(|_| Z(rng.gen_range(0..3329)));
            let f2 = ntt_inv(&ntt(&f));
            assert!(f.iter().zip(f2.iter()).all(|(a, b)| a.get_u16() == b.get_u16()));
        }
    }

    #[test]
    fn multiply_by_one_is_identity() {
        // the NTT image of the constant polynomial 1 is all-ones
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(654);
        let mut one = [Z::default(); 256];
        one[0] = Z(1);
        let one_hat = ntt(&one);
        let f: [Z; 256] = core::array::from_fn(|_| Z(rng.gen_range(0..3329)));
        let f_hat = ntt(&f);
        let prod = ntt_inv(&multiply_ntts(&f_hat, &one_hat));
        assert!(f.iter().zip(prod.iter()).all(|(a, b)| a.get_u16() == b.get_u16()));
    }
}
