use crate::types::Z;
use crate::Q;
use sha3::digest::XofReader;


/// Algorithm 7 `SampleNTT(B)`: rejection-samples a uniform element of `T_q`
/// from a SHAKE-128 stream. The caller has already absorbed the 34-byte seed
/// (`rho` plus the two index bytes); this function squeezes 3 bytes per
/// iteration, splitting them into two 12-bit candidates and keeping those
/// below `q` until 256 coefficients have been accepted.
///
/// The output is in the NTT domain by convention. The accept/reject pattern
/// depends only on `rho`, which is public, so this loop need not be
/// constant-time.
#[allow(clippy::cast_possible_truncation)] // d1/d2 < q fit u16
pub(crate) fn sample_ntt(mut xof_reader: impl XofReader) -> [Z; 256] {
    let mut array_a_hat = [Z::default(); 256];
    let mut c = [0u8; 3];

    let mut j = 0usize;
    while j < 256 {
        xof_reader.read(&mut c);

        // 0 ≤ d1, d2 < 2^12
        let d1 = u32::from(c[0]) + 256 * (u32::from(c[1]) & 0x0F);
        let d2 = (u32::from(c[1]) >> 4) + 16 * u32::from(c[2]);

        if d1 < Q {
            array_a_hat[j].set_u16(d1 as u16);
            j += 1;
        }
        if (d2 < Q) && (j < 256) {
            array_a_hat[j].set_u16(d2 as u16);
            j += 1;
        }
    }
    array_a_hat
}


/// Algorithm 8 `SamplePolyCBDη(B)`: derives a polynomial whose coefficients
/// follow the centered binomial distribution `B_η − B_η`, stored as canonical
/// representatives mod `q`. `η` is inferred from the input length `64·η`.
/// The bit extraction is fused with a constant-time popcount rather than
/// materializing the 512·η-bit string.
#[must_use]
pub(crate) fn sample_poly_cbd(byte_array_b: &[u8]) -> [Z; 256] {
    let eta = byte_array_b.len() >> 6;
    debug_assert_eq!(byte_array_b.len(), 64 * eta, "Alg 8: byte array not 64 * eta");
    let mut array_f: [Z; 256] = [Z::default(); 256];
    let mut temp = 0u32;
    let mut int_index = 0;
    let mut bit_index = 0;
    for byte in byte_array_b {
        temp |= u32::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= 2 * eta {
            let x = count_ones(temp & ((1 << eta) - 1));
            let y = count_ones((temp >> eta) & ((1 << eta) - 1));
            let (mut zx, mut zy) = (Z::default(), Z::default());
            zx.set_u16(x);
            zy.set_u16(y);
            array_f[int_index] = zx.sub(zy);
            bit_index -= 2 * eta;
            temp >>= 2 * eta;
            int_index += 1;
        }
    }
    array_f
}


// Branch-free population count of the low byte (u32 operands help perf)
#[allow(clippy::cast_possible_truncation)] // count of 8 bits fits u16
fn count_ones(x: u32) -> u16 {
    let x = (x & 0x5555_5555) + ((x >> 1) & 0x5555_5555);
    let x = (x & 0x3333_3333) + ((x >> 2) & 0x3333_3333);
    let x = (x & 0x0F0F_0F0F) + ((x >> 4) & 0x0F0F_0F0F);
    x as u16
}
