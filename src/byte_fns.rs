use crate::errors::KemError;
use crate::helpers::ensure;
use crate::types::Z;
use crate::Q;

// The BitsToBytes and BytesToBits conversions of FIPS 203 Algorithms 3/4 are
// fused into the two functions below: coefficients stream through a u64
// accumulator one d-bit group at a time, little-endian within and across
// bytes, so the intermediate bit array never materializes.


/// Algorithm 5 `ByteEncode<d>(F)` for 1 ≤ d ≤ 12.
/// Packs the low `d` bits of each of 256 coefficients into `32·d` bytes.
///
/// Coefficients must already be in range: below `2^d` when `d < 12`, below `q`
/// when `d = 12`. Out-of-range input is reported rather than silently masked.
#[allow(clippy::cast_possible_truncation)] // the flushed accumulator byte
pub(crate) fn byte_encode(
    d: u32, integers_f: &[Z; 256], bytes_b: &mut [u8],
) -> Result<(), KemError> {
    debug_assert_eq!(bytes_b.len(), 32 * d as usize, "Alg 5: output not 32 * d bytes");
    let m = if d < 12 { 1u64 << d } else { u64::from(Q) };
    let mut temp = 0u64;
    let mut bit_index = 0;
    let mut byte_index = 0;
    for coeff in integers_f {
        let coeff = u64::from(coeff.get_u16());
        ensure!(coeff < m, KemError::InvalidCoefficient);
        temp |= coeff << bit_index;
        bit_index += d as usize;
        while bit_index > 7 {
            bytes_b[byte_index] = temp as u8;
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
    Ok(())
}


/// Algorithm 6 `ByteDecode<d>(B)` for 1 ≤ d ≤ 12.
/// Unpacks `32·d` bytes into 256 coefficients of `d` bits each. Values are
/// reduced to canonical form; for `d < 12` they are already below `q`, while
/// for `d = 12` the raw 12-bit value is reduced mod `q`. Detecting a
/// non-canonical 12-bit encoding is the caller's re-encode check.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // reduced value < q fits u16
pub(crate) fn byte_decode(d: u32, bytes_b: &[u8]) -> [Z; 256] {
    debug_assert_eq!(bytes_b.len(), 32 * d as usize, "Alg 6: input not 32 * d bytes");
    let mut integers_f = [Z::default(); 256];
    let mask = (1u64 << d) - 1;
    let mut temp = 0u64;
    let mut int_index = 0;
    let mut bit_index = 0;
    for byte in bytes_b {
        temp |= u64::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= d as usize {
            // raw < 2^12 < 2q, so a single masked conditional subtract canonicalizes
            let raw = (temp & mask) as u32;
            let res = raw.wrapping_sub(Q);
            let res = res.wrapping_add((res >> 16) & Q);
            integers_f[int_index] = Z(res as u16);
            bit_index -= d as usize;
            temp >>= d;
            int_index += 1;
        }
    }
    integers_f
}
