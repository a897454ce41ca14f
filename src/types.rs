use crate::Q;
use zeroize::Zeroize;

// Z is simple and correct; perf-sensitive callers operate on whole [Z; 256]
// rows so the per-element overhead stays tolerable.

/// An element of `Z_q` held in canonical form `[0, q)`.
/// Stored as u16, with arithmetic widened to u32/u64 so reductions never
/// branch on operand values.
#[derive(Clone, Copy, Default, Zeroize)]
pub(crate) struct Z(pub(crate) u16);

#[allow(clippy::inline_always)]
impl Z {
    pub(crate) fn get_u16(self) -> u16 { self.0 }

    pub(crate) fn get_u32(self) -> u32 { u32::from(self.0) }

    pub(crate) fn set_u16(&mut self, a: u16) { self.0 = a }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)] // res < q fits u16
    pub(crate) fn add(self, other: Self) -> Self {
        debug_assert!(self.get_u32() < Q);
        debug_assert!(other.get_u32() < Q);
        let res = self.get_u32() + other.get_u32();
        let res = res.wrapping_sub(Q);
        let res = res.wrapping_add((res >> 16) & Q); // add q back when the subtract borrowed
        debug_assert!(res < Q);
        Self(res as u16)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)] // res < q fits u16
    pub(crate) fn sub(self, other: Self) -> Self {
        debug_assert!(self.get_u32() < Q);
        debug_assert!(other.get_u32() < Q);
        let res = self.get_u32().wrapping_sub(other.get_u32());
        let res = res.wrapping_add((res >> 16) & Q);
        debug_assert!(res < Q);
        Self(res as u16)
    }

    /// Barrett multiplication; exact for products below 2^24, so no second
    /// reduction step is required.
    #[inline(always)]
    #[allow(clippy::items_after_statements, clippy::cast_possible_truncation)]
    pub(crate) fn mul(self, other: Self) -> Self {
        debug_assert!(self.get_u32() < Q);
        debug_assert!(other.get_u32() < Q);
        const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;
        let prod = u64::from(self.get_u32() * other.get_u32());
        let quot = (prod * M) >> 36;
        let rem = prod - quot * u64::from(Q);
        debug_assert!(rem < u64::from(Q));
        Self(rem as u16)
    }
}


#[cfg(test)]
mod tests {
    use super::Z;
    use crate::Q;

    #[test]
    fn add_sub_match_naive_reference() {
        for a in (0..Q as u16).step_by(7) {
            for b in (0..Q as u16).step_by(13) {
                let za = Z(a);
                let zb = Z(b);
                assert_eq!(u32::from(za.add(zb).get_u16()), (u32::from(a) + u32::from(b)) % Q);
                assert_eq!(
                    u32::from(za.sub(zb).get_u16()),
                    (u32::from(a) + Q - u32::from(b)) % Q
                );
            }
        }
    }

    #[test]
    fn mul_matches_naive_reference() {
        for a in (0..Q as u16).step_by(11) {
            for b in (0..Q as u16).step_by(17) {
                let prod = Z(a).mul(Z(b));
                assert_eq!(u32::from(prod.get_u16()), (u32::from(a) * u32::from(b)) % Q);
            }
        }
        // boundary operands
        let top = Z(3328);
        assert_eq!(u32::from(top.mul(top).get_u16()), (3328u32 * 3328) % Q);
        assert_eq!(top.mul(Z(0)).get_u16(), 0);
        assert_eq!(top.mul(Z(1)).get_u16(), 3328);
    }
}
