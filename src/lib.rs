#![no_std]
#![deny(clippy::pedantic)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]


// Implements the FIPS 203 Module-Lattice-Based Key-Encapsulation Mechanism.
// See <https://csrc.nist.gov/pubs/fips/203/final>
//
// Functionality map per FIPS 203:
//
// Algorithm 3  BitsToBytes(b)                      --> fused away (byte_fns.rs)
// Algorithm 4  BytesToBits(B)                      --> fused away (byte_fns.rs)
// Algorithm 5  ByteEncode_d(F)                     --> byte_fns.rs
// Algorithm 6  ByteDecode_d(B)                     --> byte_fns.rs
// Algorithm 7  SampleNTT(B)                        --> sampling.rs
// Algorithm 8  SamplePolyCBD_eta(B)                --> sampling.rs
// Algorithm 9  NTT(f)                              --> ntt.rs
// Algorithm 10 NTT^-1(f_hat)                       --> ntt.rs
// Algorithm 11 MultiplyNTTs(f_hat, g_hat)          --> ntt.rs
// Algorithm 12 BaseCaseMultiply(a0, a1, b0, b1, g) --> ntt.rs
// Algorithm 13 K-PKE.KeyGen(d)                     --> k_pke.rs
// Algorithm 14 K-PKE.Encrypt(ek_PKE, m, r)        --> k_pke.rs
// Algorithm 15 K-PKE.Decrypt(dk_PKE, c)           --> k_pke.rs
// Algorithm 16 ML-KEM.KeyGen_internal(d, z)        --> ml_kem.rs
// Algorithm 17 ML-KEM.Encaps_internal(ek, m)       --> ml_kem.rs
// Algorithm 18 ML-KEM.Decaps_internal(dk, c)       --> ml_kem.rs
// Algorithm 19 ML-KEM.KeyGen()                     --> ml_kem.rs
// Algorithm 20 ML-KEM.Encaps(ek)                   --> ml_kem.rs
// Algorithm 21 ML-KEM.Decaps(dk, c)                --> ml_kem.rs
// PRF, XOF, and the hash functions G, H, J         --> helpers.rs
// Compress_d and Decompress_d                      --> helpers.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them to the shared functionality in ml_kem.rs. Generics are
// constrained to storage allocation (e.g. `[0u8; EK_LEN]`, where arithmetic
// expressions are not allowed); the remaining security parameters travel as
// ordinary function arguments.

use crate::traits::SerDes;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

mod byte_fns;
mod errors;
mod helpers;
mod k_pke;
mod ml_kem;
mod ntt;
mod sampling;
mod types;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

pub use crate::errors::KemError;

/// The `rand_core` types are re-exported so that consumers need not track the
/// exact version of the `rand_core` dependency themselves.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

// Relevant to all parameter sets
const _N: u32 = 256;
const Q: u32 = 3329;
const ZETA: u32 = 17;

/// Shared secret length for all ML-KEM parameter sets (in bytes)
pub const SSK_LEN: usize = 32;

/// The 32-byte shared secret established by the KEM; can be de/serialized by
/// each party. Contents are zeroized on drop, and equality is constant-time.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey(pub(crate) [u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, KemError> {
        // No validation opportunity today; a Result keeps the signature
        // uniform across the SerDes types
        Ok(SharedSecretKey(ssk))
    }
}

impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool { bool::from(self.0.ct_eq(&other.0)) }
}

impl Eq for SharedSecretKey {}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        // Rust does not (yet) allow arithmetic on generic constants, so the
        // derived sizes are spelled out here
        const ETA1_64: usize = ETA1 as usize * 64;
        const ETA2_64: usize = ETA2 as usize * 64;

        use crate::byte_fns::{byte_decode, byte_encode};
        use crate::errors::KemError;
        use crate::helpers::{ensure, h};
        use crate::ml_kem::{ml_kem_decaps, ml_kem_encaps, ml_kem_key_gen, ml_kem_key_gen_internal};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized encapsulation key specific to the target parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to the target parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to the target parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Marker type carrying the key-generation functionality of this
        /// parameter set; all behavior arrives through the `KeyGen` trait.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), KemError> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                ml_kem_key_gen::<K, ETA1_64>(rng, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn keygen_from_seed(mut d: [u8; 32], mut z: [u8; 32]) -> (EncapsKey, DecapsKey) {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                ml_kem_key_gen_internal::<K, ETA1_64>(&d, &z, &mut ek, &mut dk)
                    .expect("canonical coefficients always encode");
                d.zeroize();
                z.zeroize();
                (EncapsKey(ek), DecapsKey(dk))
            }

            fn validate_keypair_vartime(ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray) -> bool {
                let p1 = 384 * K;
                let p2 = p1 + EK_LEN;
                (dk[p1..p2] == ek[..]) & (h(ek) == dk[p2..p2 + 32])
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(SharedSecretKey, CipherText), KemError> {
                let mut ct = [0u8; CT_LEN];
                let ssk =
                    ml_kem_encaps::<K, ETA1_64, ETA2_64>(rng, DU, DV, &self.0, &mut ct)?;
                Ok((ssk, CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, KemError> {
                ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &self.0, &ct.0)
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, KemError> {
                // modulus check: each 12-bit block must already be canonical,
                // i.e. decode then re-encode reproduces the input bytes. The
                // fixed-size array argument covers the length check.
                let mut pass = true;
                for i in 0..K {
                    let mut ek_tilde = [0u8; 384];
                    let ek_hat = byte_decode(12, &ek[384 * i..384 * (i + 1)]);
                    byte_encode(12, &ek_hat, &mut ek_tilde)?;
                    pass &= ek_tilde == ek[384 * i..384 * (i + 1)];
                }
                ensure!(pass, KemError::InvalidKey);
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, KemError> {
                // hash check on the embedded encaps key, plus its modulus
                // check; the fixed-size array argument covers the length check
                let ek = &dk[384 * K..768 * K + 32];
                let mut pass = true;
                for i in 0..K {
                    let mut ek_tilde = [0u8; 384];
                    let ek_hat = byte_decode(12, &ek[384 * i..384 * (i + 1)]);
                    byte_encode(12, &ek_hat, &mut ek_tilde)?;
                    pass &= ek_tilde == ek[384 * i..384 * (i + 1)];
                }
                pass &= h(ek) == dk[768 * K + 32..768 * K + 64];
                ensure!(pass, KemError::InvalidKey);
                Ok(DecapsKey(dk))
            }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, KemError> {
                // only the length is checked today, and the fixed-size array
                // argument covers it; a Result leaves room for the validation
                // rules to grow
                Ok(CipherText(ct))
            }
        }

        impl TryFrom<&[u8]> for EncapsKey {
            type Error = KemError;

            /// Accepts a byte slice, surfacing `InvalidKey` on a length mismatch.
            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let ba: [u8; EK_LEN] = bytes.try_into().map_err(|_| KemError::InvalidKey)?;
                Self::try_from_bytes(ba)
            }
        }

        impl TryFrom<&[u8]> for DecapsKey {
            type Error = KemError;

            /// Accepts a byte slice, surfacing `InvalidKey` on a length mismatch.
            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let ba: [u8; DK_LEN] = bytes.try_into().map_err(|_| KemError::InvalidKey)?;
                Self::try_from_bytes(ba)
            }
        }

        impl TryFrom<&[u8]> for CipherText {
            type Error = KemError;

            /// Accepts a byte slice, surfacing `InvalidCiphertext` on a length mismatch.
            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let ba: [u8; CT_LEN] =
                    bytes.try_into().map_err(|_| KemError::InvalidCiphertext)?;
                Self::try_from_bytes(ba)
            }
        }
    };
}


/// Functionality for the ML-KEM-512 parameter set (claimed security category 1).
#[cfg(feature = "ml-kem-512")]
pub mod ml_kem_512 {
    //! Typical flow: the originator runs `KG::try_keygen()` and serializes the
    //! encaps key for the remote party; the remote party deserializes it with
    //! `EncapsKey::try_from_bytes()` and runs `try_encaps()` to obtain the
    //! shared secret and a ciphertext; the originator deserializes the
    //! ciphertext and runs `try_decaps()` to recover the same shared secret.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length (in bytes)
    pub const EK_LEN: usize = 800;
    /// Serialized decapsulation key length (in bytes)
    pub const DK_LEN: usize = 1632;
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for the ML-KEM-768 parameter set (claimed security category 3).
#[cfg(feature = "ml-kem-768")]
pub mod ml_kem_768 {
    //! Typical flow: the originator runs `KG::try_keygen()` and serializes the
    //! encaps key for the remote party; the remote party deserializes it with
    //! `EncapsKey::try_from_bytes()` and runs `try_encaps()` to obtain the
    //! shared secret and a ciphertext; the originator deserializes the
    //! ciphertext and runs `try_decaps()` to recover the same shared secret.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized encapsulation key length (in bytes)
    pub const EK_LEN: usize = 1184;
    /// Serialized decapsulation key length (in bytes)
    pub const DK_LEN: usize = 2400;
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for the ML-KEM-1024 parameter set (claimed security category 5).
#[cfg(feature = "ml-kem-1024")]
pub mod ml_kem_1024 {
    //! Typical flow: the originator runs `KG::try_keygen()` and serializes the
    //! encaps key for the remote party; the remote party deserializes it with
    //! `EncapsKey::try_from_bytes()` and runs `try_encaps()` to obtain the
    //! shared secret and a ciphertext; the originator deserializes the
    //! ciphertext and runs `try_decaps()` to recover the same shared secret.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized encapsulation key length (in bytes)
    pub const EK_LEN: usize = 1568;
    /// Serialized decapsulation key length (in bytes)
    pub const DK_LEN: usize = 3168;
    /// Serialized ciphertext length (in bytes)
    pub const CT_LEN: usize = 1568;

    functionality!();
}
