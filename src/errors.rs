use core::fmt;

/// Failure conditions surfaced by the ML-KEM API.
///
/// Note that decapsulation of a correct-length ciphertext never produces an
/// error: a ciphertext failing the re-encryption check is handled by implicit
/// rejection and still yields a 32-byte shared secret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KemError {
    /// An encapsulation or decapsulation key failed its length or modulus check.
    InvalidKey,
    /// A ciphertext length does not match the target parameter set.
    InvalidCiphertext,
    /// A coefficient handed to an encoder was out of range; this indicates a
    /// caller bug rather than a runtime condition on well-formed inputs.
    InvalidCoefficient,
    /// The supplied random number generator failed to deliver bytes.
    RngFailure,
}

impl fmt::Display for KemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => f.write_str("key failed length or modulus check"),
            Self::InvalidCiphertext => f.write_str("ciphertext length does not match parameter set"),
            Self::InvalidCoefficient => f.write_str("coefficient out of range for encoding"),
            Self::RngFailure => f.write_str("random number generator failed"),
        }
    }
}
