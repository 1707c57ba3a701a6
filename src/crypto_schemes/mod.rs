pub mod bigint;
pub mod weierstrass;

use crate::data::Ballot;
use crate::error::CryptoError;

/// Curve/group primitive the election consumes. Reconstructs a public-key
/// point from raw coordinate bytes and encrypts a vote under that key.
pub trait Curve {
    type Point: Clone;

    /// Rebuilds a point from canonical big-endian coordinate bytes.
    fn point(&self, x: &[u8], y: &[u8]) -> Result<Self::Point, CryptoError>;

    /// Encrypts one vote under the election key, producing an opaque ballot.
    fn encrypt(&self, key: &Self::Point, vote: &[u8]) -> Result<Ballot, CryptoError>;
}
