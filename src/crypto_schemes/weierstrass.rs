//! Default curve implementation: the NIST P-256 group in affine
//! coordinates, with hashed-ElGamal ballot encryption on top.

use hex_literal::hex;
use num_bigint::{BigUint, RandBigInt};
use rand::thread_rng;
use sha2::{Digest, Sha256};

use super::bigint::{ModSub, UsefulConstants};
use super::Curve;
use crate::data::Ballot;
use crate::error::CryptoError;

const COORD_LEN: usize = 32;

const P: [u8; 32] = hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
const A: [u8; 32] = hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc");
const B: [u8; 32] = hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
const N: [u8; 32] = hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
const GX: [u8; 32] = hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
const GY: [u8; 32] = hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");

/// Affine curve point. The point at infinity is represented as `None`
/// inside the group operations and never escapes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    x: BigUint,
    y: BigUint,
}

impl Point {
    /// Canonical big-endian X coordinate, zero-padded to 32 bytes.
    pub fn x_bytes(&self) -> Vec<u8> {
        pad(&self.x)
    }

    /// Canonical big-endian Y coordinate, zero-padded to 32 bytes.
    pub fn y_bytes(&self) -> Vec<u8> {
        pad(&self.y)
    }
}

fn pad(value: &BigUint) -> Vec<u8> {
    let raw = value.to_bytes_be();
    let mut out = vec![0u8; COORD_LEN.saturating_sub(raw.len())];
    out.extend(raw);
    out
}

/// Short Weierstrass curve y² = x³ + ax + b over a prime field.
pub struct PrimeCurve {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    n: BigUint,
    g: Point,
}

impl PrimeCurve {
    pub fn p256() -> Self {
        PrimeCurve {
            p: BigUint::from_bytes_be(&P),
            a: BigUint::from_bytes_be(&A),
            b: BigUint::from_bytes_be(&B),
            n: BigUint::from_bytes_be(&N),
            g: Point {
                x: BigUint::from_bytes_be(&GX),
                y: BigUint::from_bytes_be(&GY),
            },
        }
    }

    pub fn generator(&self) -> &Point {
        &self.g
    }

    fn is_on_curve(&self, point: &Point) -> bool {
        let p = &self.p;
        let lhs = point.y.modpow(&BigUint::two(), p);
        let rhs = (point.x.modpow(&BigUint::three(), p) + &self.a * &point.x % p + &self.b) % p;
        lhs == rhs
    }

    fn add(&self, lhs: &Point, rhs: &Point) -> Option<Point> {
        if lhs.x == rhs.x {
            if lhs.y != rhs.y {
                return None;
            }
            return self.double(lhs);
        }
        let p = &self.p;
        let slope = rhs.y.modsub(&lhs.y, p) * rhs.x.modsub(&lhs.x, p).modinv(p)? % p;
        Some(self.apply_slope(&slope, lhs, rhs))
    }

    fn double(&self, point: &Point) -> Option<Point> {
        let p = &self.p;
        if point.y == BigUint::zero() {
            return None;
        }
        let numerator = (BigUint::three() * point.x.modpow(&BigUint::two(), p) + &self.a) % p;
        let slope = numerator * (BigUint::two() * &point.y % p).modinv(p)? % p;
        Some(self.apply_slope(&slope, point, point))
    }

    fn apply_slope(&self, slope: &BigUint, lhs: &Point, rhs: &Point) -> Point {
        let p = &self.p;
        let x = slope.modpow(&BigUint::two(), p).modsub(&lhs.x, p).modsub(&rhs.x, p);
        let y = (slope * lhs.x.modsub(&x, p) % p).modsub(&lhs.y, p);
        Point { x, y }
    }

    /// Double-and-add. Returns `None` only for the point at infinity.
    fn scalar_mul(&self, k: &BigUint, point: &Point) -> Option<Point> {
        let mut acc: Option<Point> = None;
        for i in (0..k.bits()).rev() {
            acc = match acc {
                Some(value) => self.double(&value),
                None => None,
            };
            if k.bit(i) {
                acc = match acc {
                    Some(value) => self.add(&value, point),
                    None => Some(point.clone()),
                };
            }
        }
        acc
    }
}

impl Curve for PrimeCurve {
    type Point = Point;

    fn point(&self, x: &[u8], y: &[u8]) -> Result<Point, CryptoError> {
        if x.is_empty() || y.is_empty() || x.len() > COORD_LEN || y.len() > COORD_LEN {
            return Err(CryptoError::MalformedPoint);
        }
        let point = Point {
            x: BigUint::from_bytes_be(x),
            y: BigUint::from_bytes_be(y),
        };
        if point.x >= self.p || point.y >= self.p {
            return Err(CryptoError::MalformedPoint);
        }
        if !self.is_on_curve(&point) {
            return Err(CryptoError::NotOnCurve);
        }
        Ok(point)
    }

    fn encrypt(&self, key: &Point, vote: &[u8]) -> Result<Ballot, CryptoError> {
        let mut rng = thread_rng();
        let k = rng.gen_biguint_range(&BigUint::one(), &self.n);
        let ephemeral = self
            .scalar_mul(&k, &self.g)
            .ok_or(CryptoError::InfinitePoint)?;
        let shared = self.scalar_mul(&k, key).ok_or(CryptoError::InfinitePoint)?;

        let mut data = Vec::with_capacity(2 * COORD_LEN + vote.len());
        data.extend(ephemeral.x_bytes());
        data.extend(ephemeral.y_bytes());
        data.extend(mask(&shared, vote));
        Ok(Ballot(data))
    }
}

/// Hashed-ElGamal keystream: SHA-256 over the shared point and a counter,
/// XORed into the vote bytes.
fn mask(shared: &Point, vote: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vote.len());
    let mut counter = 0u32;
    while out.len() < vote.len() {
        let mut hasher = Sha256::new();
        hasher.update(shared.x_bytes());
        hasher.update(shared.y_bytes());
        hasher.update(counter.to_be_bytes());
        for byte in hasher.finalize() {
            if out.len() == vote.len() {
                break;
            }
            out.push(vote[out.len()] ^ byte);
        }
        counter += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_lies_on_the_curve() {
        let curve = PrimeCurve::p256();
        assert!(curve.is_on_curve(curve.generator()));
    }

    #[test]
    fn point_accepts_generator_coordinates() {
        let curve = PrimeCurve::p256();
        let point = curve.point(&GX, &GY).unwrap();
        assert_eq!(&point, curve.generator());
    }

    #[test]
    fn point_rejects_coordinates_off_the_curve() {
        let curve = PrimeCurve::p256();
        let mut y = GY;
        y[31] ^= 1;
        assert!(matches!(
            curve.point(&GX, &y),
            Err(CryptoError::NotOnCurve)
        ));
    }

    #[test]
    fn point_rejects_oversized_coordinates() {
        let curve = PrimeCurve::p256();
        assert!(matches!(
            curve.point(&[0xff; 33], &GY),
            Err(CryptoError::MalformedPoint)
        ));
        assert!(matches!(
            curve.point(&[], &GY),
            Err(CryptoError::MalformedPoint)
        ));
    }

    #[test]
    fn scalar_multiples_stay_on_the_curve() {
        let curve = PrimeCurve::p256();
        let two_g = curve
            .scalar_mul(&BigUint::two(), curve.generator())
            .unwrap();
        let doubled = curve.double(curve.generator()).unwrap();
        assert_eq!(two_g, doubled);
        assert!(curve.is_on_curve(&two_g));

        let five = BigUint::from(5u8);
        let five_g = curve.scalar_mul(&five, curve.generator()).unwrap();
        assert!(curve.is_on_curve(&five_g));
        // 5G = 2G + 2G + G
        let four_g = curve.double(&two_g).unwrap();
        assert_eq!(curve.add(&four_g, curve.generator()).unwrap(), five_g);
    }

    #[test]
    fn encrypt_embeds_an_ephemeral_point() {
        let curve = PrimeCurve::p256();
        let key = curve
            .scalar_mul(&BigUint::from(42u8), curve.generator())
            .unwrap();

        let ballot = curve.encrypt(&key, b"alice").unwrap();
        assert_eq!(ballot.as_bytes().len(), 64 + 5);

        let (c1x, rest) = ballot.as_bytes().split_at(32);
        let (c1y, _) = rest.split_at(32);
        let ephemeral = curve.point(c1x, c1y).unwrap();
        assert!(curve.is_on_curve(&ephemeral));

        // Fresh randomness per ballot.
        let again = curve.encrypt(&key, b"alice").unwrap();
        assert_ne!(ballot, again);
    }
}
