use num_bigint::BigUint;

pub trait UsefulConstants {
    type Output;
    fn zero() -> Self::Output;
    fn one() -> Self::Output;
    fn two() -> Self::Output;
    fn three() -> Self::Output;
}

impl UsefulConstants for BigUint {
    type Output = BigUint;
    fn zero() -> Self::Output {
        BigUint::from(0u8)
    }
    fn one() -> Self::Output {
        BigUint::from(1u8)
    }
    fn two() -> Self::Output {
        BigUint::from(2u8)
    }
    fn three() -> Self::Output {
        BigUint::from(3u8)
    }
}

pub trait ModSub {
    /// Field subtraction: (self - b) mod modulo, safe when self < b.
    fn modsub(&self, b: &BigUint, modulo: &BigUint) -> BigUint;
}

impl ModSub for BigUint {
    fn modsub(&self, b: &BigUint, modulo: &BigUint) -> BigUint {
        ((self % modulo) + modulo - (b % modulo)) % modulo
    }
}
