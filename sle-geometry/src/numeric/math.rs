//! Exact decimal arithmetic with an explicit number of significant digits.

use crate::errors::SleGeometryError;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Significant digits kept by values that were not given a precision explicitly.
pub const DEFAULT_PRECISION: u32 = 30;

/// Largest exponent magnitude accepted when parsing, well past the range of `f64`.
pub const MAX_EXPONENT: i64 = 1_000;

/// A decimal number `mantissa * 10^-scale`.
///
/// Every value carries the precision (in significant digits) it was created with.
/// Arithmetic rounds half-even to the larger precision of its two operands, so a
/// whole computation can be run at a chosen precision by building its inputs with
/// [`Decimal::with_precision`].
#[derive(Clone, Debug)]
pub struct Decimal {
    mantissa: BigInt,
    scale: i64,
    precision: u32,
}

fn ten_pow(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

fn digit_count(value: &BigInt) -> u64 {
    if value.is_zero() {
        return 1;
    }
    value.magnitude().to_string().len() as u64
}

/// Rounds a truncated `quotient` half-even, given the `remainder` of the division by
/// the positive `divisor`. `sticky` marks nonzero digits lost before this division.
fn round_half_even(
    quotient: BigInt,
    remainder: &BigInt,
    divisor: &BigInt,
    negative: bool,
    sticky: bool,
) -> BigInt {
    if remainder.is_zero() && !sticky {
        return quotient;
    }

    let twice = remainder.abs() * 2u32;
    let away_from_zero = match twice.cmp(divisor) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => sticky || quotient.is_odd(),
    };

    match (away_from_zero, negative) {
        (false, _) => quotient,
        (true, false) => quotient + 1u32,
        (true, true) => quotient - 1u32,
    }
}

/// Cuts `mantissa` down to at most `precision` significant digits.
fn round_significant(mantissa: BigInt, scale: i64, precision: u32, sticky: bool) -> (BigInt, i64) {
    let precision = u64::from(precision.max(1));
    let digits = digit_count(&mantissa);
    if digits <= precision {
        return (mantissa, scale);
    }

    let drop = digits - precision;
    let divisor = ten_pow(drop);
    let negative = mantissa.is_negative();
    let (quotient, remainder) = mantissa.div_rem(&divisor);
    let quotient = round_half_even(quotient, &remainder, &divisor, negative, sticky);
    let scale = scale - drop as i64;

    // 999.6 -> 1000 gains a digit; the extra one is a trailing zero
    if digit_count(&quotient) > precision {
        return (quotient / 10u32, scale - 1);
    }

    (quotient, scale)
}

impl Decimal {
    fn from_parts(mantissa: BigInt, scale: i64, precision: u32) -> Self {
        if mantissa.is_zero() {
            return Self {
                mantissa,
                scale: 0,
                precision,
            };
        }

        let (mantissa, scale) = round_significant(mantissa, scale, precision, false);
        Self {
            mantissa,
            scale,
            precision,
        }
    }

    /// Returns the same value re-rounded to `precision` significant digits (at least 1).
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::numeric::Decimal;
    /// let one = Decimal::from(1).with_precision(5);
    /// let third = one.checked_div(&Decimal::from(3).with_precision(5)).unwrap();
    /// assert_eq!(third.to_string(), "0.33333");
    /// ```
    pub fn with_precision(self, precision: u32) -> Self {
        Self::from_parts(self.mantissa, self.scale, precision.max(1))
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    fn combined_precision(&self, other: &Self) -> u32 {
        self.precision.max(other.precision)
    }

    /// Both mantissas brought to the larger of the two scales.
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i64) {
        let scale = self.scale.max(other.scale);
        let lhs = &self.mantissa * ten_pow((scale - self.scale) as u64);
        let rhs = &other.mantissa * ten_pow((scale - other.scale) as u64);
        (lhs, rhs, scale)
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        let (lhs_m, rhs_m, scale) = self.aligned(rhs);
        Self::from_parts(lhs_m + rhs_m, scale, self.combined_precision(rhs))
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        let (lhs_m, rhs_m, scale) = self.aligned(rhs);
        Self::from_parts(lhs_m - rhs_m, scale, self.combined_precision(rhs))
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        Self::from_parts(
            &self.mantissa * &rhs.mantissa,
            self.scale + rhs.scale,
            self.combined_precision(rhs),
        )
    }

    /// Computes `self / divisor` rounded to the combined precision.
    ///
    /// # Errors
    ///
    /// Returns `SleGeometryError::DivisionByZero` if `divisor` is exactly zero.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::numeric::Decimal;
    /// let a: Decimal = "-8.15".parse().unwrap();
    /// let b: Decimal = "2".parse().unwrap();
    /// assert_eq!(a.checked_div(&b).unwrap().to_string(), "-4.075");
    /// assert!(a.checked_div(&Decimal::from(0)).is_err());
    /// ```
    pub fn checked_div(&self, divisor: &Self) -> Result<Self, SleGeometryError> {
        if divisor.is_zero() {
            return Err(SleGeometryError::DivisionByZero(format!(
                "Cannot divide {} by zero",
                self
            )));
        }

        let precision = self.combined_precision(divisor);
        if self.is_zero() {
            return Ok(Self::from_parts(BigInt::zero(), 0, precision));
        }

        // Widen the dividend so the integer quotient has at least precision + 1 digits.
        let shift = (u64::from(precision) + digit_count(&divisor.mantissa) + 1)
            .saturating_sub(digit_count(&self.mantissa));
        let dividend = &self.mantissa * ten_pow(shift);
        let (quotient, remainder) = dividend.div_rem(&divisor.mantissa);
        let scale = self.scale - divisor.scale + shift as i64;

        let exact = remainder.is_zero();
        let (mut mantissa, mut scale) = round_significant(quotient, scale, precision, !exact);

        // exact quotients keep no more digits than the operands need
        let ideal_scale = self.scale - divisor.scale;
        while exact && scale > ideal_scale && (&mantissa % 10u32).is_zero() {
            mantissa /= 10u32;
            scale -= 1;
        }

        Ok(Self {
            mantissa,
            scale,
            precision,
        })
    }

    /// `1 / self`.
    pub fn recip(&self) -> Result<Self, SleGeometryError> {
        Self::one().with_precision(self.precision).checked_div(self)
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
            precision: self.precision,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }

    /// `-1`, `0` or `1`.
    pub fn signum(&self) -> Self {
        let sign = match self.mantissa.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        };
        Self::from_parts(BigInt::from(sign), 0, self.precision)
    }

    /// True iff `|self| < eps`.
    pub fn is_near_zero(&self, eps: f64) -> bool {
        self.abs().to_f64() < eps
    }

    pub fn is_integer(&self) -> bool {
        if self.scale <= 0 {
            return true;
        }
        (&self.mantissa % ten_pow(self.scale as u64)).is_zero()
    }

    /// Rounds half-even to `places` digits after the decimal point.
    ///
    /// # Example
    ///
    /// ```
    /// # use sle_geometry::numeric::Decimal;
    /// # use num_traits::Zero;
    /// let value: Decimal = "1.2345".parse().unwrap();
    /// assert_eq!(value.round_dp(3).to_string(), "1.234");
    /// let value: Decimal = "-0.0005".parse().unwrap();
    /// assert!(value.round_dp(3).is_zero());
    /// ```
    pub fn round_dp(&self, places: u32) -> Self {
        let places = i64::from(places);
        if self.scale <= places {
            return self.clone();
        }

        let divisor = ten_pow((self.scale - places) as u64);
        let (quotient, remainder) = self.mantissa.div_rem(&divisor);
        let mantissa = round_half_even(
            quotient,
            &remainder,
            &divisor,
            self.mantissa.is_negative(),
            false,
        );
        Self {
            scale: if mantissa.is_zero() { 0 } else { places },
            mantissa,
            precision: self.precision,
        }
    }

    /// Renders the value with exactly `places` digits after the decimal point.
    pub fn to_fixed(&self, places: u32) -> String {
        let rounded = self.round_dp(places);
        let places = i64::from(places);
        // rescale to exactly `places`
        let mantissa = if rounded.scale < places {
            &rounded.mantissa * ten_pow((places - rounded.scale) as u64)
        } else {
            rounded.mantissa
        };

        Self {
            mantissa,
            scale: places,
            precision: self.precision,
        }
        .to_string()
    }

    /// Nearest `f64`; only used where an inexact real is acceptable.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.mantissa, -self.scale)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }
}

impl Zero for Decimal {
    fn zero() -> Self {
        Self::from_parts(BigInt::zero(), 0, DEFAULT_PRECISION)
    }

    fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }
}

impl One for Decimal {
    fn one() -> Self {
        Self::from_parts(BigInt::one(), 0, DEFAULT_PRECISION)
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_parts(BigInt::from(value), 0, DEFAULT_PRECISION)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl TryFrom<f64> for Decimal {
    type Error = SleGeometryError;

    /// Uses the shortest decimal representation that round-trips to `value`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(SleGeometryError::InvalidArgument(format!(
                "Cannot represent {} as a decimal",
                value
            )));
        }
        format!("{:e}", value).parse()
    }
}

impl FromStr for Decimal {
    type Err = SleGeometryError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || SleGeometryError::ParseError(text.to_string());
        let trimmed = text.trim();

        let (body, exponent) = match trimmed.find(['e', 'E']) {
            Some(pos) => (
                &trimmed[..pos],
                trimmed[pos + 1..].parse::<i64>().map_err(|_| invalid())?,
            ),
            None => (trimmed, 0),
        };
        if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(invalid());
        }

        let (negative, unsigned) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body.strip_prefix('+').unwrap_or(body)),
        };

        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            mantissa = -mantissa;
        }

        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exponent))
            .ok_or_else(invalid)?;
        Ok(Self::from_parts(mantissa, scale, DEFAULT_PRECISION))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();

        if self.scale <= 0 {
            return write!(f, "{}{}{}", sign, digits, "0".repeat((-self.scale) as usize));
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident, $inner:ident) => {
        impl $imp<&Decimal> for &Decimal {
            type Output = Decimal;

            fn $method(self, rhs: &Decimal) -> Decimal {
                self.$inner(rhs)
            }
        }

        impl $imp<&Decimal> for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: &Decimal) -> Decimal {
                self.$inner(rhs)
            }
        }

        impl $imp for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                self.$inner(&rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantissa: -self.mantissa,
            scale: self.scale,
            precision: self.precision,
        }
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -self.clone()
    }
}

// Seeded with the first item so an empty default-precision zero never widens the result.
impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(mut iter: I) -> Self {
        match iter.next() {
            Some(first) => iter.fold(first, |acc, value| acc + value),
            None => Decimal::zero(),
        }
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(mut iter: I) -> Self {
        match iter.next() {
            Some(first) => iter.fold(first.clone(), |acc, value| acc + value),
            None => Decimal::zero(),
        }
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a string holding one")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        value.to_string().parse().map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        Decimal::try_from(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("1.6").to_string(), "1.6");
        assert_eq!(dec("-0.589").to_string(), "-0.589");
        assert_eq!(dec(".5").to_string(), "0.5");
        assert_eq!(dec("+12").to_string(), "12");
        assert_eq!(dec("1e-3").to_string(), "0.001");
        assert_eq!(dec("2.5E2").to_string(), "250");
        assert!("".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("abc".parse::<Decimal>().is_err());
        assert!("1e".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_exponents() {
        for text in ["1e-9223372036854775808", "1e9223372036854775807", "1e999999999", "-2.5e-1001"] {
            assert!(matches!(
                text.parse::<Decimal>(),
                Err(SleGeometryError::ParseError(_))
            ));
        }
        assert_eq!(dec("1e1000").to_string().len(), 1001);
        assert_eq!(dec("1e-1000").scale, 1000);
    }

    #[test]
    fn test_value_equality_ignores_representation() {
        assert_eq!(dec("1.0"), dec("1"));
        assert_eq!(dec("0.500"), dec(".5"));
        assert!(dec("-0.1") < dec("0"));
        assert!(dec("10") > dec("9.999"));
    }

    #[test]
    fn test_exact_arithmetic() {
        assert_eq!(dec("0.1") + dec("0.2"), dec("0.3"));
        assert_eq!(dec("5.862") * dec("-2"), dec("-11.724"));
        assert_eq!(dec("1") - dec("1.000"), Decimal::zero());
        assert_eq!(-dec("4.075"), dec("-4.075"));
    }

    #[test]
    fn test_division_rounds_to_precision() {
        let third = Decimal::one().checked_div(&Decimal::from(3)).unwrap();
        assert_eq!(third.to_string(), format!("0.{}", "3".repeat(30)));

        let two_thirds = Decimal::from(2).checked_div(&Decimal::from(3)).unwrap();
        assert_eq!(two_thirds.to_string(), format!("0.{}7", "6".repeat(29)));

        let negative = Decimal::from(-2).checked_div(&Decimal::from(3)).unwrap();
        assert_eq!(negative, -two_thirds);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            dec("1").checked_div(&Decimal::zero()),
            Err(SleGeometryError::DivisionByZero(_))
        ));
        assert!(Decimal::zero().recip().is_err());
    }

    #[test]
    fn test_precision_is_carried_by_values() {
        let a = Decimal::from(1).with_precision(4);
        let b = Decimal::from(7);
        assert_eq!(a.checked_div(&b).unwrap().precision(), DEFAULT_PRECISION);

        let c = Decimal::from(7).with_precision(4);
        assert_eq!(a.checked_div(&c).unwrap().to_string(), "0.1429");
        assert_eq!(dec("123456").with_precision(3).to_string(), "123000");
    }

    #[test]
    fn test_sum_keeps_operand_precision() {
        let values = [dec("0.33333"), dec("0.000001")].map(|d| d.with_precision(5));
        let total: Decimal = values.iter().sum();
        assert_eq!(total.precision(), 5);
        assert_eq!(total.to_string(), "0.33333");

        let owned: Decimal = values.into_iter().sum();
        assert_eq!(owned.precision(), 5);
        assert_eq!(Vec::<Decimal>::new().into_iter().sum::<Decimal>(), Decimal::zero());
    }

    #[test]
    fn test_half_even_rounding() {
        assert_eq!(dec("0.0125").round_dp(3), dec("0.012"));
        assert_eq!(dec("0.0135").round_dp(3), dec("0.014"));
        assert_eq!(dec("-1.3905").round_dp(3), dec("-1.390"));
        assert_eq!(dec("9.9996").round_dp(3), dec("10"));
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(dec("-1.39").to_fixed(3), "-1.390");
        assert_eq!(dec("0.0001").to_fixed(3), "0.000");
        assert_eq!(dec("7").to_fixed(3), "7.000");
    }

    #[test]
    fn test_near_zero_and_integer() {
        assert!(dec("1e-28").is_near_zero(1e-10));
        assert!(dec("-1e-11").is_near_zero(1e-10));
        assert!(!dec("1e-10").is_near_zero(1e-10));
        assert!(dec("3.000").is_integer());
        assert!(!dec("3.001").is_integer());
        assert_eq!(dec("-0.004").signum(), dec("-1"));
        assert_eq!(dec("0.000").signum(), Decimal::zero());
        assert_eq!(dec("12.5").signum(), Decimal::one());
    }

    #[test]
    fn test_f64_conversions() {
        let value = Decimal::try_from(0.25).unwrap();
        assert_eq!(value, dec("0.25"));
        assert!(Decimal::try_from(f64::NAN).is_err());
        assert_eq!(dec("-8.15").to_f64(), -8.15);
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let value = dec("-10.366");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"-10.366\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        let from_number: Decimal = serde_json::from_str("2").unwrap();
        assert_eq!(from_number, Decimal::from(2));
    }
}
