//! Exact integer fractions for just-intonation scale construction.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ratio_to_cents;

/// A positive rational number kept as an exact numerator/denominator pair.
///
/// Scale generation works on these instead of floats so that transposition,
/// period reduction and deduplication stay bit-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub num: u64,
    pub den: u64,
}

impl Fraction {
    pub fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    /// Size of this ratio as an interval in cents.
    pub fn cents(&self) -> f64 {
        ratio_to_cents(self.den as f64, self.num as f64)
    }

    /// Reduce by the Euclidean GCD of numerator and denominator.
    pub fn simplified(&self) -> Self {
        let mut a = self.num;
        let mut b = self.den;
        while b != 0 {
            let c = a % b;
            a = b;
            b = c;
        }
        Self {
            num: self.num / a,
            den: self.den / a,
        }
    }

    /// Fold into `[0, period_cents)` by repeated multiplication/division
    /// with the period ratio.
    pub fn period_reduced(&self, period: Fraction) -> Self {
        let period_cents = period.cents();
        let mut num = self.num;
        let mut den = self.den;
        let mut c = ratio_to_cents(den as f64, num as f64);
        while c < 0.0 || c >= period_cents {
            if c < 0.0 {
                num *= period.num;
                den *= period.den;
            } else {
                num *= period.den;
                den *= period.num;
            }
            c = ratio_to_cents(den as f64, num as f64);
        }
        Self { num, den }
    }

    /// Exact ordering by cross-multiplication; no float comparison involved.
    pub fn cross_cmp(&self, other: &Fraction) -> Ordering {
        let lhs = self.num as u128 * other.den as u128;
        let rhs = other.num as u128 * self.den as u128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_uses_gcd() {
        assert_eq!(Fraction::new(24, 16).simplified(), Fraction::new(3, 2));
        assert_eq!(Fraction::new(7, 4).simplified(), Fraction::new(7, 4));
        assert_eq!(Fraction::new(100, 100).simplified(), Fraction::new(1, 1));
    }

    #[test]
    fn period_reduce_folds_down() {
        let octave = Fraction::new(2, 1);
        // 9/2 is over two octaves up; reduced form is 9/8
        assert_eq!(
            Fraction::new(9, 2).period_reduced(octave).simplified(),
            Fraction::new(9, 8)
        );
    }

    #[test]
    fn period_reduce_folds_up() {
        let octave = Fraction::new(2, 1);
        // 3/8 is below the root; folds up to 3/2
        assert_eq!(
            Fraction::new(3, 8).period_reduced(octave).simplified(),
            Fraction::new(3, 2)
        );
    }

    #[test]
    fn period_reduce_with_tritave() {
        let tritave = Fraction::new(3, 1);
        let reduced = Fraction::new(1, 2).period_reduced(tritave);
        let cents = reduced.cents();
        assert!(
            cents >= 0.0 && cents < tritave.cents(),
            "3/1-reduced value {} out of range",
            cents
        );
    }

    #[test]
    fn cross_cmp_orders_without_floats() {
        let a = Fraction::new(5, 4);
        let b = Fraction::new(4, 3);
        assert_eq!(a.cross_cmp(&b), Ordering::Less);
        assert_eq!(b.cross_cmp(&a), Ordering::Greater);
        assert_eq!(a.cross_cmp(&Fraction::new(10, 8)), Ordering::Equal);
    }

    #[test]
    fn displays_as_slash_pair() {
        assert_eq!(Fraction::new(7, 4).to_string(), "7/4");
    }
}
