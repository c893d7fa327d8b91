use crate::geometry::traits::RealNumber;

/// Per-vertex acoustic properties. A normalized attribute sums to one;
/// equality is exact, which makes it usable as a region-growing predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute<TScalar: RealNumber> {
    pub reflection: TScalar,
    pub transmission: TScalar,
    pub absorption: TScalar,
}

impl<TScalar: RealNumber> Attribute<TScalar> {
    pub fn new(reflection: TScalar, transmission: TScalar, absorption: TScalar) -> Self {
        Self {
            reflection,
            transmission,
            absorption,
        }
    }

    /// Fully absorbing material
    #[inline]
    pub fn solid() -> Self {
        Self::new(TScalar::zero(), TScalar::zero(), TScalar::one())
    }

    /// Fully transmitting material
    #[inline]
    pub fn air() -> Self {
        Self::new(TScalar::zero(), TScalar::one(), TScalar::zero())
    }

    #[inline]
    pub fn sum(&self) -> TScalar {
        self.reflection + self.transmission + self.absorption
    }

    /// Scales the triple so it sums to one. The all-zero attribute has no
    /// direction to scale towards and maps to [solid](Attribute::solid).
    pub fn normalized(&self) -> Self {
        let sum = self.sum();

        if sum.is_zero() {
            return Self::solid();
        }

        Self::new(
            self.reflection / sum,
            self.transmission / sum,
            self.absorption / sum,
        )
    }
}

impl<TScalar: RealNumber> Default for Attribute<TScalar> {
    #[inline]
    fn default() -> Self {
        Self::solid()
    }
}
