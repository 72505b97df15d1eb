pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> Self;

    /// Returns `self / 2`, rounding halves up.
    fn half_round_up(self) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> Self {
        match self {
            0 | 1 => 0,
            n => (usize::BITS - (n - 1).leading_zeros()) as Self,
        }
    }

    #[inline]
    fn half_round_up(self) -> Self {
        (self + 1) / 2
    }
}
