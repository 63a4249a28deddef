use std::fmt;

/// Candidate digits 1-9 packed into the low 9 bits of a `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSet(u16);

impl DigitSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111_1111);

    pub fn single(digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit), "invalid digit: {digit}");
        Self(1 << (digit - 1))
    }

    pub fn contains(self, digit: u8) -> bool {
        self.0 & (1 << (digit - 1)) != 0
    }

    /// Copy of `self` without `digit`.
    pub fn removed(self, digit: u8) -> Self {
        Self(self.0 & !(1 << (digit - 1)))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The digit if the set is solved down to one member.
    pub fn as_single(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    /// Digits in increasing order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=9).filter(move |&digit| self.contains(digit))
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<T: IntoIterator<Item = u8>>(digits: T) -> Self {
        digits
            .into_iter()
            .fold(Self::EMPTY, |set, digit| Self(set.0 | Self::single(digit).0))
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.iter() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}
