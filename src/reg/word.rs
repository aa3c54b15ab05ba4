use core::fmt::{Debug, LowerHex};
use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// Underlying integer of a [`Register`](super::Register).
///
/// The word type selects the width of the hardware access and of every mask
/// and shift computed for the register's fields.
pub trait RegWord
where
    Self: Sized
        + Copy
        + Default
        + Eq
        + Debug
        + LowerHex
        + Not<Output = Self>
        + BitAnd<Output = Self>
        + BitOr<Output = Self>
        + BitXor<Output = Self>
        + Shl<usize, Output = Self>
        + Shr<usize, Output = Self>,
{
    /// Width of the type in bits.
    const BITS: usize;

    /// All bits cleared.
    const ZERO: Self;

    /// All bits set.
    const MAX: Self;

    /// Returns the number of bits needed to represent `self`.
    fn bit_len(self) -> usize;
}

macro_rules! reg_word {
    ($($type:ty),*) => {
        $(
            impl RegWord for $type {
                const BITS: usize = <$type>::BITS as usize;
                const ZERO: Self = 0;
                const MAX: Self = <$type>::MAX;

                #[inline]
                fn bit_len(self) -> usize {
                    (<$type>::BITS - self.leading_zeros()) as usize
                }
            }
        )*
    };
}

reg_word!(u8, u16, u32, u64, usize);

/// Returns `width` low order ones. `width` must not exceed `W::BITS`.
#[inline]
pub(crate) fn low_mask<W: RegWord>(width: usize) -> W {
    if width >= W::BITS { W::MAX } else { !(W::MAX << width) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_mask_widths() {
        assert_eq!(low_mask::<u8>(0), 0);
        assert_eq!(low_mask::<u8>(1), 0b1);
        assert_eq!(low_mask::<u8>(7), 0x7F);
        assert_eq!(low_mask::<u8>(8), 0xFF);
        assert_eq!(low_mask::<u32>(10), (1 << 10) - 1);
        assert_eq!(low_mask::<u32>(32), u32::MAX);
        assert_eq!(low_mask::<u64>(63), u64::MAX >> 1);
        assert_eq!(low_mask::<u64>(64), u64::MAX);
    }

    #[test]
    fn bit_len() {
        assert_eq!(0_u32.bit_len(), 0);
        assert_eq!(1_u32.bit_len(), 1);
        assert_eq!(0b101_u16.bit_len(), 3);
        assert_eq!(0x80_u8.bit_len(), 8);
        assert_eq!(u64::MAX.bit_len(), 64);
    }

    #[test]
    fn word_bits() {
        assert_eq!(<u8 as RegWord>::BITS, 8);
        assert_eq!(<u16 as RegWord>::BITS, 16);
        assert_eq!(<u32 as RegWord>::BITS, 32);
        assert_eq!(<u64 as RegWord>::BITS, 64);
        assert_eq!(<usize as RegWord>::BITS, usize::BITS as usize);
    }
}
