use super::word::low_mask;
use super::{Access, Readable, RegWord, Register, Writable};
use core::fmt;
use core::marker::PhantomData;

/// Compile-time width of a [`BitField`].
pub struct Width<const WIDTH: usize>;

/// Implemented for the widths of multiple-bits fields.
pub trait MultiBit {}

macro_rules! multi_bit {
    ($($width:literal)*) => {
        $(impl MultiBit for Width<$width> {})*
    };
}

multi_bit! {
    2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32 33
    34 35 36 37 38 39 40 41 42 43 44 45 46 47 48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64
}

/// View of `WIDTH` bits at `OFFSET` of a [`Register`]'s shadow.
///
/// A field never owns hardware state: every operation edits the shadow of the
/// borrowed register, so all views of one register observe each other's
/// pending edits. Nothing reaches the hardware until
/// [`commit`](BitField::commit), which flushes the whole register word.
///
/// The operation set depends on `WIDTH`:
///
/// * single-bit fields (`WIDTH == 1`) provide [`set`](BitField::set),
///   [`reset`](BitField::reset), [`toggle`](BitField::toggle),
///   [`write_bool`](BitField::write_bool) and [`is_set`](BitField::is_set);
/// * multiple-bits fields provide [`write`](BitField::write),
///   [`bit_mask`](BitField::bit_mask) and [`get`](BitField::get).
///
/// `A` is the access tag of the register and `F` the access tag of the field.
/// Reading and editing the field's bits follow `F`, while
/// [`commit`](BitField::commit) and [`fetch`](BitField::fetch) follow `A`.
///
/// A field that does not fit into the register word fails to build.
pub struct BitField<
    'a,
    W: RegWord,
    A: Access,
    const OFFSET: usize,
    const WIDTH: usize,
    F: Access = A,
> {
    reg: &'a Register<W, A>,
    _access: PhantomData<F>,
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Access>
    BitField<'a, W, A, OFFSET, WIDTH, F>
{
    const LAYOUT: () = assert!(
        WIDTH > 0 && OFFSET + WIDTH <= W::BITS,
        "bit field does not fit into the register word"
    );

    #[inline]
    pub(crate) fn new(reg: &'a Register<W, A>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LAYOUT;
        Self { reg, _access: PhantomData }
    }

    /// Returns the register this field belongs to.
    #[inline]
    pub fn register(&self) -> &'a Register<W, A> {
        self.reg
    }

    /// Bit position of the field's low bit.
    #[inline]
    pub fn offset(&self) -> usize {
        OFFSET
    }

    /// Number of bits in the field.
    #[inline]
    pub fn width(&self) -> usize {
        WIDTH
    }

    /// Returns the register word with exactly the field's bits set.
    #[inline]
    pub fn mask(&self) -> W {
        low_mask::<W>(WIDTH) << OFFSET
    }

    /// Returns the largest value the field can hold.
    #[inline]
    pub fn max(&self) -> W {
        low_mask(WIDTH)
    }

    /// Checks whether `value` fits into the field without truncation.
    #[inline]
    pub fn in_range(&self, value: W) -> bool {
        (value & !self.max()) == W::ZERO
    }

    #[inline]
    fn bits(&self) -> W {
        (self.reg.shadow() & self.mask()) >> OFFSET
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Writable>
    BitField<'a, W, A, OFFSET, WIDTH, F>
{
    /// Clears the field's bits in the shadow.
    #[inline]
    pub fn clear(&self) -> &Self {
        let mask = self.mask();
        self.reg.update(|shadow| shadow & !mask);
        self
    }
}

impl<'a, W: RegWord, A: Writable, const OFFSET: usize, const WIDTH: usize, F: Access>
    BitField<'a, W, A, OFFSET, WIDTH, F>
{
    /// Writes the whole register word, including pending edits of other
    /// fields.
    #[inline]
    pub fn commit(&self) {
        self.reg.commit();
    }
}

impl<'a, W: RegWord, A: Readable, const OFFSET: usize, const WIDTH: usize, F: Access>
    BitField<'a, W, A, OFFSET, WIDTH, F>
{
    /// Reads the whole register word into the shadow.
    #[inline]
    pub fn fetch(&self) -> &Self {
        self.reg.fetch();
        self
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, F: Writable>
    BitField<'a, W, A, OFFSET, 1, F>
{
    /// Sets the bit.
    #[inline]
    pub fn set(&self) -> &Self {
        let mask = self.mask();
        self.reg.update(|shadow| shadow | mask);
        self
    }

    /// Clears the bit.
    #[inline]
    pub fn reset(&self) -> &Self {
        self.clear()
    }

    /// Inverts the bit.
    #[inline]
    pub fn toggle(&self) -> &Self {
        let mask = self.mask();
        self.reg.update(|shadow| shadow ^ mask);
        self
    }

    /// Sets the bit if `value` is `true`, clears it otherwise.
    #[inline]
    pub fn write_bool(&self, value: bool) -> &Self {
        if value { self.set() } else { self.reset() }
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, F: Readable>
    BitField<'a, W, A, OFFSET, 1, F>
{
    /// Checks whether the bit is set in the shadow.
    #[inline]
    pub fn is_set(&self) -> bool {
        (self.reg.shadow() & self.mask()) == self.mask()
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Writable>
    BitField<'a, W, A, OFFSET, WIDTH, F>
where
    Width<WIDTH>: MultiBit,
{
    /// Replaces the field's bits with the low order bits of `value`. Bits of
    /// `value` above the field width are dropped.
    #[inline]
    pub fn write(&self, value: W) -> &Self {
        let mask = self.mask();
        self.reg.update(|shadow| (shadow & !mask) | ((value << OFFSET) & mask));
        self
    }

    /// Replaces a slice of the field starting `sub_offset` bits above the
    /// field's low bit. The slice is as wide as `value`'s significant bits,
    /// and at least one bit, so a zero `value` clears a single bit.
    ///
    /// Bits that would land outside the field are dropped; a `sub_offset`
    /// beyond the field width leaves the shadow unchanged.
    #[inline]
    pub fn bit_mask(&self, value: W, sub_offset: usize) -> &Self {
        if sub_offset >= WIDTH {
            return self;
        }
        let shift = OFFSET + sub_offset;
        let slice = (low_mask::<W>(value.bit_len().max(1)) << shift) & self.mask();
        self.reg.update(|shadow| (shadow & !slice) | ((value << shift) & slice));
        self
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Readable>
    BitField<'a, W, A, OFFSET, WIDTH, F>
where
    Width<WIDTH>: MultiBit,
{
    /// Returns the field's value from the shadow, aligned to bit zero.
    #[inline]
    pub fn get(&self) -> W {
        self.bits()
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Access> Clone
    for BitField<'a, W, A, OFFSET, WIDTH, F>
{
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Access> Copy
    for BitField<'a, W, A, OFFSET, WIDTH, F>
{
}

impl<'a, W: RegWord, A: Access, const OFFSET: usize, const WIDTH: usize, F: Access> fmt::Debug
    for BitField<'a, W, A, OFFSET, WIDTH, F>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.bits())
    }
}
