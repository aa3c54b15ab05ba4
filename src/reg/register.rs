use super::{Access, BitField, FieldAccess, ReadWrite, Readable, RegWord, Writable};
use core::cell::Cell;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::{read_volatile, write_volatile};

/// Memory-mapped register with an in-memory shadow of its value.
///
/// Field views returned by [`field`](Register::field) edit the shadow only.
/// The hardware is touched exclusively by [`commit`](Register::commit) (one
/// volatile store) and [`fetch`](Register::fetch) (one volatile load).
///
/// The shadow is a plain [`Cell`], so a `Register` is `Send` but not `Sync`.
/// A register shared between execution contexts (threads, interrupt
/// handlers) must be guarded by the caller for the whole fetch-edit-commit
/// sequence, otherwise edits staged in one context are overwritten by a
/// commit from another.
pub struct Register<W: RegWord, A: Access = ReadWrite> {
    address: usize,
    shadow: Cell<W>,
    reset: W,
    _access: PhantomData<A>,
}

impl<W: RegWord, A: Access> Register<W, A> {
    /// Creates a register at `address` with a zero shadow.
    ///
    /// # Safety
    ///
    /// * `address` must point to a register of type `W`, properly aligned,
    ///   for the whole lifetime of the returned value.
    /// * Volatile loads (if `A` is [`Readable`]) and stores (if `A` is
    ///   [`Writable`]) of the register must be sound at any time.
    #[inline]
    pub const unsafe fn new(address: usize) -> Self {
        Self::with_reset(address, W::ZERO)
    }

    /// Creates a register at `address` with the shadow set to `reset`.
    ///
    /// # Safety
    ///
    /// See [`new`](Register::new).
    #[inline]
    pub const unsafe fn with_reset(address: usize, reset: W) -> Self {
        Self { address, shadow: Cell::new(reset), reset, _access: PhantomData }
    }

    /// Returns the memory address of the register.
    #[inline]
    pub fn address(&self) -> usize {
        self.address
    }

    /// Returns the current shadow value.
    #[inline]
    pub fn shadow(&self) -> W {
        self.shadow.get()
    }

    /// Replaces the whole shadow value.
    #[inline]
    pub fn set_shadow(&self, value: W) -> &Self {
        self.shadow.set(value);
        self
    }

    /// Returns the value the shadow was created with.
    #[inline]
    pub fn reset_value(&self) -> W {
        self.reset
    }

    /// Restores the shadow to the reset value. The hardware is not touched.
    #[inline]
    pub fn reset(&self) -> &Self {
        self.set_shadow(self.reset)
    }

    /// Returns a view of `WIDTH` bits at `OFFSET` of this register.
    ///
    /// Any number of views may coexist; they all edit this register's shadow.
    #[inline]
    pub fn field<const OFFSET: usize, const WIDTH: usize>(
        &self,
    ) -> BitField<'_, W, A, OFFSET, WIDTH> {
        BitField::new(self)
    }

    /// Returns a view of `WIDTH` bits at `OFFSET` with a narrower access tag
    /// `F`, for example read-only status bits of a read-write register.
    ///
    /// ```compile_fail
    /// use regshadow::reg::prelude::*;
    /// let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    /// reg.field_with::<ReadOnly, 0, 1>().set();
    /// ```
    #[inline]
    pub fn field_with<F: FieldAccess<A>, const OFFSET: usize, const WIDTH: usize>(
        &self,
    ) -> BitField<'_, W, A, OFFSET, WIDTH, F> {
        BitField::new(self)
    }

    #[inline]
    pub(crate) fn update(&self, f: impl FnOnce(W) -> W) {
        self.shadow.set(f(self.shadow.get()));
    }
}

impl<W: RegWord, A: Writable> Register<W, A> {
    /// Writes the shadow value to the register's memory address.
    #[inline]
    pub fn commit(&self) {
        unsafe { write_volatile(self.address as *mut W, self.shadow.get()) };
    }
}

impl<W: RegWord, A: Readable> Register<W, A> {
    /// Reads the register's memory address into the shadow value.
    #[inline]
    pub fn fetch(&self) -> &Self {
        self.shadow.set(unsafe { read_volatile(self.address as *const W) });
        self
    }
}

impl<W: RegWord, A: Readable + Writable> Register<W, A> {
    /// Fetches the register, passes it to `f`, then commits the result.
    #[inline]
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&Self),
    {
        self.fetch();
        f(self);
        self.commit();
    }
}

impl<W: RegWord, A: Access> fmt::Debug for Register<W, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("address", &format_args!("{:#x}", self.address))
            .field("shadow", &format_args!("{:#x}", self.shadow.get()))
            .finish()
    }
}
