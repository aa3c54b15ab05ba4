#![allow(dead_code)]

use std::cell::UnsafeCell;
use std::ptr::{read_volatile, write_volatile};

/// Plain memory standing in for hardware registers.
pub struct Mem<T>(UnsafeCell<T>);

impl<T: Copy> Mem<T> {
    pub fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    pub fn address(&self) -> usize {
        self.0.get() as usize
    }

    pub fn get(&self) -> T {
        unsafe { read_volatile(self.0.get()) }
    }

    pub fn set(&self, value: T) {
        unsafe { write_volatile(self.0.get(), value) };
    }

    /// Loads a `U` at `offset` bytes from the start of the memory.
    pub fn load<U: Copy>(&self, offset: usize) -> U {
        assert!(offset + std::mem::size_of::<U>() <= std::mem::size_of::<T>());
        unsafe { read_volatile((self.address() + offset) as *const U) }
    }

    /// Stores a `U` at `offset` bytes from the start of the memory.
    pub fn store<U: Copy>(&self, offset: usize, value: U) {
        assert!(offset + std::mem::size_of::<U>() <= std::mem::size_of::<T>());
        unsafe { write_volatile((self.address() + offset) as *mut U, value) };
    }
}
