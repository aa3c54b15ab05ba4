//! Shadowed accessors for memory-mapped registers.
//!
//! A [`Register`](reg::Register) owns one hardware word and an in-memory
//! shadow of it. [`BitField`](reg::BitField) views edit ranges of that shadow,
//! and a single [`commit`](reg::Register::commit) flushes all pending edits
//! to the hardware in one store. Reading is symmetric: one
//! [`fetch`](reg::Register::fetch), then any number of field reads.
//!
//! ```
//! use regshadow::reg::prelude::*;
//!
//! let mut mem = 0_u32;
//! let ctrl = unsafe { Register::<u32>::new(&mut mem as *mut u32 as usize) };
//! ctrl.field::<0, 1>().set();
//! ctrl.field::<2, 3>().write(0b101);
//! ctrl.commit();
//! assert_eq!(unsafe { core::ptr::read_volatile(ctrl.address() as *const u32) }, 0b1_0101);
//! ```
//!
//! Register blocks are normally declared with [`reg::map!`], see the [`reg`]
//! module.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
#![no_std]

pub mod reg;
