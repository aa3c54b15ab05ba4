//! Memory-mapped registers.
//!
//! # Registers and Fields
//!
//! A [`Register`] is bound to a fixed memory address and keeps a shadow copy
//! of the register value. [`BitField`] views borrow the register and edit
//! ranges of the shadow. The hardware is accessed only by
//! [`Register::commit`] and [`Register::fetch`], each of which is exactly one
//! volatile store or load of the register word, without any memory barrier.
//!
//! ```
//! use regshadow::reg::prelude::*;
//!
//! let mut mem = 0_u32;
//! let reg = unsafe { Register::<u32>::new(&mut mem as *mut u32 as usize) };
//! let a = reg.field::<2, 3>();
//! let b = reg.field::<5, 1>();
//! a.write(5);
//! b.set();
//! reg.commit();
//!
//! let fresh = unsafe { Register::<u32, ReadOnly>::new(reg.address()) };
//! assert_eq!(fresh.fetch().shadow(), 5 << 2 | 1 << 5);
//! assert_eq!(fresh.field::<2, 3>().get(), 5);
//! assert!(fresh.field::<5, 1>().is_set());
//! ```
//!
//! # Mappings
//!
//! Register blocks are declared with [`map!`]. Every register gets its own
//! type with one accessor per field, and the block type places the registers
//! at `base + offset`.
//!
//! ```
//! use regshadow::reg::prelude::*;
//!
//! regshadow::reg::map! {
//!     /// Universal asynchronous receiver-transmitter.
//!     pub mod UART;
//!
//!     /// Control register.
//!     CTRL { 0x00 32 0x0000_0000 RReg WReg;
//!         /// Peripheral enable.
//!         EN { 0 1 }
//!         /// Clock prescaler.
//!         PRESCALE { 2 3 }
//!     }
//!
//!     /// Status register.
//!     STATUS { 0x04 32 0x0000_0000 RReg;
//!         /// Transfer in progress.
//!         BUSY { 0 1 }
//!     }
//! }
//!
//! let mut mem = [0_u32; 2];
//! let uart = unsafe { uart::Uart::new(mem.as_mut_ptr() as usize) };
//! uart.ctrl.en().set();
//! uart.ctrl.prescale().write(0b101);
//! uart.ctrl.commit();
//! let raw = unsafe { core::ptr::read_volatile(uart.ctrl.address() as *const u32) };
//! assert_eq!(raw, 0b1_0101);
//! assert!(!uart.status.fetch().busy().is_set());
//! ```
//!
//! # Sharing
//!
//! A register is `Send` but not `Sync`: the shadow is not synchronized, and a
//! commit from one context would overwrite edits staged by another. Registers
//! declared for the whole program lifetime are put behind a lock of the
//! caller's choice:
//!
//! ```
//! use std::sync::Mutex;
//!
//! regshadow::reg::map! {
//!     /// General purpose timer.
//!     pub mod TIM;
//!
//!     /// Counter.
//!     CNT { 0x24 32 0x0000_0000 RReg WReg;
//!         /// Counter value.
//!         VALUE { 0 16 }
//!     }
//! }
//!
//! static TIM: Mutex<tim::Tim> = Mutex::new(unsafe { tim::Tim::new(0x4000_0000) });
//!
//! let tim = TIM.lock().unwrap();
//! assert_eq!(tim.cnt.address(), 0x4000_0024);
//! tim.cnt.value().write(42);
//! assert_eq!(tim.cnt.value().get(), 42);
//! ```

pub mod prelude;

mod access;
mod field;
mod register;
mod word;

pub use self::access::{
    Access, FieldAccess, ReadOnly, ReadWrite, Readable, WriteOnly, Writable,
};
pub use self::field::{BitField, MultiBit, Width};
pub use self::register::Register;
pub use self::word::RegWord;
pub use regshadow_macros::reg_map as map;

mod compile_tests {
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<0, 3>().set();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<0, 3>().toggle();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<0, 2>().write_bool(true);
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! let _ = reg.field::<0, 4>().is_set();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<7, 1>().write(1);
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! let _ = reg.field::<7, 1>().get();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<7, 1>().bit_mask(1, 0);
    //! ```
    //!
    //! ```
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<0, 1>().set().toggle().write_bool(true).reset();
    //! let _ = reg.field::<0, 1>().is_set();
    //! reg.field::<1, 31>().write(1).bit_mask(1, 3).clear();
    //! let _ = reg.field::<1, 31>().get();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field::<0, 33>().clear();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u8>::new(0x4000_0000) };
    //! reg.field::<6, 3>().clear();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u16>::new(0x4000_0000) };
    //! reg.field::<4, 0>().clear();
    //! ```
    //!
    //! ```
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u8>::new(0x4000_0000) };
    //! reg.field::<0, 8>().clear();
    //! reg.field::<7, 1>().clear();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, ReadOnly>::new(0x4000_0000) };
    //! reg.commit();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, ReadOnly>::new(0x4000_0000) };
    //! reg.field::<3, 1>().set();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, ReadOnly>::new(0x4000_0000) };
    //! reg.field::<3, 4>().write(2);
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, WriteOnly>::new(0x4000_0000) };
    //! reg.fetch();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, WriteOnly>::new(0x4000_0000) };
    //! let _ = reg.field::<3, 4>().get();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, WriteOnly>::new(0x4000_0000) };
    //! reg.modify(|_| {});
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! fn assert_sync<T: Sync>() {}
    //! assert_sync::<Register<u32>>();
    //! ```
    //!
    //! ```
    //! use regshadow::reg::prelude::*;
    //! fn assert_send<T: Send>() {}
    //! assert_send::<Register<u32>>();
    //! assert_send::<Register<u64, ReadOnly>>();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let field;
    //! {
    //!     let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //!     field = reg.field::<0, 1>();
    //! }
    //! field.set();
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg;
    //!         BAZ { 0 1 }
    //!     }
    //! }
    //! let foo = unsafe { foo::Foo::new(0x4000_0000) };
    //! foo.bar.baz().set();
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg WReg;
    //!         BAZ { 0 4 }
    //!         QUX { 3 2 }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 16 0 RReg WReg;
    //!         BAZ { 12 8 }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x02 32 0 RReg WReg;
    //!         BAZ { 0 1 }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 24 0 RReg WReg;
    //!         BAZ { 0 1 }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! reg.field_with::<ReadOnly, 4, 4>().write(1);
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! let _ = reg.field_with::<WriteOnly, 4, 1>().is_set();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, ReadOnly>::new(0x4000_0000) };
    //! reg.field_with::<ReadWrite, 0, 1>();
    //! ```
    //!
    //! ```compile_fail
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32, WriteOnly>::new(0x4000_0000) };
    //! reg.field_with::<ReadOnly, 0, 1>();
    //! ```
    //!
    //! ```no_run
    //! use regshadow::reg::prelude::*;
    //! let reg = unsafe { Register::<u32>::new(0x4000_0000) };
    //! let _ = reg.field_with::<ReadOnly, 4, 4>().get();
    //! reg.field_with::<WriteOnly, 8, 1>().set();
    //! reg.field_with::<ReadOnly, 0, 1>().commit();
    //! let reg = unsafe { Register::<u32, ReadOnly>::new(0x4000_0000) };
    //! let _ = reg.field_with::<ReadOnly, 0, 1>().is_set();
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg WReg;
    //!         STAT { 0 1 RReg }
    //!     }
    //! }
    //! let foo = unsafe { foo::Foo::new(0x4000_0000) };
    //! foo.bar.stat().set();
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg WReg;
    //!         KEY { 0 8 WReg }
    //!     }
    //! }
    //! let foo = unsafe { foo::Foo::new(0x4000_0000) };
    //! let _ = foo.bar.key().get();
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg;
    //!         KEY { 0 8 WReg }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0xFF RReg WReg;
    //!         RESET { 0 1 }
    //!     }
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! regshadow::reg::map! {
    //!     pub mod FOO;
    //!     BAR { 0x00 32 0 RReg WReg;
    //!         ADDRESS { 4 4 }
    //!     }
    //! }
    //! ```
}
