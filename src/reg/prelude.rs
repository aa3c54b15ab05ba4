//! Memory-mapped registers prelude.

pub use super::{
    Access, BitField, FieldAccess, MultiBit, ReadOnly, ReadWrite, Readable, RegWord, Register,
    Width, Writable, WriteOnly,
};
