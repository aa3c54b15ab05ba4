//! Procedural macros for regshadow.
//!
//! See `regshadow` documentation for details.

#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

mod reg_map;
mod unkeywordize;

use proc_macro::TokenStream;

#[proc_macro]
pub fn reg_map(input: TokenStream) -> TokenStream {
    reg_map::proc_macro(input)
}
