use crate::unkeywordize::unkeywordize;
use inflector::Inflector;
use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::parse::{Parse, ParseStream, Result};
use syn::{braced, parse_macro_input, Attribute, Error, Ident, LitInt, Token, Visibility};

/// Methods of generated registers and of the `Register` they dereference to.
const RESERVED_FIELDS: &[&str] = &[
    "new",
    "with_reset",
    "address",
    "shadow",
    "set_shadow",
    "reset_value",
    "reset",
    "field",
    "field_with",
    "fetch",
    "commit",
    "modify",
];

struct RegMap {
    block: Block,
    regs: Vec<Reg>,
}

struct Block {
    attrs: Vec<Attribute>,
    vis: Visibility,
    ident: Ident,
}

struct Reg {
    attrs: Vec<Attribute>,
    ident: Ident,
    offset: LitInt,
    size: LitInt,
    reset: LitInt,
    traits: Vec<Ident>,
    fields: Vec<Field>,
}

struct Field {
    attrs: Vec<Attribute>,
    ident: Ident,
    offset: LitInt,
    width: LitInt,
    traits: Vec<Ident>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Access {
    fn tag(self) -> TokenStream2 {
        match self {
            Self::ReadWrite => quote!(::regshadow::reg::ReadWrite),
            Self::ReadOnly => quote!(::regshadow::reg::ReadOnly),
            Self::WriteOnly => quote!(::regshadow::reg::WriteOnly),
        }
    }

    /// Whether a field tagged `field` may live in a register tagged `self`.
    fn permits(self, field: Self) -> bool {
        self == Self::ReadWrite || self == field
    }

    fn describe(self) -> &'static str {
        match self {
            Self::ReadWrite => "read-write",
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
        }
    }
}

/// Register with its layout checked.
struct RegDef<'a> {
    reg: &'a Reg,
    offset: usize,
    size: usize,
    reset: u64,
    access: Access,
    fields: Vec<FieldDef<'a>>,
}

struct FieldDef<'a> {
    field: &'a Field,
    accessor: Ident,
    offset: usize,
    width: usize,
    access: Access,
}

impl Parse for RegMap {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let block = input.parse()?;
        let mut regs = Vec::new();
        while !input.is_empty() {
            regs.push(input.parse()?);
        }
        Ok(Self { block, regs })
    }
}

impl Parse for Block {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![mod]>()?;
        let ident = input.parse()?;
        input.parse::<Token![;]>()?;
        Ok(Self { attrs, vis, ident })
    }
}

impl Parse for Reg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ident = input.parse()?;
        let content;
        braced!(content in input);
        let offset = content.parse()?;
        let size = content.parse()?;
        let reset = content.parse()?;
        let mut traits = Vec::new();
        while !content.peek(Token![;]) {
            traits.push(content.parse()?);
        }
        content.parse::<Token![;]>()?;
        let mut fields = Vec::new();
        while !content.is_empty() {
            fields.push(content.parse()?);
        }
        Ok(Self { attrs, ident, offset, size, reset, traits, fields })
    }
}

impl Parse for Field {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ident = input.parse()?;
        let content;
        braced!(content in input);
        let offset = content.parse()?;
        let width = content.parse()?;
        let mut traits = Vec::new();
        while !content.is_empty() {
            traits.push(content.parse()?);
        }
        Ok(Self { attrs, ident, offset, width, traits })
    }
}

pub fn proc_macro(input: TokenStream) -> TokenStream {
    let reg_map = parse_macro_input!(input as RegMap);
    match gen_block(&reg_map) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn gen_block(reg_map: &RegMap) -> Result<TokenStream2> {
    let RegMap { block: Block { attrs: block_attrs, vis: block_vis, ident: block_ident }, regs } =
        reg_map;
    let call_site = Span::call_site();
    if regs.is_empty() {
        return Err(Error::new(block_ident.span(), "register block has no registers"));
    }
    let defs = regs.iter().map(check_reg).collect::<Result<Vec<_>>>()?;
    check_block(&defs)?;

    let block_mod =
        Ident::new(&unkeywordize(block_ident.to_string().to_snake_case().into()), call_site);
    let block_struct = Ident::new(&block_ident.to_string().to_pascal_case(), call_site);
    let block_docs = doc_attrs(block_attrs);
    let mut reg_tokens = Vec::new();
    let mut reg_docs = Vec::new();
    let mut reg_fields = Vec::new();
    let mut reg_structs = Vec::new();
    for def in &defs {
        let (reg_field, reg_struct) = reg_idents(def.reg);
        reg_tokens.push(gen_reg(def, &reg_struct));
        reg_docs.push(doc_attrs(&def.reg.attrs));
        reg_fields.push(reg_field);
        reg_structs.push(reg_struct);
    }

    Ok(quote! {
        #(#block_attrs)*
        #block_vis mod #block_mod {
            #(#reg_tokens)*

            #(#block_docs)*
            #[derive(Debug)]
            pub struct #block_struct {
                #(
                    #(#reg_docs)*
                    pub #reg_fields: #reg_structs,
                )*
            }

            impl #block_struct {
                /// Creates the register block based at `base`.
                ///
                /// # Safety
                ///
                /// `base` must be the address of this register block for the
                /// whole lifetime of the returned value.
                #[inline]
                pub const unsafe fn new(base: usize) -> Self {
                    Self {
                        #(
                            #reg_fields: #reg_structs::new(base),
                        )*
                    }
                }
            }
        }
    })
}

fn gen_reg(def: &RegDef<'_>, reg_struct: &Ident) -> TokenStream2 {
    let rt = quote!(::regshadow::reg);
    let RegDef { reg, offset, size, reset, access, ref fields } = *def;
    let attrs = &reg.attrs;
    let word = format_ident!("u{}", size);
    let access_tag = access.tag();
    let offset = Literal::usize_unsuffixed(offset);
    let reset = Literal::u64_unsuffixed(reset);
    let debug_name = reg.ident.to_string();

    let mut accessors = Vec::new();
    let mut debug_fields = Vec::new();
    for FieldDef { field, accessor, offset, width, access } in fields {
        let field_attrs = &field.attrs;
        let field_tag = access.tag();
        let field_offset = Literal::usize_unsuffixed(*offset);
        let field_width = Literal::usize_unsuffixed(*width);
        let field_name = accessor.to_string();
        accessors.push(quote! {
            #(#field_attrs)*
            #[inline]
            pub fn #accessor(
                &self,
            ) -> #rt::BitField<'_, #word, #access_tag, #field_offset, #field_width, #field_tag> {
                self.0.field_with()
            }
        });
        debug_fields.push(quote!(.field(#field_name, &self.#accessor())));
    }
    let fetch = if access == Access::WriteOnly {
        quote!()
    } else {
        quote! {
            /// Reads the register into the shadow.
            #[inline]
            pub fn fetch(&self) -> &Self {
                self.0.fetch();
                self
            }
        }
    };
    let modify = if access == Access::ReadWrite {
        quote! {
            /// Fetches the register, passes it to `f`, then commits the result.
            #[inline]
            pub fn modify<F: FnOnce(&Self)>(&self, f: F) {
                self.0.fetch();
                f(self);
                self.0.commit();
            }
        }
    } else {
        quote!()
    };

    quote! {
        #(#attrs)*
        pub struct #reg_struct(#rt::Register<#word, #access_tag>);

        impl #reg_struct {
            /// Offset of the register from the block base address.
            pub const OFFSET: usize = #offset;

            /// Value of the register after reset.
            pub const RESET: #word = #reset;

            /// Creates the register of a block based at `base`.
            ///
            /// # Safety
            ///
            /// `base` must be the address of the register block for the
            /// whole lifetime of the returned value.
            #[inline]
            pub const unsafe fn new(base: usize) -> Self {
                Self(#rt::Register::with_reset(base + Self::OFFSET, Self::RESET))
            }

            #fetch
            #modify
            #(#accessors)*
        }

        impl ::core::ops::Deref for #reg_struct {
            type Target = #rt::Register<#word, #access_tag>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::core::fmt::Debug for #reg_struct {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#debug_name)
                    .field("address", &::core::format_args!("{:#x}", self.0.address()))
                    #(#debug_fields)*
                    .finish()
            }
        }
    }
}

fn check_reg(reg: &Reg) -> Result<RegDef<'_>> {
    let offset = reg.offset.base10_parse::<usize>()?;
    let size = reg.size.base10_parse::<usize>()?;
    if !matches!(size, 8 | 16 | 32 | 64) {
        return Err(Error::new(reg.size.span(), "register size must be 8, 16, 32 or 64 bits"));
    }
    if offset % (size / 8) != 0 {
        return Err(Error::new(
            reg.offset.span(),
            format!("register offset {offset:#x} is not aligned to {} bytes", size / 8),
        ));
    }
    let reset = reg.reset.base10_parse::<u64>()?;
    if size < 64 && reset >> size != 0 {
        return Err(Error::new(
            reg.reset.span(),
            format!("reset value does not fit into a {size}-bit register"),
        ));
    }
    let access = parse_access(&reg.traits)?.ok_or_else(|| {
        Error::new(
            reg.ident.span(),
            format!("register `{}` is neither readable nor writable", reg.ident),
        )
    })?;
    let mut taken = 0_u128;
    let mut names = HashSet::new();
    let mut fields = Vec::new();
    for field in &reg.fields {
        let offset = field.offset.base10_parse::<usize>()?;
        let width = field.width.base10_parse::<usize>()?;
        if width == 0 {
            return Err(Error::new(field.width.span(), "field width must be non-zero"));
        }
        if offset.checked_add(width).map_or(true, |end| end > size) {
            return Err(Error::new(
                field.ident.span(),
                format!("field `{}` does not fit into a {size}-bit register", field.ident),
            ));
        }
        let mask = ((1_u128 << width) - 1) << offset;
        if taken & mask != 0 {
            return Err(Error::new(
                field.ident.span(),
                format!("field `{}` overlaps another field", field.ident),
            ));
        }
        taken |= mask;
        let name = unkeywordize(field.ident.to_string().to_snake_case().into()).into_owned();
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(Error::new(
                field.ident.span(),
                format!("field name `{name}` conflicts with a register method"),
            ));
        }
        if !names.insert(name.clone()) {
            return Err(Error::new(
                field.ident.span(),
                format!("field `{name}` is defined more than once"),
            ));
        }
        let field_access = parse_access(&field.traits)?.unwrap_or(access);
        if !access.permits(field_access) {
            return Err(Error::new(
                field.ident.span(),
                format!(
                    "field `{}` is {} but register `{}` is {}",
                    field.ident,
                    field_access.describe(),
                    reg.ident,
                    access.describe()
                ),
            ));
        }
        let accessor = Ident::new(&name, Span::call_site());
        fields.push(FieldDef { field, accessor, offset, width, access: field_access });
    }
    Ok(RegDef { reg, offset, size, reset, access, fields })
}

fn parse_access(traits: &[Ident]) -> Result<Option<Access>> {
    let (mut read, mut write) = (false, false);
    for ident in traits {
        if ident == "RReg" {
            read = true;
        } else if ident == "WReg" {
            write = true;
        } else {
            return Err(Error::new(
                ident.span(),
                format!("unknown register trait `{ident}`, expected `RReg` or `WReg`"),
            ));
        }
    }
    Ok(match (read, write) {
        (true, true) => Some(Access::ReadWrite),
        (true, false) => Some(Access::ReadOnly),
        (false, true) => Some(Access::WriteOnly),
        (false, false) => None,
    })
}

fn check_block(defs: &[RegDef<'_>]) -> Result<()> {
    let mut names = HashSet::new();
    for (i, def) in defs.iter().enumerate() {
        let (reg_field, _) = reg_idents(def.reg);
        if !names.insert(reg_field.to_string()) {
            return Err(Error::new(
                def.reg.ident.span(),
                format!("register `{}` is defined more than once", def.reg.ident),
            ));
        }
        let end = def.offset.saturating_add(def.size / 8);
        for prev in &defs[..i] {
            if def.offset < prev.offset.saturating_add(prev.size / 8) && prev.offset < end {
                return Err(Error::new(
                    def.reg.ident.span(),
                    format!("register `{}` overlaps register `{}`", def.reg.ident, prev.reg.ident),
                ));
            }
        }
    }
    Ok(())
}

fn reg_idents(reg: &Reg) -> (Ident, Ident) {
    let name = reg.ident.to_string();
    let call_site = Span::call_site();
    (
        Ident::new(&unkeywordize(name.to_snake_case().into()), call_site),
        Ident::new(&name.to_pascal_case(), call_site),
    )
}

fn doc_attrs(attrs: &[Attribute]) -> Vec<&Attribute> {
    attrs.iter().filter(|attr| attr.path.is_ident("doc")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(input: &str) -> Reg {
        syn::parse_str(input).unwrap()
    }

    fn check_err(input: &str) -> String {
        match check_reg(&reg(input)) {
            Ok(_) => panic!("`{input}` passed the layout check"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn parse_reg() {
        let reg = reg("/// Control.\nCTRL { 0x04 16 0x00FF RReg WReg; EN { 0 1 } MODE { 4 3 } }");
        assert_eq!(reg.ident, "CTRL");
        assert_eq!(reg.attrs.len(), 1);
        assert_eq!(reg.traits.len(), 2);
        assert_eq!(reg.fields.len(), 2);
        assert_eq!(reg.fields[1].ident, "MODE");
        let def = check_reg(&reg).unwrap();
        assert_eq!(def.offset, 4);
        assert_eq!(def.size, 16);
        assert_eq!(def.reset, 0xFF);
        assert!(def.access == Access::ReadWrite);
        assert_eq!(def.fields[1].accessor, "mode");
        assert_eq!((def.fields[1].offset, def.fields[1].width), (4, 3));
    }

    #[test]
    fn parse_block() {
        let map: RegMap = syn::parse_str(
            "pub mod UART; CTRL { 0x00 32 0 RReg WReg; EN { 0 1 } } DATA { 0x04 8 0 WReg; }",
        )
        .unwrap();
        assert_eq!(map.block.ident, "UART");
        assert_eq!(map.regs.len(), 2);
        assert!(map.regs[1].fields.is_empty());
    }

    #[test]
    fn access_tags() {
        let sr = reg("SR { 0x00 32 0 RReg; }");
        assert_eq!(check_reg(&sr).unwrap().access, Access::ReadOnly);
        let dr = reg("DR { 0x00 32 0 WReg; }");
        assert_eq!(check_reg(&dr).unwrap().access, Access::WriteOnly);
        assert!(check_err("DR { 0x00 32 0 ; }").contains("neither readable nor writable"));
        assert!(check_err("DR { 0x00 32 0 XReg; }").contains("unknown register trait"));
    }

    #[test]
    fn field_access_tags() {
        let cr = reg("CR { 0x00 32 0 RReg WReg; EN { 0 1 } RDY { 1 1 RReg } KEY { 8 8 WReg } }");
        let def = check_reg(&cr).unwrap();
        assert_eq!(def.fields[0].access, Access::ReadWrite);
        assert_eq!(def.fields[1].access, Access::ReadOnly);
        assert_eq!(def.fields[2].access, Access::WriteOnly);
        let sr = reg("SR { 0x00 32 0 RReg; BUSY { 0 1 } LVL { 4 4 RReg } }");
        let def = check_reg(&sr).unwrap();
        assert_eq!(def.fields[0].access, Access::ReadOnly);
        assert_eq!(def.fields[1].access, Access::ReadOnly);
        assert!(check_err("SR { 0x00 32 0 RReg; KEY { 0 8 WReg } }")
            .contains("field `KEY` is write-only but register `SR` is read-only"));
        assert!(check_err("DR { 0x00 32 0 WReg; V { 0 8 RReg WReg } }").contains("read-write"));
        assert!(check_err("CR { 0x00 32 0 RReg WReg; V { 0 8 XReg } }")
            .contains("unknown register trait"));
    }

    #[test]
    fn layout_errors() {
        assert!(check_err("R { 0x00 24 0 RReg; }").contains("register size"));
        assert!(check_err("R { 0x02 32 0 RReg; }").contains("not aligned"));
        assert!(check_err("R { 0x00 8 0x100 RReg; }").contains("reset value"));
        assert!(check_err("R { 0x00 32 0 RReg; A { 3 0 } }").contains("non-zero"));
        assert!(check_err("R { 0x00 16 0 RReg; A { 12 5 } }").contains("does not fit"));
        assert!(check_err("R { 0x00 32 0 RReg; A { 18446744073709551615 2 } }")
            .contains("does not fit"));
        assert!(check_err("R { 0x00 32 0 RReg; A { 0 4 } B { 3 2 } }").contains("overlaps"));
        assert!(check_err("R { 0x00 32 0 RReg; A { 0 1 } A { 1 1 } }").contains("more than once"));
    }

    #[test]
    fn register_method_names() {
        for name in ["NEW", "ADDRESS", "RESET", "SHADOW", "SET_SHADOW", "RESET_VALUE", "FIELD"] {
            let err = check_err(&format!("R {{ 0x00 32 0 RReg WReg; {name} {{ 0 1 }} }}"));
            assert!(err.contains("conflicts with a register method"), "{name}: {err}");
        }
        for name in ["FETCH", "COMMIT", "MODIFY", "WITH_RESET", "FIELD_WITH"] {
            let err = check_err(&format!("R {{ 0x00 32 0 RReg WReg; {name} {{ 0 1 }} }}"));
            assert!(err.contains("conflicts with a register method"), "{name}: {err}");
        }
        let r = reg("R { 0x00 32 0 RReg WReg; RESET_FLAG { 0 1 } ADDR { 4 4 } }");
        assert_eq!(check_reg(&r).unwrap().fields[0].accessor, "reset_flag");
    }

    #[test]
    fn full_width_fields() {
        let r = reg("R { 0x08 64 0xFFFFFFFFFFFFFFFF RReg WReg; A { 0 64 } }");
        let def = check_reg(&r).unwrap();
        assert_eq!(def.reset, u64::MAX);
        assert_eq!(def.fields[0].width, 64);
    }

    #[test]
    fn keyword_fields() {
        let r = reg("R { 0x00 32 0 RReg; TYPE { 0 2 } }");
        assert_eq!(check_reg(&r).unwrap().fields[0].accessor, "_type");
    }

    #[test]
    fn register_overlap() {
        let map: RegMap = syn::parse_str(
            "mod BLK; A { 0x00 32 0 RReg; } B { 0x02 16 0 RReg; }",
        )
        .unwrap();
        let defs = map.regs.iter().map(check_reg).collect::<Result<Vec<_>>>().unwrap();
        let err = check_block(&defs).unwrap_err().to_string();
        assert!(err.contains("overlaps register `A`"));
    }

    #[test]
    fn expansion() {
        let map: RegMap = syn::parse_str(
            "/// Timer.\npub mod TIM; CNT { 0x24 32 0 RReg WReg; VALUE { 0 16 } }",
        )
        .unwrap();
        let expanded = gen_block(&map).unwrap().to_string();
        assert!(expanded.contains("pub mod tim"));
        assert!(expanded.contains("pub struct Tim"));
        assert!(expanded.contains("pub struct Cnt"));
        assert!(expanded.contains("pub fn value"));
        assert!(expanded.contains("pub fn modify"));
    }

    #[test]
    fn expansion_field_access() {
        let map: RegMap = syn::parse_str(
            "pub mod TIM; SR { 0x00 32 0 RReg WReg; UIF { 0 1 } CNT { 16 16 RReg } }",
        )
        .unwrap();
        let expanded = gen_block(&map).unwrap().to_string().replace(' ', "");
        assert!(expanded.contains("0,1,::regshadow::reg::ReadWrite>"));
        assert!(expanded.contains("16,16,::regshadow::reg::ReadOnly>"));
    }
}
