//! `#[derive(Record)]` for [`jspointer`](https://docs.rs/jspointer).
//!
//! The derive reads what the struct already declares: a field is exported
//! when it has any `pub` visibility, and its name follows the serde
//! attributes the struct carries (`rename`, `skip`, `skip_serializing` and
//! the container's `rename_all`). `#[jspointer(..)]` overrides them and adds
//! `read_only`.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{
    ext::IdentExt, meta::ParseNestedMeta, parse_macro_input, spanned::Spanned, Attribute,
    DeriveInput, Field, Ident, LitStr, Token, Visibility,
};

/// Implements `Record` and `Node` for a struct with named fields.
///
/// Field attributes:
///
/// - `#[jspointer(read_only)]` refuses assignment to the field.
/// - `#[jspointer(rename = "name")]` or `#[serde(rename = "name")]` sets the
///   name a token must equal.
/// - `#[jspointer(skip)]`, `#[serde(skip)]` or `#[serde(skip_serializing)]`
///   hides the field from pointers.
///
/// On the struct, `#[serde(rename_all = "..")]` (or the same key under
/// `jspointer`) renames every field that has no explicit name.
#[proc_macro_derive(Record, attributes(jspointer, serde))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let krate = jspointer_crate_path();

    let syn::Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs",
        ));
    };
    let syn::Fields::Named(named) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record requires named fields",
        ));
    };

    let container = parse_container_attrs(&input.attrs)?;
    let specs = named
        .named
        .iter()
        .map(|field| parse_field(field, &container))
        .collect::<syn::Result<Vec<_>>>()?;

    let descriptors = specs.iter().map(|spec| {
        let name = &spec.name;
        let exported = spec.exported;
        let read_only = spec.read_only;
        let tag = spec.tag.as_ref().map(|tag| quote!(.with_tag(#tag)));
        quote! {
            #krate::Field::new(#name)
                #tag
                .with_exported(#exported)
                .with_read_only(#read_only)
        }
    });
    let indices: Vec<usize> = (0..specs.len()).collect();
    let idents: Vec<&Ident> = specs.iter().map(|spec| &spec.ident).collect();

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn fields(&self) -> &'static [#krate::Field] {
                const FIELDS: &[#krate::Field] = &[#(#descriptors),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn #krate::Node> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#idents as &dyn #krate::Node),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #krate::Node> {
                match index {
                    #(#indices => ::core::option::Option::Some(&mut self.#idents as &mut dyn #krate::Node),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::Node for #ident #ty_generics #where_clause {
            fn shape(&self) -> #krate::Shape<'_> {
                #krate::Shape::Record(self)
            }

            fn shape_mut(&mut self) -> #krate::ShapeMut<'_> {
                #krate::ShapeMut::Record(self)
            }
        }
    })
}

// `jspointer` declares `extern crate self as jspointer`, so the absolute
// path also resolves inside the crate and its doctests.
fn jspointer_crate_path() -> TokenStream2 {
    match crate_name("jspointer") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) | Err(_) => quote!(::jspointer),
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 Attributes                                   ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

#[derive(Default)]
struct ContainerAttrs {
    rename_all: Option<RenameRule>,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    read_only: bool,
}

struct FieldSpec {
    ident: Ident,
    name: String,
    tag: Option<String>,
    exported: bool,
    read_only: bool,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut container = ContainerAttrs::default();
    let mut explicit = None;
    for attr in attrs {
        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(rule) = parse_rename_all(&meta)? {
                        container.rename_all = Some(rule);
                    }
                    return Ok(());
                }
                skip_meta(&meta)
            })?;
        } else if attr.path().is_ident("jspointer") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    explicit = parse_rename_all(&meta)?;
                    return Ok(());
                }
                Err(meta.error("unsupported `jspointer` container attribute"))
            })?;
        }
    }
    if explicit.is_some() {
        container.rename_all = explicit;
    }
    Ok(container)
}

fn parse_field(field: &Field, container: &ContainerAttrs) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new(field.span(), "expected named field"))?;

    let mut serde = FieldAttrs::default();
    let mut own = FieldAttrs::default();
    for attr in &field.attrs {
        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(name) = parse_serialize_name(&meta)? {
                        serde.rename = Some(name);
                    }
                    return Ok(());
                }
                if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    serde.skip = true;
                    return Ok(());
                }
                skip_meta(&meta)
            })?;
        } else if attr.path().is_ident("jspointer") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("read_only") {
                    own.read_only = true;
                    return Ok(());
                }
                if meta.path.is_ident("skip") {
                    own.skip = true;
                    return Ok(());
                }
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    own.rename = Some(lit.value());
                    return Ok(());
                }
                Err(meta.error("unsupported `jspointer` field attribute"))
            })?;
        }
    }

    let name = ident.unraw().to_string();
    let tag = if own.skip || (serde.skip && own.rename.is_none()) {
        Some("-".to_string())
    } else if let Some(rename) = own.rename.or(serde.rename) {
        Some(rename)
    } else {
        container.rename_all.map(|rule| rule.apply(&name))
    };

    Ok(FieldSpec {
        ident,
        name,
        tag,
        exported: !matches!(field.vis, Visibility::Inherited),
        read_only: own.read_only,
    })
}

/// `rename = ".."` or `rename(serialize = "..")`. Only the serialized name
/// matters for addressing.
fn parse_serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let lit: LitStr = meta.value()?.parse()?;
        return Ok(Some(lit.value()));
    }
    let mut name = None;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("serialize") {
            let lit: LitStr = nested.value()?.parse()?;
            name = Some(lit.value());
            return Ok(());
        }
        skip_meta(&nested)
    })?;
    Ok(name)
}

fn parse_rename_all(meta: &ParseNestedMeta) -> syn::Result<Option<RenameRule>> {
    let span = meta.path.span();
    let Some(rule) = parse_serialize_name(meta)? else {
        return Ok(None);
    };
    RenameRule::from_name(&rule)
        .map(Some)
        .ok_or_else(|| syn::Error::new(span, format!("unknown rename rule `{rule}`")))
}

/// Consumes a serde attribute the derive does not care about.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 RenameRule                                   ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// serde's `rename_all` rules, applied to snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_name(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return None,
        })
    }

    fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal(field),
            Self::Camel => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules() {
        let cases = [
            ("lowercase", "max_conns"),
            ("UPPERCASE", "MAX_CONNS"),
            ("PascalCase", "MaxConns"),
            ("camelCase", "maxConns"),
            ("snake_case", "max_conns"),
            ("SCREAMING_SNAKE_CASE", "MAX_CONNS"),
            ("kebab-case", "max-conns"),
            ("SCREAMING-KEBAB-CASE", "MAX-CONNS"),
        ];
        for (rule, expected) in cases {
            let rule = RenameRule::from_name(rule).unwrap();
            assert_eq!(rule.apply("max_conns"), expected);
        }
        assert_eq!(RenameRule::from_name("Title Case"), None);
    }

    fn spec(field: syn::Field, container: &ContainerAttrs) -> FieldSpec {
        parse_field(&field, container).unwrap()
    }

    #[test]
    fn field_attrs() {
        let none = ContainerAttrs::default();

        let f = spec(syn::parse_quote!(pub host: String), &none);
        assert_eq!((f.name.as_str(), f.tag, f.exported), ("host", None, true));

        let f = spec(syn::parse_quote!(secret: String), &none);
        assert!(!f.exported);

        let f = spec(syn::parse_quote!(pub(crate) r#type: u8), &none);
        assert_eq!(f.name, "type");
        assert!(f.exported);

        let f = spec(
            syn::parse_quote!(#[serde(rename = "ID", default)] pub id: u64),
            &none,
        );
        assert_eq!(f.tag.as_deref(), Some("ID"));

        let f = spec(
            syn::parse_quote!(#[serde(rename(serialize = "out", deserialize = "in"))] pub x: u8),
            &none,
        );
        assert_eq!(f.tag.as_deref(), Some("out"));

        let f = spec(
            syn::parse_quote!(#[serde(skip_serializing, with = "module")] pub cache: u8),
            &none,
        );
        assert_eq!(f.tag.as_deref(), Some("-"));

        let f = spec(
            syn::parse_quote!(#[serde(skip)] #[jspointer(rename = "seen", read_only)] pub y: u8),
            &none,
        );
        assert_eq!(f.tag.as_deref(), Some("seen"));
        assert!(f.read_only);
    }

    #[test]
    fn container_rename_all() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[serde(rename_all = "camelCase")])];
        let container = parse_container_attrs(&attrs).unwrap();

        let f = spec(syn::parse_quote!(pub max_conns: u8), &container);
        assert_eq!(f.tag.as_deref(), Some("maxConns"));

        let f = spec(
            syn::parse_quote!(#[serde(rename = "MAX")] pub max_conns: u8),
            &container,
        );
        assert_eq!(f.tag.as_deref(), Some("MAX"));

        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[serde(rename_all = "nope")])];
        assert!(parse_container_attrs(&attrs).is_err());
    }

    #[test]
    fn rejects_non_structs() {
        let input: DeriveInput = syn::parse_quote!(
            enum E {
                A,
            }
        );
        assert!(expand_record(&input).is_err());

        let input: DeriveInput = syn::parse_quote!(
            struct T(u8);
        );
        assert!(expand_record(&input).is_err());
    }
}
