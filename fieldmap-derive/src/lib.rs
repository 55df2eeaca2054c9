//! # fieldmap Derive Macros
//!
//! This crate provides the procedural macro for `fieldmap`. `#[derive(Record)]`
//! implements `fieldmap::Record` and `fieldmap::Reflect` for a struct with named
//! fields, generating its field layout and index-based field accessors.
//!
//! Each field may carry one `#[map("...")]` attribute holding the annotation
//! text that tells the decoder builder where the field goes.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derives `fieldmap::Record` and `fieldmap::Reflect`.
///
/// The struct must also implement `Clone` and `Default`.
#[proc_macro_derive(Record, attributes(map))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct MappedField {
    ident: syn::Ident,
    ty: syn::Type,
    tag: Option<LitStr>,
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Record only supports structs",
            ));
        }
    };

    let named = match data_struct.fields {
        Fields::Named(named) => named.named,
        Fields::Unit => Default::default(),
        Fields::Unnamed(f) => {
            return Err(syn::Error::new_spanned(
                f,
                "Record only supports structs with named fields",
            ));
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let tag = parse_attributes(&field.attrs)?;
        let Some(ident) = field.ident else {
            continue;
        };
        fields.push(MappedField {
            ident,
            ty: field.ty,
            tag,
        });
    }

    let impl_reflect = generate_reflect(&name);
    let impl_record = generate_record(&name, &fields);

    Ok(quote! {
        #impl_reflect
        #impl_record
    })
}

/// Returns the text of the `#[map("...")]` attribute, if present.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut tag = None;
    for attr in attrs {
        if !attr.path().is_ident("map") {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "only one #[map(...)] attribute is allowed per field",
            ));
        }
        let lit: LitStr = attr.parse_args().map_err(|e| {
            syn::Error::new(e.span(), "expected an annotation string, e.g. #[map(\"path=a,b\")]")
        })?;
        tag = Some(lit);
    }
    Ok(tag)
}

fn field_name(ident: &syn::Ident) -> String {
    let raw = ident.to_string();
    raw.strip_prefix("r#").map(str::to_string).unwrap_or(raw)
}

// --- Generator: Reflect ---

fn generate_reflect(name: &syn::Ident) -> proc_macro2::TokenStream {
    let label = name.to_string();
    quote! {
        impl fieldmap::Reflect for #name {
            fn type_desc() -> fieldmap::TypeDesc {
                fieldmap::rt::record::<Self>(#label)
            }
        }
    }
}

// --- Generator: Record ---

fn generate_record(name: &syn::Ident, fields: &[MappedField]) -> proc_macro2::TokenStream {
    let label = name.to_string();

    let descs = fields.iter().enumerate().map(|(index, f)| {
        let fname = field_name(&f.ident);
        let ty = &f.ty;
        let tag = match &f.tag {
            Some(lit) => quote! { Some(#lit) },
            None => quote! { None },
        };
        quote! { fieldmap::rt::field::<#ty>(#fname, #index, #tag) }
    });

    let refs = fields.iter().enumerate().map(|(index, f)| {
        let ident = &f.ident;
        quote! { #index => Some(&self.#ident as &dyn std::any::Any), }
    });

    let muts = fields.iter().enumerate().map(|(index, f)| {
        let ident = &f.ident;
        quote! { #index => Some(&mut self.#ident as &mut dyn std::any::Any), }
    });

    quote! {
        impl fieldmap::Record for #name {
            fn shape() -> fieldmap::Shape {
                fieldmap::rt::shape(#label, vec![#(#descs),*])
            }

            fn field_ref(&self, index: usize) -> Option<&dyn std::any::Any> {
                match index {
                    #(#refs)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, index: usize) -> Option<&mut dyn std::any::Any> {
                match index {
                    #(#muts)*
                    _ => None,
                }
            }
        }
    }
}
