use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

const CONTEXT_FIELD: &str = "context";
const SOURCE_FIELD: &str = "source";
const INTERNAL_VARIANT: &str = "Internal";

/// Everything the expansion needs to know about a single variant.
struct Shape<'a> {
    ident: &'a Ident,
    cfgs: Vec<&'a Attribute>,
    has_context: bool,
    source: Option<(&'a Ident, &'a Type)>,
    field_count: usize,
}

impl<'a> Shape<'a> {
    fn of(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "osb_error variants must use named fields",
            ));
        };

        let mut has_context = false;
        let mut source = None;
        for field in &fields.named {
            let Some(name) = field.ident.as_ref() else { continue };
            if name == CONTEXT_FIELD {
                if !is_context_type(&field.ty) {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "context field must be Option<Cow<'static, str>>",
                    ));
                }
                has_context = true;
            } else if is_source(field) {
                source = Some((name, &field.ty));
            }
        }

        if source.is_some() && !has_context {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "osb_error variants wrapping a source need `context: Option<Cow<'static, str>>`",
            ));
        }

        Ok(Self {
            ident: &variant.ident,
            cfgs: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).collect(),
            has_context,
            source,
            field_count: fields.named.len(),
        })
    }

    fn is_internal(&self) -> bool {
        self.ident == INTERNAL_VARIANT
    }
}

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "osb_error can only be applied to enums")
            .to_compile_error();
    };

    let shapes = match data.variants.iter().map(Shape::of).collect::<syn::Result<Vec<_>>>() {
        Ok(shapes) => shapes,
        Err(err) => return err.to_compile_error(),
    };

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let derives = match missing_derives(&input.attrs) {
        Ok(derives) => derives,
        Err(err) => return err.to_compile_error(),
    };
    let context_trait = context_trait(name, &ext, &shapes);
    let conversions = shapes.iter().filter_map(|shape| source_conversion(name, &ext, shape));
    let internal = internal_conversions(name, &shapes);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#conversions)*
        #internal

        #[allow(dead_code, clippy::ref_option)]
        fn format_context(
            context: &Option<::std::borrow::Cow<'static, str>>,
        ) -> ::std::borrow::Cow<'static, str> {
            match context {
                Some(c) => ::std::borrow::Cow::Owned(format!(" ({c})")),
                None => ::std::borrow::Cow::Borrowed(""),
            }
        }
    }
}

fn context_trait(name: &Ident, ext: &Ident, shapes: &[Shape<'_>]) -> TokenStream {
    let arms = shapes.iter().filter(|s| s.has_context).map(|s| {
        let ident = s.ident;
        let cfgs = &s.cfgs;
        quote! { #(#cfgs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        /// Attaches a human-readable context to an error.
        pub trait #ext<T> {
            /// Wraps the error (if any) with the given context.
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    #[allow(unreachable_patterns)]
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_conversion(name: &Ident, ext: &Ident, shape: &Shape<'_>) -> Option<TokenStream> {
    let (field, ty) = shape.source?;
    let ident = shape.ident;
    let cfgs = &shape.cfgs;

    // `From` is only unambiguous when nothing but source and context need filling.
    (shape.field_count == 2 && !shape.is_internal()).then(|| {
        quote! {
            #(#cfgs)*
            #[automatically_derived]
            impl From<#ty> for #name {
                #[inline]
                fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
            }

            #(#cfgs)*
            #[automatically_derived]
            impl<T> #ext<T> for ::std::result::Result<T, #ty> {
                #[inline]
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, #name> {
                    self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
                }
            }
        }
    })
}

fn internal_conversions(name: &Ident, shapes: &[Shape<'_>]) -> TokenStream {
    let Some(internal) = shapes.iter().find(|s| s.is_internal() && s.has_context) else {
        return TokenStream::new();
    };
    let cfgs = &internal.cfgs;

    quote! {
        #(#cfgs)*
        #[automatically_derived]
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfgs)*
        #[automatically_derived]
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn missing_derives(attrs: &[Attribute]) -> syn::Result<TokenStream> {
    let mut present = FxHashSet::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                present.insert(last.ident.to_string());
            }
            Ok(())
        })?;
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }

    Ok(if derives.is_empty() { TokenStream::new() } else { quote! { #[derive(#(#derives),*)] } })
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == SOURCE_FIELD)
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

/// Accepts `Option<Cow<'static, str>>` with any path prefix on either type.
fn is_context_type(ty: &Type) -> bool {
    let rendered: String = quote!(#ty).to_string().chars().filter(|c| !c.is_whitespace()).collect();
    let Some(inner) = rendered.strip_suffix('>') else {
        return false;
    };
    let Some((outer, cow)) = inner.split_once('<') else {
        return false;
    };
    outer.rsplit("::").next() == Some("Option")
        && cow.rsplit_once("::").map_or(cow, |(_, tail)| tail) == "Cow<'static,str>"
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn adds_only_the_derives_that_are_absent() {
        let input: DeriveInput = parse_quote! {
            #[derive(Debug, Clone)]
            enum E { Internal { context: Option<Cow<'static, str>> } }
        };
        let derives = missing_derives(&input.attrs).unwrap().to_string();
        assert!(derives.contains("thiserror"));
        assert!(!derives.contains("Debug"));
    }

    #[test]
    fn malformed_derive_list_is_a_compile_error() {
        let input: DeriveInput = parse_quote! {
            #[derive(Clone = 1)]
            enum E { Internal { context: Option<Cow<'static, str>> } }
        };
        assert!(missing_derives(&input.attrs).is_err());

        let expanded = expand(input).to_string();
        assert!(expanded.contains("compile_error"));
    }
}
