use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Variant};

struct KindDef {
    ident: Ident,
    name: String,
    base: bool,
    extends: Option<Ident>,
}

impl KindDef {
    fn parse(variant: &Variant) -> syn::Result<Self> {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "NodeKind variants must not carry fields",
            ));
        }

        let mut def = KindDef {
            ident: variant.ident.clone(),
            name: variant.ident.to_string(),
            base: false,
            extends: None,
        };
        for attr in variant.attrs.iter().filter(|attr| attr.path().is_ident("kind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("base") {
                    def.base = true;
                    Ok(())
                } else if meta.path.is_ident("extends") {
                    def.extends = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    def.name = meta.value()?.parse::<LitStr>()?.value();
                    Ok(())
                } else {
                    Err(meta.error("expected `base`, `extends = Variant` or `rename = \"name\"`"))
                }
            })?;
        }
        if def.base {
            if let Some(parent) = &def.extends {
                return Err(syn::Error::new_spanned(
                    parent,
                    "the base kind cannot extend another kind",
                ));
            }
        }
        Ok(def)
    }
}

/// Index of the variant each kind extends, after defaulting to the base.
fn resolve_parents(defs: &[KindDef], base: Option<usize>) -> syn::Result<Vec<Option<usize>>> {
    let parents = defs
        .iter()
        .enumerate()
        .map(|(index, def)| match &def.extends {
            Some(parent) => defs
                .iter()
                .position(|candidate| candidate.ident == *parent)
                .map(Some)
                .ok_or_else(|| {
                    syn::Error::new_spanned(parent, format!("no variant named `{parent}` to extend"))
                }),
            None if Some(index) == base => Ok(None),
            None => Ok(base),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    for (start, def) in defs.iter().enumerate() {
        let mut current = parents[start];
        for _ in 0..defs.len() {
            match current {
                Some(index) if index == start => {
                    return Err(syn::Error::new_spanned(
                        &def.ident,
                        format!("`{}` extends itself through its parents", def.ident),
                    ));
                }
                Some(index) => current = parents[index],
                None => break,
            }
        }
    }
    Ok(parents)
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "NodeKind can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "NodeKind enums cannot be generic",
        ));
    }

    let defs = data
        .variants
        .iter()
        .map(KindDef::parse)
        .collect::<syn::Result<Vec<_>>>()?;

    let mut bases = defs.iter().enumerate().filter(|(_, def)| def.base);
    let base = bases.next().map(|(index, _)| index);
    if let Some((_, extra)) = bases.next() {
        return Err(syn::Error::new_spanned(
            &extra.ident,
            "only one kind can be marked `#[kind(base)]`",
        ));
    }

    for (index, def) in defs.iter().enumerate() {
        if let Some(other) = defs[..index].iter().find(|other| other.name == def.name) {
            return Err(syn::Error::new_spanned(
                &def.ident,
                format!("`{}` reuses the name of `{}`", def.ident, other.ident),
            ));
        }
    }

    let parents = resolve_parents(&defs, base)?;

    let idents: Vec<_> = defs.iter().map(|def| &def.ident).collect();
    let names: Vec<_> = defs.iter().map(|def| &def.name).collect();
    let extends = parents.iter().map(|parent| match parent {
        Some(index) => {
            let parent = &defs[*index].ident;
            quote! { ::core::option::Option::Some(Self::#parent) }
        }
        None => quote! { ::core::option::Option::None },
    });
    let base = match base {
        Some(index) => {
            let base = &defs[index].ident;
            quote! { ::core::option::Option::Some(Self::#base) }
        }
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        impl scankit::NodeKind for #ident {
            const ALL: &'static [Self] = &[#(Self::#idents),*];
            const BASE: ::core::option::Option<Self> = #base;

            fn name(self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn extends(self) -> ::core::option::Option<Self> {
                match self {
                    #(Self::#idents => #extends,)*
                }
            }
        }
    })
}
