//! Custom scalar declarations
//!
//! Schema scalars without a native GraphQL counterpart. The set is fixed; it
//! does not depend on which scalars the schema actually uses.

use crate::emit::file_header;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

pub const SCALARS_FILE: &str = "scalars.rs";

/// Name, inner representation and description of every custom scalar
const SCALARS: &[(&str, &str, &str)] = &[
    ("DateTime", "String", "ISO 8601 date and time"),
    ("Decimal", "String", "Arbitrary precision decimal, serialized as a string"),
    ("BigInt", "i64", "64-bit signed integer"),
    ("Bytes", "String", "Base64 encoded binary data"),
    ("Json", "serde_json::Value", "Arbitrary JSON value"),
];

pub fn generate_scalars() -> TokenStream {
    let header = file_header("Custom scalars");
    let scalars = SCALARS.iter().map(|(name, inner, description)| {
        let ident = format_ident!("{}", name);
        let inner: syn::Type = syn::parse_str(inner).unwrap_or_else(|_| syn::parse_quote!(String));
        let doc = format!(" {}", description);
        let derives = if *name == "Json" {
            quote! { #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)] }
        } else {
            quote! { #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)] }
        };
        quote! {
            #[doc = #doc]
            #derives
            #[serde(transparent)]
            pub struct #ident(pub #inner);

            async_graphql::scalar!(#ident, #name, #description);

            impl From<#inner> for #ident {
                fn from(value: #inner) -> Self {
                    Self(value)
                }
            }
        }
    });

    quote! {
        #header

        use serde::{Deserialize, Serialize};

        #(#scalars)*
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_parse() {
        let file: syn::File = syn::parse2(generate_scalars()).unwrap();
        let structs: Vec<String> = file
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Struct(s) => Some(s.ident.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(structs, vec!["DateTime", "Decimal", "BigInt", "Bytes", "Json"]);
    }
}
