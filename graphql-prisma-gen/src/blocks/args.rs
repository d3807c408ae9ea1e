//! Argument bundles shared by output, relation and CRUD emitters
//!
//! GraphQL arguments are declared one by one on resolver methods and then
//! collected into a serializable bundle that is sent to the client as is.

use super::serde_rename_attr;
use crate::dmmf::naming::field_ident;
use crate::dmmf::InputField;
use crate::emit::{file_header, input_field_type, type_ident};
use proc_macro2::TokenStream;
use quote::quote;

/// Bundle struct declaration: `pub struct FindManyPostArgs { .. }`
pub(crate) fn args_struct_file(type_name: &str, args: &[InputField], root: &TokenStream) -> TokenStream {
    let header = file_header(&format!("Arguments bundle {}", type_name));
    let ident = type_ident(type_name);
    let fields = args.iter().map(|arg| {
        let field = field_ident(&arg.name);
        let ty = input_field_type(arg, root);
        let rename = serde_rename_attr(&arg.name);
        let skip = if arg.is_required {
            quote! {}
        } else {
            quote! { #[serde(skip_serializing_if = "Option::is_none")] }
        };
        quote! {
            #rename
            #skip
            pub #field: #ty,
        }
    });

    quote! {
        #header

        use serde::Serialize;

        #[derive(Debug, Clone, Serialize)]
        pub struct #ident {
            #(#fields)*
        }
    }
}

/// Resolver method parameters, one per argument
pub(crate) fn arg_params(args: &[InputField], root: &TokenStream) -> Vec<TokenStream> {
    args.iter()
        .map(|arg| {
            let ident = field_ident(&arg.name);
            let ty = input_field_type(arg, root);
            let name = &arg.name;
            quote! { #[graphql(name = #name)] #ident: #ty }
        })
        .collect()
}

/// Parameter identifiers, in declaration order
pub(crate) fn arg_idents(args: &[InputField]) -> Vec<proc_macro2::Ident> {
    args.iter().map(|arg| field_ident(&arg.name)).collect()
}

/// Bundle constructor from same-named locals
pub(crate) fn args_init(bundle: &TokenStream, args: &[InputField]) -> TokenStream {
    let idents = arg_idents(args);
    quote! { #bundle { #(#idents),* } }
}
