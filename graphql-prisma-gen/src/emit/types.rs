//! Resolved type references to Rust type tokens

use super::type_ident;
use crate::dmmf::{InputField, TypeLocation, TypeRef};
use proc_macro2::TokenStream;
use quote::quote;

/// Rust type of a schema scalar
///
/// Scalars without a native GraphQL counterpart live in the generated
/// `scalars` module.
pub fn scalar_type(name: &str, root: &TokenStream) -> TokenStream {
    match name {
        "String" => quote! { String },
        "Int" => quote! { i32 },
        "Float" => quote! { f64 },
        "Boolean" => quote! { bool },
        "BigInt" => quote! { #root::scalars::BigInt },
        "Decimal" => quote! { #root::scalars::Decimal },
        "DateTime" => quote! { #root::scalars::DateTime },
        "Bytes" => quote! { #root::scalars::Bytes },
        _ => quote! { #root::scalars::Json },
    }
}

/// Path of the named type, without list or option wrappers
pub fn type_path(type_ref: &TypeRef, root: &TokenStream) -> TokenStream {
    let ident = type_ident(&type_ref.name);
    match type_ref.location {
        TypeLocation::Scalar => scalar_type(&type_ref.name, root),
        TypeLocation::Enum => quote! { #root::enums::#ident },
        TypeLocation::Model => quote! { #root::models::#ident },
        TypeLocation::InputObject => quote! { #root::resolvers::inputs::#ident },
        TypeLocation::OutputObject => quote! { #root::resolvers::outputs::#ident },
    }
}

/// Type of an output member
pub fn output_type(type_ref: &TypeRef, is_required: bool, root: &TokenStream) -> TokenStream {
    let base = type_path(type_ref, root);
    let ty = if type_ref.is_list {
        quote! { Vec<#base> }
    } else {
        base
    };
    if is_required {
        ty
    } else {
        quote! { Option<#ty> }
    }
}

/// Type of an input member or argument
///
/// Single nested input objects are boxed: input types are routinely
/// self-referential (`AND: PostWhereInput`).
pub fn input_field_type(field: &InputField, root: &TokenStream) -> TokenStream {
    let base = type_path(&field.selected, root);
    let ty = if field.selected.is_list {
        quote! { Vec<#base> }
    } else if field.selected.location == TypeLocation::InputObject {
        quote! { Box<#base> }
    } else {
        base
    };
    if field.is_required {
        ty
    } else {
        quote! { Option<#ty> }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::root_path;

    fn render(tokens: TokenStream) -> String {
        tokens.to_string().replace(' ', "")
    }

    #[test]
    fn test_output_types() {
        let root = root_path(2);
        let post = TypeRef::new(TypeLocation::Model, "Post", true);
        assert_eq!(render(output_type(&post, true, &root)), "Vec<super::super::models::Post>");
        let date = TypeRef::new(TypeLocation::Scalar, "DateTime", false);
        assert_eq!(
            render(output_type(&date, false, &root)),
            "Option<super::super::scalars::DateTime>"
        );
    }

    #[test]
    fn test_input_objects_are_boxed() {
        let root = root_path(3);
        let field = InputField {
            name: "AND".to_string(),
            type_name: "AND".to_string(),
            is_required: false,
            selected: TypeRef::new(TypeLocation::InputObject, "PostWhereInput", false),
            is_omitted: false,
        };
        assert_eq!(
            render(input_field_type(&field, &root)),
            "Option<Box<super::super::super::resolvers::inputs::PostWhereInput>>"
        );
    }
}
