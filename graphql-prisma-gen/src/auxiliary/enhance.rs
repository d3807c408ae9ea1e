//! Enhancement map
//!
//! Static metadata tying each model to its relation fields, operations and
//! the input and output types built around it. Application code uses it to
//! attach guards or custom logic per model without parsing generated names.

use crate::dmmf::{DmmfDocument, Model};
use crate::emit::file_header;
use proc_macro2::TokenStream;
use quote::quote;

pub const ENHANCE_FILE: &str = "enhance.rs";

/// Model owning a raw output type name: the longest model name it starts with
///
/// Aggregate and create-many result types carry the model after a prefix.
fn owning_model<'a>(doc: &'a DmmfDocument, raw_name: &str) -> Option<&'a Model> {
    let name = raw_name
        .strip_prefix("Aggregate")
        .or_else(|| raw_name.strip_prefix("CreateMany"))
        .unwrap_or(raw_name);
    doc.models
        .iter()
        .filter(|m| name.starts_with(m.name.as_str()))
        .max_by_key(|m| m.name.len())
}

/// `generated_output_types` are the output types the outputs block emitted
pub fn generate_enhance_map(doc: &DmmfDocument, generated_output_types: &[String]) -> TokenStream {
    let header = file_header("Model enhancement map");

    let models = doc.emitted_models().filter(|m| !m.is_composite_type).map(|model| {
        let name = &model.type_name;
        let relation_fields: Vec<&str> = doc
            .relation_models
            .iter()
            .filter(|r| r.model == model.name)
            .flat_map(|r| r.fields.iter().map(|f| f.field.output_name()))
            .collect();

        let actions: Vec<TokenStream> = doc
            .resolver_mappings()
            .filter(|m| m.model == model.name)
            .flat_map(|m| m.actions.iter())
            .map(|action| {
                let operation = &action.name;
                let kind = action.kind.as_str();
                let resolver = &action.resolver_name;
                quote! {
                    ActionMeta { kind: #kind, operation: #operation, resolver: #resolver }
                }
            })
            .collect();

        let input_types: Vec<&str> = doc
            .input_types
            .iter()
            .filter(|i| i.model.as_deref() == Some(model.name.as_str()))
            .map(|i| i.type_name.as_str())
            .collect();

        let output_types: Vec<&str> = doc
            .generated_output_types()
            .filter(|o| generated_output_types.contains(&o.type_name))
            .filter(|o| owning_model(doc, &o.name).is_some_and(|owner| owner.name == model.name))
            .map(|o| o.type_name.as_str())
            .collect();

        quote! {
            ModelMeta {
                name: #name,
                relation_fields: &[#(#relation_fields),*],
                actions: &[#(#actions),*],
                input_types: &[#(#input_types),*],
                output_types: &[#(#output_types),*],
            }
        }
    });

    quote! {
        #header

        /// One operation of a model
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct ActionMeta {
            /// Client action, e.g. `findMany`
            pub kind: &'static str,
            /// GraphQL field name
            pub operation: &'static str,
            pub resolver: &'static str,
        }

        /// Everything generated around one model
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct ModelMeta {
            pub name: &'static str,
            pub relation_fields: &'static [&'static str],
            pub actions: &'static [ActionMeta],
            pub input_types: &'static [&'static str],
            pub output_types: &'static [&'static str],
        }

        pub static MODELS: &[ModelMeta] = &[#(#models),*];

        /// Every generated output type
        pub static OUTPUT_TYPES: &[&str] = &[#(#generated_output_types),*];

        pub fn model(name: &str) -> Option<&'static ModelMeta> {
            MODELS.iter().find(|m| m.name == name)
        }

        /// Model and action metadata behind a GraphQL operation
        pub fn operation(name: &str) -> Option<(&'static ModelMeta, &'static ActionMeta)> {
            MODELS.iter().find_map(|m| {
                m.actions
                    .iter()
                    .find(|a| a.operation == name)
                    .map(|a| (m, a))
            })
        }
    }
}
