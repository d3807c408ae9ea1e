//! Type name resolution
//!
//! [`TypeNameCache`] is owned by one [`super::DmmfDocument`]: it knows every
//! model and enum display name and memoizes output/input type renames so each
//! raw name is classified once per run.

use super::raw;
use super::types::{TypeLocation, TypeRef};
use crate::error::GeneratorError;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Scalars the client API may reference
pub const KNOWN_SCALARS: &[&str] = &[
    "String", "Int", "BigInt", "Float", "Decimal", "Boolean", "DateTime", "Json", "Bytes", "Null",
];

/// Per-model output type suffixes and the name they map to
const DEDICATED_OUTPUT_SUFFIXES: &[(&str, &str)] = &[
    ("CountAggregateOutputType", "CountAggregate"),
    ("AvgAggregateOutputType", "AvgAggregate"),
    ("SumAggregateOutputType", "SumAggregate"),
    ("MinAggregateOutputType", "MinAggregate"),
    ("MaxAggregateOutputType", "MaxAggregate"),
    ("GroupByOutputType", "GroupBy"),
    ("CountOutputType", "Count"),
];

const AND_RETURN_PREFIXES: &[&str] = &["CreateMany", "UpdateMany"];
const AND_RETURN_SUFFIX: &str = "AndReturnOutputType";

/// Name lookups and memoized renames for one run
#[derive(Debug, Default)]
pub struct TypeNameCache {
    /// Source or display model name -> display name
    models: HashMap<String, String>,
    /// Source model names, longest first, for prefix matching
    model_names: Vec<String>,
    /// Source enum name -> display name
    enums: HashMap<String, String>,
    /// Resolved output name -> collision-free name
    output_overrides: HashMap<String, String>,
    known_inputs: HashSet<String>,
    known_outputs: HashSet<String>,
    output_names: RwLock<HashMap<String, String>>,
    input_names: RwLock<HashMap<String, String>>,
}

impl TypeNameCache {
    pub fn register_model(&mut self, name: &str, type_name: &str) {
        self.models.insert(name.to_string(), type_name.to_string());
        self.models.insert(type_name.to_string(), type_name.to_string());
        self.model_names.push(name.to_string());
        self.model_names
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    pub fn register_enum(&mut self, name: &str, type_name: &str) {
        self.enums.insert(name.to_string(), type_name.to_string());
    }

    pub fn register_output_override(&mut self, resolved: &str, final_name: &str) {
        self.output_overrides
            .insert(resolved.to_string(), final_name.to_string());
    }

    pub fn register_known_types<'a>(
        &mut self,
        inputs: impl IntoIterator<Item = &'a str>,
        outputs: impl IntoIterator<Item = &'a str>,
    ) {
        self.known_inputs.extend(inputs.into_iter().map(str::to_string));
        self.known_outputs
            .extend(outputs.into_iter().map(str::to_string));
    }

    /// Display name of a model given its source or display name
    pub fn model_type_name(&self, name: &str) -> Option<&str> {
        self.models.get(name).map(String::as_str)
    }

    /// Display name of an enum given its source name
    pub fn enum_type_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.enums.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Source model a derived type name starts with (longest match wins)
    pub fn model_name_for_type(&self, type_name: &str) -> Option<&str> {
        self.model_names
            .iter()
            .find(|model| {
                type_name
                    .strip_prefix(model.as_str())
                    .is_some_and(|rest| rest.chars().next().is_none_or(char::is_uppercase))
            })
            .map(String::as_str)
    }

    /// Map aggregate/group-by/count pseudo types to display-name based names
    ///
    /// Unrecognized names pass through unchanged; the result is a fixed point.
    pub fn resolve_output_type_name(&self, name: &str) -> String {
        if let Some(hit) = self
            .output_names
            .read()
            .ok()
            .and_then(|cache| cache.get(name).cloned())
        {
            return hit;
        }

        let mapped = self.base_output_type_name(name);
        let resolved = self
            .output_overrides
            .get(&mapped)
            .cloned()
            .unwrap_or(mapped);

        if let Ok(mut cache) = self.output_names.write() {
            cache.insert(name.to_string(), resolved.clone());
        }
        resolved
    }

    /// Rename without collision overrides and without memoizing
    pub fn base_output_type_name(&self, name: &str) -> String {
        if let Some(model) = name.strip_prefix("Aggregate") {
            if let Some(type_name) = self.model_type_name(model) {
                return format!("Aggregate{}", type_name);
            }
        }
        for prefix in AND_RETURN_PREFIXES {
            if let Some(model) = name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(AND_RETURN_SUFFIX))
            {
                if let Some(type_name) = self.model_type_name(model) {
                    return format!("{}{}{}", prefix, type_name, AND_RETURN_SUFFIX);
                }
            }
        }
        for (suffix, replacement) in DEDICATED_OUTPUT_SUFFIXES {
            if let Some(model) = name.strip_suffix(suffix) {
                if let Some(type_name) = self.model_type_name(model) {
                    return format!("{}{}", type_name, replacement);
                }
            }
        }
        name.to_string()
    }

    /// Rename the model prefix of an input type to the model display name
    pub fn resolve_input_type_name(&self, name: &str) -> String {
        if let Some(hit) = self
            .input_names
            .read()
            .ok()
            .and_then(|cache| cache.get(name).cloned())
        {
            return hit;
        }

        let resolved = match self.model_name_for_type(name) {
            Some(model) => {
                let type_name = self.model_type_name(model).unwrap_or(model);
                format!("{}{}", type_name, &name[model.len()..])
            }
            None => name.to_string(),
        };

        if let Ok(mut cache) = self.input_names.write() {
            cache.insert(name.to_string(), resolved.clone());
        }
        resolved
    }

    /// Resolve a raw type reference to a generated type
    pub fn resolve(&self, type_ref: &raw::TypeRef, context: &str) -> Result<TypeRef, GeneratorError> {
        let unresolved = || GeneratorError::UnresolvedType {
            type_name: type_ref.type_name.clone(),
            location: type_ref.location.as_str().to_string(),
            context: context.to_string(),
        };
        let name = type_ref.type_name.as_str();

        let resolved = match type_ref.location {
            raw::Location::Scalar if KNOWN_SCALARS.contains(&name) => {
                TypeRef::new(TypeLocation::Scalar, name, type_ref.is_list)
            }
            raw::Location::EnumTypes if self.is_enum(name) => {
                TypeRef::new(TypeLocation::Enum, self.enum_type_name(name), type_ref.is_list)
            }
            raw::Location::InputObjectTypes if self.known_inputs.contains(name) => TypeRef::new(
                TypeLocation::InputObject,
                self.resolve_input_type_name(name),
                type_ref.is_list,
            ),
            raw::Location::OutputObjectTypes
                if type_ref.namespace.as_deref() != Some("prisma")
                    && self.model_names.iter().any(|m| m == name) =>
            {
                let type_name = self.model_type_name(name).ok_or_else(unresolved)?;
                TypeRef::new(TypeLocation::Model, type_name, type_ref.is_list)
            }
            raw::Location::OutputObjectTypes if self.known_outputs.contains(name) => TypeRef::new(
                TypeLocation::OutputObject,
                self.resolve_output_type_name(name),
                type_ref.is_list,
            ),
            _ => return Err(unresolved()),
        };
        Ok(resolved)
    }

    /// Resolve a datamodel field type
    pub fn resolve_field(&self, field: &raw::Field, context: &str) -> Result<TypeRef, GeneratorError> {
        let location = match field.kind {
            raw::FieldKind::Scalar => raw::Location::Scalar,
            raw::FieldKind::Enum => raw::Location::EnumTypes,
            raw::FieldKind::Object => raw::Location::OutputObjectTypes,
            raw::FieldKind::Unsupported => {
                return Err(GeneratorError::UnresolvedType {
                    type_name: field.type_name.clone(),
                    location: "unsupported".to_string(),
                    context: context.to_string(),
                });
            }
        };
        self.resolve(
            &raw::TypeRef {
                type_name: field.type_name.clone(),
                location,
                is_list: field.is_list,
                namespace: Some("model".to_string()),
            },
            context,
        )
    }
}
