//! Raw schema to semantic model transformers
//!
//! Each function derives one part of the semantic model. They are sequenced by
//! [`super::DmmfDocument::new`]; the ordering constraints are documented there.

use super::annotations::{self, InputOmit};
use super::naming::{camel_case, pascal_case, pluralize};
use super::raw;
use super::resolve::TypeNameCache;
use super::types::{
    Action, ActionKind, CompositeKey, Enum, EnumValue, FieldKind, InputField, InputType, KeyInfo,
    Mapping, Model, ModelField, OperationKind, OutputField, OutputType, RelationField, RelationModel,
    TypeLocation,
};
use super::variant::{select_input_type_variant, VariantMode};
use crate::config::GeneratorOptions;
use crate::error::GeneratorError;
use std::collections::{HashMap, HashSet};

/// Root output types, emitted as resolvers rather than output types
pub const ROOT_TYPES: &[&str] = &["Query", "Mutation"];

/// Stage 1 record: identity and name of a model, no fields yet
#[derive(Debug, Clone)]
pub struct BareModel<'a> {
    pub raw: &'a raw::Model,
    pub type_name: String,
    pub plural: String,
    pub alias: Option<String>,
    pub docs: Option<String>,
    pub omit_input: bool,
    pub omit_output: bool,
    pub is_composite_type: bool,
}

/// Stage 1: parse annotations of every model, without assigning names yet
pub fn bare_models<'a>(datamodel: &'a raw::Datamodel) -> Vec<BareModel<'a>> {
    let models = datamodel.models.iter().map(|m| (m, false));
    let types = datamodel.types.iter().map(|m| (m, true));
    models
        .chain(types)
        .map(|(raw, is_composite_type)| {
            let ann = annotations::parse(raw.documentation.as_deref());
            BareModel {
                raw,
                type_name: String::new(),
                plural: ann.plural.clone().unwrap_or_default(),
                alias: ann.name,
                docs: ann.docs,
                omit_input: matches!(ann.omit_input, Some(InputOmit::Always)),
                omit_output: ann.omit_output.unwrap_or(false),
                is_composite_type,
            }
        })
        .collect()
}

/// Allocates collision-free display names
///
/// Explicit names are claimed first, so a computed name never displaces an alias.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
}

impl NameRegistry {
    /// Claim `preferred`, or `preferred + suffix`, or `preferred + suffix + n`
    pub fn claim(&mut self, preferred: &str, suffix: &str) -> String {
        if self.taken.insert(preferred.to_string()) {
            return preferred.to_string();
        }
        let suffixed = format!("{}{}", preferred, suffix);
        if self.taken.insert(suffixed.clone()) {
            return suffixed;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", suffixed, n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Assign model display names: explicit aliases first, computed names after
pub fn assign_model_names(models: &mut [BareModel<'_>], registry: &mut NameRegistry) {
    for model in models.iter_mut().filter(|m| m.alias.is_some()) {
        let alias = model.alias.clone().unwrap_or_default();
        model.type_name = registry.claim(&alias, "Model");
    }
    for model in models.iter_mut().filter(|m| m.alias.is_none()) {
        model.type_name = registry.claim(&pascal_case(&model.raw.name), "Model");
    }
    for model in models.iter_mut() {
        if model.plural.is_empty() {
            model.plural = pluralize(&model.type_name);
        }
    }
}

/// Datamodel and schema enums, de-duplicated by source name (datamodel wins)
pub fn collect_enums(raw: &raw::Document) -> Vec<(String, Vec<String>, Option<String>)> {
    let mut seen = HashSet::new();
    let mut enums = Vec::new();
    for e in &raw.datamodel.enums {
        if seen.insert(e.name.clone()) {
            let ann = annotations::parse(e.documentation.as_deref());
            let values = e.values.iter().map(|v| v.name.clone()).collect();
            enums.push((e.name.clone(), values, ann.docs));
        }
    }
    for e in raw.schema.enum_types.iter() {
        if seen.insert(e.name.clone()) {
            enums.push((e.name.clone(), e.values.clone(), None));
        }
    }
    enums
}

/// Model source name behind a `<Model>ScalarFieldEnum`
fn scalar_field_enum_model(name: &str) -> Option<&str> {
    name.strip_suffix("ScalarFieldEnum")
}

/// Enum pass; run once before field resolution (names) and once after (value aliases)
pub fn transform_enums(
    enums: &[(String, Vec<String>, Option<String>)],
    cache: &TypeNameCache,
    models: &[Model],
    registry: Option<&mut NameRegistry>,
) -> Vec<Enum> {
    let mut registry = registry;
    enums
        .iter()
        .map(|(name, values, docs)| {
            let model_name = scalar_field_enum_model(name).filter(|m| cache.model_type_name(m).is_some());
            let preferred = match model_name {
                Some(model) => format!(
                    "{}ScalarFieldEnum",
                    cache.model_type_name(model).unwrap_or(model)
                ),
                None => name.clone(),
            };
            let type_name = match registry.as_deref_mut() {
                Some(registry) => registry.claim(&preferred, "Enum"),
                None => cache.enum_type_name(name).to_string(),
            };
            let model = model_name.and_then(|m| models.iter().find(|model| model.name == m));
            let values = values
                .iter()
                .map(|value| EnumValue {
                    value: value.clone(),
                    name: model
                        .and_then(|model| model.field(value))
                        .map(|field| field.output_name().to_string())
                        .unwrap_or_else(|| value.clone()),
                })
                .collect();
            Enum {
                name: name.clone(),
                type_name,
                docs: docs.clone(),
                values,
            }
        })
        .collect()
}

/// Stage 2: resolve every field of a model
///
/// Requires every model and enum display name to be registered in `cache`.
pub fn resolve_model(
    bare: &BareModel<'_>,
    cache: &TypeNameCache,
    output_omitted_models: &HashSet<&str>,
    options: &GeneratorOptions,
) -> Result<Model, GeneratorError> {
    let raw = bare.raw;
    let mut fields = Vec::with_capacity(raw.fields.len());
    for field in &raw.fields {
        let context = format!("{}.{}", raw.name, field.name);
        let ann = annotations::parse(field.documentation.as_deref());
        let type_ref = cache.resolve_field(field, &context)?;
        // object fields without a relation are composite types
        let kind = match field.kind {
            raw::FieldKind::Object if field.relation_name.is_some() => FieldKind::Relation,
            raw::FieldKind::Object => FieldKind::Embedded,
            raw::FieldKind::Enum => FieldKind::Enum,
            _ => FieldKind::Scalar,
        };

        let targets_hidden_model = matches!(kind, FieldKind::Relation | FieldKind::Embedded)
            && output_omitted_models.contains(field.type_name.as_str());
        let omit_output = targets_hidden_model
            || ann
                .omit_output
                .unwrap_or_else(|| options.omit_output_fields_by_default.contains(&field.name));
        let omit_input = if bare.omit_input {
            InputOmit::Always
        } else {
            ann.omit_input.unwrap_or_else(|| {
                if options.omit_input_fields_by_default.contains(&field.name) {
                    InputOmit::Always
                } else {
                    InputOmit::Never
                }
            })
        };

        fields.push(ModelField {
            name: field.name.clone(),
            alias: ann.name,
            kind,
            type_ref,
            is_required: field.is_required,
            is_id: field.is_id,
            is_unique: field.is_unique,
            relation_name: field.relation_name.clone(),
            docs: ann.docs,
            omit_output: omit_output || bare.omit_output,
            omit_input,
        });
    }

    let check_key = |key: &CompositeKey, key_label: String| -> Result<(), GeneratorError> {
        for name in &key.fields {
            if !fields.iter().any(|f| &f.name == name) {
                return Err(GeneratorError::MissingKeyField {
                    model: raw.name.clone(),
                    key: key_label.clone(),
                    field: name.clone(),
                });
            }
        }
        Ok(())
    };

    let primary_key = raw
        .primary_key
        .as_ref()
        .filter(|pk| !pk.fields.is_empty())
        .map(|pk| CompositeKey {
            name: pk.name.clone(),
            fields: pk.fields.clone(),
        });
    if let Some(pk) = &primary_key {
        check_key(pk, pk.filter_name())?;
    }

    let mut unique_indexes: Vec<CompositeKey> = raw
        .unique_indexes
        .iter()
        .map(|idx| CompositeKey {
            name: idx.name.clone(),
            fields: idx.fields.clone(),
        })
        .collect();
    if unique_indexes.is_empty() {
        unique_indexes = raw
            .unique_fields
            .iter()
            .map(|fields| CompositeKey {
                name: None,
                fields: fields.clone(),
            })
            .collect();
    }
    for idx in &unique_indexes {
        check_key(idx, idx.filter_name())?;
    }

    Ok(Model {
        name: raw.name.clone(),
        type_name: bare.type_name.clone(),
        plural: bare.plural.clone(),
        fields,
        primary_key,
        unique_indexes,
        docs: bare.docs.clone(),
        omit_input: bare.omit_input,
        omit_output: bare.omit_output,
        is_composite_type: bare.is_composite_type,
    })
}

fn variant_mode(options: &GeneratorOptions) -> VariantMode {
    VariantMode {
        simple_inputs: options.use_simple_inputs,
        unchecked_inputs: options.use_unchecked_scalar_inputs,
    }
}

/// Resolve an argument or input field, selecting its input variant
fn transform_input_field(
    field: &raw::InputField,
    owner: &str,
    model: Option<&Model>,
    cache: &TypeNameCache,
    options: &GeneratorOptions,
) -> Result<InputField, GeneratorError> {
    let context = format!("{}.{}", owner, field.name);
    let selected = select_input_type_variant(&field.input_types, variant_mode(options)).ok_or_else(
        || GeneratorError::UnresolvedType {
            type_name: field
                .input_types
                .first()
                .map(|t| t.type_name.clone())
                .unwrap_or_default(),
            location: "none".to_string(),
            context: context.clone(),
        },
    )?;
    let model_field = model.and_then(|m| m.field(&field.name));

    Ok(InputField {
        name: field.name.clone(),
        type_name: model_field
            .map(|f| f.output_name().to_string())
            .unwrap_or_else(|| field.name.clone()),
        is_required: field.is_required,
        selected: cache.resolve(selected, &context)?,
        is_omitted: model_field.is_some_and(|f| f.omit_input.hides_in(owner)),
    })
}

/// Input object types with selected variants; deprecated fields are dropped
pub fn transform_input_types(
    raw: &raw::Document,
    models: &[Model],
    cache: &TypeNameCache,
    options: &GeneratorOptions,
) -> Result<Vec<InputType>, GeneratorError> {
    raw.schema
        .input_object_types
        .iter()
        .map(|input| {
            let model_name = cache.model_name_for_type(&input.name);
            let model = model_name.and_then(|name| models.iter().find(|m| m.name == name));
            let fields = input
                .fields
                .iter()
                .filter(|f| f.deprecation.is_none())
                .map(|f| transform_input_field(f, &input.name, model, cache, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(InputType {
                name: input.name.clone(),
                type_name: cache.resolve_input_type_name(&input.name),
                model: model_name.map(str::to_string),
                fields,
            })
        })
        .collect()
}

/// Output object types with renamed pseudo types and argument bundles
///
/// Fields of generated output types that return a hidden model are dropped;
/// `hidden_models` holds display names.
pub fn transform_output_types(
    raw: &raw::Document,
    cache: &TypeNameCache,
    hidden_models: &HashSet<&str>,
    options: &GeneratorOptions,
) -> Result<Vec<OutputType>, GeneratorError> {
    raw.schema
        .output_object_types
        .iter()
        .map(|output| {
            let is_model = output_is_model(raw, output);
            let type_name = if is_model {
                cache
                    .model_type_name(&output.name)
                    .unwrap_or(&output.name)
                    .to_string()
            } else {
                cache.resolve_output_type_name(&output.name)
            };
            let is_generated = !is_model && !ROOT_TYPES.contains(&output.name.as_str());
            let fields = output
                .fields
                .iter()
                .map(|field| -> Result<Option<OutputField>, GeneratorError> {
                    let context = format!("{}.{}", output.name, field.name);
                    let resolved = cache.resolve(&field.output_type, &context)?;
                    if is_generated
                        && resolved.location == TypeLocation::Model
                        && hidden_models.contains(resolved.name.as_str())
                    {
                        tracing::debug!(output = %output.name, field = %field.name, "dropping field of hidden model");
                        return Ok(None);
                    }
                    let args = field
                        .args
                        .iter()
                        .map(|arg| transform_input_field(arg, &context, None, cache, options))
                        .collect::<Result<Vec<_>, _>>()?;
                    let args_type_name = (!args.is_empty())
                        .then(|| format!("{}{}Args", type_name, pascal_case(&field.name)));
                    Ok(Some(OutputField {
                        name: field.name.clone(),
                        is_required: !field.is_nullable,
                        output: resolved,
                        args,
                        args_type_name,
                    }))
                })
                .filter_map(Result::transpose)
                .collect::<Result<Vec<_>, GeneratorError>>()?;
            Ok(OutputType {
                name: output.name.clone(),
                type_name,
                fields,
            })
        })
        .collect()
}

fn output_is_model(raw: &raw::Document, output: &raw::OutputType) -> bool {
    raw.datamodel
        .models
        .iter()
        .chain(raw.datamodel.types.iter())
        .any(|m| m.name == output.name)
}

/// Public operation name of an action
pub fn mapped_action_name(kind: ActionKind, type_name: &str, plural: &str, use_original_mapping: bool) -> String {
    let default_name = format!("{}{}", kind.as_str(), type_name);
    if use_original_mapping || plural == type_name {
        return default_name;
    }
    match kind {
        ActionKind::FindUnique => camel_case(type_name),
        ActionKind::FindUniqueOrThrow => format!("get{}", type_name),
        ActionKind::FindFirstOrThrow => format!("findFirst{}OrThrow", type_name),
        ActionKind::FindMany => camel_case(plural),
        _ => default_name,
    }
}

/// Operation mappings: one per model, actions sorted by kind
pub fn transform_mappings(
    raw: &raw::Document,
    models: &[Model],
    outputs: &[OutputType],
    options: &GeneratorOptions,
) -> Result<Vec<Mapping>, GeneratorError> {
    let mut mappings = Vec::new();
    for mapping in &raw.mappings.model_operations {
        let Some(model) = models.iter().find(|m| m.name == mapping.model) else {
            tracing::debug!(model = %mapping.model, "skipping mapping for unknown model");
            continue;
        };

        let mut entries: Vec<(ActionKind, &str)> = mapping
            .action_fields()
            .filter_map(|(action, field)| ActionKind::parse(action).map(|kind| (kind, field)))
            .collect();
        entries.sort_by_key(|(kind, _)| *kind);

        let mut actions = Vec::with_capacity(entries.len());
        for (kind, field_name) in entries {
            let root = match kind.operation() {
                OperationKind::Query => "Query",
                OperationKind::Mutation => "Mutation",
            };
            let field = outputs
                .iter()
                .find(|o| o.name == root)
                .and_then(|o| o.field(field_name))
                .or_else(|| outputs.iter().find_map(|o| o.field(field_name)))
                .ok_or_else(|| GeneratorError::MissingMappedField {
                    model: mapping.model.clone(),
                    field: field_name.to_string(),
                })?;
            let kind_pascal = pascal_case(kind.as_str());
            actions.push(Action {
                kind,
                field_name: field_name.to_string(),
                name: mapped_action_name(
                    kind,
                    &model.type_name,
                    &model.plural,
                    options.use_original_mapping,
                ),
                args: field.args.clone(),
                args_type_name: (!field.args.is_empty())
                    .then(|| format!("{}{}Args", kind_pascal, model.type_name)),
                output: field.output.clone(),
                is_required: field.is_required,
                resolver_name: format!("{}{}Resolver", kind_pascal, model.type_name),
            });
        }

        mappings.push(Mapping {
            model: model.name.clone(),
            model_type_name: model.type_name.clone(),
            actions,
            resolver_name: format!("{}CrudResolver", model.type_name),
        });
    }
    Ok(mappings)
}

/// Relation models: models with at least one visible relation field in their output type
pub fn transform_relation_models(models: &[Model], outputs: &[OutputType]) -> Vec<RelationModel> {
    let outputs_by_name: HashMap<&str, &OutputType> =
        outputs.iter().map(|o| (o.name.as_str(), o)).collect();

    models
        .iter()
        .filter(|model| !model.omit_output && !model.is_composite_type)
        .filter_map(|model| {
            let output = outputs_by_name.get(model.name.as_str())?;
            let fields: Vec<RelationField> = model
                .fields
                .iter()
                .filter(|f| f.kind == FieldKind::Relation && !f.omit_output)
                .filter_map(|field| {
                    let output_field = output.field(&field.name)?;
                    Some(RelationField {
                        field: field.clone(),
                        output: output_field.clone(),
                        args_type_name: (!output_field.args.is_empty()).then(|| {
                            format!("{}{}Args", model.type_name, pascal_case(&field.name))
                        }),
                    })
                })
                .collect();
            if fields.is_empty() {
                return None;
            }
            Some(RelationModel {
                model: model.name.clone(),
                type_name: model.type_name.clone(),
                fields,
                keys: KeyInfo {
                    id_field: model.fields.iter().find(|f| f.is_id).map(|f| f.name.clone()),
                    unique_field: model
                        .fields
                        .iter()
                        .find(|f| f.is_unique)
                        .map(|f| f.name.clone()),
                    primary_key: model.primary_key.clone(),
                    first_unique_index: model.unique_indexes.first().cloned(),
                },
            })
        })
        .collect()
}
