//! The semantic model of one generator run

use super::raw;
use super::resolve::TypeNameCache;
use super::transform::{self, NameRegistry, ROOT_TYPES};
use super::types::{Enum, InputType, Mapping, Model, ModelField, OutputType, RelationModel};
use crate::config::{EmitBlock, GeneratorOptions};
use crate::error::GeneratorError;
use std::collections::HashSet;

/// Resolved schema plus the options it was built with
///
/// Built once per run and read concurrently by every block generator.
#[derive(Debug)]
pub struct DmmfDocument {
    pub options: GeneratorOptions,
    pub models: Vec<Model>,
    pub enums: Vec<Enum>,
    pub input_types: Vec<InputType>,
    /// Every output type, model output types and root types included
    pub output_types: Vec<OutputType>,
    pub mappings: Vec<Mapping>,
    pub relation_models: Vec<RelationModel>,
    cache: TypeNameCache,
}

impl DmmfDocument {
    /// Build the semantic model
    ///
    /// Model and enum names must all be known before any field type is
    /// resolved, so models are built in two stages: names first, fields after.
    /// Scalar field enums are revisited once fields (and their aliases) exist.
    pub fn new(raw: &raw::Document, options: &GeneratorOptions) -> Result<Self, GeneratorError> {
        let mut cache = TypeNameCache::default();
        let mut registry = NameRegistry::default();

        let mut bare = transform::bare_models(&raw.datamodel);
        transform::assign_model_names(&mut bare, &mut registry);
        for model in &bare {
            cache.register_model(&model.raw.name, &model.type_name);
        }

        let raw_enums = transform::collect_enums(raw);
        for e in transform::transform_enums(&raw_enums, &cache, &[], Some(&mut registry)) {
            cache.register_enum(&e.name, &e.type_name);
        }

        let model_names: HashSet<&str> = bare.iter().map(|m| m.raw.name.as_str()).collect();
        cache.register_known_types(
            raw.schema.input_object_types.iter().map(|t| t.name.as_str()),
            raw.schema.output_object_types.iter().map(|t| t.name.as_str()),
        );
        for output in raw.schema.output_object_types.iter() {
            if ROOT_TYPES.contains(&output.name.as_str()) || model_names.contains(output.name.as_str()) {
                continue;
            }
            let base = cache.base_output_type_name(&output.name);
            let claimed = registry.claim(&base, "Output");
            if claimed != base {
                tracing::debug!(output = %output.name, name = %claimed, "renamed colliding output type");
                cache.register_output_override(&base, &claimed);
            }
        }

        let output_omitted: HashSet<&str> = bare
            .iter()
            .filter(|m| m.omit_output)
            .map(|m| m.raw.name.as_str())
            .collect();
        let models = bare
            .iter()
            .map(|m| transform::resolve_model(m, &cache, &output_omitted, options))
            .collect::<Result<Vec<_>, _>>()?;

        let enums = transform::transform_enums(&raw_enums, &cache, &models, None);
        let input_types = transform::transform_input_types(raw, &models, &cache, options)?;
        let hidden_models: HashSet<&str> = bare
            .iter()
            .filter(|m| m.omit_output)
            .map(|m| m.type_name.as_str())
            .collect();
        let output_types = transform::transform_output_types(raw, &cache, &hidden_models, options)?;
        let mappings = transform::transform_mappings(raw, &models, &output_types, options)?;
        let relation_models = transform::transform_relation_models(&models, &output_types);

        tracing::debug!(
            models = models.len(),
            enums = enums.len(),
            inputs = input_types.len(),
            outputs = output_types.len(),
            mappings = mappings.len(),
            relation_models = relation_models.len(),
            "built semantic model"
        );

        Ok(Self {
            options: options.clone(),
            models,
            enums,
            input_types,
            output_types,
            mappings,
            relation_models,
            cache,
        })
    }

    /// Whether a block is part of this run
    pub fn should_generate(&self, block: EmitBlock) -> bool {
        self.options.emits(block)
    }

    /// Model by source or display name
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .or_else(|| self.models.iter().find(|m| m.type_name == name))
    }

    pub fn model_field(&self, model: &str, field: &str) -> Option<&ModelField> {
        self.model(model).and_then(|m| m.field(field))
    }

    /// Output type by source name
    pub fn output_type(&self, name: &str) -> Option<&OutputType> {
        self.output_types.iter().find(|o| o.name == name)
    }

    /// Enum by display name
    pub fn enum_by_type_name(&self, type_name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.type_name == type_name)
    }

    /// Models emitted as object types (persisted models and composite types)
    pub fn emitted_models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter().filter(|m| !m.omit_output)
    }

    /// Output types of the outputs block: no root types, no model types
    pub fn generated_output_types(&self) -> impl Iterator<Item = &OutputType> {
        self.output_types.iter().filter(|o| {
            !ROOT_TYPES.contains(&o.name.as_str()) && self.models.iter().all(|m| m.name != o.name)
        })
    }

    /// Mappings of models that expose resolvers
    pub fn resolver_mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings
            .iter()
            .filter(|m| self.model(&m.model).is_some_and(|model| !model.omit_output))
    }

    /// Final name of a raw output type
    pub fn output_type_name(&self, name: &str) -> String {
        self.cache.resolve_output_type_name(name)
    }

    /// Final name of a raw input type
    pub fn input_type_name(&self, name: &str) -> String {
        self.cache.resolve_input_type_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmmf::fixtures;
    use crate::dmmf::types::{ActionKind, FieldKind, TypeLocation, TypeRef, UniqueFilter};

    fn document() -> DmmfDocument {
        DmmfDocument::new(&fixtures::blog(), &GeneratorOptions::new("generated")).unwrap()
    }

    #[test]
    fn test_models_resolve_fields_once() {
        let doc = document();
        let post = doc.model("Post").unwrap();
        assert_eq!(post.plural, "Posts");
        assert_eq!(post.docs.as_deref(), Some("A blog entry"));
        let author = post.field("author").unwrap();
        assert_eq!(author.kind, FieldKind::Relation);
        assert_eq!(author.type_ref, TypeRef::new(TypeLocation::Model, "User", false));

        let user = doc.model("User").unwrap();
        assert_eq!(user.field("name").unwrap().output_name(), "displayName");
        assert!(user.field("password").unwrap().omit_output);
        assert_eq!(
            user.field("role").unwrap().type_ref,
            TypeRef::new(TypeLocation::Enum, "Role", false)
        );
    }

    #[test]
    fn test_scalar_field_enum_uses_aliases() {
        let doc = document();
        let user_fields = doc.enum_by_type_name("UserScalarFieldEnum").unwrap();
        let name = user_fields.values.iter().find(|v| v.value == "name").unwrap();
        assert_eq!(name.name, "displayName");
        assert!(doc.enum_by_type_name("SortOrder").is_some());
        assert_eq!(doc.enums.iter().filter(|e| e.name == "Role").count(), 1);
    }

    #[test]
    fn test_input_types() {
        let doc = document();
        let where_input = doc.input_types.iter().find(|i| i.name == "UserWhereInput").unwrap();
        assert_eq!(where_input.model.as_deref(), Some("User"));
        assert!(where_input.fields.iter().all(|f| f.name != "nickname"));
        let password = where_input.fields.iter().find(|f| f.name == "password").unwrap();
        assert!(password.is_omitted);
        let name = where_input.fields.iter().find(|f| f.name == "name").unwrap();
        assert_eq!(name.type_name, "displayName");
        assert_eq!(name.selected.name, "StringFilter");

        let create = doc.input_types.iter().find(|i| i.name == "UserCreateInput").unwrap();
        assert!(!create.fields.iter().find(|f| f.name == "password").unwrap().is_omitted);
    }

    #[test]
    fn test_output_types_are_renamed() {
        let doc = document();
        let aggregate = doc.output_type("AggregatePost").unwrap();
        assert_eq!(aggregate.field("_count").unwrap().output.name, "PostCountAggregate");
        let names: Vec<_> = doc.generated_output_types().map(|o| o.type_name.as_str()).collect();
        assert!(names.contains(&"PostAvgAggregate"));
        assert!(names.contains(&"UserCount"));
        assert!(!names.contains(&"Query"));
        assert!(!names.contains(&"User"));

        let posts = doc.output_type("User").unwrap().field("posts").unwrap();
        assert_eq!(posts.args_type_name.as_deref(), Some("UserPostsArgs"));
    }

    #[test]
    fn test_mappings() {
        let doc = document();
        let post = doc.mappings.iter().find(|m| m.model == "Post").unwrap();
        assert_eq!(post.resolver_name, "PostCrudResolver");
        let kinds: Vec<_> = post.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::Aggregate,
                ActionKind::CreateOne,
                ActionKind::DeleteMany,
                ActionKind::FindMany,
                ActionKind::FindUnique,
                ActionKind::UpdateOne,
            ]
        );
        let find_many = post.actions.iter().find(|a| a.kind == ActionKind::FindMany).unwrap();
        assert_eq!(find_many.name, "posts");
        assert_eq!(find_many.args_type_name.as_deref(), Some("FindManyPostArgs"));
        assert_eq!(find_many.resolver_name, "FindManyPostResolver");
        let create = post.actions.iter().find(|a| a.kind == ActionKind::CreateOne).unwrap();
        assert_eq!(create.args[0].selected.name, "PostCreateInput");
    }

    #[test]
    fn test_missing_mapped_field() {
        let mut raw = fixtures::blog();
        raw.mappings.model_operations[0]
            .actions
            .insert("groupBy".to_string(), serde_json::json!("groupByPost"));
        let err = DmmfDocument::new(&raw, &GeneratorOptions::new("generated")).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingMappedField { field, .. } if field == "groupByPost"));
    }

    #[test]
    fn test_relation_models() {
        let doc = document();
        let names: Vec<_> = doc.relation_models.iter().map(|r| r.type_name.as_str()).collect();
        assert_eq!(names, vec!["User", "Post"]);
        let user = &doc.relation_models[0];
        assert_eq!(user.fields[0].args_type_name.as_deref(), Some("UserPostsArgs"));
        assert_eq!(user.unique_filter().unwrap(), UniqueFilter::Single("id".to_string()));
    }

    #[test]
    fn test_model_alias_and_collisions() {
        let mut value = fixtures::blog_json();
        value["datamodel"]["models"][0]["documentation"] =
            serde_json::json!("@TypeGraphQL.type(name: \"Role\")");
        let raw: raw::Document = serde_json::from_value(value).unwrap();
        let doc = DmmfDocument::new(&raw, &GeneratorOptions::new("generated")).unwrap();

        assert_eq!(doc.model("User").unwrap().type_name, "Role");
        assert_eq!(doc.enums.iter().find(|e| e.name == "Role").unwrap().type_name, "RoleEnum");
        assert_eq!(doc.model("Post").unwrap().field("author").unwrap().type_ref.name, "Role");
        assert!(doc.enum_by_type_name("RoleScalarFieldEnum").is_some());
    }

    #[test]
    fn test_model_level_output_omission() {
        let mut value = fixtures::blog_json();
        value["datamodel"]["models"][0]["documentation"] =
            serde_json::json!("@TypeGraphQL.omit(output: true)");
        let raw: raw::Document = serde_json::from_value(value).unwrap();
        let doc = DmmfDocument::new(&raw, &GeneratorOptions::new("generated")).unwrap();

        assert!(doc.model_field("Post", "author").unwrap().omit_output);
        assert!(doc.resolver_mappings().all(|m| m.model != "User"));
        assert!(doc.relation_models.is_empty());
        assert!(doc.emitted_models().all(|m| m.name != "User"));
    }

    #[test]
    fn test_composite_types_are_embedded() {
        let doc = DmmfDocument::new(&fixtures::blog_with_address(), &GeneratorOptions::new("generated")).unwrap();

        let address = doc.model("Address").unwrap();
        assert!(address.is_composite_type);
        let field = doc.model_field("User", "address").unwrap();
        assert_eq!(field.kind, FieldKind::Embedded);
        assert_eq!(field.type_ref, TypeRef::new(TypeLocation::Model, "Address", false));

        let user = doc.relation_models.iter().find(|r| r.model == "User").unwrap();
        let fields: Vec<_> = user.fields.iter().map(|f| f.field.name.as_str()).collect();
        assert_eq!(fields, vec!["posts"]);
        assert!(doc.relation_models.iter().all(|r| r.model != "Address"));
        assert!(doc.resolver_mappings().all(|m| m.model != "Address"));
    }

    #[test]
    fn test_output_fields_of_hidden_models_are_dropped() {
        let doc = DmmfDocument::new(&fixtures::blog_with_hidden_user(), &GeneratorOptions::new("generated")).unwrap();
        let output = doc.output_type("CreateManyPostAndReturnOutputType").unwrap();
        let fields: Vec<_> = output.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["id"]);
        // root types keep them for the mappings
        assert!(doc.output_type("Query").unwrap().field("findUniqueUser").is_some());
    }
}
