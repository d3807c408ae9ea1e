//! Semantic schema model
//!
//! The enriched, resolved representation every block generator reads. All
//! names here are final output names; raw names are kept alongside for
//! lookups and for the runtime calls the generated code makes.

use super::annotations::InputOmit;

/// Where a resolved type lives in the generated tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeLocation {
    Scalar,
    Enum,
    InputObject,
    OutputObject,
    /// A datamodel model (output object emitted by the models block)
    Model,
}

/// A resolved type reference: (location, output name, list-ness)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub location: TypeLocation,
    pub name: String,
    pub is_list: bool,
}

impl TypeRef {
    pub fn new(location: TypeLocation, name: impl Into<String>, is_list: bool) -> Self {
        Self {
            location,
            name: name.into(),
            is_list,
        }
    }
}

/// Classification of a model field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Enum,
    Relation,
    /// Composite type stored inline on its owner
    Embedded,
}

/// A composite primary key or unique index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    pub name: Option<String>,
    pub fields: Vec<String>,
}

impl CompositeKey {
    /// Key name used in unique filters: declared name or underscore-joined fields
    pub fn filter_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.fields.join("_"))
    }
}

/// A model (or composite type) with resolved fields
#[derive(Debug, Clone)]
pub struct Model {
    /// Source name from the schema
    pub name: String,
    /// Display name used for every generated identifier
    pub type_name: String,
    /// Plural of the display name
    pub plural: String,
    pub fields: Vec<ModelField>,
    pub primary_key: Option<CompositeKey>,
    pub unique_indexes: Vec<CompositeKey>,
    pub docs: Option<String>,
    pub omit_input: bool,
    pub omit_output: bool,
    /// Embedded composite type rather than a table
    pub is_composite_type: bool,
}

impl Model {
    /// Field by source name
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A model field with its type resolved exactly once
#[derive(Debug, Clone)]
pub struct ModelField {
    pub name: String,
    /// `@TypeGraphQL.field(name:)` alias
    pub alias: Option<String>,
    pub kind: FieldKind,
    /// Resolved target type
    pub type_ref: TypeRef,
    pub is_required: bool,
    pub is_id: bool,
    pub is_unique: bool,
    pub relation_name: Option<String>,
    pub docs: Option<String>,
    pub omit_output: bool,
    pub omit_input: InputOmit,
}

impl ModelField {
    /// GraphQL name of the field
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_list(&self) -> bool {
        self.type_ref.is_list
    }
}

/// Generated enum
#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub type_name: String,
    pub docs: Option<String>,
    pub values: Vec<EnumValue>,
}

/// Enum value with its GraphQL name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value as sent to the client
    pub value: String,
    /// Name exposed in GraphQL (field alias for scalar-field enums)
    pub name: String,
}

/// Argument or input field with the selected input variant
#[derive(Debug, Clone)]
pub struct InputField {
    /// Source name (sent to the client)
    pub name: String,
    /// GraphQL name
    pub type_name: String,
    pub is_required: bool,
    pub selected: TypeRef,
    /// Hidden by `@TypeGraphQL.omit(input:)` for this input type
    pub is_omitted: bool,
}

/// Generated input object type
#[derive(Debug, Clone)]
pub struct InputType {
    pub name: String,
    pub type_name: String,
    /// Source name of the model this type was derived from
    pub model: Option<String>,
    pub fields: Vec<InputField>,
}

/// Field of an output type
#[derive(Debug, Clone)]
pub struct OutputField {
    pub name: String,
    pub is_required: bool,
    pub output: TypeRef,
    pub args: Vec<InputField>,
    /// `<OutputType><Field>Args` when the field takes arguments
    pub args_type_name: Option<String>,
}

/// Generated output object type
#[derive(Debug, Clone)]
pub struct OutputType {
    pub name: String,
    pub type_name: String,
    pub fields: Vec<OutputField>,
}

impl OutputType {
    pub fn field(&self, name: &str) -> Option<&OutputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Query or mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Supported client primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Aggregate,
    CreateMany,
    CreateManyAndReturn,
    CreateOne,
    DeleteMany,
    DeleteOne,
    FindFirst,
    FindFirstOrThrow,
    FindMany,
    FindUnique,
    FindUniqueOrThrow,
    GroupBy,
    UpdateMany,
    UpdateOne,
    UpsertOne,
}

impl ActionKind {
    /// Parse a mapping key; unsupported actions yield `None`
    pub fn parse(action: &str) -> Option<Self> {
        Some(match action {
            "aggregate" => ActionKind::Aggregate,
            "createMany" => ActionKind::CreateMany,
            "createManyAndReturn" => ActionKind::CreateManyAndReturn,
            "createOne" => ActionKind::CreateOne,
            "deleteMany" => ActionKind::DeleteMany,
            "deleteOne" => ActionKind::DeleteOne,
            "findFirst" => ActionKind::FindFirst,
            "findFirstOrThrow" => ActionKind::FindFirstOrThrow,
            "findMany" => ActionKind::FindMany,
            "findUnique" => ActionKind::FindUnique,
            "findUniqueOrThrow" => ActionKind::FindUniqueOrThrow,
            "groupBy" => ActionKind::GroupBy,
            "updateMany" => ActionKind::UpdateMany,
            "updateOne" => ActionKind::UpdateOne,
            "upsertOne" => ActionKind::UpsertOne,
            _ => return None,
        })
    }

    /// Mapping key spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Aggregate => "aggregate",
            ActionKind::CreateMany => "createMany",
            ActionKind::CreateManyAndReturn => "createManyAndReturn",
            ActionKind::CreateOne => "createOne",
            ActionKind::DeleteMany => "deleteMany",
            ActionKind::DeleteOne => "deleteOne",
            ActionKind::FindFirst => "findFirst",
            ActionKind::FindFirstOrThrow => "findFirstOrThrow",
            ActionKind::FindMany => "findMany",
            ActionKind::FindUnique => "findUnique",
            ActionKind::FindUniqueOrThrow => "findUniqueOrThrow",
            ActionKind::GroupBy => "groupBy",
            ActionKind::UpdateMany => "updateMany",
            ActionKind::UpdateOne => "updateOne",
            ActionKind::UpsertOne => "upsertOne",
        }
    }

    pub fn operation(&self) -> OperationKind {
        match self {
            ActionKind::Aggregate
            | ActionKind::FindFirst
            | ActionKind::FindFirstOrThrow
            | ActionKind::FindMany
            | ActionKind::FindUnique
            | ActionKind::FindUniqueOrThrow
            | ActionKind::GroupBy => OperationKind::Query,
            _ => OperationKind::Mutation,
        }
    }

    /// Method name on the client delegate
    pub fn client_method(&self) -> &'static str {
        match self {
            ActionKind::CreateOne => "create",
            ActionKind::DeleteOne => "delete",
            ActionKind::UpdateOne => "update",
            ActionKind::UpsertOne => "upsert",
            other => other.as_str(),
        }
    }
}

/// One operation available on a model
#[derive(Debug, Clone)]
pub struct Action {
    pub kind: ActionKind,
    /// Root field name the action binds to in the raw schema
    pub field_name: String,
    /// Public operation name
    pub name: String,
    pub args: Vec<InputField>,
    pub args_type_name: Option<String>,
    pub output: TypeRef,
    pub is_required: bool,
    /// `<Action><Model>Resolver`
    pub resolver_name: String,
}

impl Action {
    pub fn operation(&self) -> OperationKind {
        self.kind.operation()
    }
}

/// Operations of one model
#[derive(Debug, Clone)]
pub struct Mapping {
    /// Source model name
    pub model: String,
    pub model_type_name: String,
    pub actions: Vec<Action>,
    /// `<Model>CrudResolver`
    pub resolver_name: String,
}

/// Relation field exposed through a relation resolver
#[derive(Debug, Clone)]
pub struct RelationField {
    pub field: ModelField,
    pub output: OutputField,
    pub args_type_name: Option<String>,
}

/// Identity information needed to re-fetch a relation parent
#[derive(Debug, Clone)]
pub struct KeyInfo {
    pub id_field: Option<String>,
    pub unique_field: Option<String>,
    pub primary_key: Option<CompositeKey>,
    pub first_unique_index: Option<CompositeKey>,
}

/// Unique filter selected for a relation resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueFilter {
    /// `{ field: parent.field }`
    Single(String),
    /// `{ name: { a: parent.a, b: parent.b } }`
    Composite { name: String, fields: Vec<String> },
}

/// Model that exposes at least one relation field
#[derive(Debug, Clone)]
pub struct RelationModel {
    pub model: String,
    pub type_name: String,
    pub fields: Vec<RelationField>,
    pub keys: KeyInfo,
}

impl RelationModel {
    /// Resolver type name
    pub fn resolver_name(&self) -> String {
        format!("{}RelationsResolver", self.type_name)
    }

    /// Filter used to locate the parent record
    ///
    /// Single id, else single unique field, else primary key, else the first
    /// composite unique index.
    pub fn unique_filter(&self) -> Result<UniqueFilter, crate::GeneratorError> {
        if let Some(field) = self.keys.id_field.as_ref().or(self.keys.unique_field.as_ref()) {
            return Ok(UniqueFilter::Single(field.clone()));
        }
        let composite = self
            .keys
            .primary_key
            .as_ref()
            .or(self.keys.first_unique_index.as_ref());
        match composite {
            Some(key) if !key.fields.is_empty() => Ok(UniqueFilter::Composite {
                name: key.filter_name(),
                fields: key.fields.clone(),
            }),
            _ => Err(crate::GeneratorError::AmbiguousRelationFilter {
                model: self.type_name.clone(),
            }),
        }
    }
}
