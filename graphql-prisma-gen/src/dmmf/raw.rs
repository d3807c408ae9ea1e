//! Raw DMMF document as emitted by the Prisma introspection step
//!
//! These structs mirror the JSON shape one to one and are never mutated.
//! Everything the generators consume is derived from them in
//! [`super::transform`].

use serde::Deserialize;

/// Root of the raw schema document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Models, enums and composite types declared in the schema file
    pub datamodel: Datamodel,
    /// Input/output/enum types of the client API
    pub schema: Schema,
    /// Operation mappings per model
    pub mappings: Mappings,
}

impl Document {
    /// Decode a document from its JSON text
    pub fn from_json(text: &str) -> Result<Self, crate::GeneratorError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Declared datamodel
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datamodel {
    /// Persisted models
    #[serde(default)]
    pub models: Vec<Model>,
    /// Declared enums
    #[serde(default)]
    pub enums: Vec<DatamodelEnum>,
    /// Composite (embedded) types
    #[serde(default)]
    pub types: Vec<Model>,
}

/// A declared model
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,
    #[serde(default)]
    pub unique_fields: Vec<Vec<String>>,
    #[serde(default)]
    pub unique_indexes: Vec<UniqueIndex>,
    #[serde(default)]
    pub documentation: Option<String>,
}

/// Kind of a datamodel field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    #[default]
    Scalar,
    Object,
    Enum,
    Unsupported,
}

/// A declared model field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default)]
    pub relation_name: Option<String>,
    #[serde(default)]
    pub relation_from_fields: Vec<String>,
    #[serde(default)]
    pub relation_to_fields: Vec<String>,
    #[serde(default)]
    pub documentation: Option<String>,
}

/// Composite primary key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryKey {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

/// Composite unique index
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniqueIndex {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

/// Enum declared in the datamodel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatamodelEnum {
    pub name: String,
    pub values: Vec<DatamodelEnumValue>,
    #[serde(default)]
    pub documentation: Option<String>,
}

/// One value of a datamodel enum
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamodelEnumValue {
    pub name: String,
    #[serde(default)]
    pub db_name: Option<String>,
}

/// Client API types
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub input_object_types: Namespaced<InputType>,
    #[serde(default)]
    pub output_object_types: Namespaced<OutputType>,
    #[serde(default)]
    pub enum_types: Namespaced<SchemaEnum>,
}

/// Types split by namespace (`prisma` for generated types, `model` for datamodel ones)
#[derive(Debug, Clone, Deserialize)]
pub struct Namespaced<T> {
    #[serde(default = "Vec::new")]
    pub prisma: Vec<T>,
    #[serde(default = "Vec::new")]
    pub model: Vec<T>,
}

impl<T> Default for Namespaced<T> {
    fn default() -> Self {
        Self {
            prisma: Vec::new(),
            model: Vec::new(),
        }
    }
}

impl<T> Namespaced<T> {
    /// Iterate `prisma` then `model` entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.prisma.iter().chain(self.model.iter())
    }
}

/// Where a referenced type lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Scalar,
    InputObjectTypes,
    OutputObjectTypes,
    EnumTypes,
    FieldRefTypes,
}

impl Location {
    /// Name as written in the document
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Scalar => "scalar",
            Location::InputObjectTypes => "inputObjectTypes",
            Location::OutputObjectTypes => "outputObjectTypes",
            Location::EnumTypes => "enumTypes",
            Location::FieldRefTypes => "fieldRefTypes",
        }
    }
}

/// Reference to a type from an input field or argument
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: Location,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Input object type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<InputField>,
}

/// Field of an input object type, or an argument of an output field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub name: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub input_types: Vec<TypeRef>,
    #[serde(default)]
    pub deprecation: Option<serde_json::Value>,
}

/// Output object type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<OutputField>,
}

/// Field of an output object type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    pub name: String,
    #[serde(default)]
    pub args: Vec<InputField>,
    #[serde(default)]
    pub is_nullable: bool,
    pub output_type: TypeRef,
}

/// Enum of the client API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaEnum {
    pub name: String,
    pub values: Vec<String>,
}

/// Operation mapping tables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mappings {
    #[serde(default)]
    pub model_operations: Vec<ModelMapping>,
}

/// Available actions for one model: action name -> root field name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelMapping {
    pub model: String,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(flatten)]
    pub actions: std::collections::BTreeMap<String, serde_json::Value>,
}

impl ModelMapping {
    /// Action entries whose value is a field name, sorted by action name
    pub fn action_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions
            .iter()
            .filter_map(|(action, value)| value.as_str().map(|field| (action.as_str(), field)))
    }
}
