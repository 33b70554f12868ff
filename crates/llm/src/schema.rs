//! Response Schemas
//!
//! Provider-neutral description of the JSON shape a structured-output call
//! must return. Each provider renders it into its own dialect:
//! - Gemini: OpenAPI subset with uppercase type names (`responseSchema`)
//! - OpenAI: strict JSON Schema (`response_format.json_schema`)

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// Primitive JSON kinds a schema node may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
}

impl SchemaType {
    fn gemini_name(self) -> &'static str {
        match self {
            SchemaType::Object => "OBJECT",
            SchemaType::Array => "ARRAY",
            SchemaType::String => "STRING",
            SchemaType::Number => "NUMBER",
            SchemaType::Integer => "INTEGER",
        }
    }

    fn json_schema_name(self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
        }
    }
}

/// A structured-output schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub schema_type: SchemaType,
    /// Name used by providers that label schemas (OpenAI `json_schema.name`)
    pub title: Option<String>,
    pub properties: BTreeMap<String, ResponseSchema>,
    pub required: Vec<String>,
    pub items: Option<Box<ResponseSchema>>,
    pub enum_values: Vec<String>,
}

impl ResponseSchema {
    fn leaf(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            title: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            items: None,
            enum_values: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::leaf(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::leaf(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::leaf(SchemaType::Integer)
    }

    /// A string restricted to the given values.
    pub fn string_enum(values: &[&str]) -> Self {
        Self {
            enum_values: values.iter().map(|v| v.to_string()).collect(),
            ..Self::leaf(SchemaType::String)
        }
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array)
        }
    }

    /// An object with the given properties, every one of them required.
    pub fn object(properties: Vec<(&str, ResponseSchema)>) -> Self {
        let required = properties.iter().map(|(name, _)| name.to_string()).collect();
        Self {
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            required,
            ..Self::leaf(SchemaType::Object)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render as a Gemini `responseSchema`.
    pub fn to_gemini(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".to_string(), json!(self.schema_type.gemini_name()));
        if !self.enum_values.is_empty() {
            node.insert("format".to_string(), json!("enum"));
            node.insert("enum".to_string(), json!(self.enum_values));
        }
        if let Some(items) = &self.items {
            node.insert("items".to_string(), items.to_gemini());
        }
        if self.schema_type == SchemaType::Object {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_gemini()))
                .collect();
            node.insert("properties".to_string(), Value::Object(properties));
            if !self.required.is_empty() {
                node.insert("required".to_string(), json!(self.required));
            }
        }
        Value::Object(node)
    }

    /// Render as strict JSON Schema (closed objects).
    pub fn to_json_schema(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".to_string(), json!(self.schema_type.json_schema_name()));
        if !self.enum_values.is_empty() {
            node.insert("enum".to_string(), json!(self.enum_values));
        }
        if let Some(items) = &self.items {
            node.insert("items".to_string(), items.to_json_schema());
        }
        if self.schema_type == SchemaType::Object {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
                .collect();
            node.insert("properties".to_string(), Value::Object(properties));
            node.insert("required".to_string(), json!(self.required));
            node.insert("additionalProperties".to_string(), json!(false));
        }
        Value::Object(node)
    }
}
