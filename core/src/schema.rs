#![deny(missing_docs)]

//! # Parameter Schemas
//!
//! The schema tree handed to the classifier. It mirrors the type algebra of a
//! typical API description language (primitives, literals, arrays, tuples,
//! objects with index signatures, unions, intersections and enums).
//!
//! Schemas can be built in code with the helper constructors or deserialized
//! from JSON/YAML, where each node is tagged by `kind`:
//!
//! ```json
//! { "kind": "array", "items": { "kind": "union", "of": [
//!     { "kind": "stringLiteral", "value": "asc" },
//!     { "kind": "stringLiteral", "value": "desc" }
//! ] } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the field treated as the JSON conversion capability of an object.
pub const TO_JSON: &str = "toJSON";

/// A node of the parameter schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Schema {
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// `void`.
    Void,
    /// Any boolean.
    Boolean,
    /// A boolean literal type.
    BooleanLiteral {
        /// The literal.
        value: bool,
    },
    /// Any string.
    String,
    /// A string literal type.
    StringLiteral {
        /// The literal.
        value: String,
    },
    /// Any number.
    Number,
    /// A number literal type.
    NumberLiteral {
        /// The literal.
        value: f64,
    },
    /// The unchecked top type.
    Any,
    /// The checked top type.
    Unknown,
    /// The bottom type.
    Never,
    /// A homogeneous array.
    Array {
        /// Element schema.
        items: Box<Schema>,
    },
    /// A fixed-length tuple. Classified like an array of the union of its items.
    Tuple {
        /// Item schemas in order.
        items: Vec<Schema>,
    },
    /// An object with named fields and optional index signatures.
    Object(ObjectSchema),
    /// Any of the member schemas.
    Union {
        /// Members.
        of: Vec<Schema>,
    },
    /// All of the member schemas at once.
    Intersection {
        /// Members.
        of: Vec<Schema>,
    },
    /// A closed set of literal members.
    Enum {
        /// Members.
        members: Vec<EnumMember>,
    },
    /// A callable. Object fields of this kind are methods.
    Function {
        /// Return types of the call signatures.
        #[serde(default)]
        returns: Vec<Schema>,
    },
    /// A type the schema source could not describe.
    Opaque {
        /// Free-form name, used in diagnostics only.
        name: String,
    },
}

/// Field layout of an object schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    /// Named fields in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, Schema>,
    /// Value schema of a `[key: string]` index signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_index: Option<Box<Schema>>,
    /// Value schema of a `[key: number]` index signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_index: Option<Box<Schema>>,
}

/// A member of an enum schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumMember {
    /// String valued member.
    String(String),
    /// Number valued member.
    Number(f64),
}

impl EnumMember {
    /// The literal type of the member.
    pub fn literal(&self) -> Schema {
        match self {
            EnumMember::String(value) => Schema::string_literal(value.clone()),
            EnumMember::Number(value) => Schema::NumberLiteral { value: *value },
        }
    }
}

impl Schema {
    /// `Array<items>`.
    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }

    /// `[a, b, ...]`.
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple {
            items: items.into_iter().collect(),
        }
    }

    /// `a | b | ...`.
    pub fn union(of: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Union {
            of: of.into_iter().collect(),
        }
    }

    /// `a & b & ...`.
    pub fn intersection(of: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Intersection {
            of: of.into_iter().collect(),
        }
    }

    /// A string literal type.
    pub fn string_literal(value: impl Into<String>) -> Self {
        Schema::StringLiteral {
            value: value.into(),
        }
    }

    /// An enum over the given members.
    pub fn enumeration(members: impl IntoIterator<Item = EnumMember>) -> Self {
        Schema::Enum {
            members: members.into_iter().collect(),
        }
    }

    /// An object with the given named fields.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Schema::Object(ObjectSchema {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..ObjectSchema::default()
        })
    }

    /// `Record<string, value>`.
    pub fn record(value: Schema) -> Self {
        Schema::Object(ObjectSchema::default().with_string_index(value))
    }

    /// A nominal brand marker, `{ __brand: "<name>" }`.
    pub fn brand(name: impl Into<String>) -> Self {
        Schema::object([("__brand", Schema::string_literal(name))])
    }

    /// A method returning the given types (one per call signature).
    pub fn method(returns: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Function {
            returns: returns.into_iter().collect(),
        }
    }

    /// Keyword used when a schema is rejected outright.
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            Schema::Null => "null",
            Schema::Undefined => "undefined",
            Schema::Void => "void",
            Schema::Boolean | Schema::BooleanLiteral { .. } => "boolean",
            Schema::String | Schema::StringLiteral { .. } => "string",
            Schema::Number | Schema::NumberLiteral { .. } => "number",
            Schema::Any => "any",
            Schema::Unknown => "unknown",
            Schema::Never => "never",
            Schema::Array { .. } => "array",
            Schema::Tuple { .. } => "tuple",
            Schema::Object(_) => "object",
            Schema::Union { .. } => "union",
            Schema::Intersection { .. } => "intersection",
            Schema::Enum { .. } => "enum",
            Schema::Function { .. } => "function",
            Schema::Opaque { .. } => "opaque",
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

/// Key of an enumerated object entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    /// A declared field.
    Named(&'a str),
    /// The `[key: string]` index signature.
    StringIndex,
    /// The `[key: number]` index signature.
    NumberIndex,
}

impl std::fmt::Display for FieldKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKey::Named(name) => f.write_str(name),
            FieldKey::StringIndex => f.write_str("[key: string]"),
            FieldKey::NumberIndex => f.write_str("[key: number]"),
        }
    }
}

impl ObjectSchema {
    /// Adds (or replaces) a named field.
    pub fn with_field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Sets the `[key: string]` index signature.
    pub fn with_string_index(mut self, schema: Schema) -> Self {
        self.string_index = Some(Box::new(schema));
        self
    }

    /// Sets the `[key: number]` index signature.
    pub fn with_number_index(mut self, schema: Schema) -> Self {
        self.number_index = Some(Box::new(schema));
        self
    }

    /// The `toJSON` member, if declared.
    pub fn to_json(&self) -> Option<&Schema> {
        self.fields.get(TO_JSON)
    }

    /// Value-carrying entries: declared fields that are not methods, followed by
    /// the index signatures that are not `never`.
    pub fn entries(&self) -> impl Iterator<Item = (FieldKey<'_>, &Schema)> {
        let named = self
            .fields
            .iter()
            .filter(|(_, schema)| !matches!(schema, Schema::Function { .. }))
            .map(|(name, schema)| (FieldKey::Named(name.as_str()), schema));
        let indexes = [
            (FieldKey::StringIndex, self.string_index.as_deref()),
            (FieldKey::NumberIndex, self.number_index.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, schema)| match schema {
            Some(Schema::Never) | None => None,
            Some(schema) => Some((key, schema)),
        });
        named.chain(indexes)
    }
}
