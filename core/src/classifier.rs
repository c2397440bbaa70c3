#![deny(missing_docs)]

//! # Shape Classifier
//!
//! Reduces a [`Schema`] tree to the [`CanonicalShape`] the codec works with.
//!
//! Rules:
//! - Unions must agree: every member has to classify to the same shape.
//! - Intersections succeed when all members are the same object shape, or when
//!   exactly one member is not an object. The remaining object members are
//!   brand markers (`string & { __brand: "id" }`) and are ignored.
//! - Arrays and objects may only contain primitives.
//! - Objects must have at least one value-carrying field and every field
//!   (index signatures included) must share one primitive.
//!
//! Failures carry the path to the offending node, e.g.
//! `in array: in tuple: union of different types (detected string, number)`.

use crate::error::ClassifyError;
use crate::models::{CanonicalShape, ParameterPosition, ParseContext, Primitive};
use crate::schema::{EnumMember, FieldKey, ObjectSchema, Schema};
use tracing::debug;

/// Classifies `schema` for a parameter in `position`.
///
/// The result is a pure function of its inputs.
pub fn classify(
    schema: &Schema,
    position: ParameterPosition,
) -> Result<CanonicalShape, ClassifyError> {
    let shape = Classifier { position }.classify(schema)?;
    debug!(%position, %shape, "classified parameter schema");
    Ok(shape)
}

/// Classifies `schema` and binds the result to `position`.
pub fn parse_context(
    schema: &Schema,
    position: ParameterPosition,
) -> Result<ParseContext, ClassifyError> {
    classify(schema, position).map(|shape| ParseContext::new(position, shape))
}

struct Classifier {
    position: ParameterPosition,
}

impl Classifier {
    fn classify(&self, schema: &Schema) -> Result<CanonicalShape, ClassifyError> {
        match schema {
            Schema::Union { of } => self.union(of),
            Schema::Intersection { of } => self.intersection(of),
            Schema::Enum { members } => {
                let literals: Vec<Schema> = members.iter().map(EnumMember::literal).collect();
                self.union(&literals).map_err(|e| e.within("in enum"))
            }
            Schema::Null | Schema::Undefined | Schema::Void => {
                Ok(CanonicalShape::Primitive(Primitive::Null))
            }
            Schema::Boolean | Schema::BooleanLiteral { .. } => {
                Ok(CanonicalShape::Primitive(Primitive::Boolean))
            }
            Schema::String | Schema::StringLiteral { .. } => {
                Ok(CanonicalShape::Primitive(Primitive::String))
            }
            Schema::Number | Schema::NumberLiteral { .. } => {
                Ok(CanonicalShape::Primitive(Primitive::Number))
            }
            Schema::Any | Schema::Unknown | Schema::Never => Err(self.not_supported(format!(
                "{} (use string instead)",
                schema.keyword()
            ))),
            Schema::Array { items } => {
                let element = self.classify(items).map_err(|e| e.within("in array"))?;
                self.array_of(element)
            }
            Schema::Tuple { items } => {
                let element = self.union(items).map_err(|e| e.within("in tuple"))?;
                self.array_of(element)
            }
            Schema::Object(object) => self.object(object),
            Schema::Function { .. } | Schema::Opaque { .. } => Err(
                ClassifyError::inference_failed("Type not identified by classifier"),
            ),
        }
    }

    fn union(&self, members: &[Schema]) -> Result<CanonicalShape, ClassifyError> {
        let shapes = self.classify_all(members, "in union")?;
        let Some(first) = shapes.first().copied() else {
            return Err(ClassifyError::inference_failed(
                "After identifying a union, the union types cannot be inferred",
            ));
        };

        if shapes.iter().all(|shape| *shape == first) {
            Ok(first)
        } else {
            Err(self.not_supported(format!(
                "union of different types (detected {})",
                join(&shapes)
            )))
        }
    }

    fn intersection(&self, members: &[Schema]) -> Result<CanonicalShape, ClassifyError> {
        let shapes = self.classify_all(members, "in intersection")?;
        let Some(first) = shapes.first().copied() else {
            return Err(ClassifyError::inference_failed(
                "After identifying an intersection, the intersection types cannot be inferred",
            ));
        };

        if first.is_object() && shapes.iter().all(|shape| *shape == first) {
            return Ok(first);
        }

        // Object members of a mixed intersection are brand markers.
        let mut non_objects = shapes.iter().filter(|shape| !shape.is_object());
        match (non_objects.next(), non_objects.next()) {
            (Some(shape), None) => Ok(*shape),
            _ => Err(self.not_supported(format!(
                "intersection of different types (detected {})",
                join(&shapes)
            ))),
        }
    }

    fn array_of(&self, element: CanonicalShape) -> Result<CanonicalShape, ClassifyError> {
        match element {
            CanonicalShape::ArrayOf(_) => Err(self.not_supported("multidimensional arrays")),
            CanonicalShape::ObjectOf(_) => Err(self.not_supported("array of objects")),
            CanonicalShape::Primitive(p) => Ok(CanonicalShape::ArrayOf(p)),
        }
    }

    fn object(&self, object: &ObjectSchema) -> Result<CanonicalShape, ClassifyError> {
        if let Some(to_json) = object.to_json() {
            return self.to_json(to_json);
        }

        let mut first: Option<(FieldKey<'_>, CanonicalShape)> = None;
        for (key, schema) in object.entries() {
            let shape = self
                .classify(schema)
                .map_err(|e| e.within(&format!("object property {key}")))?;

            if let FieldKey::Named(name) = key {
                self.check_deep_object_key(name)?;
            }

            match first {
                None => first = Some((key, shape)),
                Some((first_key, first_shape)) if first_shape != shape => {
                    return Err(self.not_supported(format!(
                        "object values containing different types ({first_key}={first_shape} and {key}={shape})"
                    )));
                }
                Some(_) => {}
            }
        }

        let Some((key, shape)) = first else {
            return Err(self.not_supported("empty object"));
        };
        match shape {
            CanonicalShape::ObjectOf(_) => Err(self.not_supported(format!(
                "object (property {key}) containing subobject"
            ))),
            CanonicalShape::ArrayOf(_) => Err(self.not_supported(format!(
                "object (property {key}) containing array"
            ))),
            CanonicalShape::Primitive(p) => Ok(CanonicalShape::ObjectOf(p)),
        }
    }

    /// Objects exposing `toJSON` are classified by what they convert to.
    fn to_json(&self, member: &Schema) -> Result<CanonicalShape, ClassifyError> {
        let Schema::Function { returns } = member else {
            return Err(
                self.not_supported("object contains property \"toJSON\" which isn't a function")
            );
        };
        match returns.as_slice() {
            [] => Err(self.not_supported(
                "object contains function \"toJSON\", but signature cannot be inferred",
            )),
            [single] => self.classify(single).map_err(|e| e.within("in toJSON")),
            many => self.union(many).map_err(|e| e.within("in toJSON")),
        }
    }

    /// `name[key]` addressing in query strings cannot express keys with brackets.
    fn check_deep_object_key(&self, name: &str) -> Result<(), ClassifyError> {
        if self.position != ParameterPosition::QueryParameter {
            return Ok(());
        }
        for bracket in ['[', ']'] {
            if name.contains(bracket) {
                return Err(self
                    .not_supported(format!(
                        "To enable compatibility with the \"deepObject\" serialization style, object property keys containing \"{bracket}\" are"
                    ))
                    .within(&format!("object property {name}")));
            }
        }
        Ok(())
    }

    fn classify_all(
        &self,
        members: &[Schema],
        context: &str,
    ) -> Result<Vec<CanonicalShape>, ClassifyError> {
        members
            .iter()
            .map(|member| self.classify(member).map_err(|e| e.within(context)))
            .collect()
    }

    fn not_supported(&self, reason: impl Into<String>) -> ClassifyError {
        ClassifyError::not_supported(reason, self.position)
    }
}

fn join(shapes: &[CanonicalShape]) -> String {
    shapes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
