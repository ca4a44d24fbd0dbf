//! Inferred schema types and the kind-widening lattice.
//!
//! A `Schema` inferred from N examples is the pointwise least upper
//! bound of the per-example schemas: fields are unioned, a field
//! missing from any example becomes nullable, and kinds widen along a
//! fixed lattice rather than erroring on disagreement.

use serde::{Deserialize, Serialize};

/// The closed set of value kinds the inference engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Float,
    Date,
    Datetime,
    String,
    Array,
    Object,
}

impl Kind {
    /// Widen two observed kinds for the same field into one kind that
    /// can represent both, per the lattice in the spec:
    /// `null < boolean < integer < float < string`; date/datetime
    /// collapse to string on conflict; array/object collapse to string
    /// on shape conflict.
    pub fn widen(self, other: Kind) -> Kind {
        use Kind::*;
        if self == other {
            return self;
        }
        match (self, other) {
            (Null, k) | (k, Null) => k,
            (Array, Array) => Array,
            (Object, Object) => Object,
            (Array, _) | (_, Array) => String,
            (Object, _) | (_, Object) => String,
            (Date, Datetime) | (Datetime, Date) => String,
            (Date, Date) => Date,
            (Datetime, Datetime) => Datetime,
            (Date, String) | (String, Date) => String,
            (Datetime, String) | (String, Datetime) => String,
            _ => self.rank().max(other.rank()).to_kind(),
        }
    }

    fn rank(self) -> u8 {
        match self {
            Kind::Null => 0,
            Kind::Boolean => 1,
            Kind::Integer => 2,
            Kind::Float => 3,
            Kind::Date => 4,
            Kind::Datetime => 4,
            Kind::String => 5,
            Kind::Array => 6,
            Kind::Object => 7,
        }
    }
}

trait RankToKind {
    fn to_kind(self) -> Kind;
}

impl RankToKind for u8 {
    fn to_kind(self) -> Kind {
        match self {
            0 => Kind::Null,
            1 => Kind::Boolean,
            2 => Kind::Integer,
            3 => Kind::Float,
            5 => Kind::String,
            6 => Kind::Array,
            7 => Kind::Object,
            _ => Kind::String,
        }
    }
}

/// One inferred field of a `Schema`.
///
/// `nested` carries the element schema for `Array` and the member
/// schema for `Object`, giving the flat `Kind` tag the "array-of-schema
/// / object-of-schema" shape the spec describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: Kind,
    pub nullable: bool,
    /// A handful of observed values, retained for prompt rendering so
    /// the coder sees real shapes rather than a bare kind name.
    pub sample_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<Schema>>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            sample_values: Vec::new(),
            nested: None,
        }
    }

    pub fn with_nested(mut self, nested: Schema) -> Self {
        self.nested = Some(Box::new(nested));
        self
    }
}

/// An ordered list of fields, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Merge `other` into `self` as the pointwise least upper bound:
    /// union the keys, widen shared kinds, and mark any field absent
    /// from one side as nullable. Field order follows first
    /// appearance in `self`, then `other`.
    pub fn merge(mut self, other: Schema) -> Schema {
        for field in &mut self.fields {
            if let Some(other_field) = other.field(&field.name) {
                let widened = field.kind.widen(other_field.kind);
                field.nested = match (field.kind, other_field.kind, field.nested.take(), other_field.nested.clone()) {
                    (Kind::Array, Kind::Array, Some(a), Some(b)) => Some(Box::new(a.merge(*b))),
                    (Kind::Object, Kind::Object, Some(a), Some(b)) => Some(Box::new(a.merge(*b))),
                    (Kind::Array, Kind::Array, a, b) => a.or(b),
                    (Kind::Object, Kind::Object, a, b) => a.or(b),
                    _ => None,
                };
                field.kind = widened;
                field.nullable = field.nullable || other_field.nullable;
                for v in &other_field.sample_values {
                    if !field.sample_values.contains(v) {
                        field.sample_values.push(v.clone());
                    }
                }
            } else {
                field.nullable = true;
            }
        }
        for other_field in other.fields {
            if self.field(&other_field.name).is_none() {
                let mut f = other_field;
                f.nullable = true;
                self.fields.push(f);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_is_commutative_for_numeric_ladder() {
        assert_eq!(Kind::Integer.widen(Kind::Float), Kind::Float);
        assert_eq!(Kind::Float.widen(Kind::Integer), Kind::Float);
        assert_eq!(Kind::Boolean.widen(Kind::Integer), Kind::Integer);
    }

    #[test]
    fn merge_marks_absent_field_nullable() {
        let mut a = Schema::default();
        a.fields.push(Field::new("id", Kind::Integer));
        a.fields.push(Field::new("nickname", Kind::String));

        let mut b = Schema::default();
        b.fields.push(Field::new("id", Kind::Integer));

        let merged = a.merge(b);
        let nickname = merged.field("nickname").unwrap();
        assert!(nickname.nullable);
        let id = merged.field("id").unwrap();
        assert!(!id.nullable);
    }

    #[test]
    fn merge_widens_conflicting_shape_to_string() {
        let mut a = Schema::default();
        a.fields.push(Field::new("tags", Kind::Array));
        let mut b = Schema::default();
        b.fields.push(Field::new("tags", Kind::String));

        let merged = a.merge(b);
        assert_eq!(merged.field("tags").unwrap().kind, Kind::String);
    }
}
