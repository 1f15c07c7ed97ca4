//! Declarative schema for resources and data sources.

use std::collections::BTreeMap;

use serde_json::Value;

/// Attribute value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    /// UTF-8 string.
    String,
    /// Integer.
    Int,
    /// Boolean.
    Bool,
    /// Homogeneous list.
    List(Box<AttrType>),
    /// Object with named fields.
    Object(Vec<(&'static str, AttrType)>),
}

impl AttrType {
    /// Whether `value` has this type. `null` is accepted everywhere and means unset.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Bool, Value::Bool(_)) => true,
            (Self::List(elem), Value::Array(items)) => items.iter().all(|item| elem.accepts(item)),
            (Self::Object(fields), Value::Object(map)) => {
                map.keys().all(|key| fields.iter().any(|(name, _)| *name == key.as_str()))
                    && fields
                        .iter()
                        .all(|(name, ty)| map.get(*name).map_or(true, |v| ty.accepts(v)))
            }
            _ => false,
        }
    }
}

/// One schema attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Value type.
    pub ty: AttrType,
    /// Must be supplied by configuration.
    pub required: bool,
    /// May be supplied by configuration.
    pub optional: bool,
    /// Filled in by the provider.
    pub computed: bool,
    /// Hidden from plan output.
    pub sensitive: bool,
    /// Human readable description.
    pub description: &'static str,
}

impl Attribute {
    fn new(ty: AttrType) -> Self {
        Self {
            ty,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: "",
        }
    }

    /// Required configuration attribute.
    #[must_use]
    pub fn required(ty: AttrType) -> Self {
        Self {
            required: true,
            ..Self::new(ty)
        }
    }

    /// Optional configuration attribute.
    #[must_use]
    pub fn optional(ty: AttrType) -> Self {
        Self {
            optional: true,
            ..Self::new(ty)
        }
    }

    /// Read-only attribute set by the provider.
    #[must_use]
    pub fn computed(ty: AttrType) -> Self {
        Self {
            computed: true,
            ..Self::new(ty)
        }
    }

    /// Mark as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Named attributes of a resource or data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    /// Empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    /// Names of required attributes.
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.required)
            .map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_accepts_scalars() {
        assert!(AttrType::String.accepts(&json!("x")));
        assert!(AttrType::Int.accepts(&json!(3)));
        assert!(!AttrType::Int.accepts(&json!(3.5)));
        assert!(!AttrType::Bool.accepts(&json!("true")));
        assert!(AttrType::Bool.accepts(&Value::Null));
    }

    #[test]
    fn test_accepts_nested() {
        let subnets = AttrType::List(Box::new(AttrType::Object(vec![
            ("ip", AttrType::String),
            ("mask", AttrType::String),
        ])));
        assert!(subnets.accepts(&json!([{"ip": "10.0.0.0", "mask": "24"}])));
        assert!(!subnets.accepts(&json!([{"ip": "10.0.0.0", "prefix": 24}])));
        assert!(!subnets.accepts(&json!({"ip": "10.0.0.0"})));
    }

    #[test]
    fn test_required_names() {
        let schema = Schema::new()
            .with_attribute("b", Attribute::optional(AttrType::String))
            .with_attribute("a", Attribute::required(AttrType::Int))
            .with_attribute("c", Attribute::computed(AttrType::String).sensitive());
        assert_eq!(schema.required().collect::<Vec<_>>(), vec!["a"]);
        assert!(schema.attribute("c").unwrap().sensitive);
        assert!(schema.attribute("d").is_none());
    }
}
