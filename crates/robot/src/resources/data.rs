//! Framework-held state of one resource or data source instance.

use serde::Serialize;
use serde_json::{Map, Value};

use super::schema::Schema;
use crate::error::RobotError;

/// Encode a server number as a resource identifier.
#[must_use]
pub fn resource_id(server_number: u32) -> String {
    server_number.to_string()
}

/// Decode a resource identifier back into a server number.
///
/// # Errors
/// Returns [`RobotError::InvalidId`] unless `id` is a plain non-negative integer.
pub fn parse_resource_id(id: &str) -> Result<u32, RobotError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RobotError::InvalidId(id.to_string()));
    }
    id.parse().map_err(|_| RobotError::InvalidId(id.to_string()))
}

/// Identifier and attribute values, checked against a schema on write.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceData {
    schema: Schema,
    id: Option<String>,
    values: Map<String, Value>,
}

impl ResourceData {
    /// Empty state for `schema`.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            id: None,
            values: Map::new(),
        }
    }

    /// State populated from a configuration object.
    ///
    /// # Errors
    /// Returns error if `config` is not an object or holds undeclared or mistyped attributes.
    pub fn from_config(schema: Schema, config: Value) -> Result<Self, RobotError> {
        let Value::Object(map) = config else {
            return Err(RobotError::Attribute(
                "configuration must be an object".to_string(),
            ));
        };

        let mut data = Self::new(schema);
        for (name, value) in map {
            data.set_value(&name, value)?;
        }
        Ok(data)
    }

    /// State for an import, carrying only the identifier.
    #[must_use]
    pub fn for_import(schema: Schema, id: impl Into<String>) -> Self {
        let mut data = Self::new(schema);
        data.set_id(id);
        data
    }

    /// Schema this state is checked against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resource identifier, `None` when not tracked.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the identifier.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Stop tracking the resource.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// All attribute values.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Raw attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// String attribute; unset reads as `None`.
    ///
    /// # Errors
    /// Returns error if the value is not a string.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, RobotError> {
        self.get(name)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| RobotError::Attribute(format!("{name} is not a string")))
            })
            .transpose()
    }

    /// Integer attribute; unset reads as `None`.
    ///
    /// # Errors
    /// Returns error if the value is not an integer.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>, RobotError> {
        self.get(name)
            .map(|v| {
                v.as_i64()
                    .ok_or_else(|| RobotError::Attribute(format!("{name} is not an integer")))
            })
            .transpose()
    }

    /// List-of-strings attribute; unset reads as empty.
    ///
    /// # Errors
    /// Returns error if the value is not a list of strings.
    pub fn get_str_list(&self, name: &str) -> Result<Vec<String>, RobotError> {
        let Some(value) = self.get(name) else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .ok_or_else(|| RobotError::Attribute(format!("{name} is not a list of strings")))
    }

    /// Server number from an integer attribute.
    ///
    /// # Errors
    /// Returns error if the attribute is unset or not a valid server number.
    pub fn get_server_number(&self, name: &str) -> Result<u32, RobotError> {
        let raw = self
            .get_int(name)?
            .ok_or_else(|| RobotError::Attribute(format!("{name} is required")))?;
        u32::try_from(raw)
            .map_err(|_| RobotError::Attribute(format!("{name} out of range: {raw}")))
    }

    /// Set an attribute declared in the schema.
    ///
    /// # Errors
    /// Returns error if the attribute is undeclared or the value has the wrong type.
    pub fn set(&mut self, name: &str, value: impl Serialize) -> Result<(), RobotError> {
        let value = serde_json::to_value(value)?;
        self.set_value(name, value)
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), RobotError> {
        let attribute = self
            .schema
            .attribute(name)
            .ok_or_else(|| RobotError::Attribute(format!("{name} is not in the schema")))?;
        if !attribute.ty.accepts(&value) {
            return Err(RobotError::Attribute(format!(
                "{name} expects {:?}, got {value}",
                attribute.ty
            )));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Check every required attribute is set.
    ///
    /// # Errors
    /// Returns error naming the first missing attribute.
    pub fn check_required(&self) -> Result<(), RobotError> {
        match self.schema.required().find(|name| self.get(name).is_none()) {
            Some(name) => Err(RobotError::Attribute(format!("{name} is required"))),
            None => Ok(()),
        }
    }
}
