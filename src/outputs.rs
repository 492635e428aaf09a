//! Typed view over the document printed by `terraform output -json`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Output name -> wrapper, in the order terraform printed them.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct TerraformOutputs(IndexMap<String, OutputValue>);

#[derive(Debug, Clone, Deserialize)]
pub struct OutputValue {
    /// Only the connection output needs a value; others are never read.
    #[serde(default)]
    pub value: Value,
}

/// Connection details published by the VM module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConnection {
    pub vm_name: String,
    pub public_ip: String,
    pub private_ip: String,
}

impl TerraformOutputs {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.0.get(name)
    }

    /// Reads the named output as a [`VmConnection`].
    ///
    /// Returns `None` when the output is absent or its value is not an object.
    pub fn vm_connection(&self, name: &str) -> Option<VmConnection> {
        let output = self.get(name)?;
        let Some(fields) = output.value.as_object() else {
            tracing::warn!(output = name, "output value is not an object, ignoring");
            return None;
        };
        Some(VmConnection {
            vm_name: string_field(fields, "vm_name").unwrap_or_else(|| "unknown".to_string()),
            public_ip: fields
                .get("public_ip")
                .filter(|value| !is_falsy(value))
                .map(render)
                .unwrap_or_default(),
            private_ip: string_field(fields, "private_ip").unwrap_or_default(),
        })
    }
}

fn string_field(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).filter(|value| !value.is_null()).map(render)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A host is only added for a truthy address, so `false`, `0`, `[]` and `{}`
/// count as missing just like null or "".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
