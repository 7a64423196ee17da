// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema-less representation of an arbitrary Kubernetes object.

use crate::error::{Result, RuntimeError};
use kube::core::{DynamicObject, GroupVersionKind, ObjectMeta, TypeMeta};
use serde_json::Value;
use std::collections::BTreeMap;

/// A Kubernetes object of any kind: its GVK, typed metadata and an opaque body.
///
/// The body holds every top-level field other than `apiVersion`, `kind` and
/// `metadata` (usually `spec`, `data`, `rules`...), ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericResource {
    gvk: GroupVersionKind,
    metadata: ObjectMeta,
    body: BTreeMap<String, Value>,
}

impl GenericResource {
    pub fn new(gvk: GroupVersionKind, metadata: ObjectMeta, body: BTreeMap<String, Value>) -> Self {
        Self {
            gvk,
            metadata,
            body,
        }
    }

    /// Build from a JSON document with `apiVersion` and `kind` at its root
    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(RuntimeError::Decode(format!(
                    "document root must be an object, got {}",
                    value_type(&other)
                )))
            }
        };

        let api_version = take_string(&mut root, "apiVersion")?;
        let kind = take_string(&mut root, "kind")?;
        let gvk = gvk_from_api_version(&api_version, &kind);

        let metadata = match root.remove("metadata") {
            None | Some(Value::Null) => ObjectMeta::default(),
            Some(meta) => serde_json::from_value(meta)
                .map_err(|e| RuntimeError::Decode(format!("invalid metadata: {}", e)))?,
        };

        Ok(Self {
            gvk,
            metadata,
            body: root.into_iter().collect(),
        })
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn api_version(&self) -> String {
        self.gvk.api_version()
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    pub fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(self.metadata.name.as_deref())
    }

    /// The object's namespace; an empty string counts as unset
    pub fn namespace(&self) -> Option<&str> {
        non_empty(self.metadata.namespace.as_deref())
    }

    pub fn set_namespace(&mut self, namespace: &str) {
        self.metadata.namespace = Some(namespace.to_string());
    }

    pub fn clear_namespace(&mut self) {
        self.metadata.namespace = None;
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.labels.as_ref()
    }

    pub fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.metadata.annotations.as_ref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.metadata.uid.as_deref()
    }

    pub fn body(&self) -> &BTreeMap<String, Value> {
        &self.body
    }

    /// A top-level body field such as `spec`
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// A nested body value addressed by a JSON pointer, e.g. `/spec/replicas`
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, format!("/{}", tail)),
            None => (rest, String::new()),
        };
        self.body.get(head)?.pointer(&tail)
    }
}

impl From<GenericResource> for DynamicObject {
    fn from(resource: GenericResource) -> Self {
        DynamicObject {
            types: Some(TypeMeta {
                api_version: resource.gvk.api_version(),
                kind: resource.gvk.kind,
            }),
            metadata: resource.metadata,
            data: Value::Object(resource.body.into_iter().collect()),
        }
    }
}

impl TryFrom<DynamicObject> for GenericResource {
    type Error = RuntimeError;

    fn try_from(object: DynamicObject) -> Result<Self> {
        let value = serde_json::to_value(&object)
            .map_err(|e| RuntimeError::Decode(format!("failed to serialize object: {}", e)))?;
        Self::from_value(value)
    }
}

/// Split an `apiVersion` into group and version; the core group has no slash.
pub fn gvk_from_api_version(api_version: &str, kind: &str) -> GroupVersionKind {
    let (group, version) = match api_version.split_once('/') {
        Some((g, v)) => (g, v),
        None => ("", api_version),
    };
    GroupVersionKind::gvk(group, version, kind)
}

fn take_string(root: &mut serde_json::Map<String, Value>, key: &str) -> Result<String> {
    match root.remove(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            Err(RuntimeError::Decode(format!("missing {}", key)))
        }
        Some(other) => Err(RuntimeError::Decode(format!(
            "{} must be a string, got {}",
            key,
            value_type(&other)
        ))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
