// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decoding of rendered manifests into generic objects

use crate::error::{Result, RuntimeError};
use crate::types::GenericResource;
use serde::Deserialize;

/// Parse a YAML (or JSON) manifest holding one object into a [`GenericResource`].
///
/// Empty documents around `---` separators are skipped.
pub fn decode(bytes: &[u8]) -> Result<GenericResource> {
    let mut objects = Vec::with_capacity(1);
    for document in serde_yaml::Deserializer::from_slice(bytes) {
        let value = serde_json::Value::deserialize(document)
            .map_err(|e| RuntimeError::Decode(format!("invalid manifest document: {}", e)))?;
        if !value.is_null() {
            objects.push(value);
        }
    }

    if objects.len() > 1 {
        return Err(RuntimeError::Decode(format!(
            "manifest holds {} objects, expected one",
            objects.len()
        )));
    }
    match objects.pop() {
        Some(value) => GenericResource::from_value(value),
        None => Err(RuntimeError::Decode("manifest holds no object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifests::render::{render_template, Placeholders};

    #[test]
    fn test_decode_rendered_manifest_keeps_declared_gvk() {
        let template = r#"apiVersion: batch/v1
kind: Job
metadata:
  name: eval-{{ .JobID }}
  labels:
    eval-hub.io/job-id: "{{ .JobID }}"
spec:
  backoffLimit: 0
"#;
        let placeholders: Placeholders = [("JobID".to_string(), "1234".to_string())].into();
        let rendered = render_template("job.yaml", template, &placeholders).unwrap();

        let resource = decode(&rendered).unwrap();

        assert_eq!(resource.kind(), "Job");
        assert_eq!(resource.gvk().version, "v1");
        assert_eq!(resource.gvk().group, "batch");
        assert_eq!(resource.name(), Some("eval-1234"));
        assert_eq!(
            resource.labels().unwrap().get("eval-hub.io/job-id").unwrap(),
            "1234"
        );
        assert_eq!(resource.namespace(), None);
    }

    #[test]
    fn test_decode_json_document() {
        let resource = decode(br#"{"apiVersion":"v1","kind":"Namespace","metadata":{"name":"evals"}}"#)
            .unwrap();
        assert_eq!(resource.kind(), "Namespace");
        assert_eq!(resource.name(), Some("evals"));
    }

    #[test]
    fn test_decode_malformed_yaml() {
        let err = decode(b"kind: [Job\n").unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(_)));
    }

    #[test]
    fn test_decode_scalar_root() {
        let err = decode(b"just a string").unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(msg) if msg.contains("object")));
    }

    #[test]
    fn test_decode_empty_document() {
        assert!(matches!(decode(b"").unwrap_err(), RuntimeError::Decode(_)));
    }

    #[test]
    fn test_decode_multiple_documents() {
        let docs = b"apiVersion: v1\nkind: Namespace\n---\napiVersion: v1\nkind: Namespace\n";
        let err = decode(docs).unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(msg) if msg.contains("2 objects")));
    }

    #[test]
    fn test_decode_ignores_empty_documents_around_separators() {
        let resource =
            decode(b"---\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: a\n---\n").unwrap();
        assert_eq!(resource.kind(), "Namespace");
        assert_eq!(resource.name(), Some("a"));

        let resource = decode(b"---\n---\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: b\n")
            .unwrap();
        assert_eq!(resource.name(), Some("b"));
    }

    #[test]
    fn test_decode_only_separators() {
        let err = decode(b"---\n---\n").unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(msg) if msg.contains("no object")));
    }

    #[test]
    fn test_decode_non_string_label_value() {
        let doc = b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\n  labels:\n    tier: [a]\n";
        let err = decode(doc).unwrap_err();
        assert!(matches!(err, RuntimeError::Decode(msg) if msg.contains("metadata")));
    }
}
