// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest template loading and placeholder substitution

use crate::error::{Result, RuntimeError, TemplateFailure};
use gtmpl::{Context, Value};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Placeholder name (as referenced by `{{ .Name }}`) to substituted value
pub type Placeholders = BTreeMap<String, String>;

// A field on the root context: `.Name` not preceded by a word, `.`, `$` or `)`
static ROOT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.$)\]])\.([A-Za-z_][A-Za-z0-9_]*)").expect("valid field regex")
});

/// Renders manifest templates stored in a single directory
#[derive(Debug, Clone)]
pub struct ManifestRenderer {
    dir: PathBuf,
}

impl ManifestRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load `<dir>/<name>` and substitute every placeholder it references
    #[instrument(skip(self, placeholders), fields(dir = %self.dir.display()))]
    pub async fn render(&self, name: &str, placeholders: &Placeholders) -> Result<Vec<u8>> {
        let path = self.manifest_path(name)?;

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RuntimeError::ManifestNotFound(path))
            }
            Err(source) => return Err(RuntimeError::ManifestRead { path, source }),
        };

        debug!("Loaded manifest template {} ({} bytes)", path.display(), raw.len());
        render_template(name, &raw, placeholders)
    }

    /// Only plain file names inside the manifest directory are addressable
    fn manifest_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Err(RuntimeError::ManifestNotFound(path));
        }
        Ok(path)
    }
}

/// Render template text with the given placeholders.
///
/// Every root field the template references must be present in `placeholders`;
/// supplied values that the template never uses are ignored.
pub fn render_template(name: &str, text: &str, placeholders: &Placeholders) -> Result<Vec<u8>> {
    let failure = |reason: TemplateFailure| RuntimeError::Template {
        name: name.to_string(),
        reason,
    };

    // gtmpl's lexer does not terminate on some unclosed actions
    let referenced = referenced_placeholders(text).map_err(failure)?;

    let mut tmpl = gtmpl::Template::default();
    tmpl.parse(text)
        .map_err(|e| failure(TemplateFailure::Parse(e.to_string())))?;

    let missing: Vec<String> = referenced
        .into_iter()
        .filter(|p| !placeholders.contains_key(p))
        .collect();
    if !missing.is_empty() {
        return Err(failure(TemplateFailure::MissingPlaceholders(missing)));
    }

    let values: HashMap<String, Value> = placeholders
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let context = Context::from(Value::Map(values));

    let rendered = tmpl
        .render(&context)
        .map_err(|e| failure(TemplateFailure::Execution(e.to_string())))?;

    Ok(rendered.into_bytes())
}

/// Names of the root-context fields referenced by the template's actions.
///
/// Comments and string literals inside actions are skipped. Fails with
/// `Parse` when an action, comment or literal is left open.
pub fn referenced_placeholders(
    text: &str,
) -> std::result::Result<BTreeSet<String>, TemplateFailure> {
    let mut found = BTreeSet::new();
    for body in action_bodies(text)? {
        found.extend(ROOT_FIELD.captures_iter(&body).map(|field| field[1].to_string()));
    }
    Ok(found)
}

/// Code of every `{{ ... }}` action, with comments and literals blanked out
fn action_bodies(text: &str) -> std::result::Result<Vec<String>, TemplateFailure> {
    let mut bodies = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let action = &rest[start + 2..];
        let (body, consumed) = scan_action(action)?;
        bodies.push(body);
        rest = &action[consumed..];
    }
    Ok(bodies)
}

/// Scan one action up to its closing `}}`, returning its code and the bytes consumed
fn scan_action(src: &str) -> std::result::Result<(String, usize), TemplateFailure> {
    let bytes = src.as_bytes();
    let mut code: Vec<u8> = Vec::with_capacity(bytes.len().min(64));
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                return Ok((String::from_utf8_lossy(&code).into_owned(), i + 2));
            }
            quote @ (b'"' | b'\'') => {
                i = skip_quoted(bytes, i + 1, quote).ok_or_else(|| {
                    TemplateFailure::Parse("unterminated quoted string".to_string())
                })?;
                code.push(b' ');
            }
            b'`' => {
                let end = src[i + 1..]
                    .find('`')
                    .ok_or_else(|| TemplateFailure::Parse("unterminated raw string".to_string()))?;
                i += end + 2;
                code.push(b' ');
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = src[i + 2..]
                    .find("*/")
                    .ok_or_else(|| TemplateFailure::Parse("unclosed comment".to_string()))?;
                i += end + 4;
                code.push(b' ');
            }
            b => {
                code.push(b);
                i += 1;
            }
        }
    }

    Err(TemplateFailure::Parse("unclosed action".to_string()))
}

/// Index just past the closing quote, honouring backslash escapes
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
