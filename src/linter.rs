//! Schema linting - static analysis of schema description files.
//!
//! Validates description files for:
//! - JSON syntax errors
//! - Descriptions the parser rejects (E003, reported at the failing node)
//! - Shapes the meta-schema rejects once the parser accepts the file (E002)
//! - Suspicious but accepted shapes (empty objects, extra keys on fields)

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

use crate::loader::load_json;
use crate::schema::{escape_pointer, is_field_description};
use crate::types::{SchemaNode, FIELD_KEYS};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/items/0/sku")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// JSON Schema describing the schema description language itself.
pub fn meta_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "field": {
                "type": "object",
                "properties": {
                    "type": { "enum": ["string", "number", "boolean"] },
                    "required": { "type": "boolean" }
                },
                "required": ["type", "required"]
            },
            "array": {
                "type": "array",
                "minItems": 1,
                "maxItems": 1,
                "items": { "$ref": "#/$defs/node" }
            },
            "object": {
                "type": "object",
                "additionalProperties": { "$ref": "#/$defs/node" }
            },
            "node": {
                "anyOf": [
                    { "$ref": "#/$defs/field" },
                    { "$ref": "#/$defs/array" },
                    { "$ref": "#/$defs/object" }
                ]
            }
        },
        "$ref": "#/$defs/node"
    })
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let results: Vec<FileResult> = files.iter().map(|file| lint_file(file, path)).collect();

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    };
    let total_errors = count(Severity::Error);
    let total_warnings = count(Severity::Warning);

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema description file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut diagnostics = Vec::new();
    let display = display_name(file, base_path);

    let description = match load_json(file) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(error(file, "E001", "/", format!("syntax error: {}", e)));
            return FileResult {
                file: display,
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    // The parser pins the failing node; the meta-schema only sees the whole document.
    match SchemaNode::from_value(&description) {
        Ok(_) => check_meta_schema(&description, file, &mut diagnostics),
        Err(e) => diagnostics.push(error(file, "E003", e.path(), e.to_string())),
    }

    check_shapes(&description, file, "", &mut diagnostics);

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: display,
        status,
        diagnostics,
    }
}

/// Path relative to the lint root, or the file name when the root is the file itself.
fn display_name(file: &Path, base_path: &Path) -> PathBuf {
    match file.strip_prefix(base_path) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        Ok(_) => file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf()),
        Err(_) => file.to_path_buf(),
    }
}

fn check_meta_schema(description: &Value, file: &Path, diagnostics: &mut Vec<Diagnostic>) {
    let validator = match jsonschema::validator_for(&meta_schema()) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(error(file, "E002", "/", format!("meta-schema unusable: {}", e)));
            return;
        }
    };

    for e in validator.iter_errors(description) {
        let path = e.instance_path.to_string();
        let path = if path.is_empty() { "/".to_string() } else { path };
        diagnostics.push(error(file, "E002", &path, e.to_string()));
    }
}

/// Recursively warn on shapes that parse but are unlikely to be intended.
fn check_shapes(value: &Value, file: &Path, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match value {
        Value::Object(map) if is_field_description(map) => {
            for key in map.keys().filter(|k| !FIELD_KEYS.contains(&k.as_str())) {
                diagnostics.push(warning(
                    file,
                    "W002",
                    &format!("{}/{}", path, escape_pointer(key)),
                    format!("field key \"{}\" is ignored: fields only take type and required", key),
                ));
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                let at = if path.is_empty() { "/" } else { path };
                diagnostics.push(warning(
                    file,
                    "W001",
                    at,
                    "empty object schema validates nothing".to_string(),
                ));
            }
            for (key, child) in map {
                let child_path = format!("{}/{}", path, escape_pointer(key));
                check_shapes(child, file, &child_path, diagnostics);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let child_path = format!("{}/{}", path, i);
                check_shapes(item, file, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}

fn error(file: &Path, code: &str, path: &str, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        code: code.to_string(),
        file: file.to_path_buf(),
        path: path.to_string(),
        message,
    }
}

fn warning(file: &Path, code: &str, path: &str, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warning,
        ..error(file, code, path, message)
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
