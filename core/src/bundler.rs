#![deny(missing_docs)]

//! # Reference Bundler
//!
//! Parses a YAML file and recursively inlines every internal `$ref` until
//! the tree is fully self-contained. Reference targets are loaded from the
//! filesystem relative to the referencing file's own directory, so chains
//! of relative references across subdirectories resolve correctly.
//!
//! Bundling is read-only: the only side effect is filesystem reads.

use crate::error::{CombineError, CombineResult};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const REF_KEY: &str = "$ref";

/// Bundles the YAML document at `file_path`, inlining all `$ref`s.
///
/// A relative `file_path` is resolved against `base_dir`. Fails with
/// [`CombineError::Parse`] on malformed YAML and with
/// [`CombineError::Reference`] when a target file is missing, a JSON
/// pointer does not resolve, or the reference graph contains a cycle.
pub fn bundle(file_path: &Path, base_dir: &Path) -> CombineResult<Value> {
    let root_path = if file_path.is_absolute() {
        file_path.to_path_buf()
    } else {
        base_dir.join(file_path)
    };
    let canonical = fs::canonicalize(&root_path)?;

    let mut bundler = Bundler::default();
    let root = bundler.load_document(&canonical)?.clone();
    let mut chain = Vec::new();
    bundler.resolve(root, &canonical, &mut chain)
}

/// Per-call bundler state: each referenced file is parsed once and reused
/// for every reference to it within the same bundle operation.
#[derive(Default)]
struct Bundler {
    cache: HashMap<PathBuf, Value>,
}

impl Bundler {
    fn load_document(&mut self, canonical: &Path) -> CombineResult<&Value> {
        if !self.cache.contains_key(canonical) {
            let text = fs::read_to_string(canonical)?;
            let parsed = serde_yaml::from_str(&text).map_err(|source| CombineError::Parse {
                path: canonical.to_path_buf(),
                source,
            })?;
            self.cache.insert(canonical.to_path_buf(), parsed);
        }
        Ok(&self.cache[canonical])
    }

    /// Rebuilds `value` with every `$ref` replaced by its resolved target.
    ///
    /// `current` is the canonical path of the file the value came from;
    /// `chain` holds the `(file, pointer)` pairs of the active resolution
    /// chain for cycle detection.
    fn resolve(
        &mut self,
        value: Value,
        current: &Path,
        chain: &mut Vec<(PathBuf, String)>,
    ) -> CombineResult<Value> {
        match value {
            Value::Mapping(map) => {
                // A `$ref` replaces the whole mapping; sibling keys are
                // discarded.
                if let Some(target) = ref_target(&map) {
                    return self.resolve_reference(&target, current, chain);
                }
                let mut resolved = Mapping::new();
                for (key, entry) in map {
                    resolved.insert(key, self.resolve(entry, current, chain)?);
                }
                Ok(Value::Mapping(resolved))
            }
            Value::Sequence(entries) => entries
                .into_iter()
                .map(|entry| self.resolve(entry, current, chain))
                .collect::<CombineResult<Vec<_>>>()
                .map(Value::Sequence),
            scalar => Ok(scalar),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &str,
        current: &Path,
        chain: &mut Vec<(PathBuf, String)>,
    ) -> CombineResult<Value> {
        let (file_part, pointer) = match reference.split_once('#') {
            Some((file, pointer)) => (file, pointer),
            None => (reference, ""),
        };

        let target_path = if file_part.is_empty() {
            current.to_path_buf()
        } else {
            current
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(file_part)
        };
        let canonical = fs::canonicalize(&target_path).map_err(|_| {
            CombineError::Reference(format!(
                "target file '{}' of reference '{}' does not exist",
                target_path.display(),
                reference
            ))
        })?;

        let link = (canonical.clone(), pointer.to_string());
        if chain.contains(&link) {
            return Err(CombineError::Reference(format!(
                "reference cycle detected at '{}'",
                reference
            )));
        }

        let fragment = {
            let document = self.load_document(&canonical)?;
            navigate_pointer(document, pointer)
                .ok_or_else(|| {
                    CombineError::Reference(format!(
                        "pointer '{}' does not resolve in '{}'",
                        pointer,
                        canonical.display()
                    ))
                })?
                .clone()
        };

        // The fragment may itself contain references, rooted at the
        // target file.
        chain.push(link);
        let resolved = self.resolve(fragment, &canonical, chain);
        chain.pop();
        resolved
    }
}

fn ref_target(map: &Mapping) -> Option<String> {
    match map.get(REF_KEY) {
        Some(Value::String(target)) => Some(target.clone()),
        _ => None,
    }
}

/// Walks a JSON pointer through mappings by key and sequences by index.
///
/// An empty pointer addresses the whole document. Returns `None` when any
/// segment fails to resolve.
fn navigate_pointer<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(document);
    }

    let mut node = document;
    for segment in trimmed.split('/') {
        let segment = decode_pointer_segment(segment);
        node = match node {
            Value::Mapping(map) => map.get(segment.as_str())?,
            Value::Sequence(entries) => entries.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_bundle_without_refs_is_identity() {
        let dir = tempdir().unwrap();
        write(dir.path(), "api.yaml", "info:\n  title: Plain\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("info:\n  title: Plain"));
    }

    #[test]
    fn test_cross_file_pointer_reference() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "defs:\n  Bar:\n    type: string\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'other.yaml#/defs/Bar'\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  type: string"));
    }

    #[test]
    fn test_same_file_pointer_reference() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "api.yaml",
            "defs:\n  Bar:\n    type: string\nfoo:\n  $ref: '#/defs/Bar'\n",
        );

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(
            bundled,
            yaml("defs:\n  Bar:\n    type: string\nfoo:\n  type: string")
        );
    }

    #[test]
    fn test_whole_file_reference() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "type: string\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'other.yaml'\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  type: string"));
    }

    #[test]
    fn test_sibling_keys_are_discarded() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "defs:\n  Bar:\n    type: string\n");
        write(
            dir.path(),
            "api.yaml",
            "foo:\n  description: dropped\n  $ref: 'other.yaml#/defs/Bar'\n",
        );

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  type: string"));
    }

    #[test]
    fn test_nested_relative_references() {
        // api.yaml -> sub/b.yaml -> c.yaml (sibling of b, resolved
        // relative to sub/, not the base dir)
        let dir = tempdir().unwrap();
        write(dir.path(), "sub/c.yaml", "type: integer\n");
        write(dir.path(), "sub/b.yaml", "inner:\n  $ref: 'c.yaml'\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'sub/b.yaml#/inner'\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  type: integer"));
    }

    #[test]
    fn test_pointer_through_sequence_index() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "items:\n  - type: string\n  - type: number\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'other.yaml#/items/1'\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  type: number"));
    }

    #[test]
    fn test_pointer_segment_escapes() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "paths:\n  /pets:\n    get: {}\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'other.yaml#/paths/~1pets'\n");

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(bundled, yaml("foo:\n  get: {}"));
    }

    #[test]
    fn test_repeated_reference_to_same_target() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "defs:\n  Bar:\n    type: string\n");
        write(
            dir.path(),
            "api.yaml",
            "a:\n  $ref: 'other.yaml#/defs/Bar'\nb:\n  $ref: 'other.yaml#/defs/Bar'\n",
        );

        let bundled = bundle(Path::new("api.yaml"), dir.path()).unwrap();
        assert_eq!(
            bundled,
            yaml("a:\n  type: string\nb:\n  type: string")
        );
    }

    #[test]
    fn test_cycle_between_files_fails() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.yaml", "node:\n  $ref: 'b.yaml#/node'\n");
        write(dir.path(), "b.yaml", "node:\n  $ref: 'a.yaml#/node'\n");

        let err = bundle(Path::new("a.yaml"), dir.path()).unwrap_err();
        assert!(matches!(err, CombineError::Reference(_)));
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_self_cycle_fails() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.yaml", "node:\n  $ref: '#/node'\n");

        let err = bundle(Path::new("a.yaml"), dir.path()).unwrap_err();
        assert!(matches!(err, CombineError::Reference(_)));
    }

    #[test]
    fn test_missing_target_file_fails() {
        let dir = tempdir().unwrap();
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'absent.yaml#/x'\n");

        let err = bundle(Path::new("api.yaml"), dir.path()).unwrap_err();
        assert!(matches!(err, CombineError::Reference(_)));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_unresolvable_pointer_fails() {
        let dir = tempdir().unwrap();
        write(dir.path(), "other.yaml", "defs: {}\n");
        write(dir.path(), "api.yaml", "foo:\n  $ref: 'other.yaml#/defs/Bar'\n");

        let err = bundle(Path::new("api.yaml"), dir.path()).unwrap_err();
        assert!(matches!(err, CombineError::Reference(_)));
    }

    #[test]
    fn test_malformed_yaml_fails_with_parse_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "api.yaml", "foo: [1,\n");

        let err = bundle(Path::new("api.yaml"), dir.path()).unwrap_err();
        assert!(matches!(err, CombineError::Parse { .. }));
    }
}
