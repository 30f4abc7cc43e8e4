#![deny(missing_docs)]

//! # Generic Document Merger
//!
//! Deep structural union over YAML document trees with last-write-wins
//! semantics: mapping keys are unioned, shared keys merge recursively,
//! sequences concatenate, and on any other conflict the later value
//! replaces the earlier one.

use serde_yaml::{Mapping, Value};

/// Merges an ordered list of document trees into one, folding
/// left-to-right with [`merge_pair`].
///
/// Merging an empty list yields an empty mapping. There are no error
/// conditions.
pub fn merge_all(trees: Vec<Value>) -> Value {
    trees
        .into_iter()
        .fold(Value::Mapping(Mapping::new()), merge_pair)
}

/// Merges two document trees.
///
/// - Mapping + Mapping: union of keys; a key present in both merges
///   recursively. Keys keep the earlier tree's insertion order.
/// - Sequence + Sequence: concatenation, duplicates kept.
/// - Anything else (scalars, or a type mismatch): `later` wins.
pub fn merge_pair(earlier: Value, later: Value) -> Value {
    match (earlier, later) {
        (Value::Mapping(mut base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => {
                        let prior = std::mem::replace(existing, Value::Null);
                        *existing = merge_pair(prior, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Mapping(base)
        }
        (Value::Sequence(mut base), Value::Sequence(tail)) => {
            base.extend(tail);
            Value::Sequence(base)
        }
        (_, later) => later,
    }
}
