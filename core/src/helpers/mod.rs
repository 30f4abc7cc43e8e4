#![deny(missing_docs)]

//! # Mock Templating Helpers
//!
//! A fixed registry of helper functions for the template engine that
//! renders mock-server code from OpenAPI operations. Block helpers take
//! their positional arguments plus a [`HelperContext`] carrying the
//! engine's branch-render callbacks and named hash parameters; value
//! helpers map a single value to replacement text.

mod mock;

pub use mock::resolve_mock_response;

use derive_more::Display;
use heck::ToLowerCamelCase;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Errors raised by helper misuse; these abort the enclosing render.
#[derive(Debug, Display)]
pub enum HelperError {
    /// A helper was invoked with too few positional arguments.
    #[display("Helper '{helper}' needs {expected} parameters")]
    Arity {
        /// The helper's registered name.
        helper: &'static str,
        /// Number of required positional arguments.
        expected: usize,
    },

    /// `compare` was given an operator it does not know.
    #[display("Helper 'compare' doesn't know the operator {_0}")]
    UnknownOperator(String),

    /// `match` was given a pattern that does not compile.
    #[display("Helper 'match' got an invalid pattern: {_0}")]
    Pattern(regex::Error),
}

impl std::error::Error for HelperError {}

/// Render callbacks and named parameters supplied by the template engine
/// for one block-helper invocation.
pub struct HelperContext<'a> {
    /// Renders the block's matched branch.
    pub fn_branch: &'a dyn Fn() -> String,
    /// Renders the block's `else` branch.
    pub inverse_branch: &'a dyn Fn() -> String,
    /// Named hash parameters (e.g. `operator` for `compare`).
    pub hash: BTreeMap<String, Value>,
}

impl HelperContext<'_> {
    fn render(&self, condition: bool) -> String {
        if condition {
            (self.fn_branch)()
        } else {
            (self.inverse_branch)()
        }
    }
}

/// A block helper: positional arguments plus context, returns the
/// rendered branch.
pub type BlockHelper = fn(&[Value], &HelperContext) -> Result<String, HelperError>;

/// A value helper: maps a single value to replacement text.
pub type ValueHelper = fn(&Value) -> String;

/// A registered helper.
pub enum Helper {
    /// Conditional block helper.
    Block(BlockHelper),
    /// Plain value-to-text helper.
    Value(ValueHelper),
}

/// The fixed helper registry, keyed by template-facing name.
pub fn registry() -> BTreeMap<&'static str, Helper> {
    BTreeMap::from([
        ("equal", Helper::Block(equal as BlockHelper)),
        ("endsWith", Helper::Block(ends_with as BlockHelper)),
        ("validMethod", Helper::Block(valid_method as BlockHelper)),
        ("match", Helper::Block(regex_match as BlockHelper)),
        ("compare", Helper::Block(compare as BlockHelper)),
        (
            "ifNoErrorResponses",
            Helper::Block(if_no_error_responses as BlockHelper),
        ),
        (
            "ifNoSuccessResponses",
            Helper::Block(if_no_success_responses as BlockHelper),
        ),
        ("capitalize", Helper::Value(capitalize as ValueHelper)),
        ("camelCase", Helper::Value(camel_case as ValueHelper)),
        ("inline", Helper::Value(inline as ValueHelper)),
        (
            "resolveMockResponse",
            Helper::Value(mock::resolve_mock_response as ValueHelper),
        ),
    ])
}

fn require_two<'a>(
    args: &'a [Value],
    helper: &'static str,
) -> Result<(&'a Value, &'a Value), HelperError> {
    match args {
        [first, second, ..] => Ok((first, second)),
        _ => Err(HelperError::Arity { helper, expected: 2 }),
    }
}

/// Renders the matched branch iff the two values are loosely equal.
pub fn equal(args: &[Value], context: &HelperContext) -> Result<String, HelperError> {
    let (left, right) = require_two(args, "equal")?;
    Ok(context.render(loose_eq(left, right)))
}

/// Renders the matched branch iff the string ends with the suffix.
pub fn ends_with(args: &[Value], context: &HelperContext) -> Result<String, HelperError> {
    let (text, suffix) = require_two(args, "endsWith")?;
    let suffix = text_of(suffix);
    Ok(context.render(!suffix.is_empty() && text_of(text).ends_with(&suffix)))
}

/// HTTP method tokens the generated mock server accepts.
const AUTHORIZED_METHODS: [&str; 14] = [
    "GET", "POST", "PUT", "DELETE", "PATCH", "COPY", "HEAD", "OPTIONS", "LINK", "UNLIK", "PURGE",
    "LOCK", "UNLOCK", "PROPFIND",
];

/// Renders the matched branch iff the uppercased value is an authorized
/// HTTP method token.
pub fn valid_method(args: &[Value], context: &HelperContext) -> Result<String, HelperError> {
    let (method, _) = require_two(args, "validMethod")?;
    let upper = text_of(method).to_uppercase();
    Ok(context.render(AUTHORIZED_METHODS.contains(&upper.as_str())))
}

/// Renders the matched branch iff the string matches the regex pattern.
pub fn regex_match(args: &[Value], context: &HelperContext) -> Result<String, HelperError> {
    let (text, pattern) = require_two(args, "match")?;
    let pattern = Regex::new(&text_of(pattern)).map_err(HelperError::Pattern)?;
    Ok(context.render(pattern.is_match(&text_of(text))))
}

/// Compares two values with the operator named in the hash (`operator`,
/// default `==`). Knows `==`, `===`, `!=`, `<`, `>`, `<=`, `>=` and
/// `typeof`; anything else is [`HelperError::UnknownOperator`].
pub fn compare(args: &[Value], context: &HelperContext) -> Result<String, HelperError> {
    let (left, right) = require_two(args, "compare")?;
    let operator = context
        .hash
        .get("operator")
        .and_then(Value::as_str)
        .unwrap_or("==");

    let result = match operator {
        "==" => loose_eq(left, right),
        "===" => left == right,
        "!=" => !loose_eq(left, right),
        "<" => ordering(left, right) == Some(Ordering::Less),
        ">" => ordering(left, right) == Some(Ordering::Greater),
        "<=" => matches!(ordering(left, right), Some(Ordering::Less | Ordering::Equal)),
        ">=" => matches!(
            ordering(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "typeof" => type_name(left) == text_of(right),
        unknown => return Err(HelperError::UnknownOperator(unknown.to_string())),
    };
    Ok(context.render(result))
}

/// Renders the matched branch iff no response key parses to a status code
/// of 400 or above.
pub fn if_no_error_responses(
    args: &[Value],
    context: &HelperContext,
) -> Result<String, HelperError> {
    let (responses, _) = require_two(args, "ifNoErrorResponses")?;
    Ok(context.render(!any_code(responses, |code| code >= 400.0)))
}

/// Renders the matched branch iff no response key parses to a status code
/// in `[200, 300)`.
pub fn if_no_success_responses(
    args: &[Value],
    context: &HelperContext,
) -> Result<String, HelperError> {
    let (responses, _) = require_two(args, "ifNoSuccessResponses")?;
    Ok(context.render(!any_code(responses, |code| (200.0..300.0).contains(&code))))
}

fn any_code(responses: &Value, predicate: impl Fn(f64) -> bool) -> bool {
    match responses {
        Value::Object(map) => map
            .keys()
            .any(|key| key.trim().parse::<f64>().map(&predicate).unwrap_or(false)),
        _ => false,
    }
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(value: &Value) -> String {
    let text = text_of(value);
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Lower-camel-cases the value.
pub fn camel_case(value: &Value) -> String {
    text_of(value).to_lower_camel_case()
}

/// Strips newline characters; empty input yields an empty string.
pub fn inline(value: &Value) -> String {
    match value {
        Value::String(text) => text.replace('\n', ""),
        _ => String::new(),
    }
}

/// Loose equality: structural equality, plus numeric coercion between
/// numbers, numeric strings and booleans.
fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (as_number(left), as_number(right)) {
        return l.partial_cmp(&r);
    }
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        // null and arrays both report "object", as the templates expect
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
