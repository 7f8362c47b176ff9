//! Rule-string parsing into typed rules.

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// A rule that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule `{rule}`: {reason}")]
pub struct RuleError {
    /// The rule segment as written.
    pub rule: String,
    /// What is wrong with it.
    pub reason: String,
}

impl RuleError {
    fn new(rule: &str, reason: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

/// A numeric rule parameter, kept with its written form for messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Parsed value.
    pub value: f64,
    /// Parameter as written.
    pub text: String,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One parsed validation rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present and non-empty.
    Required,
    /// `null` is acceptable.
    Nullable,
    /// Only validate when the key is in the input.
    Sometimes,
    /// Must not be empty when present.
    Filled,
    /// Key must exist in the input.
    Present,
    /// Required when any of the other fields is present.
    RequiredWith(Vec<String>),
    /// Required when any of the other fields is missing.
    RequiredWithout(Vec<String>),
    /// Required when another field equals one of the values.
    RequiredIf(String, Vec<String>),
    /// Required unless another field equals one of the values.
    RequiredUnless(String, Vec<String>),
    /// Must be a string.
    String,
    /// Must be a number or numeric string.
    Numeric,
    /// Must be an integer.
    Integer,
    /// Must be a floating point number.
    Float,
    /// Must be a boolean or boolean literal.
    Boolean,
    /// Must be a list or map.
    Array,
    /// Accepts anything.
    Mixed,
    /// Must be an email address.
    Email,
    /// Must be an http(s) URL.
    Url,
    /// Must be a UUID.
    Uuid,
    /// Letters only.
    Alpha,
    /// Letters and digits only.
    AlphaNum,
    /// Letters, digits, `-` and `_` only.
    AlphaDash,
    /// Must match the pattern.
    Regex(Regex),
    /// Must not match the pattern.
    NotRegex(Regex),
    /// Minimum size.
    Min(Limit),
    /// Maximum size.
    Max(Limit),
    /// Inclusive size range.
    Between(Limit, Limit),
    /// Exact size.
    Size(Limit),
    /// Must be one of the values.
    In(Vec<String>),
    /// Must not be one of the values.
    NotIn(Vec<String>),
    /// Must start with one of the prefixes.
    StartsWith(Vec<String>),
    /// Must end with one of the suffixes.
    EndsWith(Vec<String>),
    /// Must equal another field.
    Same(String),
    /// Must differ from another field.
    Different(String),
    /// Must equal `{key}_confirmation`.
    Confirmed,
}

impl Rule {
    /// Parses one `name[:params]` segment.
    ///
    /// # Errors
    ///
    /// Returns error for unknown names, missing or malformed parameters and
    /// patterns that do not compile.
    pub fn parse(segment: &str) -> Result<Self, RuleError> {
        let (name, raw) = match segment.split_once(':') {
            Some((name, raw)) => (name.trim(), Some(raw)),
            None => (segment.trim(), None),
        };

        if name == "regex" || name == "not_regex" {
            let pattern = compile_pattern(segment, raw.unwrap_or_default())?;
            return Ok(if name == "regex" {
                Self::Regex(pattern)
            } else {
                Self::NotRegex(pattern)
            });
        }

        let params: Vec<String> = raw
            .map(|r| r.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();

        let rule = match name {
            "required" => Self::Required,
            "nullable" => Self::Nullable,
            "sometimes" => Self::Sometimes,
            "filled" => Self::Filled,
            "present" => Self::Present,
            "string" => Self::String,
            "numeric" => Self::Numeric,
            "integer" | "int" => Self::Integer,
            "float" | "double" => Self::Float,
            "boolean" | "bool" => Self::Boolean,
            "array" => Self::Array,
            "mixed" => Self::Mixed,
            "email" => Self::Email,
            "url" => Self::Url,
            "uuid" => Self::Uuid,
            "alpha" => Self::Alpha,
            "alpha_num" => Self::AlphaNum,
            "alpha_dash" => Self::AlphaDash,
            "confirmed" => Self::Confirmed,
            "required_with" => Self::RequiredWith(at_least(segment, params, 1)?),
            "required_without" => Self::RequiredWithout(at_least(segment, params, 1)?),
            "required_if" => {
                let (other, values) = field_and_values(segment, params)?;
                Self::RequiredIf(other, values)
            }
            "required_unless" => {
                let (other, values) = field_and_values(segment, params)?;
                Self::RequiredUnless(other, values)
            }
            "min" => Self::Min(single_limit(segment, &params)?),
            "max" => Self::Max(single_limit(segment, &params)?),
            "size" => Self::Size(single_limit(segment, &params)?),
            "between" => {
                if params.len() != 2 {
                    return Err(RuleError::new(segment, "expected two numeric parameters"));
                }
                Self::Between(limit(segment, &params[0])?, limit(segment, &params[1])?)
            }
            "in" => Self::In(at_least(segment, params, 1)?),
            "not_in" => Self::NotIn(at_least(segment, params, 1)?),
            "starts_with" => Self::StartsWith(at_least(segment, params, 1)?),
            "ends_with" => Self::EndsWith(at_least(segment, params, 1)?),
            "same" => Self::Same(single_field(segment, params)?),
            "different" => Self::Different(single_field(segment, params)?),
            _ => return Err(RuleError::new(segment, "unknown rule")),
        };
        Ok(rule)
    }

    /// True for rules that decide presence rather than check a value.
    #[must_use]
    pub fn is_presence(&self) -> bool {
        matches!(
            self,
            Self::Required
                | Self::Filled
                | Self::Present
                | Self::RequiredWith(_)
                | Self::RequiredWithout(_)
                | Self::RequiredIf(..)
                | Self::RequiredUnless(..)
        )
    }

    /// True for rules that make sizes numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::Integer | Self::Float)
    }
}

/// Splits a rule string on `|`, keeping `/.../` patterns of `regex` and
/// `not_regex` intact.
#[must_use]
pub fn split_rules(rules: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < rules.len() {
        if i == start {
            if let Some(end) = pattern_segment_end(&rules[start..]) {
                i = start + end;
                continue;
            }
        }
        if rules.as_bytes()[i] == b'|' {
            parts.push(&rules[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    parts.push(&rules[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Parses a whole rule string.
///
/// # Errors
///
/// Returns the first segment that fails to parse.
pub fn parse_rules(rules: &str) -> Result<Vec<Rule>, RuleError> {
    split_rules(rules).into_iter().map(Rule::parse).collect()
}

/// Byte length of a `regex:/.../flags` segment, up to the `|` or end after it.
fn pattern_segment_end(segment: &str) -> Option<usize> {
    let (name, rest) = segment.split_once(':')?;
    if !matches!(name.trim(), "regex" | "not_regex") || !rest.starts_with('/') {
        return None;
    }
    let body_start = name.len() + 2;
    let body = &segment[body_start..];
    let mut escaped = false;
    for (offset, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '/' => {
                let after = &body[offset + 1..];
                let flags = after.find('|').unwrap_or(after.len());
                return Some(body_start + offset + 1 + flags);
            }
            _ => {}
        }
    }
    None
}

fn compile_pattern(segment: &str, raw: &str) -> Result<Regex, RuleError> {
    let raw = raw.trim();
    let Some(body) = raw.strip_prefix('/') else {
        return Err(RuleError::new(segment, "pattern must be delimited by `/`"));
    };
    let Some(close) = body.rfind('/') else {
        return Err(RuleError::new(segment, "pattern must be delimited by `/`"));
    };
    let (pattern, flags) = (&body[..close], &body[close + 1..]);
    if let Some(flag) = flags.chars().find(|c| !matches!(c, 'i' | 'm' | 's' | 'x' | 'u')) {
        return Err(RuleError::new(segment, format!("unsupported pattern flag `{flag}`")));
    }
    let flags: String = flags.chars().filter(|&c| c != 'u').collect();
    let source = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };
    Regex::new(&source).map_err(|e| RuleError::new(segment, e.to_string()))
}

fn at_least(segment: &str, params: Vec<String>, count: usize) -> Result<Vec<String>, RuleError> {
    if params.len() < count || params.iter().any(String::is_empty) {
        return Err(RuleError::new(
            segment,
            format!("expected at least {count} non-empty parameter(s)"),
        ));
    }
    Ok(params)
}

fn single_field(segment: &str, params: Vec<String>) -> Result<String, RuleError> {
    match <[String; 1]>::try_from(params) {
        Ok([field]) if !field.is_empty() => Ok(field),
        _ => Err(RuleError::new(segment, "expected one field name")),
    }
}

fn field_and_values(segment: &str, params: Vec<String>) -> Result<(String, Vec<String>), RuleError> {
    let mut params = at_least(segment, params, 2)?;
    let other = params.remove(0);
    Ok((other, params))
}

fn single_limit(segment: &str, params: &[String]) -> Result<Limit, RuleError> {
    match params {
        [only] => limit(segment, only),
        _ => Err(RuleError::new(segment, "expected one numeric parameter")),
    }
}

fn limit(segment: &str, text: &str) -> Result<Limit, RuleError> {
    let value = text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RuleError::new(segment, format!("`{text}` is not a number")))?;
    Ok(Limit {
        value,
        text: text.to_string(),
    })
}
