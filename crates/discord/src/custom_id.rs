use std::str::FromStr;

use thiserror::Error;

/// Fixed namespace literal marking custom_ids this process owns. Other
/// producers on the same transport use different first segments; their
/// identifiers decode as foreign, never as errors.
pub const NAMESPACE: &str = "grid";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("field `{field}` contains a reserved delimiter (`;` or `/`)")]
    ReservedDelimiter { field: String },
}

/// State recovered from a custom_id: the component kind, the positional
/// field blob as raw strings, and the optional trailing action verb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCustomId {
    pub kind: String,
    pub fields: Vec<String>,
    pub action: Option<String>,
}

/// Joins `fields` with `;` and the path segments with `/`. The delimiter
/// check here is the single mechanism keeping the grammar unambiguous;
/// free-form values (display names) must be validated before they get here.
pub fn encode(kind: &str, fields: &[&str], action: Option<&str>) -> Result<String, EncodeError> {
    for field in fields {
        if contains_reserved_delimiter(field) {
            return Err(EncodeError::ReservedDelimiter { field: (*field).to_string() });
        }
    }

    let blob = fields.join(";");
    match action {
        Some(verb) => Ok(format!("{NAMESPACE}/{kind}/{blob}/{verb}")),
        None => Ok(format!("{NAMESPACE}/{kind}/{blob}")),
    }
}

/// Splits a custom_id back into its decoded form. `None` means the
/// identifier is not ours (foreign namespace) or lacks the mandatory
/// namespace/kind/state segments.
pub fn decode(raw: &str) -> Option<DecodedCustomId> {
    let mut segments = raw.splitn(4, '/');
    if segments.next()? != NAMESPACE {
        return None;
    }

    let kind = segments.next().filter(|segment| !segment.is_empty())?;
    let blob = segments.next()?;
    let action = segments.next().filter(|segment| !segment.is_empty()).map(str::to_string);

    Some(DecodedCustomId {
        kind: kind.to_string(),
        fields: blob.split(';').map(str::to_string).collect(),
        action,
    })
}

pub fn is_ours(raw: &str) -> bool {
    raw.split('/').next() == Some(NAMESPACE)
}

/// Extracts just the kind segment for registry lookup, without decoding the
/// state blob. Requires the mandatory three segments to be present.
pub fn peek_kind(raw: &str) -> Option<&str> {
    let mut segments = raw.splitn(3, '/');
    if segments.next()? != NAMESPACE {
        return None;
    }
    let kind = segments.next().filter(|segment| !segment.is_empty())?;
    segments.next()?;
    Some(kind)
}

pub fn contains_reserved_delimiter(value: &str) -> bool {
    value.contains(';') || value.contains('/')
}

/// Tolerant numeric decode: a corrupted wire field (or a user typing text
/// into a numeric modal input) falls back to the value already known from
/// context instead of failing the whole operation.
pub fn parse_or<T: FromStr>(raw: &str, fallback: T) -> T {
    raw.trim().parse().unwrap_or(fallback)
}
