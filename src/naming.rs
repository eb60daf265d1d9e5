//! Schema identifiers to target-language identifiers.
//!
//! Both transforms drop every non-alphanumeric character and upper-case the
//! character that follows a dropped one. No collision detection happens here;
//! the schema is expected to be collision-free already.
use crate::error::{GenError, GenResult};
use crate::schema::NAT_TYPE_NAME;

/// Name of the universal root class. Schema names may not claim it.
pub const ROOT_CLASS_NAME: &str = "Object";

/// `message_id` → `MessageId`.
pub fn class_name(raw: &str) -> GenResult<String> {
    if raw.is_empty() || raw == ROOT_CLASS_NAME || raw == NAT_TYPE_NAME {
        return Err(GenError::identifier(format!("`{raw}` cannot be used as a class name")));
    }
    let name = camelize(raw, true);
    if name.is_empty() {
        return Err(GenError::identifier(format!("`{raw}` has no alphanumeric characters")));
    }
    Ok(name)
}

/// `message_id` → `messageId`.
pub fn field_name(raw: &str) -> GenResult<String> {
    match raw.chars().last() {
        None => Err(GenError::identifier("empty field name")),
        Some(last) if !last.is_ascii_alphanumeric() => Err(GenError::identifier(format!(
            "field name `{raw}` must end with an alphanumeric character"
        ))),
        Some(_) => Ok(camelize(raw, false)),
    }
}

fn camelize(raw: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut next_upper = upper_first;
    for ch in raw.chars() {
        if !ch.is_ascii_alphanumeric() {
            next_upper = true;
            continue;
        }
        if next_upper {
            out.push(ch.to_ascii_uppercase());
            next_upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
