//! Discriminator resolution and name rules for profile fields.
//!
//! Everything here is a pure function of its input: no shared state, safe to
//! call from any number of requests at once.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::contract::model::{ProfileField, ProfileFieldType, User};
use crate::domain::error::DomainError;

/// Identify the variant of `field` and borrow its common `name` attribute.
///
/// Only `Unrecognized` wire data fails, with `DomainError::UnknownVariant`;
/// callers treat that as a per-item problem.
pub fn resolve(field: &ProfileField) -> Result<(ProfileFieldType, &str), DomainError> {
    match field {
        ProfileField::Text(f) => Ok((ProfileFieldType::Text, f.name.as_str())),
        ProfileField::Number(f) => Ok((ProfileFieldType::Number, f.name.as_str())),
        ProfileField::Gender(f) => Ok((ProfileFieldType::Gender, f.name.as_str())),
        ProfileField::Unrecognized(u) => Err(DomainError::unknown_variant(u.field_type.clone())),
    }
}

/// Trim surrounding whitespace and case-fold.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check every field name, in order, and collect one message per offending field.
///
/// Rules: the field must resolve, its normalized name must be non-empty and
/// must not repeat an earlier normalized name of the same sequence.
/// An empty result means the sequence is valid.
pub fn validate_names(fields: &[ProfileField]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, field) in fields.iter().enumerate() {
        let name = match resolve(field) {
            Ok((_, name)) => name,
            Err(e) => {
                errors.push(format!("field[{i}]: {e}"));
                continue;
            }
        };

        let normalized = normalize_name(name);
        if normalized.is_empty() {
            errors.push(format!("field[{i}]: name is empty"));
            continue;
        }
        if seen.contains(&normalized) {
            errors.push(format!("field[{i}]: name '{name}' is duplicated"));
            continue;
        }
        seen.insert(normalized);
    }

    errors
}

/// Fields whose resolved name equals `target_name` exactly, in original order.
/// Unresolvable fields are skipped.
pub fn filter_by_name(fields: &[ProfileField], target_name: &str) -> Vec<ProfileField> {
    fields
        .iter()
        .filter(|f| matches!(resolve(f), Ok((_, name)) if name == target_name))
        .cloned()
        .collect()
}

/// How often each resolved field name occurs across all users.
pub fn field_name_stats(users: &[User]) -> HashMap<String, usize> {
    let mut stats = HashMap::new();
    let fields = users
        .iter()
        .filter_map(|u| u.profile_fields.as_deref())
        .flatten();
    for field in fields {
        if let Ok((_, name)) = resolve(field) {
            *stats.entry(name.to_string()).or_insert(0) += 1;
        }
    }
    stats
}

/// Emit one diagnostic record per field.
pub fn log_field_names(fields: &[ProfileField]) {
    for (index, field) in fields.iter().enumerate() {
        match resolve(field) {
            Ok((kind, name)) => debug!(index, field_type = %kind, name, "profile field"),
            Err(e) => warn!(index, error = %e, "unresolvable profile field"),
        }
    }
}
