//! Scope parsing — site vs. room addressing for scenes.

use crate::error::ValidationError;

/// A normalized scope and its extracted components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScope {
    /// Normalized scope string (empty for the wildcard scope).
    pub scope: String,
    /// Room name when the scope addresses a room.
    pub room: Option<String>,
    /// Local site id when the scope addresses the site.
    pub site_id: Option<String>,
}

/// Normalize and validate a raw scope identifier.
///
/// - Empty/absent input is the wildcard scope (no error).
/// - `"room:<name>"` passes through unchanged with the room extracted.
/// - `"site"` and `"site:<id>"` normalize to `"site:<local_site_id>"`;
///   an explicit id that differs from the local site is rejected.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedScope`] for more than two
/// colon-separated segments or a room scope without a name,
/// [`ValidationError::ForeignSite`] for a non-local site id, and
/// [`ValidationError::UnknownScheme`] for any other scheme prefix.
pub fn parse_scope(raw: Option<&str>, local_site_id: &str) -> Result<ParsedScope, ValidationError> {
    let raw = match raw {
        None | Some("") => return Ok(ParsedScope::default()),
        Some(raw) => raw,
    };

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() > 2 {
        return Err(ValidationError::MalformedScope {
            scope: raw.to_string(),
        });
    }

    match parts[0] {
        "room" => {
            let room = parts.get(1).filter(|name| !name.is_empty()).ok_or_else(|| {
                ValidationError::MalformedScope {
                    scope: raw.to_string(),
                }
            })?;
            Ok(ParsedScope {
                scope: raw.to_string(),
                room: Some((*room).to_string()),
                site_id: None,
            })
        }
        "site" => {
            if let Some(explicit) = parts.get(1)
                && *explicit != local_site_id
            {
                return Err(ValidationError::ForeignSite {
                    site_id: (*explicit).to_string(),
                });
            }
            Ok(ParsedScope {
                scope: format!("site:{local_site_id}"),
                room: None,
                site_id: Some(local_site_id.to_string()),
            })
        }
        _ => Err(ValidationError::UnknownScheme {
            scope: raw.to_string(),
        }),
    }
}
