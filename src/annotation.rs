//! Turns the raw annotation of one source field into a destination path and an
//! optional transform.
//!
//! Accepted forms:
//!
//! | Annotation           | Meaning                                           |
//! |----------------------|---------------------------------------------------|
//! | *(absent or empty)*  | field is ignored                                  |
//! | `-`, `-=...`         | field is ignored                                  |
//! | `name`               | copy into the destination field `name`            |
//! | `path=a,b,c`         | copy into `a.b.c` (spaces work as separators too) |
//! | `name;negate`        | copy through the registered transform `negate`    |

use crate::error::{MapperError, Result};
use crate::tag;
use crate::transform::{Transform, TransformRegistry};

const IGNORE_KEY: &str = "-";
const PATH_KEY: &str = "path";

/// A parsed field annotation.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Destination field names, outermost first. Never empty.
    pub path: Vec<String>,
    /// Transform applied to the source value before it is stored.
    pub transform: Option<Transform>,
}

/// Parses `raw` against the transforms in `registry`.
///
/// Returns `Ok(None)` when the field should be ignored.
///
/// # Errors
/// Any tokenizer error, more than two parameters, an unknown first-parameter key,
/// an empty `path=`, a transform parameter with values, or an unregistered
/// transform name.
pub fn parse_annotation(raw: &str, registry: &TransformRegistry) -> Result<Option<Annotation>> {
    let params = tag::parse(raw)?;
    if params.len() > 2 {
        return Err(MapperError::TooManyParameters {
            tag: raw.to_string(),
            count: params.len(),
        });
    }

    let mut params = params.into_iter();
    let Some(first) = params.next() else {
        return Ok(None);
    };

    let tag::Param { key, values } = first;
    if key == IGNORE_KEY {
        return Ok(None);
    }
    let path = match values {
        None => vec![key],
        Some(values) if key == PATH_KEY => {
            if values.is_empty() {
                return Err(MapperError::EmptyPath {
                    tag: raw.to_string(),
                });
            }
            values
        }
        Some(_) => {
            return Err(MapperError::UnknownParameter {
                tag: raw.to_string(),
                key,
            });
        }
    };

    let transform = match params.next() {
        None => None,
        Some(second) if second.has_values() => {
            return Err(MapperError::UnexpectedValue {
                tag: raw.to_string(),
                key: second.key,
            });
        }
        Some(second) => match registry.get(&second.key) {
            Some(t) => Some(t.clone()),
            None => {
                return Err(MapperError::UnknownTransform {
                    tag: raw.to_string(),
                    name: second.key,
                });
            }
        },
    };

    Ok(Some(Annotation { path, transform }))
}
