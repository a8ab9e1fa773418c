use thiserror::Error;
use tracing::debug;
use updatemap_core::AppError;
use updatemap_domain::{
    ADMIN_ONLY_TAG, EXCLUDED_NAME, FieldSlot, NAME_TAG, UpdateMap, UpdateRequest, to_column_name,
};

/// Reasons an update request cannot be staged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateMapError {
    /// A caller without admin rights tried to set an admin-only field.
    #[error("Only admins can update field '{column}'.")]
    AdminOnlyField {
        /// Column name of the rejected field.
        column: String,
    },
}

impl UpdateMapError {
    /// Returns the column name of the offending field.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::AdminOnlyField { column } => column.as_str(),
        }
    }
}

impl From<UpdateMapError> for AppError {
    fn from(error: UpdateMapError) -> Self {
        AppError::Forbidden(error.to_string())
    }
}

/// Builds the column map for a partial update from an update request.
///
/// Only fields declared as `Option<T>` and set to `Some` are staged, so a
/// caller can reset a column to `0`, `false` or `""` while plain fields never
/// leak into the update. Private fields and fields named `-` are skipped, as
/// are value kinds that do not fit a single column.
///
/// Fields tagged `admin_only` require `is_admin`. The first such field set by
/// a non-admin caller rejects the whole request.
pub fn create_update_map<R>(request: &R, is_admin: bool) -> Result<UpdateMap, UpdateMapError>
where
    R: UpdateRequest + ?Sized,
{
    let mut update_map = UpdateMap::new();

    for field in request.fields() {
        let identifier = field.identifier();
        let visibility = field.visibility();
        let name_tag = field.tags().get(NAME_TAG);
        let admin_only = !field.tags().get(ADMIN_ONLY_TAG).is_empty();

        let value = match field.into_slot() {
            FieldSlot::Optional(Some(value)) => value,
            FieldSlot::Optional(None) => {
                debug!(field = identifier, "skipping unset field");
                continue;
            }
            FieldSlot::Plain(_) => {
                debug!(field = identifier, "skipping field that is not optional");
                continue;
            }
        };

        if !visibility.is_public() {
            debug!(field = identifier, "skipping field that is not public");
            continue;
        }

        if name_tag == EXCLUDED_NAME {
            continue;
        }

        let column = to_column_name(resolve_field_name(name_tag, identifier));

        if admin_only && !is_admin {
            return Err(UpdateMapError::AdminOnlyField { column });
        }

        match value.into_patch_value() {
            Some(value) => {
                debug!(
                    field = identifier,
                    column = %column,
                    kind = value.kind(),
                    "staging field"
                );
                update_map.insert(column, value);
            }
            None => debug!(
                field = identifier,
                column = %column,
                "skipping field with a value kind that has no column mapping"
            ),
        }
    }

    Ok(update_map)
}

// Modifiers after the first comma (`omitempty`, ...) carry no meaning here.
fn resolve_field_name(name_tag: &'static str, identifier: &'static str) -> &'static str {
    let name = name_tag
        .split_once(',')
        .map_or(name_tag, |(name, _modifiers)| name);

    // An empty name (`",omitempty"`) falls back to the identifier instead of
    // producing an empty column key, unlike a plain first-segment split.
    if name.is_empty() { identifier } else { name }
}
