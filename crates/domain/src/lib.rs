//! Domain types for staging partial record updates.

#![forbid(unsafe_code)]

mod column_name;
mod patch;
mod request;
mod update_request;

pub use column_name::to_column_name;
pub use patch::{PatchValue, UpdateMap};
pub use request::{
    ADMIN_ONLY_TAG, EXCLUDED_NAME, FieldRef, FieldSlot, FieldTags, FieldValue, FieldVisibility,
    NAME_TAG, PatchField, RequestField, ResolveFieldSlot, ToFieldValue, UpdateRequest,
};
