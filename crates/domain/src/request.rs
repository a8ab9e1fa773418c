use std::any::type_name;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde_json::Value;

use crate::PatchValue;

/// Tag key carrying the storage-facing field name.
pub const NAME_TAG: &str = "json";

/// Tag key marking a field as changeable by admins only.
pub const ADMIN_ONLY_TAG: &str = "admin_only";

/// Name tag value that excludes a field from every update.
pub const EXCLUDED_NAME: &str = "-";

/// Whether a field belongs to the public contract of its request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldVisibility {
    /// Declared `pub`.
    Public,
    /// Private or restricted (`pub(crate)`, `pub(super)`, ...).
    Private,
}

impl FieldVisibility {
    /// Derives visibility from a declared Rust visibility qualifier.
    ///
    /// Only a bare `pub` counts as public.
    #[must_use]
    pub fn from_qualifier(qualifier: &str) -> Self {
        if qualifier.trim() == "pub" {
            Self::Public
        } else {
            Self::Private
        }
    }

    /// Returns whether the field is public.
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Ordered key/value annotations attached to a request field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags(Vec<(&'static str, &'static str)>);

impl FieldTags {
    /// Creates an empty tag list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tag.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: &'static str) -> Self {
        self.0.push((key, value));
        self
    }

    /// Returns the value of the first tag named `key`, or `""` when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &'static str {
        self.0
            .iter()
            .find(|(tag, _)| *tag == key)
            .map_or("", |(_, value)| *value)
    }
}

/// Runtime value of a request field, classified by its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed integer of any width.
    Signed(i64),
    /// Unsigned integer of any width.
    Unsigned(u64),
    /// Floating point of any width.
    Float(f64),
    /// String value.
    Text(String),
    /// Boolean value.
    Boolean(bool),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// A kind that cannot be written as a single column, with its type name.
    Unsupported(&'static str),
}

impl FieldValue {
    /// Converts the value into a column value, if its kind is supported.
    #[must_use]
    pub fn into_patch_value(self) -> Option<PatchValue> {
        match self {
            Self::Signed(value) => Some(PatchValue::Signed(value)),
            Self::Unsigned(value) => Some(PatchValue::Unsigned(value)),
            Self::Float(value) => Some(PatchValue::Float(value)),
            Self::Text(value) => Some(PatchValue::Text(value)),
            Self::Boolean(value) => Some(PatchValue::Boolean(value)),
            Self::Timestamp(value) => Some(PatchValue::Timestamp(value)),
            Self::Unsupported(_) => None,
        }
    }
}

/// How a field's value is declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSlot {
    /// Declared as `Option<T>`; `Some` signals the caller wants to set it.
    Optional(Option<FieldValue>),
    /// Declared as a plain value; never part of an update.
    Plain(FieldValue),
}

/// Descriptor of one declared field of an update request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestField {
    identifier: &'static str,
    visibility: FieldVisibility,
    tags: FieldTags,
    slot: FieldSlot,
}

impl RequestField {
    /// Creates a field descriptor.
    #[must_use]
    pub fn new(
        identifier: &'static str,
        visibility: FieldVisibility,
        tags: FieldTags,
        slot: FieldSlot,
    ) -> Self {
        Self {
            identifier,
            visibility,
            tags,
            slot,
        }
    }

    /// Returns the declared Rust identifier.
    #[must_use]
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Returns the declared visibility.
    #[must_use]
    pub fn visibility(&self) -> FieldVisibility {
        self.visibility
    }

    /// Returns the field annotations.
    #[must_use]
    pub fn tags(&self) -> &FieldTags {
        &self.tags
    }

    /// Returns the value slot.
    #[must_use]
    pub fn slot(&self) -> &FieldSlot {
        &self.slot
    }

    /// Consumes the descriptor and returns the value slot.
    #[must_use]
    pub fn into_slot(self) -> FieldSlot {
        self.slot
    }
}

/// A request type whose fields can be staged as a partial update.
///
/// Implementations list every declared field in declaration order. The
/// [`update_request!`](crate::update_request) macro derives this table.
pub trait UpdateRequest {
    /// Returns the field descriptors in declaration order.
    fn fields(&self) -> Vec<RequestField>;
}

/// Classifies a scalar Rust value as a [`FieldValue`].
pub trait ToFieldValue {
    /// Returns the classified value.
    fn to_field_value(&self) -> FieldValue;
}

/// Describes how a declared field type participates in an update.
pub trait PatchField {
    /// Returns the value slot for this field.
    fn to_field_slot(&self) -> FieldSlot;
}

impl<T: ToFieldValue> PatchField for Option<T> {
    fn to_field_slot(&self) -> FieldSlot {
        FieldSlot::Optional(self.as_ref().map(T::to_field_value))
    }
}

/// Borrowed field value handed to [`ResolveFieldSlot`] by
/// [`update_request!`](crate::update_request).
#[doc(hidden)]
pub struct FieldRef<'a, T: ?Sized>(pub &'a T);

/// Picks the value slot of a declared field, falling back to
/// [`FieldValue::Unsupported`] for types without a [`PatchField`] impl.
///
/// The impls sit on `&&FieldRef`, `&FieldRef` and `FieldRef` so method
/// resolution on `(&&&FieldRef(value)).resolve_field_slot()` prefers, in
/// order: a [`PatchField`] type, any other `Option<T>`, anything else.
#[doc(hidden)]
pub trait ResolveFieldSlot {
    /// Returns the value slot for the referenced field.
    fn resolve_field_slot(&self) -> FieldSlot;
}

impl<T: PatchField + ?Sized> ResolveFieldSlot for &&FieldRef<'_, T> {
    fn resolve_field_slot(&self) -> FieldSlot {
        self.0.to_field_slot()
    }
}

impl<T> ResolveFieldSlot for &FieldRef<'_, Option<T>> {
    fn resolve_field_slot(&self) -> FieldSlot {
        FieldSlot::Optional(
            self.0
                .as_ref()
                .map(|_| FieldValue::Unsupported(type_name::<T>())),
        )
    }
}

impl<T: ?Sized> ResolveFieldSlot for FieldRef<'_, T> {
    fn resolve_field_slot(&self) -> FieldSlot {
        FieldSlot::Plain(FieldValue::Unsupported(type_name::<T>()))
    }
}

macro_rules! scalar_field {
    ($($ty:ty => |$value:ident| $convert:expr),+ $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> FieldValue {
                    let $value = self;
                    $convert
                }
            }

            impl PatchField for $ty {
                fn to_field_slot(&self) -> FieldSlot {
                    FieldSlot::Plain(self.to_field_value())
                }
            }
        )+
    };
}

macro_rules! unsupported_field {
    ($(impl[$($generics:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> ToFieldValue for $ty {
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Unsupported(type_name::<Self>())
                }
            }

            impl<$($generics)*> PatchField for $ty {
                fn to_field_slot(&self) -> FieldSlot {
                    FieldSlot::Plain(self.to_field_value())
                }
            }
        )+
    };
}

scalar_field! {
    i8 => |value| FieldValue::Signed(i64::from(*value)),
    i16 => |value| FieldValue::Signed(i64::from(*value)),
    i32 => |value| FieldValue::Signed(i64::from(*value)),
    i64 => |value| FieldValue::Signed(*value),
    isize => |value| FieldValue::Signed(*value as i64),
    u8 => |value| FieldValue::Unsigned(u64::from(*value)),
    u16 => |value| FieldValue::Unsigned(u64::from(*value)),
    u32 => |value| FieldValue::Unsigned(u64::from(*value)),
    u64 => |value| FieldValue::Unsigned(*value),
    usize => |value| FieldValue::Unsigned(*value as u64),
    f32 => |value| FieldValue::Float(f64::from(*value)),
    f64 => |value| FieldValue::Float(*value),
    String => |value| FieldValue::Text(value.clone()),
    bool => |value| FieldValue::Boolean(*value),
    DateTime<Utc> => |value| FieldValue::Timestamp(*value),
}

// Only `DateTime<Utc>` is a timestamp column; other chrono types are skipped.
// Listed so hand-written field tables can call `to_field_slot` on them too.
unsupported_field! {
    impl[T] Vec<T>,
    impl[K, V] BTreeMap<K, V>,
    impl[K, V, S] HashMap<K, V, S>,
    impl[] Value,
    impl[] DateTime<FixedOffset>,
    impl[] NaiveDateTime,
}
