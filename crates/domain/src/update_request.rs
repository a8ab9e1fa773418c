/// Declares an update request struct together with its field table.
///
/// Each field may carry one `#[patch(...)]` attribute with string tags,
/// after any doc comments. Struct attributes such as derives pass through
/// unchanged. Field types without a [`PatchField`](crate::PatchField) impl
/// are accepted and reported as [`FieldValue::Unsupported`](crate::FieldValue).
///
/// # Example
/// ```
/// use updatemap_domain::{FieldSlot, UpdateRequest, update_request};
///
/// update_request! {
///     #[derive(Debug, Default)]
///     pub struct UpdateBusiness {
///         /// Display name shown to customers.
///         #[patch(json = "display_name,omitempty")]
///         pub display_name: Option<String>,
///         #[patch(json = "credit_limit", admin_only = "true")]
///         pub credit_limit: Option<i64>,
///         pub limit_24: Option<f64>,
///         pub revision: u32,
///     }
/// }
///
/// let request = UpdateBusiness {
///     limit_24: Some(10.1),
///     ..UpdateBusiness::default()
/// };
/// let fields = request.fields();
///
/// assert_eq!(fields.len(), 4);
/// assert_eq!(fields[1].tags().get("admin_only"), "true");
/// assert!(matches!(fields[3].slot(), FieldSlot::Plain(_)));
/// ```
#[macro_export]
macro_rules! update_request {
    (
        $(#[$struct_meta:meta])*
        $struct_vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[patch($($tag:ident = $tag_value:literal),* $(,)?)])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        $struct_vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::UpdateRequest for $name {
            fn fields(&self) -> ::std::vec::Vec<$crate::RequestField> {
                ::std::vec![
                    $(
                        $crate::RequestField::new(
                            ::std::stringify!($field),
                            $crate::FieldVisibility::from_qualifier(
                                ::std::stringify!($field_vis),
                            ),
                            $crate::FieldTags::new()
                                $($(.with(::std::stringify!($tag), $tag_value))*)?,
                            {
                                use $crate::ResolveFieldSlot as _;
                                (&&&$crate::FieldRef(&self.$field)).resolve_field_slot()
                            },
                        )
                    ),*
                ]
            }
        }
    };
}
