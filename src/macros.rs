//! Macros to reduce boilerplate in the codebase

/// Generate `Display`, `FromStr` and an `ALL` listing for a unit-only enum
/// whose variants are spelled as a plural name with a singular alias.
///
/// `Display` always writes the plural form; `FromStr` accepts either form,
/// case-insensitively.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::StewardError;
///
/// named_kinds!(
///     MyKind,
///     StewardError::UnknownEntity,
///     {
///         Widgets => ("widgets", "widget"),
///         Gadgets => ("gadgets", "gadget"),
///     }
/// );
/// ```
#[macro_export]
macro_rules! named_kinds {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => ($plural:expr, $singular:expr)),+ $(,)? }
    ) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)+];

            /// Plural name, as used in REST paths and on the command line.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $plural,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::StewardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                $(
                    if lower == $plural || lower == $singular {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($error_variant(s.to_string()))
            }
        }
    };
}

/// Run `$body` with `$record` bound to the record type of `$kind`.
///
/// Lets generic code over [`crate::entity::Record`] be selected by a runtime
/// [`crate::entity::EntityKind`].
///
/// ```rust,ignore
/// with_record_type!(kind, R => list_kind::<R>(&config).await)
/// ```
#[macro_export]
macro_rules! with_record_type {
    ($kind:expr, $record:ident => $body:expr) => {
        match $kind {
            $crate::entity::EntityKind::Departments => {
                type $record = $crate::entity::Department;
                $body
            }
            $crate::entity::EntityKind::Employees => {
                type $record = $crate::entity::Employee;
                $body
            }
            $crate::entity::EntityKind::Owners => {
                type $record = $crate::entity::Owner;
                $body
            }
            $crate::entity::EntityKind::Suppliers => {
                type $record = $crate::entity::Supplier;
                $body
            }
            $crate::entity::EntityKind::Assets => {
                type $record = $crate::entity::Asset;
                $body
            }
        }
    };
}
