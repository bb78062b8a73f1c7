//! Boilerplate for port error enums.
//!
//! `define_port_error!` takes variants written as `Name { field: Type } =>
//! "message"` (or a bare `Name => "message"`) and emits a `thiserror` enum,
//! one snake_case constructor per variant taking `impl Into<_>` fields, and
//! a `kind()` accessor naming the variant for structured logs.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };
    (@ctor $variant:ident { $($field:ident : $ty:ty),+ }) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };
    (@kind $variant:ident) => { Self::$variant };
    (@kind $variant:ident { $($field:ident : $ty:ty),+ }) => { Self::$variant { .. } };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: $ty),+ } )?,
            )+
        }

        impl $name {
            $( define_port_error!(@ctor $variant $( { $($field : $ty),+ } )?); )+

            /// Variant name, for log fields.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    $( define_port_error!(@kind $variant $( { $($field : $ty),+ } )?) => stringify!($variant), )+
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use super::define_port_error;
    use rstest::rstest;

    define_port_error! {
        pub enum GatewayError {
            Offline => "gateway offline",
            Rejected { status: u16, reason: String } => "gateway rejected the call ({status}): {reason}",
        }
    }

    #[rstest]
    #[case(GatewayError::offline(), "gateway offline", "Offline")]
    #[case(
        GatewayError::rejected(413_u16, "photo too large"),
        "gateway rejected the call (413): photo too large",
        "Rejected"
    )]
    fn renders_message_and_kind(
        #[case] error: GatewayError,
        #[case] message: &str,
        #[case] kind: &str,
    ) {
        assert_eq!(error.to_string(), message);
        assert_eq!(error.kind(), kind);
    }
}
