//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum StubStoreError {
            Unreachable { message: String } => "store unreachable: {message}",
            RowLimit { limit: u32 } => "row limit exceeded: {limit}",
            Rejected { message: String, code: u32 } => "rejected: {message} ({code})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = StubStoreError::unreachable("connection refused");
        assert_eq!(err.to_string(), "store unreachable: connection refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = StubStoreError::row_limit(10_000_u32);
        assert_eq!(err.to_string(), "row limit exceeded: 10000");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = StubStoreError::rejected("bad row", 22_u32);
        assert_eq!(err.to_string(), "rejected: bad row (22)");
    }
}
