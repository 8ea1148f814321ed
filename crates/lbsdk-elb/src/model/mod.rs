//! Request, result and value types of the ELB API.
//!
//! Every field is optional or a list so partially filled values can be
//! built with `..Default::default()`; the marshallers reject calls that
//! leave a required field unset. Lists are empty, never absent.

/// `with_*` setters for optional string fields.
macro_rules! string_setters {
    ($ty:ty { $($setter:ident => $field:ident),* $(,)? }) => {
        impl $ty {
            $(
                pub fn $setter(mut self, value: impl Into<String>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }
    };
}

/// `with_*` setters for optional non-string fields.
macro_rules! value_setters {
    ($ty:ty { $($setter:ident => $field:ident: $val:ty),* $(,)? }) => {
        impl $ty {
            $(
                pub fn $setter(mut self, value: $val) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*
        }
    };
}

/// `with_*` setters replacing a list field.
macro_rules! list_setters {
    ($ty:ty { $($setter:ident => $field:ident: $val:ty),* $(,)? }) => {
        impl $ty {
            $(
                pub fn $setter<I, V>(mut self, values: I) -> Self
                where
                    I: IntoIterator<Item = V>,
                    V: Into<$val>,
                {
                    self.$field = values.into_iter().map(Into::into).collect();
                    self
                }
            )*
        }
    };
}

mod requests;
mod results;
mod types;

pub use requests::*;
pub use results::*;
pub use types::*;
