//! `Reflect` implementations for the standard leaf types and `Option<T>`.

use crate::reflect::{Reflect, TypeDesc};
use std::time::Duration;

/// Implements [`Reflect`] for leaf types that are copied by cloning.
///
/// The type must be `Clone + Send + Sync + 'static`. To be usable behind an `Option`
/// in a destination record it must also implement `Default`.
///
/// ```rust
/// #[derive(Clone, Default, PartialEq, Debug)]
/// struct Celsius(f64);
///
/// fieldmap::impl_reflect_scalar!(Celsius);
/// ```
#[macro_export]
macro_rules! impl_reflect_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $t {
                fn type_desc() -> $crate::TypeDesc {
                    $crate::TypeDesc::scalar::<$t>(stringify!($t))
                }
            }
        )*
    };
}

impl_reflect_scalar!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
    Duration
);

impl<T: Reflect + Clone + Default> Reflect for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::optional::<T>()
    }
}
