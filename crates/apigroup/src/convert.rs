//! The conversion contract between wire and internal shapes.
//!
//! Conversions are the only place where a wire schema and the internal model
//! touch. Each operation of each version provides one [`Convert`] impl per
//! direction:
//!
//! ```text
//! v1::ComputeDoubleRequest   --Convert-->  internal::ComputeDoubleRequest
//! internal::ComputeDoubleResponse --Convert-->  v1::ComputeDoubleResponse
//! ```
//!
//! ## Rules
//!
//! - Pure: the source is borrowed, never mutated; no I/O; deterministic.
//! - Every destination field is populated. Fields absent on the wire arrive
//!   here already defaulted to their zero value by the decoder.
//! - Data the destination can represent is never dropped. A value it cannot
//!   represent yields a [`ConversionError`]; lossy mappings are documented on
//!   the impl that performs them.

use crate::errors::ConversionError;

/// Fallible, side-effect-free mapping from `Self` into `T`.
pub trait Convert<T> {
    /// Converts `self` into the destination shape.
    fn convert(&self) -> Result<T, ConversionError>;
}

/// Narrows an integer into a smaller destination type, reporting the
/// destination range when it does not fit.
pub fn narrow<S, D>(field: &'static str, value: S) -> Result<D, ConversionError>
where
    S: Copy + std::fmt::Display,
    D: TryFrom<S> + Bounded,
{
    D::try_from(value).map_err(|_| {
        ConversionError::out_of_range(field, value, format!("[{}, {}]", D::MIN, D::MAX))
    })
}

/// Integer types whose bounds can be reported in a [`ConversionError`].
pub trait Bounded: Sized + std::fmt::Display {
    const MIN: Self;
    const MAX: Self;
}

macro_rules! bounded {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Bounded for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
            }
        )+
    };
}

bounded!(i8, i16, i32, u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_accepts_values_in_range() {
        let v: i32 = narrow("value", 42_i64).unwrap();
        assert_eq!(v, 42);
        let v: i32 = narrow("value", i64::from(i32::MIN)).unwrap();
        assert_eq!(v, i32::MIN);
    }

    #[test]
    fn narrow_reports_field_and_destination_range() {
        let err = narrow::<i64, i32>("response32", 1_i64 << 31).unwrap_err();
        assert_eq!(
            err,
            ConversionError::OutOfRange {
                field: "response32",
                value: "2147483648".to_string(),
                expected: "[-2147483648, 2147483647]".to_string(),
            }
        );
    }

    #[test]
    fn reported_range_follows_the_destination_type() {
        let err = narrow::<i64, u8>("level", -1).unwrap_err();
        assert_eq!(err, ConversionError::out_of_range("level", -1, "[0, 255]"));

        let err = narrow::<i32, i16>("offset", 40_000).unwrap_err();
        assert_eq!(
            err,
            ConversionError::out_of_range("offset", 40_000, format!("[{}, {}]", i16::MIN, i16::MAX))
        );
    }
}
