//! Conversions between `dummy.v1alpha1` and the internal model.
//!
//! Every 32-bit wire value widens losslessly into the internal model. The
//! reverse direction narrows: an internal value outside `i32` is an
//! out-of-range error, most notably a doubled result above `i32::MAX`.

use apigroup::{narrow, Convert, ConversionError};

use super::{ComputeDoubleRequest, ComputeDoubleResponse};
use crate::internal::{self, Operand};

impl Convert<internal::ComputeDoubleRequest> for ComputeDoubleRequest {
    fn convert(&self) -> Result<internal::ComputeDoubleRequest, ConversionError> {
        Ok(internal::ComputeDoubleRequest {
            input: Operand::from(self.input32),
        })
    }
}

impl Convert<ComputeDoubleRequest> for internal::ComputeDoubleRequest {
    fn convert(&self) -> Result<ComputeDoubleRequest, ConversionError> {
        Ok(ComputeDoubleRequest {
            input32: narrow("input32", self.input.as_i64())?,
        })
    }
}

impl Convert<internal::ComputeDoubleResponse> for ComputeDoubleResponse {
    fn convert(&self) -> Result<internal::ComputeDoubleResponse, ConversionError> {
        Ok(internal::ComputeDoubleResponse {
            value: i64::from(self.response32),
        })
    }
}

impl Convert<ComputeDoubleResponse> for internal::ComputeDoubleResponse {
    fn convert(&self) -> Result<ComputeDoubleResponse, ConversionError> {
        Ok(ComputeDoubleResponse {
            response32: narrow("response32", self.value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn request_widens() {
        let wire = ComputeDoubleRequest { input32: -7 };
        let internal: internal::ComputeDoubleRequest = wire.convert().unwrap();
        assert_eq!(internal.input.as_i64(), -7);
    }

    #[test]
    fn response_outside_i32_is_rejected() {
        let internal = internal::ComputeDoubleResponse {
            value: 2 * i64::from(i32::MAX),
        };
        let err = Convert::<ComputeDoubleResponse>::convert(&internal).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::OutOfRange { field: "response32", .. }
        ));
    }

    #[test]
    fn internal_request_outside_i32_does_not_narrow() {
        let internal = internal::ComputeDoubleRequest {
            input: Operand::new(i64::from(i32::MAX) + 1).unwrap(),
        };
        assert!(Convert::<ComputeDoubleRequest>::convert(&internal).is_err());
    }

    proptest! {
        #[test]
        fn request_round_trips(input32 in any::<i32>()) {
            let wire = ComputeDoubleRequest { input32 };
            let internal: internal::ComputeDoubleRequest = wire.convert().unwrap();
            let back: ComputeDoubleRequest = internal.convert().unwrap();
            prop_assert_eq!(back, wire);
        }

        #[test]
        fn response_round_trips_within_i32(value in i64::from(i32::MIN)..=i64::from(i32::MAX)) {
            let internal = internal::ComputeDoubleResponse { value };
            let wire: ComputeDoubleResponse = internal.convert().unwrap();
            let back: internal::ComputeDoubleResponse = wire.convert().unwrap();
            prop_assert_eq!(back, internal);
        }
    }
}
