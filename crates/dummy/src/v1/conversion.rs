//! Conversions between `dummy.v1` and the internal model.
//!
//! Lossy edge: v1 has no way to distinguish "no title" from an empty title, so
//! an internal `Some("")` title is sent as `""` and reads back as `None`.

use apigroup::{Convert, ConversionError};

use super::{
    ComputeDoubleRequest, ComputeDoubleResponse, PoemForm, TellMeAPoemRequest,
    TellMeAPoemResponse,
};
use crate::internal::{self, Operand};

// ---------------------------------------------------------------------------
// ComputeDouble
// ---------------------------------------------------------------------------

impl Convert<internal::ComputeDoubleRequest> for ComputeDoubleRequest {
    fn convert(&self) -> Result<internal::ComputeDoubleRequest, ConversionError> {
        let input = Operand::new(self.value).ok_or_else(|| {
            ConversionError::out_of_range(
                "value",
                self.value,
                format!("[{}, {}]", Operand::MIN, Operand::MAX),
            )
        })?;
        Ok(internal::ComputeDoubleRequest { input })
    }
}

impl Convert<ComputeDoubleRequest> for internal::ComputeDoubleRequest {
    fn convert(&self) -> Result<ComputeDoubleRequest, ConversionError> {
        Ok(ComputeDoubleRequest {
            value: self.input.as_i64(),
        })
    }
}

impl Convert<internal::ComputeDoubleResponse> for ComputeDoubleResponse {
    fn convert(&self) -> Result<internal::ComputeDoubleResponse, ConversionError> {
        Ok(internal::ComputeDoubleResponse { value: self.value })
    }
}

impl Convert<ComputeDoubleResponse> for internal::ComputeDoubleResponse {
    fn convert(&self) -> Result<ComputeDoubleResponse, ConversionError> {
        Ok(ComputeDoubleResponse { value: self.value })
    }
}

// ---------------------------------------------------------------------------
// TellMeAPoem
// ---------------------------------------------------------------------------

fn form_to_internal(raw: i32) -> Result<internal::PoemForm, ConversionError> {
    match PoemForm::from_i32(raw) {
        Some(PoemForm::Unspecified) => Ok(internal::PoemForm::Any),
        Some(PoemForm::Haiku) => Ok(internal::PoemForm::Haiku),
        Some(PoemForm::Couplet) => Ok(internal::PoemForm::Couplet),
        None => Err(ConversionError::UnknownEnumValue {
            field: "form",
            value: raw,
        }),
    }
}

fn form_to_wire(form: internal::PoemForm) -> i32 {
    let wire = match form {
        internal::PoemForm::Any => PoemForm::Unspecified,
        internal::PoemForm::Haiku => PoemForm::Haiku,
        internal::PoemForm::Couplet => PoemForm::Couplet,
    };
    wire as i32
}

impl Convert<internal::TellMeAPoemRequest> for TellMeAPoemRequest {
    fn convert(&self) -> Result<internal::TellMeAPoemRequest, ConversionError> {
        Ok(internal::TellMeAPoemRequest {
            want_title: self.i_want_a_title,
            form: form_to_internal(self.form)?,
        })
    }
}

impl Convert<TellMeAPoemRequest> for internal::TellMeAPoemRequest {
    fn convert(&self) -> Result<TellMeAPoemRequest, ConversionError> {
        Ok(TellMeAPoemRequest {
            i_want_a_title: self.want_title,
            form: form_to_wire(self.form),
        })
    }
}

impl Convert<internal::TellMeAPoemResponse> for TellMeAPoemResponse {
    fn convert(&self) -> Result<internal::TellMeAPoemResponse, ConversionError> {
        Ok(internal::TellMeAPoemResponse {
            title: (!self.title.is_empty()).then(|| self.title.clone()),
            lines: self.lines.clone(),
        })
    }
}

impl Convert<TellMeAPoemResponse> for internal::TellMeAPoemResponse {
    fn convert(&self) -> Result<TellMeAPoemResponse, ConversionError> {
        Ok(TellMeAPoemResponse {
            title: self.title.clone().unwrap_or_default(),
            lines: self.lines.clone(),
        })
    }
}
