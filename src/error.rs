//! Recoverable errors surfaced to the input collaborator.

use std::fmt;

use thiserror::Error;

use crate::eval::ExprError;

/// Text field a value was entered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// The function `f(x)`.
    Function,
    /// Lower x bound.
    XMin,
    /// Upper x bound.
    XMax,
    /// Lower y bound.
    YMin,
    /// Upper y bound.
    YMax,
    /// Custom x value to center on.
    CustomX,
    /// Custom coarse sampling density.
    CustomDelta,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::XMin => "x_min",
            Self::XMax => "x_max",
            Self::YMin => "y_min",
            Self::YMax => "y_max",
            Self::CustomX => "custom x",
            Self::CustomDelta => "samples per pixel",
        };
        f.write_str(name)
    }
}

/// Errors reported when user input cannot be applied.
///
/// None of these are fatal: the plot keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// The text of a field did not parse or evaluate.
    #[error("invalid {field}: {source}")]
    Parse {
        /// Field holding the text.
        field: InputField,
        /// Underlying expression error.
        #[source]
        source: ExprError,
    },
    /// The text evaluated to NaN or infinity.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Field holding the text.
        field: InputField,
    },
    /// A custom sampling density below the supported minimum.
    #[error("sampling density {0} is below the minimum of 0.1 samples per pixel")]
    SamplingDensity(f64),
}

impl PlotError {
    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<InputField> {
        match self {
            Self::Parse { field, .. } | Self::NonFinite { field } => Some(*field),
            Self::SamplingDensity(_) => Some(InputField::CustomDelta),
        }
    }
}
