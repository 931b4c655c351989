use thiserror::Error;

/// Why a descriptor failed validation.
///
/// Validation is all-or-nothing: the first violation found is reported and the
/// descriptor is rejected before it reaches the wire.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{what} exceeds the {limit}-byte embedded payload cap")]
    PayloadTooLarge { what: &'static str, limit: usize },

    #[error("{field} out of range: {detail}")]
    OutOfRange { field: &'static str, detail: String },

    #[error("trailing content and a renderable progress indicator are mutually exclusive")]
    TrailingProgressConflict,

    #[error("leading content override must be an icon or animation")]
    LeadingOverrideNotCompatible,
}

impl ValidationError {
    pub(crate) fn empty(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    pub(crate) fn out_of_range(field: &'static str, detail: impl Into<String>) -> Self {
        Self::OutOfRange { field, detail: detail.into() }
    }
}
