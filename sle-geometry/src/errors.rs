#[derive(thiserror::Error, Debug)]
pub enum SleGeometryError {
    /// Empty or otherwise unusable input, e.g. a vector with no coordinates.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),
    /// Operands of different dimensions, or a plane that does not fit its system.
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    /// All coefficients are near zero, so there is no leading variable.
    #[error("No nonzero elements found")]
    NoNonzeroElements,
    #[error("DivisionByZero: {0}")]
    DivisionByZero(String),
    #[error("Operation is only defined for dimensions up to 3, got {0}")]
    UnsupportedDimension(usize),
    /// Something other than a hyperplane or a scalar was added to a hyperplane.
    #[error("InvalidOperand: {0}")]
    InvalidOperand(String),

    #[error("Could not parse decimal: {0}")]
    ParseError(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
