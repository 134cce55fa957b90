/// Errors that can occur during gate evaluation.
///
/// A denial is not an error: it is reported through
/// [`GateResult`](crate::GateResult). These variants mean the gate itself
/// could not reach a decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// A stage could not evaluate the proposal.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },

    /// The pipeline cannot be evaluated as configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Create a stage error with a name and message.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
