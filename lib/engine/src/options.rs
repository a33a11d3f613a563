/// Options that control the evaluation of an algebra.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Re-checks every retrieved triple against the pattern and the inbound bindings.
    ///
    /// Datasets that answer index lookups exactly do not need this. It should be enabled for
    /// datasets whose lookups may return more triples than requested. Property paths are always
    /// evaluated rigorously.
    pub rigorous_evaluation: bool,
}

impl EvaluationOptions {
    #[must_use]
    pub fn with_rigorous_evaluation(mut self, rigorous_evaluation: bool) -> Self {
        self.rigorous_evaluation = rigorous_evaluation;
        self
    }
}
