/// Facts about the function that the IR itself does not carry.
///
/// The buffer-length arguments of the calling convention are never
/// inspected; these counts are the only source of truth for node layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationContext {
    /// Name recorded in the graph.
    pub function_name: String,
    /// Dynamic parameters, D. They occupy nodes `1..=D`.
    pub n_dynamic_ind: usize,
    /// Independent variables, V. They occupy nodes `D+1..=D+V`.
    pub n_variable_ind: usize,
    /// Number of output slots that must be stored.
    pub n_dependent: usize,
}

impl TranslationContext {
    pub fn new(function_name: &str, n_variable_ind: usize, n_dependent: usize) -> Self {
        Self {
            function_name: function_name.to_string(),
            n_dynamic_ind: 0,
            n_variable_ind,
            n_dependent,
        }
    }

    pub fn with_dynamic(mut self, n_dynamic_ind: usize) -> Self {
        self.n_dynamic_ind = n_dynamic_ind;
        self
    }

    /// Length of the input buffer, `D + V`.
    pub fn n_independent(&self) -> usize {
        self.n_dynamic_ind.saturating_add(self.n_variable_ind)
    }
}
