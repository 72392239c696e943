//! Instructions sent to the edit-suggestion service along with the code

use derive_more::Display;

/// What the user wants done to their code
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FixRequest {
    /// Fix the error described by a stack trace
    #[display(fmt = "fix error")]
    FixError { stack_trace: String },

    /// Find and fix bugs
    #[display(fmt = "lint")]
    Lint,

    /// Make the code faster
    #[display(fmt = "optimize")]
    Optimize,

    /// Add comments
    #[display(fmt = "document")]
    Document,

    /// A free-form instruction
    #[display(fmt = "custom edit")]
    Custom(String),
}

impl FixRequest {
    /// The instruction text for the edit-suggestion service
    pub fn instruction(&self) -> String {
        match self {
            FixRequest::FixError { stack_trace } => {
                // The service wants the trace on a single line
                let trace: String = stack_trace
                    .chars()
                    .filter(|c| *c != '\n' && *c != '\r')
                    .collect();
                format!("Propose a fix for the code given this Error StackTrace: {trace}")
            }
            FixRequest::Lint => "Fix all the bugs in this code, if there are any.".to_string(),
            FixRequest::Optimize => "Optimize this code.".to_string(),
            FixRequest::Document => "Add comments to this code.".to_string(),
            FixRequest::Custom(instruction) => instruction.clone(),
        }
    }
}
