use crate::domain::error::ValidateError;
use crate::domain::report::{Verdict, Violation};

/// Ordered violation list with the `failOnFirstError` short-circuit.
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: Vec<Violation>,
    fail_fast: bool,
}

impl ErrorAccumulator {
    pub fn new(fail_fast: bool) -> Self {
        Self {
            errors: Vec::new(),
            fail_fast,
        }
    }

    /// Records `violation`, or turns it into an abort when failing fast.
    pub fn push(&mut self, violation: Violation) -> Result<(), ValidateError> {
        if self.fail_fast {
            return Err(ValidateError::Aborted(Box::new(violation)));
        }
        self.errors.push(violation);
        Ok(())
    }

    /// Position to compare against with [`ErrorAccumulator::recorded_since`].
    pub fn mark(&self) -> usize {
        self.errors.len()
    }

    pub fn recorded_since(&self, mark: usize) -> bool {
        self.errors.len() > mark
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_verdict(self) -> Verdict {
        Verdict::from_errors(self.errors)
    }
}
