//! Error types
//!
//! Two families: [`ConfigError`] is returned from constructors and signals a
//! programming error, [`UpdateFault`] describes a rejected observation and is
//! always reported to a [`DiagnosticSink`](crate::diagnostics::DiagnosticSink)
//! before it reaches the caller.

use thiserror::Error;

use crate::numeric::Timestamp;

/// Invalid construction-time parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid capacity: {capacity} (must be at least {min})")]
    InvalidCapacity { capacity: usize, min: usize },
    #[error("invalid memory horizon: {0} (must be positive)")]
    InvalidMemory(usize),
    #[error("invalid band multiplier: {0} (must be finite and non-negative)")]
    InvalidMultiplier(f64),
    #[error("invalid {name}: {value}")]
    InvalidNoise { name: &'static str, value: f64 },
    #[error("invalid warm-up length: {0} (must be positive)")]
    InvalidWarmup(usize),
    #[error("invalid decomposition depth: {levels} (must be within 1..={max})")]
    InvalidLevels { levels: u32, max: u32 },
}

/// A single rejected update
///
/// Faults never abort stream processing: the component keeps its previous
/// state and the next observation is handled normally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateFault {
    #[error("out-of-order timestamp: {got} is earlier than {last}")]
    OutOfOrder { last: Timestamp, got: Timestamp },
    #[error("{component}: NaN input rejected")]
    NotANumber { component: &'static str },
    #[error("internal fault: {0}")]
    Internal(String),
}

impl UpdateFault {
    /// True for faults caused by the input rather than by the component
    #[inline]
    pub fn is_input_fault(&self) -> bool {
        !matches!(self, UpdateFault::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let fault = UpdateFault::OutOfOrder { last: 5, got: 3 };
        assert_eq!(fault.to_string(), "out-of-order timestamp: 3 is earlier than 5");
        assert!(fault.is_input_fault());

        let fault = UpdateFault::Internal("singular".into());
        assert!(!fault.is_input_fault());

        let err = ConfigError::InvalidCapacity { capacity: 0, min: 1 };
        assert_eq!(err.to_string(), "invalid capacity: 0 (must be at least 1)");
    }
}
