//! Loan default escalation rules.

use serde::Deserialize;

/// When an overdue loan is escalated and what it costs the borrower.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelinquencyPolicy {
    /// Days overdue at which the loan defaults
    pub default_threshold_days: i64,
    /// Points removed from the borrower's credit score
    pub credit_score_penalty: u32,
}

impl Default for DelinquencyPolicy {
    fn default() -> Self {
        Self {
            default_threshold_days: 31,
            credit_score_penalty: 50,
        }
    }
}

impl DelinquencyPolicy {
    /// Whether an installment this late puts its loan into default
    pub fn is_default(&self, days_overdue: i64) -> bool {
        days_overdue >= self.default_threshold_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        let policy = DelinquencyPolicy::default();
        assert!(!policy.is_default(30));
        assert!(policy.is_default(31));
        assert!(policy.is_default(35));
    }
}
