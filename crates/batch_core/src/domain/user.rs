//! Customer profile data referenced by loans and accounts.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Customer profile with contact details and credit score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name used in notifications
    pub name: String,
    /// Notification address
    pub email: String,
    /// Credit score, if one has been assigned
    pub credit_score: Option<u32>,
    /// Row version for optimistic locking
    pub version: u64,
}

impl User {
    /// Lowers the credit score by `penalty`, never below zero.
    ///
    /// Returns `(old, new)` or `None` when the user has no score.
    pub fn apply_credit_penalty(&mut self, penalty: u32) -> Option<(u32, u32)> {
        let old = self.credit_score?;
        let new = old.saturating_sub(penalty);
        self.credit_score = Some(new);
        Some((old, new))
    }

    /// Recipient list for notifications
    pub fn recipients(&self) -> Vec<String> {
        vec![self.email.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(score: Option<u32>) -> User {
        User {
            id: 1,
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            credit_score: score,
            version: 0,
        }
    }

    #[test]
    fn test_penalty_subtracts() {
        let mut u = user(Some(750));
        assert_eq!(u.apply_credit_penalty(50), Some((750, 700)));
        assert_eq!(u.credit_score, Some(700));
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let mut u = user(Some(0));
        assert_eq!(u.apply_credit_penalty(50), Some((0, 0)));
        let mut u = user(Some(30));
        assert_eq!(u.apply_credit_penalty(50), Some((30, 0)));
    }

    #[test]
    fn test_no_score_is_left_alone() {
        let mut u = user(None);
        assert_eq!(u.apply_credit_penalty(50), None);
        assert_eq!(u.credit_score, None);
    }
}
