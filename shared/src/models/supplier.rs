//! Supplier models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_rating;

/// Maximum supplier rating (ratings are on a 0-5 scale)
pub const MAX_RATING: u32 = 5;

/// A raw-material supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Names of the materials this supplier provides
    pub materials: Vec<String>,
    pub rating: Decimal,
    pub is_active: bool,
}

impl Supplier {
    /// Rating expressed as a percentage of the maximum rating
    pub fn performance_score(&self) -> Decimal {
        performance_score(self.rating)
    }
}

/// `(rating / 5) * 100`
pub fn performance_score(rating: Decimal) -> Decimal {
    rating.saturating_mul(Decimal::ONE_HUNDRED) / Decimal::from(MAX_RATING)
}

/// Performance tier derived from the performance score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn from_score(score: Decimal) -> Self {
        if score >= Decimal::from(80) {
            PerformanceTier::Excellent
        } else if score >= Decimal::from(60) {
            PerformanceTier::Good
        } else {
            PerformanceTier::NeedsImprovement
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceTier::Excellent => write!(f, "Excellent"),
            PerformanceTier::Good => write!(f, "Good"),
            PerformanceTier::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Payload for creating or replacing a supplier upstream
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_person: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Phone number is too short"))]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[validate(custom = "validate_rating")]
    pub rating: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
