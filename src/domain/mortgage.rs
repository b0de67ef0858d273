use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, LedgerError, UserId};

pub type ApplicationId = Uuid;

/// Status of a mortgage application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            "cancelled" | "canceled" => Some(ApplicationStatus::Cancelled),
            _ => None,
        }
    }

    /// Approved, rejected and cancelled applications are final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The figures a customer hands in, before they are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageRequest {
    pub applicant: Option<UserId>,
    /// Property value, in millions
    pub property_value: Amount,
    /// Requested loan, in millions
    pub loan_amount: Amount,
    /// Proposed interest rate, in percent
    pub interest_rate: f64,
}

impl MortgageRequest {
    /// True if the applicant is missing or any figure is not a positive number.
    pub fn is_incomplete(&self) -> bool {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        self.applicant.is_none()
            || !positive(self.property_value)
            || !positive(self.loan_amount)
            || !positive(self.interest_rate)
    }

    /// Turn a complete request into a pending application.
    pub fn into_application(self) -> Result<MortgageApplication, LedgerError> {
        if self.is_incomplete() {
            return Err(LedgerError::IncompleteApplication);
        }
        let applicant = self.applicant.ok_or(LedgerError::IncompleteApplication)?;

        Ok(MortgageApplication {
            id: Uuid::new_v4(),
            applicant,
            property_value: self.property_value,
            loan_amount: self.loan_amount,
            interest_rate: self.interest_rate,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            decided_at: None,
        })
    }
}

/// A loan request moving through Pending -> Approved | Rejected | Cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageApplication {
    pub id: ApplicationId,
    pub applicant: UserId,
    pub property_value: Amount,
    pub loan_amount: Amount,
    pub interest_rate: f64,
    status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl MortgageApplication {
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn approve(&mut self) -> Result<(), LedgerError> {
        self.transition(ApplicationStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), LedgerError> {
        self.transition(ApplicationStatus::Rejected)
    }

    pub fn cancel(&mut self) -> Result<(), LedgerError> {
        self.transition(ApplicationStatus::Cancelled)
    }

    /// Only pending applications can be decided; a decision is never revisited.
    fn transition(&mut self, to: ApplicationStatus) -> Result<(), LedgerError> {
        if self.status.is_terminal() {
            return Err(LedgerError::IllegalTransition {
                id: self.id.to_string(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.decided_at = Some(Utc::now());
        Ok(())
    }
}
