//! Payment method and payment status flags
//!
//! Payment is recorded, not processed; gateway integration is out of scope.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the buyer intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Bkash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash-on-delivery",
            Self::Bkash => "bkash",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::CashOnDelivery
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash-on-delivery" => Ok(Self::CashOnDelivery),
            "bkash" => Ok(Self::Bkash),
            other => Err(UnknownPaymentValue(other.to_string())),
        }
    }
}

/// Settlement state of an order's payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownPaymentValue(other.to_string())),
        }
    }
}

/// Error for unrecognized payment strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment value: {0}")]
pub struct UnknownPaymentValue(pub String);
