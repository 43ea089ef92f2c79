//! Postgres enum types shared across entities.

use gurukul_core::{auth::UserRole as DomainRole, fees::PaymentMode as DomainMode};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Operator role stored on the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl From<DomainRole> for UserRole {
    fn from(role: DomainRole) -> Self {
        match role {
            DomainRole::Admin => Self::Admin,
            DomainRole::Staff => Self::Staff,
        }
    }
}

impl From<UserRole> for DomainRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Staff => Self::Staff,
        }
    }
}

/// Payment mode stored on the `fee_payments` table.
///
/// Stored lowercase in Postgres; the display labels ("Cash", "UPI", "Card",
/// "Bank Transfer") live on [`gurukul_core::fees::PaymentMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
pub enum PaymentMode {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "upi")]
    Upi,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
}

impl From<DomainMode> for PaymentMode {
    fn from(mode: DomainMode) -> Self {
        match mode {
            DomainMode::Cash => Self::Cash,
            DomainMode::Upi => Self::Upi,
            DomainMode::Card => Self::Card,
            DomainMode::BankTransfer => Self::BankTransfer,
        }
    }
}

impl From<PaymentMode> for DomainMode {
    fn from(mode: PaymentMode) -> Self {
        match mode {
            PaymentMode::Cash => Self::Cash,
            PaymentMode::Upi => Self::Upi,
            PaymentMode::Card => Self::Card,
            PaymentMode::BankTransfer => Self::BankTransfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_mode_round_trips_through_domain() {
        for mode in [
            PaymentMode::Cash,
            PaymentMode::Upi,
            PaymentMode::Card,
            PaymentMode::BankTransfer,
        ] {
            let domain: DomainMode = mode.into();
            let back: PaymentMode = domain.into();
            assert_eq!(back, mode);
        }
    }

    #[test]
    fn test_user_role_round_trips_through_domain() {
        for role in [UserRole::Admin, UserRole::Staff] {
            let domain: DomainRole = role.into();
            let back: UserRole = domain.into();
            assert_eq!(back, role);
        }
    }
}
