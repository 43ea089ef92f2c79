//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{MONEY_SCALE, round_money, split_rupees_paise};
pub use pagination::{PageMeta, PageRequest, PageResponse};
