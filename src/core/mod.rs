//! Core business logic: the subscription model and the calculations over it

pub mod analytics;
pub mod billing;
pub mod config;
pub mod currency;
pub mod format;
pub mod log;
pub mod settings;
pub mod subscription;

// Re-export main types for cleaner imports
pub use billing::BillingCycle;
pub use currency::{Conversion, RateTable};
pub use subscription::{Category, Subscription, SubscriptionDraft};
