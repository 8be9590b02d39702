//! Engine settings - persisted configuration for the accrual sweep and
//! default vault routing.

mod settings_model;

pub use settings_model::LedgerSettings;
