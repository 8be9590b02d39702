//! Reports module - USD-normalized balance aggregation.

mod reports_model;
mod reports_service;


pub use reports_model::{
    HoldingBalance, LegacyReport, LegacyTotals, NetWorthReport, NetWorthTotals,
    ObligationBalance,
};
pub use reports_service::ReportService;
