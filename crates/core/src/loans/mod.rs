//! Loans module - obligation agreements, repayments and borrow-side
//! aggregation.

mod loans_model;
mod loans_service;
mod loans_traits;


pub use loans_model::{
    LoanAgreement, LoanMetrics, LoanPeriod, LoanStatus, LoanView, NewLoan,
};
pub use loans_service::LoanService;
pub use loans_traits::LoanServiceTrait;
