//! Accrual module - monthly borrowing-interest sweep.

mod accrual_service;


pub use accrual_service::AccrualService;
