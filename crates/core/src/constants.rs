/// Epsilon for zero comparisons on f64 balances.
pub const BALANCE_EPSILON: f64 = 1e-12;

/// Interest postings at or below this USD value are skipped by the
/// accrual sweep.
pub const INTEREST_DUST_THRESHOLD_USD: f64 = 0.01;

/// Default vault receiving accrued borrowing interest expenses.
pub const DEFAULT_BORROWING_VAULT: &str = "Borrowings";

/// Default monthly borrowing interest rate (2%).
pub const DEFAULT_BORROWING_MONTHLY_RATE: f64 = 0.02;

/// Default vault for day-to-day postings that name no vault.
pub const DEFAULT_SPENDING_VAULT: &str = "Spending";

/// Structured category marking loan interest income.
pub const INTEREST_INCOME_CATEGORY: &str = "INTEREST_INCOME";

/// Structured category for accrued borrowing interest expenses.
pub const BORROWING_INTEREST_CATEGORY: &str = "BORROWING_INTEREST";
