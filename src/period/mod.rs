//! Period windowing
//!
//! The remote only answers bounded-period queries reliably, so every stream is
//! read one calendar month at a time. [`YearMonth`] is the month value type and
//! [`Months`] walks an inclusive range of them.
//!
//! ```rust,ignore
//! for month in months_from("2021-01")? {
//!     println!("{month}"); // 2021/01, 2021/02, ... up to the current month
//! }
//! ```

mod iter;
mod types;

pub use iter::{months_between, months_from, Months};
pub use types::YearMonth;
