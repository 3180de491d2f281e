//! Ledger module containing shift lifecycle, sale recording and summaries

pub mod core;
pub mod sale;
pub mod shift;
pub mod summary;

pub use self::core::*;
pub use sale::*;
pub use shift::*;
pub use summary::*;
