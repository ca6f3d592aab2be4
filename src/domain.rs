//! Domain models for the library catalog.
//!
//! This module contains the entities tracked by the [`Library`](crate::Library):
//! books, borrowers and their loans, the keys that identify them, and the
//! configuration.

/// Book entity and its stock status.
pub mod book;
pub use book::{Availability, Book, BookDetails};

/// Borrower entity and active loans.
pub mod borrower;
pub use borrower::{Borrower, Loan};

mod config;
pub use config::{Config, MAX_LOAN_PERIOD_DAYS};

mod key;
pub use key::{EmptyKeyError, Isbn, MembershipId};
