//! In-memory library catalog management
//!
//! A [`Library`] tracks books, borrowers and the loans between them, and
//! enforces the rules for borrowing, returning and removing entries.

pub mod domain;
pub use domain::{
    Availability, Book, BookDetails, Borrower, Config, EmptyKeyError, Isbn, Loan, MembershipId,
};

pub mod demo;

mod error;
pub use error::{Error, ErrorKind};

pub mod library;
pub use library::{Library, OverdueLoan, Return, SearchQuery};
