//! Errors returned by [`Library`](crate::Library) operations.

use chrono::{DateTime, Utc};

use crate::domain::{EmptyKeyError, Isbn, MembershipId};

/// A business-rule violation reported by the library.
///
/// None of these are fatal; the caller decides what to do next.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// No book with this ISBN is in the catalog.
    #[error("book with ISBN {0} not found")]
    BookNotFound(Isbn),

    /// No borrower with this membership ID is registered.
    #[error("borrower with ID {0} not found")]
    BorrowerNotFound(MembershipId),

    /// A book with this ISBN is already in the catalog.
    #[error("book with ISBN {0} already exists")]
    DuplicateBook(Isbn),

    /// A borrower with this membership ID is already registered.
    #[error("borrower with ID {0} already exists")]
    DuplicateBorrower(MembershipId),

    /// The book cannot be removed while a borrower holds it.
    #[error("cannot remove '{title}': it is currently borrowed by {borrower}")]
    BookOnLoan {
        /// Title of the book.
        title: String,
        /// Name of the (first) borrower holding the book.
        borrower: String,
    },

    /// The borrower cannot be removed while holding loans.
    #[error("cannot remove {name}: they have {loans} outstanding borrowed book(s)")]
    BorrowerHasLoans {
        /// Name of the borrower.
        name: String,
        /// Number of active loans.
        loans: usize,
    },

    /// A quantity below zero was requested.
    #[error("quantity cannot be negative (got {0})")]
    NegativeQuantity(i64),

    /// The requested quantity does not fit in the stock counter.
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),

    /// No copies of the book are available.
    #[error("'{title}' is out of stock")]
    OutOfStock {
        /// Title of the book.
        title: String,
    },

    /// The borrower already holds a copy of this book.
    #[error("{borrower} has already borrowed a copy of '{title}'")]
    AlreadyBorrowed {
        /// Name of the borrower.
        borrower: String,
        /// Title of the book.
        title: String,
    },

    /// The borrower holds no loan for this ISBN.
    #[error("borrower {borrower} has not borrowed book {isbn}")]
    NotBorrowed {
        /// Membership ID of the borrower.
        borrower: MembershipId,
        /// ISBN that was to be returned.
        isbn: Isbn,
    },

    /// Checkout time plus the loan period falls outside the supported
    /// calendar range.
    #[error("no due date can be computed for a loan checked out at {0}")]
    DueDateOutOfRange(DateTime<Utc>),

    /// An ISBN or membership ID was empty.
    #[error(transparent)]
    InvalidKey(#[from] EmptyKeyError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unknown ISBN, membership ID or loan.
    NotFound,
    /// A duplicate key, or a removal blocked by a reference.
    Conflict,
    /// The entity is not in a state that permits the operation.
    InvalidState,
}

impl Error {
    /// Returns the class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound(_) | Self::BorrowerNotFound(_) | Self::NotBorrowed { .. } => {
                ErrorKind::NotFound
            }
            Self::DuplicateBook(_)
            | Self::DuplicateBorrower(_)
            | Self::BookOnLoan { .. }
            | Self::BorrowerHasLoans { .. } => ErrorKind::Conflict,
            Self::NegativeQuantity(_)
            | Self::QuantityTooLarge(_)
            | Self::OutOfStock { .. }
            | Self::AlreadyBorrowed { .. }
            | Self::DueDateOutOfRange(_)
            | Self::InvalidKey(_) => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_isbn(s: &str) -> Result<Isbn, Error> {
        Ok(s.parse::<Isbn>()?)
    }

    #[test]
    fn empty_key_propagates_as_invalid_key() {
        let error = parse_isbn("").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidState);
        assert_eq!(error.to_string(), "ISBN must not be empty");
        assert!(parse_isbn("9780451524935").is_ok());
    }
}
