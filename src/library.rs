//! The in-memory catalog of books and borrowers.
//!
//! The [`Library`] owns every [`Book`] and [`Borrower`] and is the only place
//! where they are mutated together. Loans refer to books by ISBN, so there is
//! no shared mutable state between the two collections.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::instrument;

use crate::{
    Error,
    domain::{Book, BookDetails, Borrower, Config, Isbn, Loan, MembershipId},
};

mod search;
pub use search::SearchQuery;

/// The catalog coordinator.
///
/// Both collections keep insertion order. Keys are unique within their
/// collection; lookups are linear scans.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    borrowers: Vec<Borrower>,
    loan_period: TimeDelta,
}

/// The outcome of a successful [`Library::return_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    /// The loan that was closed.
    pub loan: Loan,
    /// The time the return was recorded.
    pub returned: DateTime<Utc>,
    /// Whole days past the due date, if the book came back late.
    pub days_overdue: Option<i64>,
}

/// An entry in the overdue report.
#[derive(Debug, Clone, Copy)]
pub struct OverdueLoan<'a> {
    /// The borrower holding the book.
    pub borrower: &'a Borrower,
    /// The overdue loan.
    pub loan: &'a Loan,
    /// The borrowed book, resolved by ISBN.
    pub book: Option<&'a Book>,
    /// Whole days elapsed since the due date.
    pub days_overdue: i64,
}

impl Return {
    fn close(loan: Loan, returned: DateTime<Utc>) -> Self {
        let days_overdue = loan.days_overdue_at(returned);
        if let Some(days) = days_overdue {
            tracing::warn!("Book {} returned {days} day(s) overdue", loan.isbn());
        }
        Self {
            loan,
            returned,
            days_overdue,
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Creates an empty library with the default 14 day loan period.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an empty library using the loan period from `config`.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        Self {
            books: Vec::new(),
            borrowers: Vec::new(),
            loan_period: config.loan_period(),
        }
    }

    /// The time between checkout and due date.
    #[must_use]
    pub const fn loan_period(&self) -> TimeDelta {
        self.loan_period
    }

    /// Find a book by its ISBN.
    #[must_use]
    pub fn find_book_by_isbn(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn() == isbn)
    }

    /// Find a borrower by membership ID.
    #[must_use]
    pub fn find_borrower_by_id(&self, id: &MembershipId) -> Option<&Borrower> {
        self.borrowers
            .iter()
            .find(|borrower| borrower.membership_id() == id)
    }

    fn book_mut(&mut self, isbn: &Isbn) -> Result<&mut Book, Error> {
        self.books
            .iter_mut()
            .find(|book| book.isbn() == isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.clone()))
    }

    fn borrower_mut(&mut self, id: &MembershipId) -> Result<&mut Borrower, Error> {
        self.borrowers
            .iter_mut()
            .find(|borrower| borrower.membership_id() == id)
            .ok_or_else(|| Error::BorrowerNotFound(id.clone()))
    }

    /// Number of borrowers currently holding a copy of `isbn`.
    #[must_use]
    pub fn active_loans(&self, isbn: &Isbn) -> usize {
        self.borrowers
            .iter()
            .filter(|borrower| borrower.has_loan(isbn))
            .count()
    }

    /// Add a book to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateBook`] if the ISBN is already present. The
    /// catalog is not modified.
    #[instrument(level = "debug", skip(self, book), fields(isbn = %book.isbn()))]
    pub fn add_book(&mut self, book: Book) -> Result<(), Error> {
        if self.find_book_by_isbn(book.isbn()).is_some() {
            tracing::debug!("duplicate ISBN rejected");
            return Err(Error::DuplicateBook(book.isbn().clone()));
        }
        tracing::info!("Book '{}' added", book.title());
        self.books.push(book);
        Ok(())
    }

    /// Overwrite the descriptive fields of a book.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] if the ISBN is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn update_book_details(
        &mut self,
        isbn: &Isbn,
        details: BookDetails,
    ) -> Result<&Book, Error> {
        let book = self.book_mut(isbn)?;
        book.update_details(details);
        tracing::info!("Book details for ISBN {isbn} updated");
        Ok(&*book)
    }

    /// Set the number of available copies of a book.
    ///
    /// This is a direct override: it does not account for copies on loan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] if the ISBN is unknown,
    /// [`Error::NegativeQuantity`] if `quantity` is below zero, or
    /// [`Error::QuantityTooLarge`] if it exceeds `u32::MAX`.
    #[instrument(level = "debug", skip(self))]
    pub fn update_book_quantity(&mut self, isbn: &Isbn, quantity: i64) -> Result<&Book, Error> {
        let book = self.book_mut(isbn)?;
        book.update_quantity(quantity)?;
        tracing::info!("Book {isbn} quantity updated to {}", book.quantity());
        Ok(&*book)
    }

    /// Remove a book from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BookNotFound`] if the ISBN is unknown, or
    /// [`Error::BookOnLoan`] if any borrower currently holds a copy.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_book(&mut self, isbn: &Isbn) -> Result<Book, Error> {
        let pos = self
            .books
            .iter()
            .position(|book| book.isbn() == isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.clone()))?;

        if let Some(holder) = self.borrowers.iter().find(|b| b.has_loan(isbn)) {
            tracing::debug!(borrower = %holder.membership_id(), "book is on loan");
            return Err(Error::BookOnLoan {
                title: self.books[pos].title().to_string(),
                borrower: holder.name().to_string(),
            });
        }

        let book = self.books.remove(pos);
        tracing::info!("Book '{}' removed", book.title());
        Ok(book)
    }

    /// Register a new borrower.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateBorrower`] if the membership ID is taken.
    #[instrument(level = "debug", skip(self, borrower), fields(id = %borrower.membership_id()))]
    pub fn add_borrower(&mut self, borrower: Borrower) -> Result<(), Error> {
        if self.find_borrower_by_id(borrower.membership_id()).is_some() {
            tracing::debug!("duplicate membership ID rejected");
            return Err(Error::DuplicateBorrower(borrower.membership_id().clone()));
        }
        tracing::info!("Borrower '{}' added", borrower.name());
        self.borrowers.push(borrower);
        Ok(())
    }

    /// Update a borrower's name and/or contact details.
    ///
    /// Fields passed as `None` are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BorrowerNotFound`] if the membership ID is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn update_borrower_info(
        &mut self,
        id: &MembershipId,
        name: Option<String>,
        contact: Option<String>,
    ) -> Result<&Borrower, Error> {
        let borrower = self.borrower_mut(id)?;
        if let Some(name) = name {
            borrower.update_name(name);
        }
        if let Some(contact) = contact {
            borrower.update_contact(contact);
        }
        tracing::info!("Borrower {id} info updated");
        Ok(&*borrower)
    }

    /// Remove a borrower.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BorrowerNotFound`] if the membership ID is unknown, or
    /// [`Error::BorrowerHasLoans`] if they still hold any books.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_borrower(&mut self, id: &MembershipId) -> Result<Borrower, Error> {
        let pos = self
            .borrowers
            .iter()
            .position(|borrower| borrower.membership_id() == id)
            .ok_or_else(|| Error::BorrowerNotFound(id.clone()))?;

        let borrower = &self.borrowers[pos];
        if !borrower.loans().is_empty() {
            return Err(Error::BorrowerHasLoans {
                name: borrower.name().to_string(),
                loans: borrower.loans().len(),
            });
        }

        let borrower = self.borrowers.remove(pos);
        tracing::info!("Borrower '{}' removed", borrower.name());
        Ok(borrower)
    }

    /// Lend a copy of a book to a borrower, due one loan period from now.
    ///
    /// # Errors
    ///
    /// See [`Library::borrow_book_at`].
    pub fn borrow_book(&mut self, id: &MembershipId, isbn: &Isbn) -> Result<Loan, Error> {
        self.borrow_book_at(id, isbn, Utc::now())
    }

    /// Lend a copy of a book to a borrower, checked out at `now`.
    ///
    /// On success the book's quantity drops by one and the new loan is
    /// appended to the borrower's loans.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`Error::BorrowerNotFound`] if the membership ID is unknown
    /// - [`Error::BookNotFound`] if the ISBN is unknown
    /// - [`Error::OutOfStock`] if no copies are available
    /// - [`Error::AlreadyBorrowed`] if the borrower already holds this book
    /// - [`Error::DueDateOutOfRange`] if `now` plus the loan period cannot be
    ///   represented
    #[instrument(level = "debug", skip(self))]
    pub fn borrow_book_at(
        &mut self,
        id: &MembershipId,
        isbn: &Isbn,
        now: DateTime<Utc>,
    ) -> Result<Loan, Error> {
        let borrower_pos = self
            .borrowers
            .iter()
            .position(|borrower| borrower.membership_id() == id)
            .ok_or_else(|| Error::BorrowerNotFound(id.clone()))?;
        let book_pos = self
            .books
            .iter()
            .position(|book| book.isbn() == isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.clone()))?;

        let borrower = &mut self.borrowers[borrower_pos];
        let book = &mut self.books[book_pos];

        if !book.is_available() {
            return Err(Error::OutOfStock {
                title: book.title().to_string(),
            });
        }
        if borrower.has_loan(isbn) {
            return Err(Error::AlreadyBorrowed {
                borrower: borrower.name().to_string(),
                title: book.title().to_string(),
            });
        }

        let loan = Loan::new(isbn.clone(), now, self.loan_period)
            .ok_or(Error::DueDateOutOfRange(now))?;
        book.take_copy();
        borrower.push_loan(loan.clone());

        tracing::info!(
            "Book '{}' borrowed by {}. Due: {}",
            book.title(),
            borrower.name(),
            loan.due().format("%Y-%m-%d")
        );
        Ok(loan)
    }

    /// Take a book back from a borrower.
    ///
    /// # Errors
    ///
    /// See [`Library::return_book_at`].
    pub fn return_book(&mut self, id: &MembershipId, isbn: &Isbn) -> Result<Return, Error> {
        self.return_book_at(id, isbn, Utc::now())
    }

    /// Take a book back from a borrower, returned at `now`.
    ///
    /// On success the loan is closed and the book's quantity rises by one.
    /// A late return still succeeds; the elapsed days are reported in
    /// [`Return::days_overdue`].
    ///
    /// # Errors
    ///
    /// - [`Error::BorrowerNotFound`] if the membership ID is unknown
    /// - [`Error::NotBorrowed`] if the borrower holds no loan for `isbn`
    #[instrument(level = "debug", skip(self))]
    pub fn return_book_at(
        &mut self,
        id: &MembershipId,
        isbn: &Isbn,
        now: DateTime<Utc>,
    ) -> Result<Return, Error> {
        let borrower = self.borrower_mut(id)?;
        let name = borrower.name().to_string();
        let loan = borrower.take_loan(isbn).ok_or_else(|| Error::NotBorrowed {
            borrower: id.clone(),
            isbn: isbn.clone(),
        })?;

        let Ok(book) = self.book_mut(isbn) else {
            tracing::warn!("Book {isbn} returned by {name} is no longer in the catalog");
            return Ok(Return::close(loan, now));
        };
        book.restore_copy();
        tracing::info!("Book '{}' returned by {name}", book.title());

        Ok(Return::close(loan, now))
    }

    /// Find books matching every criterion in `query`.
    ///
    /// Returns an empty list when nothing matches.
    #[must_use]
    pub fn search_book(&self, query: &SearchQuery) -> Vec<&Book> {
        self.books.iter().filter(|book| query.matches(book)).collect()
    }

    /// All books, in the order they were added.
    #[must_use]
    pub fn list_all_books(&self) -> &[Book] {
        &self.books
    }

    /// All borrowers, in the order they registered.
    #[must_use]
    pub fn list_all_borrowers(&self) -> &[Borrower] {
        &self.borrowers
    }

    /// Every loan whose due date has passed.
    #[must_use]
    pub fn list_overdue_books(&self) -> Vec<OverdueLoan<'_>> {
        self.list_overdue_books_at(Utc::now())
    }

    /// Every loan whose due date is strictly before `now`.
    ///
    /// Entries are grouped by borrower in registration order, then by loan in
    /// checkout order.
    #[must_use]
    pub fn list_overdue_books_at(&self, now: DateTime<Utc>) -> Vec<OverdueLoan<'_>> {
        self.borrowers
            .iter()
            .flat_map(|borrower| {
                borrower.loans().iter().filter_map(move |loan| {
                    loan.days_overdue_at(now).map(|days_overdue| OverdueLoan {
                        borrower,
                        loan,
                        book: self.find_book_by_isbn(loan.isbn()),
                        days_overdue,
                    })
                })
            })
            .collect()
    }
}
