use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::domain::{Isbn, MembershipId};

/// A registered library member and the books they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Borrower {
    name: String,
    contact: String,
    membership_id: MembershipId,
    /// Active loans, in the order they were taken out.
    loans: Vec<Loan>,
}

/// A single active loan.
///
/// The book is referenced by ISBN and resolved against the
/// [`Library`](crate::Library) when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    isbn: Isbn,
    borrowed: DateTime<Utc>,
    due: DateTime<Utc>,
}

impl Loan {
    /// Opens a loan due `period` after `borrowed`.
    ///
    /// Returns `None` if the due date falls outside the representable range.
    pub(crate) fn new(isbn: Isbn, borrowed: DateTime<Utc>, period: TimeDelta) -> Option<Self> {
        let due = borrowed.checked_add_signed(period)?;
        Some(Self {
            isbn,
            borrowed,
            due,
        })
    }

    /// The ISBN of the borrowed book.
    #[must_use]
    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// When the book was checked out.
    #[must_use]
    pub const fn borrowed(&self) -> DateTime<Utc> {
        self.borrowed
    }

    /// When the book is due back.
    #[must_use]
    pub const fn due(&self) -> DateTime<Utc> {
        self.due
    }

    /// Returns `true` if the due date is strictly before `now`.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due < now
    }

    /// Whole days elapsed since the due date, or `None` if not overdue.
    #[must_use]
    pub fn days_overdue_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.is_overdue_at(now).then(|| (now - self.due).num_days())
    }
}

impl Borrower {
    /// Construct a new [`Borrower`] with no loans.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        membership_id: MembershipId,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            membership_id,
            loans: Vec::new(),
        }
    }

    /// The borrower's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phone number, email address or similar.
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// The unique membership ID. This never changes.
    #[must_use]
    pub const fn membership_id(&self) -> &MembershipId {
        &self.membership_id
    }

    /// Active loans in checkout order.
    #[must_use]
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// The active loan for `isbn`, if any.
    #[must_use]
    pub fn loan_for(&self, isbn: &Isbn) -> Option<&Loan> {
        self.loans.iter().find(|loan| &loan.isbn == isbn)
    }

    /// Returns `true` if the borrower holds a copy of `isbn`.
    #[must_use]
    pub fn has_loan(&self, isbn: &Isbn) -> bool {
        self.loan_for(isbn).is_some()
    }

    /// Replace the borrower's name.
    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the borrower's contact details.
    pub fn update_contact(&mut self, contact: impl Into<String>) {
        self.contact = contact.into();
    }

    pub(crate) fn push_loan(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    /// Removes and returns the loan for `isbn`, keeping the order of the rest.
    pub(crate) fn take_loan(&mut self, isbn: &Isbn) -> Option<Loan> {
        let pos = self.loans.iter().position(|loan| &loan.isbn == isbn)?;
        Some(self.loans.remove(pos))
    }
}

impl fmt::Display for Borrower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, ID: {}, Contact: {}, Books Borrowed: {}",
            self.name,
            self.membership_id,
            self.contact,
            self.loans.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn isbn(s: &str) -> Isbn {
        Isbn::new(s).unwrap()
    }

    fn checkout() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn due_date_is_checkout_plus_period() {
        let loan = Loan::new(isbn("X"), checkout(), TimeDelta::days(14)).unwrap();
        assert_eq!(
            loan.due(),
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn due_date_beyond_calendar_range_is_refused() {
        assert!(Loan::new(isbn("X"), DateTime::<Utc>::MAX_UTC, TimeDelta::days(1)).is_none());
    }

    #[test]
    fn loan_is_not_overdue_at_due_instant() {
        let loan = Loan::new(isbn("X"), checkout(), TimeDelta::days(14)).unwrap();
        assert!(!loan.is_overdue_at(loan.due()));
        assert_eq!(loan.days_overdue_at(loan.due()), None);
    }

    #[test]
    fn overdue_days_are_whole_days() {
        let loan = Loan::new(isbn("X"), checkout(), TimeDelta::days(14)).unwrap();
        let now = loan.due() + TimeDelta::days(3) + TimeDelta::hours(23);
        assert_eq!(loan.days_overdue_at(now), Some(3));

        let just_late = loan.due() + TimeDelta::minutes(5);
        assert_eq!(loan.days_overdue_at(just_late), Some(0));
    }

    #[test]
    fn take_loan_preserves_order_of_remaining() {
        let mut borrower = Borrower::new("Alice", "alice@email.com", "M001".parse().unwrap());
        for key in ["A", "B", "C"] {
            borrower.push_loan(Loan::new(isbn(key), checkout(), TimeDelta::days(14)).unwrap());
        }

        let taken = borrower.take_loan(&isbn("B")).unwrap();
        assert_eq!(taken.isbn().as_str(), "B");

        let remaining: Vec<_> = borrower.loans().iter().map(|l| l.isbn().as_str()).collect();
        assert_eq!(remaining, ["A", "C"]);
        assert!(borrower.take_loan(&isbn("B")).is_none());
    }

    #[test]
    fn display_counts_loans() {
        let mut borrower = Borrower::new("Bob Johnson", "555-1234", "M002".parse().unwrap());
        borrower.push_loan(Loan::new(isbn("X"), checkout(), TimeDelta::days(14)).unwrap());
        assert_eq!(
            borrower.to_string(),
            "Name: Bob Johnson, ID: M002, Contact: 555-1234, Books Borrowed: 1"
        );
    }
}
