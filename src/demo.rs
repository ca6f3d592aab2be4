//! The sample catalog a fresh session starts from.

use crate::{Book, Borrower, Error, Isbn, Library, MembershipId};

/// Books added by [`populate`]: title, author, ISBN, genre, quantity.
const BOOKS: [(&str, &str, &str, &str, u32); 3] = [
    (
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "9780743273565",
        "Classic",
        5,
    ),
    ("1984", "George Orwell", "9780451524935", "Dystopian", 3),
    (
        "To Kill a Mockingbird",
        "Harper Lee",
        "9780061120084",
        "Fiction",
        0,
    ),
];

/// Borrowers added by [`populate`]: name, contact, membership ID.
const BORROWERS: [(&str, &str, &str); 2] = [
    ("Alice Smith", "alice@email.com", "M001"),
    ("Bob Johnson", "555-1234", "M002"),
];

/// Adds the demo books and borrowers to `library`.
///
/// # Errors
///
/// Fails if any demo key is already present in `library`. Entries added
/// before the clash are kept.
pub fn populate(library: &mut Library) -> Result<(), Error> {
    for (title, author, isbn, genre, quantity) in BOOKS {
        let isbn = Isbn::new(isbn)?;
        library.add_book(Book::new(title, author, isbn, genre, quantity))?;
    }
    for (name, contact, id) in BORROWERS {
        let id = MembershipId::new(id)?;
        library.add_borrower(Borrower::new(name, contact, id))?;
    }
    tracing::debug!(
        books = BOOKS.len(),
        borrowers = BORROWERS.len(),
        "demo data loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populates_catalog() {
        let mut library = Library::new();
        populate(&mut library).unwrap();

        assert_eq!(library.list_all_books().len(), 3);
        assert_eq!(library.list_all_borrowers().len(), 2);
        let mockingbird = library
            .find_book_by_isbn(&"9780061120084".parse().unwrap())
            .unwrap();
        assert!(!mockingbird.is_available());
    }

    #[test]
    fn populating_twice_fails() {
        let mut library = Library::new();
        populate(&mut library).unwrap();
        assert!(populate(&mut library).is_err());
        assert_eq!(library.list_all_books().len(), 3);
    }
}
