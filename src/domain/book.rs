use std::fmt;

use serde::Serialize;

use crate::{Error, domain::Isbn};

/// A title in the catalog, with a count of copies on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    title: String,
    author: String,
    isbn: Isbn,
    genre: String,
    /// Copies currently available to borrow.
    quantity: u32,
}

/// Optional replacements for a book's descriptive fields.
///
/// `None` leaves a field untouched. `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDetails {
    /// New title.
    pub title: Option<String>,
    /// New author.
    pub author: Option<String>,
    /// New genre.
    pub genre: Option<String>,
}

impl BookDetails {
    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.genre.is_none()
    }
}

/// Whether any copies of a book can be borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// At least one copy is on the shelf.
    Available,
    /// Every copy is on loan (or none are stocked).
    OutOfStock,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("Available"),
            Self::OutOfStock => f.write_str("Out of Stock"),
        }
    }
}

impl Book {
    /// Construct a new [`Book`].
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Isbn,
        genre: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn,
            genre: genre.into(),
            quantity,
        }
    }

    /// The title of the book.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author of the book.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The unique ISBN. This never changes.
    #[must_use]
    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// The genre of the book.
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Copies currently available.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `true` if at least one copy can be borrowed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// The derived stock status.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        if self.is_available() {
            Availability::Available
        } else {
            Availability::OutOfStock
        }
    }

    /// Set the number of available copies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeQuantity`] if `quantity` is below zero, or
    /// [`Error::QuantityTooLarge`] if it exceeds `u32::MAX`. The current
    /// quantity is kept in both cases.
    pub fn update_quantity(&mut self, quantity: i64) -> Result<(), Error> {
        if quantity < 0 {
            return Err(Error::NegativeQuantity(quantity));
        }
        self.quantity =
            u32::try_from(quantity).map_err(|_| Error::QuantityTooLarge(quantity))?;
        Ok(())
    }

    /// Overwrite the fields present in `details`.
    pub fn update_details(&mut self, details: BookDetails) {
        let BookDetails {
            title,
            author,
            genre,
        } = details;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(genre) = genre {
            self.genre = genre;
        }
    }

    pub(crate) const fn take_copy(&mut self) {
        self.quantity = self.quantity.saturating_sub(1);
    }

    pub(crate) const fn restore_copy(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, Author: {}, ISBN: {}, Genre: {}, Quantity: {} ({})",
            self.title,
            self.author,
            self.isbn,
            self.genre,
            self.quantity,
            self.availability()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nineteen_eighty_four(quantity: u32) -> Book {
        Book::new(
            "1984",
            "George Orwell",
            Isbn::new("9780451524935").unwrap(),
            "Dystopian",
            quantity,
        )
    }

    #[test]
    fn negative_quantity_is_rejected_and_ignored() {
        let mut book = nineteen_eighty_four(3);
        assert_eq!(book.update_quantity(-1), Err(Error::NegativeQuantity(-1)));
        assert_eq!(book.quantity(), 3);
    }

    #[test]
    fn oversized_quantity_is_rejected_and_ignored() {
        let mut book = nineteen_eighty_four(3);
        assert_eq!(
            book.update_quantity(5_000_000_000),
            Err(Error::QuantityTooLarge(5_000_000_000))
        );
        assert_eq!(book.quantity(), 3);

        book.update_quantity(i64::from(u32::MAX)).unwrap();
        assert_eq!(book.quantity(), u32::MAX);
    }

    #[test]
    fn zero_quantity_is_out_of_stock() {
        let mut book = nineteen_eighty_four(3);
        book.update_quantity(0).unwrap();
        assert!(!book.is_available());
        assert_eq!(book.availability(), Availability::OutOfStock);
    }

    #[test]
    fn absent_details_are_left_untouched() {
        let mut book = nineteen_eighty_four(1);
        book.update_details(BookDetails {
            author: Some("Eric Blair".to_string()),
            ..BookDetails::default()
        });
        assert_eq!(book.title(), "1984");
        assert_eq!(book.author(), "Eric Blair");
        assert_eq!(book.genre(), "Dystopian");
    }

    #[test]
    fn empty_detail_clears_field() {
        let mut book = nineteen_eighty_four(1);
        book.update_details(BookDetails {
            genre: Some(String::new()),
            ..BookDetails::default()
        });
        assert_eq!(book.genre(), "");
    }

    #[test]
    fn display_includes_status() {
        assert_eq!(
            nineteen_eighty_four(0).to_string(),
            "Title: 1984, Author: George Orwell, ISBN: 9780451524935, Genre: Dystopian, \
             Quantity: 0 (Out of Stock)"
        );
        assert!(nineteen_eighty_four(2).to_string().ends_with("(Available)"));
    }
}
