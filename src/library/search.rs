use crate::Book;

/// Criteria for [`Library::search_book`](crate::Library::search_book).
///
/// Every supplied criterion must match (case-insensitive substring). Absent
/// criteria match anything, so the default query returns the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Substring of the title.
    pub title: Option<String>,
    /// Substring of the author.
    pub author: Option<String>,
    /// Substring of the genre.
    pub genre: Option<String>,
}

impl SearchQuery {
    /// Restrict results to titles containing `title`.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Restrict results to authors containing `author`.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Restrict results to genres containing `genre`.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Returns `true` if `book` satisfies every supplied criterion.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        [
            (&self.title, book.title()),
            (&self.author, book.author()),
            (&self.genre, book.genre()),
        ]
        .into_iter()
        .all(|(needle, field)| needle.as_deref().is_none_or(|n| contains_ignore_case(field, n)))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::Isbn;

    fn gatsby() -> Book {
        Book::new(
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            Isbn::new("9780743273565").unwrap(),
            "Classic",
            5,
        )
    }

    #[test_case(SearchQuery::default(), true; "empty query matches")]
    #[test_case(SearchQuery::default().title("great"), true; "title lowercase")]
    #[test_case(SearchQuery::default().title("GATSBY"), true; "title uppercase")]
    #[test_case(SearchQuery::default().author("scott").genre("class"), true; "criteria combined")]
    #[test_case(SearchQuery::default().author("scott").genre("horror"), false; "one criterion fails")]
    #[test_case(SearchQuery::default().title("zzz"), false; "no match")]
    #[test_case(SearchQuery::default().genre(""), true; "empty needle matches")]
    fn query_matches(query: SearchQuery, expected: bool) {
        assert_eq!(query.matches(&gatsby()), expected);
    }
}
