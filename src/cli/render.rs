//! Plain-text and JSON rendering of library contents.

use std::io::{self, Write};

use serde::Serialize;
use shelfmark::{Book, Borrower, OverdueLoan};

use super::terminal::Colorize;

/// Date format used wherever a due date is shown.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn books(out: &mut dyn Write, books: &[Book]) -> io::Result<()> {
    if books.is_empty() {
        return writeln!(out, "{}", "No books in the library.".dim());
    }
    writeln!(out, "\n{}", "--- All Books in Library ---".info())?;
    for book in books {
        writeln!(out, "{book}")?;
    }
    Ok(())
}

pub fn borrowers(out: &mut dyn Write, borrowers: &[Borrower]) -> io::Result<()> {
    if borrowers.is_empty() {
        return writeln!(out, "{}", "No borrowers in the system.".dim());
    }
    writeln!(out, "\n{}", "--- All Registered Borrowers ---".info())?;
    for borrower in borrowers {
        writeln!(out, "{borrower}")?;
    }
    Ok(())
}

pub fn search_results(out: &mut dyn Write, books: &[&Book]) -> io::Result<()> {
    if books.is_empty() {
        return writeln!(out, "{}", "No books found matching the criteria.".dim());
    }
    writeln!(out, "\nFound {} book(s):", books.len())?;
    for book in books {
        writeln!(out, "{book}")?;
    }
    Ok(())
}

pub fn overdue(out: &mut dyn Write, entries: &[OverdueLoan<'_>]) -> io::Result<()> {
    writeln!(out, "\n{}", "--- Overdue Books Report ---".info())?;
    if entries.is_empty() {
        return writeln!(out, "{}", "No overdue books.".success());
    }
    for entry in entries {
        let title = entry.book.map_or("(no longer in catalog)", Book::title);
        writeln!(
            out,
            "  - Borrower: {} (ID: {})",
            entry.borrower.name(),
            entry.borrower.membership_id()
        )?;
        writeln!(out, "    Book: '{title}' (ISBN: {})", entry.loan.isbn())?;
        writeln!(
            out,
            "    Due Date: {} ({})",
            entry.loan.due().format(DATE_FORMAT),
            format!("{} days overdue", entry.days_overdue).warning()
        )?;
    }
    Ok(())
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
