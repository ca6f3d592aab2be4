//! The interactive menu.
//!
//! Each menu action collects its input through a [`Prompt`], calls a single
//! [`Library`] operation and writes the outcome. Business-rule failures are
//! reported and the session carries on; only prompt or output I/O errors end
//! it.

use std::{fmt, io::Write, str::FromStr};

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use shelfmark::{
    Book, BookDetails, Borrower, EmptyKeyError, Isbn, Library, MembershipId, SearchQuery,
};
use tracing::instrument;

use super::{
    render::{self, DATE_FORMAT},
    terminal::{self, Colorize},
};

/// A source of answers for the menu.
pub trait Prompt {
    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<usize>;

    /// Read a line of free text. May be empty.
    fn input(&mut self, prompt: &str) -> anyhow::Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

/// Reads answers from the terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl Prompt for TerminalPrompt {
    fn select(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }

    fn input(&mut self, prompt: &str) -> anyhow::Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddBook,
    UpdateBook,
    RemoveBook,
    ListBooks,
    AddBorrower,
    UpdateBorrower,
    RemoveBorrower,
    ListBorrowers,
    Borrow,
    Return,
    Search,
    Overdue,
    Exit,
}

impl Action {
    const ALL: [Self; 13] = [
        Self::AddBook,
        Self::UpdateBook,
        Self::RemoveBook,
        Self::ListBooks,
        Self::AddBorrower,
        Self::UpdateBorrower,
        Self::RemoveBorrower,
        Self::ListBorrowers,
        Self::Borrow,
        Self::Return,
        Self::Search,
        Self::Overdue,
        Self::Exit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::AddBook => "Add New Book",
            Self::UpdateBook => "Update Book Details/Quantity",
            Self::RemoveBook => "Remove Book",
            Self::ListBooks => "List All Books",
            Self::AddBorrower => "Add New Borrower",
            Self::UpdateBorrower => "Update Borrower Info",
            Self::RemoveBorrower => "Remove Borrower",
            Self::ListBorrowers => "List All Borrowers",
            Self::Borrow => "Borrow Book",
            Self::Return => "Return Book",
            Self::Search => "Search Books",
            Self::Overdue => "Check Overdue Books",
            Self::Exit => "Exit",
        }
    }

    /// The number shown next to the entry; `Exit` is 0.
    fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|&action| action == self)
            .map_or(0, |pos| if self == Self::Exit { 0 } else { pos + 1 })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}. {}", self.number(), self.label())
    }
}

/// An interactive session over an owned [`Library`].
pub struct Shell<P, W> {
    library: Library,
    prompt: P,
    out: W,
}

impl<P: Prompt, W: Write> Shell<P, W> {
    pub const fn new(library: Library, prompt: P, out: W) -> Self {
        Self {
            library,
            prompt,
            out,
        }
    }

    /// Runs the menu loop until the user exits, then hands back the library.
    pub fn run(mut self) -> anyhow::Result<Library> {
        let items: Vec<String> = Action::ALL.iter().map(ToString::to_string).collect();
        loop {
            writeln!(self.out, "\n{}", terminal::rule().dim())?;
            let choice = self.prompt.select("Library Management System", &items)?;
            let Some(&action) = Action::ALL.get(choice) else {
                writeln!(self.out, "{}", "Invalid choice.".warning())?;
                continue;
            };
            if action == Action::Exit {
                writeln!(self.out, "\nExiting the system. Goodbye!")?;
                return Ok(self.library);
            }
            writeln!(self.out, "\n{}", format!("--- {} ---", action.label()).info())?;
            self.dispatch(action)?;
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            Action::AddBook => self.add_book(),
            Action::UpdateBook => self.update_book(),
            Action::RemoveBook => self.remove_book(),
            Action::ListBooks => Ok(render::books(&mut self.out, self.library.list_all_books())?),
            Action::AddBorrower => self.add_borrower(),
            Action::UpdateBorrower => self.update_borrower(),
            Action::RemoveBorrower => self.remove_borrower(),
            Action::ListBorrowers => Ok(render::borrowers(
                &mut self.out,
                self.library.list_all_borrowers(),
            )?),
            Action::Borrow => self.borrow(),
            Action::Return => self.return_book(),
            Action::Search => self.search(),
            Action::Overdue => Ok(render::overdue(
                &mut self.out,
                &self.library.list_overdue_books(),
            )?),
            Action::Exit => Ok(()),
        }
    }

    fn success(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{}", message.success())?;
        Ok(())
    }

    fn failure(&mut self, error: &dyn fmt::Display) -> anyhow::Result<()> {
        writeln!(self.out, "{}", format!("Error: {error}").error())?;
        Ok(())
    }

    /// Reads a required key. Reports and returns `None` if it is blank.
    fn key<K>(&mut self, prompt: &str) -> anyhow::Result<Option<K>>
    where
        K: FromStr<Err = EmptyKeyError>,
    {
        match self.prompt.input(prompt)?.trim().parse() {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                self.failure(&e)?;
                Ok(None)
            }
        }
    }

    /// Reads an optional field; a blank answer means "no change".
    fn optional(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        let answer = self.prompt.input(prompt)?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn add_book(&mut self) -> anyhow::Result<()> {
        let title = self.prompt.input("Enter title")?;
        let author = self.prompt.input("Enter author")?;
        let Some(isbn) = self.key::<Isbn>("Enter ISBN")? else {
            return Ok(());
        };
        let genre = self.prompt.input("Enter genre")?;
        let quantity = loop {
            let answer = self.prompt.input("Enter quantity")?;
            let Ok(n) = answer.trim().parse::<i64>() else {
                writeln!(
                    self.out,
                    "Invalid input for quantity. Please enter a number."
                )?;
                continue;
            };
            if n < 0 {
                writeln!(self.out, "Quantity must be zero or more.")?;
            } else if let Ok(n) = u32::try_from(n) {
                break n;
            } else {
                writeln!(self.out, "Quantity is too large.")?;
            }
        };

        let book = Book::new(title.trim(), author.trim(), isbn, genre.trim(), quantity);
        let title = book.title().to_string();
        match self.library.add_book(book) {
            Ok(()) => self.success(&format!("Book '{title}' added successfully.")),
            Err(e) => self.failure(&e),
        }
    }

    fn update_book(&mut self) -> anyhow::Result<()> {
        let Some(isbn) = self.key::<Isbn>("Enter ISBN of book to update")? else {
            return Ok(());
        };
        let Some(book) = self.library.find_book_by_isbn(&isbn) else {
            return self.failure(&shelfmark::Error::BookNotFound(isbn));
        };
        let current = book.quantity();
        writeln!(self.out, "Updating: {}", book.title())?;

        let details = BookDetails {
            title: self.optional("Enter new title (or press Enter to skip)")?,
            author: self.optional("Enter new author (or press Enter to skip)")?,
            genre: self.optional("Enter new genre (or press Enter to skip)")?,
        };
        if !details.is_empty() {
            match self.library.update_book_details(&isbn, details) {
                Ok(_) => self.success(&format!("Book details for ISBN {isbn} updated."))?,
                Err(e) => self.failure(&e)?,
            }
        }

        if !self.prompt.confirm("Do you want to update quantity?")? {
            return Ok(());
        }
        let answer = self
            .prompt
            .input(&format!("Enter new quantity (current: {current})"))?;
        let Ok(quantity) = answer.trim().parse::<i64>() else {
            writeln!(self.out, "Invalid quantity. Skipping quantity update.")?;
            return Ok(());
        };
        match self.library.update_book_quantity(&isbn, quantity) {
            Ok(book) => {
                let message = format!("Book {isbn} quantity updated to {}.", book.quantity());
                self.success(&message)
            }
            Err(e) => self.failure(&e),
        }
    }

    fn remove_book(&mut self) -> anyhow::Result<()> {
        let Some(isbn) = self.key::<Isbn>("Enter ISBN of book to remove")? else {
            return Ok(());
        };
        match self.library.remove_book(&isbn) {
            Ok(book) => self.success(&format!("Book '{}' removed successfully.", book.title())),
            Err(e) => self.failure(&e),
        }
    }

    fn add_borrower(&mut self) -> anyhow::Result<()> {
        let name = self.prompt.input("Enter name")?;
        let contact = self.prompt.input("Enter contact (phone/email)")?;
        let Some(id) = self.key::<MembershipId>("Enter membership ID")? else {
            return Ok(());
        };

        let borrower = Borrower::new(name.trim(), contact.trim(), id);
        let name = borrower.name().to_string();
        match self.library.add_borrower(borrower) {
            Ok(()) => self.success(&format!("Borrower '{name}' added successfully.")),
            Err(e) => self.failure(&e),
        }
    }

    fn update_borrower(&mut self) -> anyhow::Result<()> {
        let Some(id) = self.key::<MembershipId>("Enter membership ID of borrower to update")?
        else {
            return Ok(());
        };
        if self.library.find_borrower_by_id(&id).is_none() {
            return self.failure(&shelfmark::Error::BorrowerNotFound(id));
        }

        let name = self.optional("Enter new name (or press Enter to skip)")?;
        let contact = self.optional("Enter new contact (or press Enter to skip)")?;
        match self.library.update_borrower_info(&id, name, contact) {
            Ok(_) => self.success(&format!("Borrower {id} info updated.")),
            Err(e) => self.failure(&e),
        }
    }

    fn remove_borrower(&mut self) -> anyhow::Result<()> {
        let Some(id) = self.key::<MembershipId>("Enter membership ID of borrower to remove")?
        else {
            return Ok(());
        };
        match self.library.remove_borrower(&id) {
            Ok(borrower) => self.success(&format!(
                "Borrower '{}' removed successfully.",
                borrower.name()
            )),
            Err(e) => self.failure(&e),
        }
    }

    /// Reads the membership ID and ISBN for a borrow or return.
    fn loan_keys(&mut self, verb: &str) -> anyhow::Result<Option<(MembershipId, Isbn)>> {
        let Some(id) = self.key::<MembershipId>("Enter your membership ID")? else {
            return Ok(None);
        };
        let Some(isbn) = self.key::<Isbn>(&format!("Enter book ISBN to {verb}"))? else {
            return Ok(None);
        };
        Ok(Some((id, isbn)))
    }

    /// Title of `isbn` and name of `id`, for messages after a successful call.
    fn names(&self, id: &MembershipId, isbn: &Isbn) -> (String, String) {
        let title = self
            .library
            .find_book_by_isbn(isbn)
            .map_or_else(|| isbn.to_string(), |book| book.title().to_string());
        let name = self
            .library
            .find_borrower_by_id(id)
            .map_or_else(|| id.to_string(), |borrower| borrower.name().to_string());
        (title, name)
    }

    fn borrow(&mut self) -> anyhow::Result<()> {
        let Some((id, isbn)) = self.loan_keys("borrow")? else {
            return Ok(());
        };
        match self.library.borrow_book(&id, &isbn) {
            Ok(loan) => {
                let (title, name) = self.names(&id, &isbn);
                self.success(&format!(
                    "Book '{title}' borrowed by {name}. Due: {}",
                    loan.due().format(DATE_FORMAT)
                ))
            }
            Err(e) => self.failure(&e),
        }
    }

    fn return_book(&mut self) -> anyhow::Result<()> {
        let Some((id, isbn)) = self.loan_keys("return")? else {
            return Ok(());
        };
        match self.library.return_book(&id, &isbn) {
            Ok(returned) => {
                let (title, name) = self.names(&id, &isbn);
                self.success(&format!("Book '{title}' returned by {name}."))?;
                if let Some(days) = returned.days_overdue {
                    let alert = format!("**ALERT: This book is {days} day(s) overdue!**");
                    writeln!(self.out, "{}", alert.warning())?;
                }
                Ok(())
            }
            Err(e) => self.failure(&e),
        }
    }

    fn search(&mut self) -> anyhow::Result<()> {
        let query = SearchQuery {
            title: self.optional("Enter title (or press Enter to skip)")?,
            author: self.optional("Enter author (or press Enter to skip)")?,
            genre: self.optional("Enter genre (or press Enter to skip)")?,
        };
        let results = self.library.search_book(&query);
        Ok(render::search_results(&mut self.out, &results)?)
    }
}
