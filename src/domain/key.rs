use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// Error returned when an identifier is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{0} must not be empty")]
pub struct EmptyKeyError(&'static str);

/// Declares a validated, non-empty textual key.
///
/// Keys are compared exactly (case-sensitive, no normalisation); trimming
/// user input is the caller's job.
macro_rules! key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonEmptyString);

        impl $name {
            /// Creates a new key from a string.
            ///
            /// # Errors
            ///
            /// Returns [`EmptyKeyError`] if the string is empty.
            pub fn new(s: impl Into<String>) -> Result<Self, EmptyKeyError> {
                NonEmptyString::new(s.into())
                    .map(Self)
                    .map_err(|_| EmptyKeyError($label))
            }

            /// Returns the string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyKeyError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EmptyKeyError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = EmptyKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

key!(
    /// The unique identifier of a [`Book`](crate::Book).
    Isbn,
    "ISBN"
);

key!(
    /// The unique identifier of a [`Borrower`](crate::Borrower).
    MembershipId,
    "membership ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_isbn_is_rejected() {
        assert_eq!(Isbn::new(""), Err(EmptyKeyError("ISBN")));
        assert_eq!(
            "".parse::<MembershipId>().unwrap_err().to_string(),
            "membership ID must not be empty"
        );
    }

    #[test]
    fn keys_are_case_sensitive() {
        let lower = MembershipId::new("m001").unwrap();
        let upper = MembershipId::new("M001").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn serializes_as_plain_string() {
        let isbn = Isbn::new("9780451524935").unwrap();
        assert_eq!(serde_json::to_string(&isbn).unwrap(), "\"9780451524935\"");
    }
}
