//! Phone number type and contact links.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Too few digits once formatting characters are removed.
    #[error("phone number must contain at least {min} digits")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
    },
    /// Too many digits to be a real number.
    #[error("phone number must contain at most {max} digits")]
    TooLong {
        /// Maximum number of digits.
        max: usize,
    },
}

/// A phone number as typed by the worker.
///
/// The original text is kept for display; [`PhoneNumber::digits`] returns the
/// normalized form used in `tel:` and WhatsApp links.
///
/// ## Constraints
///
/// - Non-empty
/// - 7-15 digits after stripping every non-digit character (E.164 limit)
///
/// ## Examples
///
/// ```
/// use seva_sangam_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+91 98765-43210").unwrap();
/// assert_eq!(phone.digits(), "919876543210");
/// assert_eq!(phone.tel_link(), "tel:919876543210");
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("12-34").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum digit count.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum digit count (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or its digit count is outside
    /// 7-15.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digit_count = normalize_phone_number(trimmed).len();
        if digit_count < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digit_count > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits of the phone number.
    #[must_use]
    pub fn digits(&self) -> String {
        normalize_phone_number(&self.0)
    }

    /// A `tel:` link for this number.
    #[must_use]
    pub fn tel_link(&self) -> String {
        tel_link(&self.0)
    }

    /// A WhatsApp chat link for this number with an optional prefilled message.
    #[must_use]
    pub fn whatsapp_link(&self, message: Option<&str>) -> String {
        whatsapp_link(&self.0, message)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Strip everything except ASCII digits.
#[must_use]
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Build a `tel:` link from free-form phone text.
#[must_use]
pub fn tel_link(phone: &str) -> String {
    format!("tel:{}", normalize_phone_number(phone))
}

/// Build a `wa.me` link from free-form phone text.
#[must_use]
pub fn whatsapp_link(phone: &str, message: Option<&str>) -> String {
    let base = format!("https://wa.me/{}", normalize_phone_number(phone));
    match message {
        Some(text) => format!("{base}?text={}", urlencoding::encode(text)),
        None => base,
    }
}

/// Greeting prefilled into the WhatsApp chat with a worker.
#[must_use]
pub fn whatsapp_greeting(worker_name: &str) -> String {
    format!("Hi {worker_name}, I found you on SevaSangam.")
}
