//! Checkout contact form.

use thiserror::Error;
use tire_disciples_core::{Customer, Email};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in all required fields.")]
    MissingField(&'static str),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Raw field values as typed by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl ContactForm {
    /// Check required fields and email shape, returning trimmed values.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingField`] for the first blank required
    /// field, or [`ContactError::InvalidEmail`].
    pub fn validate(&self) -> Result<Customer, ContactError> {
        let name = required("name", &self.name)?;
        let email = required("email", &self.email)?;
        let phone = required("phone", &self.phone)?;
        let email = Email::parse(email).map_err(|_| ContactError::InvalidEmail)?;

        Ok(Customer {
            name: name.to_string(),
            email: email.into_inner(),
            phone: phone.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ContactError::MissingField(field))
    } else {
        Ok(value)
    }
}
