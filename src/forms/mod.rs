//! Form payloads posted by the dashboard and the public listing page.
//!
//! Each form validates with `validator` and converts into domain values; the
//! error text is shown to the user as a flash alert.

use std::str::FromStr;

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod analytics;
pub mod auth;
pub mod calls;
pub mod campaigns;
pub mod customers;
pub mod listings;
pub mod public;
pub mod users;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Provjerite unesene podatke.")]
    Validation(#[from] ValidationErrors),

    #[error("Neispravna email adresa.")]
    InvalidEmail,

    #[error("Neispravan broj telefona.")]
    InvalidPhoneNumber,

    #[error("Neispravna poveznica.")]
    InvalidUrl,

    #[error("Iznos mora biti pozitivan broj.")]
    InvalidAmount,

    #[error("Polje \"{0}\" je obavezno.")]
    Required(&'static str),

    #[error("Neispravna vrijednost polja \"{0}\".")]
    InvalidField(&'static str),

    #[error("Datum završetka ne može biti prije datuma početka.")]
    InvalidSchedule,

    #[error("Neispravna CSV datoteka: {0}")]
    Csv(String),
}

impl FormError {
    /// Maps a value-object failure onto the form field it came from.
    pub fn for_field(field: &'static str) -> impl Fn(TypeConstraintError) -> FormError {
        move |err| match err {
            TypeConstraintError::EmptyString => FormError::Required(field),
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
            TypeConstraintError::InvalidAmount => FormError::InvalidAmount,
            _ => FormError::InvalidField(field),
        }
    }
}

/// Trimmed value of an optional text input; blank means absent.
pub(crate) fn optional_text(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Parses an optional input such as a number or a date; blank means absent.
pub(crate) fn parse_optional<T: FromStr>(
    value: &str,
    field: &'static str,
) -> Result<Option<T>, FormError> {
    optional_text(value)
        .map(|v| v.parse::<T>().map_err(|_| FormError::InvalidField(field)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_inputs_treat_blank_as_missing() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" Split "), Some("Split"));
        assert_eq!(parse_optional::<i32>("", "sobe").unwrap(), None);
        assert_eq!(parse_optional::<i32>(" 3 ", "sobe").unwrap(), Some(3));
        assert!(matches!(
            parse_optional::<f64>("abc", "površina"),
            Err(FormError::InvalidField("površina"))
        ));
    }

    #[test]
    fn constraint_errors_name_the_field() {
        let map = FormError::for_field("naslov");
        assert!(matches!(
            map(TypeConstraintError::EmptyString),
            FormError::Required("naslov")
        ));
        assert_eq!(
            map(TypeConstraintError::InvalidAmount).to_string(),
            "Iznos mora biti pozitivan broj."
        );
    }
}
