use failure::Fail;
use lazy_static::lazy_static;
use regex::Regex;

use crate::api::types::Attachment;
use crate::filters::{Field, FilterSelection};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Problems caught before anything is sent. The message is shown as-is under the form.
#[derive(PartialEq, Eq, Clone, Debug, Fail)]
pub enum ValidationError {
    #[fail(display = "Please enter at least one {}", what)]
    EmptyList {
        what: &'static str
    },

    #[fail(display = "Please select a {}", field)]
    MissingField {
        field: Field
    },

    #[fail(display = "Please fill in the {} field", name)]
    MissingInput {
        name: &'static str
    },

    #[fail(display = "Please choose a marks file (.csv, .xlsx or .xls)")]
    MissingFile,

    #[fail(display = "'{}' is not a supported marks file, use .csv, .xlsx or .xls", file_name)]
    UnsupportedFile {
        file_name: String
    },

    #[fail(display = "Please enter a valid email address")]
    InvalidEmail,

    #[fail(display = "Please pick a query to respond to")]
    NoQuerySelected,

    #[fail(display = "Please type a response")]
    BlankResponse
}

/// Splits a comma separated input, trimming entries and dropping empty ones.
pub fn split_list(input: &str, what: &'static str) -> Result<Vec<String>, ValidationError> {
    let list: Vec<String> = input.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    if list.is_empty() {
        return Err(ValidationError::EmptyList { what });
    }

    Ok(list)
}

pub fn require(selection: &FilterSelection, required: &[Field]) -> Result<(), ValidationError> {
    match selection.missing(required) {
        Some(field) => Err(ValidationError::MissingField { field }),
        None => Ok(())
    }
}

pub fn require_input(value: &str, name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingInput { name })
    } else {
        Ok(())
    }
}

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn check_mark_sheet(file: Option<&Attachment>) -> Result<(), ValidationError> {
    match file {
        None => Err(ValidationError::MissingFile),
        Some(f) if !f.is_mark_sheet() => Err(ValidationError::UnsupportedFile {
            file_name: f.file_name.clone()
        }),
        Some(_) => Ok(())
    }
}
