//! The eight fields of the family form and their conversion to a stored record.

use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::db::models::submissions::FamilySubmission;

/// Returned when a field name is not one of the form's eight fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FamilyName,
    NumberOfAdults,
    NumberOfChildren,
    StreetAddress,
    City,
    ZipCode,
    PhoneNumber,
    EmailAddress,
}

/// Native input attributes rendered for a field.
///
/// These are hints for the browser. The server never enforces them; only the store's own
/// constraints decide whether a row is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputHints {
    pub input_type: &'static str,
    pub required: bool,
    pub min: Option<u32>,
    pub pattern: Option<&'static str>,
    pub title: Option<&'static str>,
}

impl FormField {
    /// Every field, in display order.
    pub const ALL: [FormField; 8] = [
        FormField::FamilyName,
        FormField::NumberOfAdults,
        FormField::NumberOfChildren,
        FormField::StreetAddress,
        FormField::City,
        FormField::ZipCode,
        FormField::PhoneNumber,
        FormField::EmailAddress,
    ];

    /// The form field name (camelCase), as posted by the browser.
    pub fn name(self) -> &'static str {
        match self {
            FormField::FamilyName => "familyName",
            FormField::NumberOfAdults => "numberOfAdults",
            FormField::NumberOfChildren => "numberOfChildren",
            FormField::StreetAddress => "streetAddress",
            FormField::City => "city",
            FormField::ZipCode => "zipCode",
            FormField::PhoneNumber => "phoneNumber",
            FormField::EmailAddress => "emailAddress",
        }
    }

    /// The store column (snake_case) this field is written to.
    pub fn column(self) -> &'static str {
        match self {
            FormField::FamilyName => "family_name",
            FormField::NumberOfAdults => "number_of_adults",
            FormField::NumberOfChildren => "number_of_children",
            FormField::StreetAddress => "street_address",
            FormField::City => "city",
            FormField::ZipCode => "zip_code",
            FormField::PhoneNumber => "phone_number",
            FormField::EmailAddress => "email_address",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::FamilyName => "Family Name",
            FormField::NumberOfAdults => "Number of Adults",
            FormField::NumberOfChildren => "Number of Children",
            FormField::StreetAddress => "Street Address",
            FormField::City => "City",
            FormField::ZipCode => "Zip Code",
            FormField::PhoneNumber => "Phone Number",
            FormField::EmailAddress => "Email Address",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FormField::NumberOfAdults | FormField::NumberOfChildren)
    }

    pub fn hints(self) -> InputHints {
        let text = InputHints {
            input_type: "text",
            required: true,
            min: None,
            pattern: None,
            title: None,
        };
        match self {
            FormField::NumberOfAdults | FormField::NumberOfChildren => InputHints {
                input_type: "number",
                min: Some(0),
                ..text
            },
            FormField::ZipCode => InputHints {
                pattern: Some("[0-9]{5}"),
                title: Some("Please enter a 5-digit zip code"),
                ..text
            },
            FormField::PhoneNumber => InputHints {
                input_type: "tel",
                ..text
            },
            FormField::EmailAddress => InputHints {
                input_type: "email",
                ..text
            },
            FormField::FamilyName | FormField::StreetAddress | FormField::City => text,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Coerce raw numeric input to a headcount.
///
/// Reads the leading run of digits (after optional whitespace and `+`), like a lenient
/// integer parse. Anything else, including negative numbers and values that overflow the
/// column, becomes 0.
pub fn coerce_count(raw: &str) -> i32 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned.find(|c: char| !c.is_ascii_digit()).unwrap_or(unsigned.len());
    unsigned[..end].parse().unwrap_or(0)
}

/// Editable values of the eight fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FamilyForm {
    pub family_name: String,
    pub number_of_adults: i32,
    pub number_of_children: i32,
    pub street_address: String,
    pub city: String,
    pub zip_code: String,
    pub phone_number: String,
    pub email_address: String,
}

impl FamilyForm {
    /// Set one field from raw input, coercing the numeric ones.
    pub fn set(&mut self, field: FormField, raw: &str) {
        let text = || raw.to_string();
        match field {
            FormField::FamilyName => self.family_name = text(),
            FormField::NumberOfAdults => self.number_of_adults = coerce_count(raw),
            FormField::NumberOfChildren => self.number_of_children = coerce_count(raw),
            FormField::StreetAddress => self.street_address = text(),
            FormField::City => self.city = text(),
            FormField::ZipCode => self.zip_code = text(),
            FormField::PhoneNumber => self.phone_number = text(),
            FormField::EmailAddress => self.email_address = text(),
        }
    }

    /// Current value of a field, as it should appear in its input.
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::FamilyName => self.family_name.clone(),
            FormField::NumberOfAdults => self.number_of_adults.to_string(),
            FormField::NumberOfChildren => self.number_of_children.to_string(),
            FormField::StreetAddress => self.street_address.clone(),
            FormField::City => self.city.clone(),
            FormField::ZipCode => self.zip_code.clone(),
            FormField::PhoneNumber => self.phone_number.clone(),
            FormField::EmailAddress => self.email_address.clone(),
        }
    }

    pub fn to_submission(&self) -> FamilySubmission {
        FamilySubmission {
            family_name: self.family_name.clone(),
            number_of_adults: self.number_of_adults,
            number_of_children: self.number_of_children,
            street_address: self.street_address.clone(),
            city: self.city.clone(),
            zip_code: self.zip_code.clone(),
            phone_number: self.phone_number.clone(),
            email_address: self.email_address.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_case(name: &str) -> String {
        let mut out = String::new();
        for c in name.chars() {
            if c.is_ascii_uppercase() {
                out.push('_');
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_columns_are_snake_case_of_field_names() {
        for field in FormField::ALL {
            assert_eq!(field.column(), snake_case(field.name()), "{field}");
        }
    }

    #[test]
    fn test_parse_known_and_unknown_names() {
        assert_eq!("zipCode".parse::<FormField>(), Ok(FormField::ZipCode));
        assert_eq!("numberOfChildren".parse::<FormField>(), Ok(FormField::NumberOfChildren));
        assert_eq!("zip_code".parse::<FormField>(), Err(UnknownField("zip_code".to_string())));
        assert!("".parse::<FormField>().is_err());
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("3"), 3);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("  7"), 7);
        assert_eq!(coerce_count("+4"), 4);
        assert_eq!(coerce_count("12 kids"), 12);
        assert_eq!(coerce_count("2.9"), 2);
        assert_eq!(coerce_count("-2"), 0);
        assert_eq!(coerce_count("99999999999"), 0);
    }

    #[test]
    fn test_set_coerces_only_numeric_fields() {
        let mut form = FamilyForm::default();
        form.set(FormField::NumberOfAdults, "two");
        form.set(FormField::NumberOfChildren, "3");
        form.set(FormField::ZipCode, "0213x");

        assert_eq!(form.number_of_adults, 0);
        assert_eq!(form.number_of_children, 3);
        assert_eq!(form.zip_code, "0213x");
    }

    #[test]
    fn test_hints() {
        assert_eq!(FormField::NumberOfAdults.hints().input_type, "number");
        assert_eq!(FormField::NumberOfAdults.hints().min, Some(0));
        assert_eq!(FormField::ZipCode.hints().pattern, Some("[0-9]{5}"));
        assert_eq!(FormField::PhoneNumber.hints().input_type, "tel");
        assert_eq!(FormField::EmailAddress.hints().input_type, "email");
        assert!(FormField::ALL.iter().all(|f| f.hints().required));

        let numeric: Vec<_> = FormField::ALL.into_iter().filter(|f| f.is_numeric()).collect();
        assert_eq!(numeric, vec![FormField::NumberOfAdults, FormField::NumberOfChildren]);
    }

    #[test]
    fn test_to_submission_maps_every_field() {
        let mut form = FamilyForm::default();
        for field in FormField::ALL {
            let raw = if field.is_numeric() { "5" } else { field.column() };
            form.set(field, raw);
        }

        let record = form.to_submission();
        let json = serde_json::to_value(&record).unwrap();
        for field in FormField::ALL {
            let expected = if field.is_numeric() {
                serde_json::json!(5)
            } else {
                serde_json::json!(field.column())
            };
            assert_eq!(json[field.column()], expected, "{field}");
        }
    }
}
