// ABOUTME: Synchronous per-step field checks for the registration wizard

use super::state::{FormField, RegistrationForm, RegistrationStep};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Minimum password length accepted locally
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

fn require(errors: &mut BTreeMap<FormField, String>, field: FormField, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message.to_string());
        return false;
    }
    true
}

/// Run every check for `step`, returning the full error set
pub fn validate(step: RegistrationStep, form: &RegistrationForm) -> BTreeMap<FormField, String> {
    let mut errors = BTreeMap::new();

    match step {
        RegistrationStep::Account => {
            require(&mut errors, FormField::FirstName, &form.first_name, "First name is required");
            require(&mut errors, FormField::LastName, &form.last_name, "Last name is required");

            if require(&mut errors, FormField::Email, &form.email, "Email is required")
                && !is_valid_email(&form.email)
            {
                errors.insert(FormField::Email, "Please enter a valid email address".to_string());
            }

            if require(&mut errors, FormField::Password, &form.password, "Password is required")
                && form.password.chars().count() < MIN_PASSWORD_LEN
            {
                errors.insert(
                    FormField::Password,
                    format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                );
            }

            if require(
                &mut errors,
                FormField::ConfirmPassword,
                &form.confirm_password,
                "Please confirm your password",
            ) && form.confirm_password != form.password
            {
                errors.insert(FormField::ConfirmPassword, "Passwords do not match".to_string());
            }
        }
        RegistrationStep::Contact => {
            require(&mut errors, FormField::ContactNumber, &form.contact_number, "Contact number is required");
            require(
                &mut errors,
                FormField::ParentContactNumber,
                &form.parent_contact_number,
                "Parent contact number is required",
            );
            require(&mut errors, FormField::AddressCity, &form.address.city, "City is required");
        }
        RegistrationStep::Academic => {
            require(&mut errors, FormField::Year, &form.year, "Year is required");
            require(&mut errors, FormField::Session, &form.session, "Session is required");
            require(&mut errors, FormField::Nationality, &form.nationality, "Nationality is required");
            require(&mut errors, FormField::School, &form.school, "School is required");
        }
        // Background questions are optional
        RegistrationStep::Background => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("student@example.com"));
        assert!(is_valid_email("  padded@example.co.uk "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spa ce@example.com"));
    }

    #[test]
    fn test_password_rules() {
        let mut form = RegistrationForm::default();
        form.first_name = "A".to_string();
        form.last_name = "B".to_string();
        form.email = "a@b.co".to_string();
        form.password = "12345".to_string();
        form.confirm_password = "12345".to_string();

        let errors = validate(RegistrationStep::Account, &form);
        assert_eq!(
            errors.get(&FormField::Password).map(String::as_str),
            Some("Password must be at least 6 characters")
        );
        assert!(!errors.contains_key(&FormField::ConfirmPassword));

        form.password = "123456".to_string();
        let errors = validate(RegistrationStep::Account, &form);
        assert_eq!(
            errors.get(&FormField::ConfirmPassword).map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let mut form = RegistrationForm::default();
        form.year = "   ".to_string();
        let errors = validate(RegistrationStep::Academic, &form);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key(&FormField::Year));
    }

    #[test]
    fn test_background_step_has_no_required_fields() {
        assert!(validate(RegistrationStep::Background, &RegistrationForm::default()).is_empty());
    }
}
