// ABOUTME: State management for the registration wizard
// Tracks the current step, form values, per-field errors and the submission guard

use super::validation;
use crate::api::{ApiError, RegistrationBackend, RegistrationPayload};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Fallback shown when the server fails without a usable message
pub const REGISTRATION_FALLBACK_MESSAGE: &str = "Registration failed. Please try again.";

/// Steps in the registration wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegistrationStep {
    #[default]
    Account,
    Contact,
    Academic,
    Background,
}

impl RegistrationStep {
    /// Get all steps in order
    pub fn all() -> &'static [RegistrationStep] {
        &[Self::Account, Self::Contact, Self::Academic, Self::Background]
    }

    /// Get the step number (1-indexed)
    pub fn number(&self) -> usize {
        match self {
            Self::Account => 1,
            Self::Contact => 2,
            Self::Academic => 3,
            Self::Background => 4,
        }
    }

    /// Get the total number of steps
    pub fn total() -> usize {
        4
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Contact => "Contact",
            Self::Academic => "Academic",
            Self::Background => "Background",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Account => "Create your sign-in details",
            Self::Contact => "How can we reach you and your parent?",
            Self::Academic => "Tell us about your IGCSE exam",
            Self::Background => "Help us pitch the lessons at the right level",
        }
    }

    /// Fields shown on this step, in tab order
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Self::Account => &[
                FormField::FirstName,
                FormField::LastName,
                FormField::Email,
                FormField::Password,
                FormField::ConfirmPassword,
            ],
            Self::Contact => &[
                FormField::ContactNumber,
                FormField::AlternativeNumber,
                FormField::ParentContactNumber,
                FormField::AddressStreet,
                FormField::AddressCity,
                FormField::AddressCountry,
            ],
            Self::Academic => &[
                FormField::Year,
                FormField::Session,
                FormField::Nationality,
                FormField::School,
                FormField::IsRetaker,
            ],
            Self::Background => &[FormField::TechKnowledge, FormField::OtherSubjects],
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Account => Some(Self::Contact),
            Self::Contact => Some(Self::Academic),
            Self::Academic => Some(Self::Background),
            Self::Background => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Account => None,
            Self::Contact => Some(Self::Account),
            Self::Academic => Some(Self::Contact),
            Self::Background => Some(Self::Academic),
        }
    }
}

/// Every editable field of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    ContactNumber,
    AlternativeNumber,
    ParentContactNumber,
    AddressStreet,
    AddressCity,
    AddressCountry,
    Year,
    Session,
    Nationality,
    School,
    IsRetaker,
    TechKnowledge,
    OtherSubjects,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::ContactNumber => "Contact number",
            Self::AlternativeNumber => "Alternative number",
            Self::ParentContactNumber => "Parent contact number",
            Self::AddressStreet => "Street",
            Self::AddressCity => "City",
            Self::AddressCountry => "Country",
            Self::Year => "Exam year",
            Self::Session => "Exam session",
            Self::Nationality => "Nationality",
            Self::School => "School",
            Self::IsRetaker => "Retaking the exam",
            Self::TechKnowledge => "Tech knowledge (1-5)",
            Self::OtherSubjects => "Other subjects",
        }
    }

    /// Rendered masked
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }

    /// Yes/no field toggled with space
    pub fn is_toggle(&self) -> bool {
        matches!(self, Self::IsRetaker)
    }
}

/// Who the account is for. Self-registration only creates students;
/// other roles are provisioned by the portal staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Student,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "Student",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub contact_number: String,
    pub alternative_number: String,
    pub address: Address,
    pub year: String,
    pub session: String,
    pub nationality: String,
    pub school: String,
    pub is_retaker: bool,
    pub parent_contact_number: String,
    pub tech_knowledge: String,
    pub other_subjects: String,
}

impl RegistrationForm {
    /// Mutable access to a text field; `None` for toggles
    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        Some(match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::ConfirmPassword => &mut self.confirm_password,
            FormField::ContactNumber => &mut self.contact_number,
            FormField::AlternativeNumber => &mut self.alternative_number,
            FormField::ParentContactNumber => &mut self.parent_contact_number,
            FormField::AddressStreet => &mut self.address.street,
            FormField::AddressCity => &mut self.address.city,
            FormField::AddressCountry => &mut self.address.country,
            FormField::Year => &mut self.year,
            FormField::Session => &mut self.session,
            FormField::Nationality => &mut self.nationality,
            FormField::School => &mut self.school,
            FormField::TechKnowledge => &mut self.tech_knowledge,
            FormField::OtherSubjects => &mut self.other_subjects,
            FormField::IsRetaker => return None,
        })
    }

    /// Current value as displayed
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::FirstName => self.first_name.clone(),
            FormField::LastName => self.last_name.clone(),
            FormField::Email => self.email.clone(),
            FormField::Password => self.password.clone(),
            FormField::ConfirmPassword => self.confirm_password.clone(),
            FormField::ContactNumber => self.contact_number.clone(),
            FormField::AlternativeNumber => self.alternative_number.clone(),
            FormField::ParentContactNumber => self.parent_contact_number.clone(),
            FormField::AddressStreet => self.address.street.clone(),
            FormField::AddressCity => self.address.city.clone(),
            FormField::AddressCountry => self.address.country.clone(),
            FormField::Year => self.year.clone(),
            FormField::Session => self.session.clone(),
            FormField::Nationality => self.nationality.clone(),
            FormField::School => self.school.clone(),
            FormField::IsRetaker => if self.is_retaker { "Yes" } else { "No" }.to_string(),
            FormField::TechKnowledge => self.tech_knowledge.clone(),
            FormField::OtherSubjects => self.other_subjects.clone(),
        }
    }

    /// Map to the narrower request body
    pub fn to_payload(&self) -> RegistrationPayload {
        RegistrationPayload {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            year: self.year.trim().to_string(),
            nationality: self.nationality.trim().to_string(),
            city: self.address.city.trim().to_string(),
            school: self.school.trim().to_string(),
            session: self.session.trim().to_string(),
            is_retaker: self.is_retaker,
            email: self.email.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            parent_number: self.parent_contact_number.trim().to_string(),
            tech_knowledge: self.tech_knowledge.trim().parse().unwrap_or(1),
            other_subjects: self.other_subjects.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Field errors for the last validated step plus a submission-level message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepErrors {
    fields: BTreeMap<FormField, String>,
    pub general: Option<String>,
}

impl StepErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains_key(&field)
    }

    /// No field errors and no general message
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn clear_field(&mut self, field: FormField) {
        self.fields.remove(&field);
    }
}

/// Result of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted; the form has been reset
    Registered,
    /// Server or transport rejected; `errors.general` explains why
    Failed,
    /// Guard refused to submit (wrong step, invalid or already in flight)
    NotReady,
}

/// Full registration wizard state
#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    pub form: RegistrationForm,
    pub current_step: RegistrationStep,
    pub errors: StepErrors,
    /// Index into `current_step.fields()`
    pub focused_field: usize,
    /// A submission is in flight
    pub loading: bool,
    /// Offer a shortcut to the sign-in screen
    pub show_sign_in_link: bool,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-indexed wizard position
    pub fn position(&self) -> usize {
        self.current_step.number()
    }

    pub fn total_steps(&self) -> usize {
        RegistrationStep::total()
    }

    pub fn is_final_step(&self) -> bool {
        self.position() == self.total_steps()
    }

    pub fn can_go_back(&self) -> bool {
        self.current_step.previous().is_some()
    }

    /// Write a field value, clearing only that field's error
    pub fn set_field(&mut self, field: FormField, value: &str) {
        match self.form.text_mut(field) {
            Some(slot) => *slot = value.to_string(),
            None => self.form.is_retaker = matches!(value.trim(), "true" | "yes" | "Yes"),
        }
        self.errors.clear_field(field);
    }

    pub fn set_address_street(&mut self, street: &str) {
        self.set_field(FormField::AddressStreet, street);
    }

    pub fn set_address_city(&mut self, city: &str) {
        self.set_field(FormField::AddressCity, city);
    }

    pub fn set_address_country(&mut self, country: &str) {
        self.set_field(FormField::AddressCountry, country);
    }

    pub fn set_is_retaker(&mut self, is_retaker: bool) {
        self.form.is_retaker = is_retaker;
        self.errors.clear_field(FormField::IsRetaker);
    }

    /// Run the checks for `step`, replacing all current errors
    pub fn validate_step(&mut self, step: RegistrationStep) -> bool {
        self.errors = StepErrors {
            fields: validation::validate(step, &self.form),
            general: None,
        };
        self.errors.fields.is_empty()
    }

    /// Advance one step if the current one validates
    pub fn next(&mut self) -> bool {
        if !self.validate_step(self.current_step) {
            info!(
                "Registration step {} has {} error(s)",
                self.position(),
                self.errors.field_count()
            );
            return false;
        }

        match self.current_step.next() {
            Some(next) => {
                self.current_step = next;
                self.focused_field = 0;
                true
            }
            None => false,
        }
    }

    /// Go back one step; errors are left as they are
    pub fn previous(&mut self) -> bool {
        match self.current_step.previous() {
            Some(prev) => {
                self.current_step = prev;
                self.focused_field = 0;
                true
            }
            None => false,
        }
    }

    /// Check the guard and build the payload, marking the wizard as loading.
    ///
    /// Earlier steps are trusted as validated when they were left; only the
    /// final step is re-checked here.
    pub fn begin_submit(&mut self) -> Option<RegistrationPayload> {
        if !self.is_final_step() {
            warn!("Ignoring submit on step {}", self.position());
            return None;
        }
        if self.loading {
            warn!("Ignoring submit while a registration is in flight");
            return None;
        }
        if !self.validate_step(RegistrationStep::Background) {
            return None;
        }

        self.loading = true;
        self.show_sign_in_link = false;
        Some(self.form.to_payload())
    }

    /// Apply the server's answer to a submission started with `begin_submit`
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> SubmitOutcome {
        self.loading = false;

        match result {
            Ok(()) => {
                info!("Registration succeeded, resetting wizard");
                self.reset();
                SubmitOutcome::Registered
            }
            Err(err) => {
                if err.is_network() {
                    warn!("Registration could not reach the server: {}", err);
                } else {
                    warn!("Registration rejected: {}", err);
                }
                self.show_sign_in_link = err.suggests_sign_in();
                self.errors.general = Some(err.user_message(REGISTRATION_FALLBACK_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }

    /// Guarded submission through `backend`
    pub async fn submit<B: RegistrationBackend>(&mut self, backend: &B) -> SubmitOutcome {
        let Some(payload) = self.begin_submit() else {
            return SubmitOutcome::NotReady;
        };
        let result = backend.submit_registration(&payload).await;
        self.finish_submit(result)
    }

    /// Back to an empty form on step 1
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Field under the cursor
    pub fn focused(&self) -> FormField {
        let fields = self.current_step.fields();
        fields[self.focused_field.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let len = self.current_step.fields().len();
        self.focused_field = (self.focused_field + 1) % len;
    }

    pub fn focus_previous(&mut self) {
        let len = self.current_step.fields().len();
        self.focused_field = (self.focused_field + len - 1) % len;
    }

    /// Handle a typed character on the focused field
    pub fn input_char(&mut self, c: char) {
        let field = self.focused();
        if field.is_toggle() {
            if c == ' ' {
                self.set_is_retaker(!self.form.is_retaker);
            }
            return;
        }

        let mut value = self.form.value(field);
        value.push(c);
        self.set_field(field, &value);
    }

    /// Handle backspace on the focused field
    pub fn backspace(&mut self) {
        let field = self.focused();
        if field.is_toggle() {
            return;
        }

        let mut value = self.form.value(field);
        if value.pop().is_some() {
            self.set_field(field, &value);
        }
    }
}
