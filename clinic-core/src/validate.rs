//! Field rules for the edit forms.
//!
//! Every rule is checked and every failure reported, so a caller can show all
//! problems at once rather than one per submit.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::ValidationErrors;
use crate::forms::{CrmSettingsForm, UserForm};

const PHONE_PATTERN: &str = r"^((\+[1-9]{1,4}[ -]?)|(\([0-9]{2,3}\)[ -]?)|([0-9]{2,4})[ -]?)*?[0-9]{3,4}[ -]?[0-9]{3,4}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Absolute http(s) URL with a host.
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn user_form(form: &UserForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    required(&mut errors, "first_name", &form.first_name, "First name is required");
    required(&mut errors, "last_name", &form.last_name, "Last name is required");
    email(&mut errors, "email", &form.email);
    phone(&mut errors, "contact", &form.contact, "Contact number is required");
    required(&mut errors, "address", &form.address, "Address is required");
    errors.into_result()
}

pub fn settings_form(form: &CrmSettingsForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    required(
        &mut errors,
        "primary_color",
        &form.primary_color,
        "Primary color is required",
    );
    if form.instagram.trim().is_empty() {
        errors.push("instagram", "Instagram URL is required");
    } else if !is_valid_url(form.instagram.trim()) {
        errors.push("instagram", "Enter a valid URL");
    }
    phone(&mut errors, "phone", &form.phone, "Phone number is required");
    required(&mut errors, "address", &form.address, "Address is required");
    email(&mut errors, "email", &form.email);
    errors.into_result()
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

fn email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "Email is required");
    } else if !is_valid_email(value.trim()) {
        errors.push(field, "Invalid email");
    }
}

fn phone(errors: &mut ValidationErrors, field: &'static str, value: &str, missing: &str) {
    if value.trim().is_empty() {
        errors.push(field, missing);
    } else if !is_valid_phone(value.trim()) {
        errors.push(field, "Phone number is not valid");
    }
}
