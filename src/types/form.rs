//! Profile form validation
//!
//! Only the validation contract lives here; rendering the form is the
//! host application's business.

use serde::{Deserialize, Deserializer, Serialize};

use super::schema::{Checker, Schema, coerce_u32};

/// Roles a respondent can pick
pub const ROLES: [&str; 4] = ["student", "professional", "freelancer", "other"];

/// Respondent role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student (default)
    #[default]
    Student,
    /// Professional
    Professional,
    /// Freelancer
    Freelancer,
    /// Anything else
    Other,
}

/// Optional project date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date
    pub start: String,
    /// End date
    pub end: String,
}

/// Submitted profile form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Age, accepted as a number or numeric string
    #[serde(deserialize_with = "coerce_age")]
    pub age: u32,
    /// Country
    pub country: String,
    /// Role, `student` when omitted
    #[serde(default)]
    pub role: Role,
    /// Short biography
    pub bio: String,
    /// Birth date
    pub birth_date: String,
    /// Project date range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_duration: Option<DateRange>,
    /// Newsletter opt-in
    pub newsletter: bool,
    /// Selected interests
    pub interests: Vec<String>,
    /// Terms accepted
    pub terms: bool,
}

fn coerce_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    use serde::de::Error;

    let raw = serde_json::Value::deserialize(deserializer)?;
    coerce_u32(&raw).ok_or_else(|| D::Error::custom(format!("invalid age: {raw}")))
}

impl Schema for ProfileForm {
    fn check(v: &mut Checker<'_>) {
        v.string_min("name", 2, "Name must be at least 2 characters");
        v.email("email", "Please enter a valid email address");
        v.coerced_unsigned32_min("age", 18, "Must be at least 18 years old");
        v.string_min("country", 1, "Please select a country");
        v.optional_one_of("role", &ROLES);
        v.string_min("bio", 10, "Bio must be at least 10 characters");
        v.string_min("birthDate", 1, "Please select your birth date");
        v.optional_object("projectDuration", |v| {
            v.string_min("start", 1, "Please select start date");
            v.string_min("end", 1, "Please select end date");
        });
        v.boolean("newsletter");
        v.string_array_min("interests", 1, "Please select at least one interest");
        v.must_be_true("terms", "You must accept the terms and conditions");
    }
}
