use std::fmt;

use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde/utoipa).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile_fields: Option<Vec<ProfileField>>,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub profile_fields: Option<Vec<ProfileField>>,
}

/// Partial update data for a user; `None` leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_fields: Option<Vec<ProfileField>>,
}

/// One user-profile attribute. The variant is the discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileField {
    Text(TextProfileField),
    Number(NumberProfileField),
    Gender(GenderProfileField),
    /// Wire data with an unknown tag, or a payload that does not fit its tag.
    Unrecognized(UnrecognizedProfileField),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProfileField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberProfileField {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenderProfileField {
    pub name: String,
    pub value: Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedProfileField {
    /// The `field_type` tag as received, if there was a string one.
    pub field_type: Option<String>,
    /// The element exactly as received.
    pub raw: serde_json::Value,
}

/// Kind of a resolved profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFieldType {
    Text,
    Number,
    Gender,
}

impl ProfileFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Gender => "gender",
        }
    }
}

impl fmt::Display for ProfileFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProfileField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text(TextProfileField {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::Number(NumberProfileField {
            name: name.into(),
            value,
        })
    }

    pub fn gender(name: impl Into<String>, value: Gender) -> Self {
        Self::Gender(GenderProfileField {
            name: name.into(),
            value,
        })
    }
}
