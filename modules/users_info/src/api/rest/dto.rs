use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    Gender, GenderProfileField, NewUser, NumberProfileField, ProfileField, TextProfileField,
    UnrecognizedProfileField, User, UserPatch,
};

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "User")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<KnownProfileField>>)]
    pub profile_fields: Option<Vec<ProfileFieldDto>>,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "CreateUserRequest")]
pub struct CreateUserReq {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<KnownProfileField>>)]
    pub profile_fields: Option<Vec<ProfileFieldDto>>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[schema(title = "UpdateUserRequest")]
pub struct UpdateUserReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<KnownProfileField>>)]
    pub profile_fields: Option<Vec<ProfileFieldDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HelloResponse {
    pub message: String,
}

/// REST DTO for query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Keep only profile fields with exactly this name.
    pub field_name: Option<String>,
}

/// One element of `profile_fields` as it travels over the wire.
///
/// Decoding never fails for a JSON value: anything that is not a well-formed
/// known variant lands in `Unknown` and is reported later by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileFieldDto {
    Known(KnownProfileField),
    Unknown(serde_json::Value),
}

/// Profile field discriminated by `field_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "field_type", rename_all = "lowercase")]
#[schema(title = "ProfileField")]
pub enum KnownProfileField {
    Text(TextFieldDto),
    Number(NumberFieldDto),
    Gender(GenderFieldDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(title = "TextProfileField")]
pub struct TextFieldDto {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(title = "NumberProfileField")]
pub struct NumberFieldDto {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(title = "GenderProfileField")]
pub struct GenderFieldDto {
    pub name: String,
    pub value: GenderDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GenderDto {
    Male,
    Female,
    Other,
}

// Conversion implementations between REST DTOs and contract models

impl From<GenderDto> for Gender {
    fn from(g: GenderDto) -> Self {
        match g {
            GenderDto::Male => Gender::Male,
            GenderDto::Female => Gender::Female,
            GenderDto::Other => Gender::Other,
        }
    }
}

impl From<Gender> for GenderDto {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Male => GenderDto::Male,
            Gender::Female => GenderDto::Female,
            Gender::Other => GenderDto::Other,
        }
    }
}

impl From<ProfileFieldDto> for ProfileField {
    fn from(dto: ProfileFieldDto) -> Self {
        match dto {
            ProfileFieldDto::Known(KnownProfileField::Text(f)) => {
                ProfileField::Text(TextProfileField {
                    name: f.name,
                    value: f.value,
                })
            }
            ProfileFieldDto::Known(KnownProfileField::Number(f)) => {
                ProfileField::Number(NumberProfileField {
                    name: f.name,
                    value: f.value,
                })
            }
            ProfileFieldDto::Known(KnownProfileField::Gender(f)) => {
                ProfileField::Gender(GenderProfileField {
                    name: f.name,
                    value: f.value.into(),
                })
            }
            ProfileFieldDto::Unknown(raw) => {
                let field_type = raw
                    .get("field_type")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                ProfileField::Unrecognized(UnrecognizedProfileField { field_type, raw })
            }
        }
    }
}

impl From<ProfileField> for ProfileFieldDto {
    fn from(field: ProfileField) -> Self {
        match field {
            ProfileField::Text(f) => ProfileFieldDto::Known(KnownProfileField::Text(TextFieldDto {
                name: f.name,
                value: f.value,
            })),
            ProfileField::Number(f) => {
                ProfileFieldDto::Known(KnownProfileField::Number(NumberFieldDto {
                    name: f.name,
                    value: f.value,
                }))
            }
            ProfileField::Gender(f) => {
                ProfileFieldDto::Known(KnownProfileField::Gender(GenderFieldDto {
                    name: f.name,
                    value: f.value.into(),
                }))
            }
            ProfileField::Unrecognized(u) => ProfileFieldDto::Unknown(u.raw),
        }
    }
}

fn fields_from_dto(fields: Option<Vec<ProfileFieldDto>>) -> Option<Vec<ProfileField>> {
    fields.map(|v| v.into_iter().map(ProfileField::from).collect())
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
            profile_fields: user
                .profile_fields
                .map(|v| v.into_iter().map(ProfileFieldDto::from).collect()),
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            profile_fields: fields_from_dto(req.profile_fields),
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            profile_fields: fields_from_dto(req.profile_fields),
        }
    }
}
