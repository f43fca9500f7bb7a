use chrono::{DateTime, Utc};

use crate::contract::model::{Gender, ProfileField, User};

/// The two users the service starts with when seeding is enabled.
pub fn sample_users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "田中太郎".to_string(),
            email: "tanaka@example.com".to_string(),
            created_at: now,
            updated_at: now,
            profile_fields: Some(vec![
                ProfileField::text("趣味", "読書"),
                ProfileField::number("年齢", 30.0),
            ]),
        },
        User {
            id: 2,
            name: "三井花子".to_string(),
            email: "mitsui@example.com".to_string(),
            created_at: now,
            updated_at: now,
            profile_fields: Some(vec![
                ProfileField::text("職業", "エンジニア"),
                ProfileField::gender("性別", Gender::Female),
            ]),
        },
    ]
}
