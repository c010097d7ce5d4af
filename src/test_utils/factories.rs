//! Test data factories. Each returns a complete fixture; the closure overrides fields.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{identity::Role, therapist::Therapist, user::User};

pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: 1,
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        phone: String::new(),
        avatar: String::new(),
        role: Role::Client,
        is_email_verified: false,
        last_login_at: None,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut user);
    user
}

/// The embedded user is a therapist account whose id matches `user_id`.
pub fn create_test_therapist(overrides: impl FnOnce(&mut Therapist)) -> Therapist {
    let user = create_test_user(|u| {
        u.id = 100;
        u.email = "therapist@example.com".to_string();
        u.name = "Анна Петрова".to_string();
        u.role = Role::Therapist;
    });
    let mut therapist = Therapist {
        id: 1,
        user_id: user.id,
        user,
        specialization: "Тревожные расстройства".to_string(),
        approach: "КПТ".to_string(),
        experience: 5,
        price_per_hour: 300_000,
        rating: 4.8,
        review_count: 12,
        bio: "Работаю с тревогой и стрессом".to_string(),
        languages: vec!["ru".to_string(), "en".to_string()],
        is_online: true,
        next_slot: None,
        created_at: test_datetime(),
    };
    overrides(&mut therapist);
    therapist
}
