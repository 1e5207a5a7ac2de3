use serde::{Deserialize, Serialize};

/// Account role. Raw strings coming from clients are parsed with
/// [`Role::parse`] at the handler boundary; everything past that point
/// only ever sees the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// Exercise difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "exercise_difficulty", rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s {
            "EASY" => Some(Difficulty::Easy),
            "MEDIUM" => Some(Difficulty::Medium),
            "HARD" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_accepts_known_values_only() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("SUPERUSER"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn difficulty_parse_accepts_known_values_only() {
        assert_eq!(Difficulty::parse("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("IMPOSSIBLE"), None);
        assert_eq!(Difficulty::parse("easy"), None);
    }

    #[test]
    fn enums_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"MEDIUM\""
        );
    }

    #[test]
    fn parse_round_trips_as_str() {
        for role in [Role::Admin, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
    }
}
