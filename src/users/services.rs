use super::dto::{AdminUserView, ProfileView};
use super::repo::User;
use crate::enums::Role;
use crate::exercises::dto::{ExerciseView, LoggedExercise};
use crate::exercises::repo::LinkedExerciseRow;

/// Partial update to a user profile. Run through [`UserPatch::diff_against`]
/// before persisting so an identical resubmission results in no write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub nick_name: Option<String>,
    pub age: Option<i32>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.nick_name.is_none()
            && self.age.is_none()
            && self.role.is_none()
    }

    /// Keep only the fields that actually differ from current state.
    pub fn diff_against(&self, current: &User) -> UserPatch {
        UserPatch {
            name: self.name.clone().filter(|v| *v != current.name),
            surname: self.surname.clone().filter(|v| *v != current.surname),
            nick_name: self.nick_name.clone().filter(|v| *v != current.nick_name),
            age: self.age.filter(|v| *v != current.age),
            role: self.role.filter(|v| *v != current.role),
        }
    }
}

/// Pair each user with the exercises linked to it, association metadata
/// excluded (admin listing shape).
pub fn attach_exercises(users: Vec<User>, links: &[LinkedExerciseRow]) -> Vec<AdminUserView> {
    users
        .into_iter()
        .map(|user| {
            let exercises = links
                .iter()
                .filter(|l| l.user_id == user.id)
                .map(ExerciseView::from)
                .collect();
            AdminUserView::with_exercises(user, exercises)
        })
        .collect()
}

/// Member-facing profile: the user plus every logged exercise with its
/// per-link metadata.
pub fn profile_view(user: User, links: Vec<LinkedExerciseRow>) -> ProfileView {
    ProfileView {
        id: user.id,
        name: user.name,
        surname: user.surname,
        nick_name: user.nick_name,
        email: user.email,
        age: user.age,
        role: user.role,
        exercises: links.into_iter().map(LoggedExercise::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Difficulty;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jana".into(),
            surname: "Novak".into(),
            nick_name: "jn".into(),
            email: "jana@example.com".into(),
            age: 30,
            role: Role::User,
            password_hash: "$argon2id$irrelevant".into(),
        }
    }

    fn link_for(user_id: Uuid, name: &str) -> LinkedExerciseRow {
        LinkedExerciseRow {
            user_id,
            link_id: Uuid::new_v4(),
            completed_at: None,
            duration: Some(15),
            exercise_id: Uuid::new_v4(),
            exercise_name: name.into(),
            difficulty: Difficulty::Easy,
            program_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn identical_patch_diffs_to_empty() {
        let user = sample_user();
        let patch = UserPatch {
            name: Some("Jana".into()),
            surname: Some("Novak".into()),
            nick_name: Some("jn".into()),
            age: Some(30),
            role: Some(Role::User),
        };
        assert!(patch.diff_against(&user).is_empty());
    }

    #[test]
    fn diff_keeps_only_changed_fields() {
        let user = sample_user();
        let patch = UserPatch {
            name: Some("Jana".into()),
            surname: None,
            nick_name: Some("jana_n".into()),
            age: Some(31),
            role: Some(Role::User),
        };
        let changes = patch.diff_against(&user);
        assert_eq!(changes.name, None);
        assert_eq!(changes.nick_name.as_deref(), Some("jana_n"));
        assert_eq!(changes.age, Some(31));
        assert_eq!(changes.role, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn role_change_is_detected() {
        let user = sample_user();
        let patch = UserPatch {
            role: Some(Role::Admin),
            ..UserPatch::default()
        };
        assert_eq!(patch.diff_against(&user).role, Some(Role::Admin));
    }

    #[test]
    fn empty_patch_stays_empty_after_diff() {
        let user = sample_user();
        assert!(UserPatch::default().diff_against(&user).is_empty());
    }

    #[test]
    fn attach_exercises_groups_links_by_user() {
        let a = sample_user();
        let mut b = sample_user();
        b.nick_name = "other".into();
        let links = vec![
            link_for(a.id, "Squat"),
            link_for(b.id, "Deadlift"),
            link_for(a.id, "Push-up"),
        ];
        let views = attach_exercises(vec![a.clone(), b.clone()], &links);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].exercises.as_ref().unwrap().len(), 2);
        assert_eq!(views[1].exercises.as_ref().unwrap().len(), 1);
        assert_eq!(views[1].exercises.as_ref().unwrap()[0].name, "Deadlift");
    }

    #[test]
    fn profile_view_carries_link_metadata() {
        let user = sample_user();
        let links = vec![link_for(user.id, "Squat")];
        let view = profile_view(user, links);
        assert_eq!(view.exercises.len(), 1);
        assert_eq!(view.exercises[0].user_exercise.duration, Some(15));
    }
}
