use super::repo::Exercise;
use crate::enums::Difficulty;
use uuid::Uuid;

/// Partial update to an exercise. Run through
/// [`ExercisePatch::diff_against`] before persisting so a resend of the
/// current values becomes a no-op instead of a spurious write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub program_id: Option<Uuid>,
}

impl ExercisePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.difficulty.is_none() && self.program_id.is_none()
    }

    /// Keep only the fields that actually differ from current state.
    pub fn diff_against(&self, current: &Exercise) -> ExercisePatch {
        ExercisePatch {
            name: self.name.clone().filter(|v| *v != current.name),
            difficulty: self.difficulty.filter(|v| *v != current.difficulty),
            program_id: self.program_id.filter(|v| *v != current.program_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exercise() -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: "Squat".into(),
            difficulty: Difficulty::Medium,
            program_id: Uuid::nil(),
        }
    }

    #[test]
    fn identical_patch_diffs_to_empty() {
        let exercise = sample_exercise();
        let patch = ExercisePatch {
            name: Some("Squat".into()),
            difficulty: Some(Difficulty::Medium),
            program_id: Some(exercise.program_id),
        };
        assert!(patch.diff_against(&exercise).is_empty());
    }

    #[test]
    fn changed_difficulty_survives_the_diff() {
        let exercise = sample_exercise();
        let patch = ExercisePatch {
            name: Some("Squat".into()),
            difficulty: Some(Difficulty::Hard),
            program_id: None,
        };
        let changes = patch.diff_against(&exercise);
        assert_eq!(changes.name, None);
        assert_eq!(changes.difficulty, Some(Difficulty::Hard));
        assert_eq!(changes.program_id, None);
    }

    #[test]
    fn program_move_survives_the_diff() {
        let exercise = sample_exercise();
        let target = Uuid::new_v4();
        let patch = ExercisePatch {
            program_id: Some(target),
            ..ExercisePatch::default()
        };
        assert_eq!(patch.diff_against(&exercise).program_id, Some(target));
    }

    #[test]
    fn empty_patch_stays_empty() {
        assert!(ExercisePatch::default()
            .diff_against(&sample_exercise())
            .is_empty());
    }
}
