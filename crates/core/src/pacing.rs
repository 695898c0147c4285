use crate::model::ProficiencyLevel;

//
// ─── SESSION SIZING ────────────────────────────────────────────────────────────
//

/// Smallest session the calculator will produce, so even a short session at
/// the slowest pacing yields a usable set.
pub const MIN_EXERCISES: usize = 3;

/// Expected seconds a learner at this level spends on one exercise.
///
/// Lower bands move fast through short recognition items; the top bands get
/// production-heavy items that take minutes each.
#[must_use]
pub fn seconds_per_exercise(level: ProficiencyLevel) -> u32 {
    match level {
        ProficiencyLevel::A1 | ProficiencyLevel::A2 => 20,
        ProficiencyLevel::B1 | ProficiencyLevel::B2 => 40,
        ProficiencyLevel::C1 | ProficiencyLevel::C2 => 120,
    }
}

/// Sizes a practice session from a proficiency level and a time budget.
///
/// `ceil(minutes / seconds_per_exercise)` with a floor of [`MIN_EXERCISES`].
/// Pure and deterministic; the quiz workflow feeds the result straight to the
/// question generation service.
#[must_use]
pub fn exercise_count(level: ProficiencyLevel, minutes: u32) -> usize {
    let seconds = u64::from(minutes) * 60;
    let per_exercise = u64::from(seconds_per_exercise(level));
    let raw = usize::try_from(seconds.div_ceil(per_exercise)).unwrap_or(usize::MAX);
    raw.max(MIN_EXERCISES)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_never_drops_below_floor() {
        for level in ProficiencyLevel::ALL {
            for minutes in 0..=30 {
                assert!(exercise_count(level, minutes) >= MIN_EXERCISES);
            }
        }
    }

    #[test]
    fn count_is_monotonic_in_minutes() {
        for level in ProficiencyLevel::ALL {
            let mut prev = 0;
            for minutes in 1..=60 {
                let count = exercise_count(level, minutes);
                assert!(count >= prev, "{level:?} at {minutes}m regressed");
                prev = count;
            }
        }
    }

    #[test]
    fn beginner_fifteen_minutes_is_forty_five() {
        assert_eq!(exercise_count(ProficiencyLevel::A1, 15), 45);
    }

    #[test]
    fn native_five_minutes_hits_the_floor() {
        // 5 minutes at 2 minutes per exercise rounds up to 3 either way.
        assert_eq!(exercise_count(ProficiencyLevel::C2, 5), 3);
    }

    #[test]
    fn middle_bands_use_medium_pacing() {
        // 10 minutes at 40 s per exercise.
        assert_eq!(exercise_count(ProficiencyLevel::B1, 10), 15);
        assert_eq!(exercise_count(ProficiencyLevel::B2, 10), 15);
    }

    #[test]
    fn ceiling_rounds_partial_exercises_up() {
        // 3 minutes at 40 s per exercise = 4.5 -> 5.
        assert_eq!(exercise_count(ProficiencyLevel::B1, 3), 5);
    }
}
