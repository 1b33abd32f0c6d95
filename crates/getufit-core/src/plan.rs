use serde::{Deserialize, Serialize};

/// Weekly fitness plan extracted from a coach reply.
///
/// Constructed transiently on each plan-view mount; never persisted on the
/// client. An empty `activities` list is valid and renders as an empty
/// state, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FitnessPlan {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<String>,
}

impl FitnessPlan {
    /// Whether the plan carries the free-text recommendation section
    pub fn has_recommendations(&self) -> bool {
        self.nutrition.is_some()
    }
}

/// One day of the weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub day: String,
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// A single prescribed exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Rest duration between sets, in seconds
    pub rest: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    /// One-line rendering used by the plan view,
    /// e.g. `Squat - 3 sets of 12 reps (Rest: 60s)`
    pub fn summary(&self) -> String {
        format!(
            "{} - {} sets of {} reps (Rest: {}s)",
            self.name, self.sets, self.reps, self.rest
        )
    }
}

/// Deterministic multi-line rendering of day records embedded in a
/// personal-bot reply:
///
/// ```text
/// **Mon (Legs)**:
/// - Squat: 3 sets of 12 reps (Rest: 60 seconds)
/// ```
///
/// Days are separated by a blank line; an exercise's notes, when present,
/// go on an indented `Notes:` line underneath it.
pub fn format_day_summary(days: &[Activity]) -> String {
    days.iter()
        .map(|day| {
            let exercises = day
                .exercises
                .iter()
                .map(|exercise| {
                    let mut line = format!(
                        "- {}: {} sets of {} reps (Rest: {} seconds)",
                        exercise.name, exercise.sets, exercise.reps, exercise.rest
                    );
                    if let Some(ref notes) = exercise.notes {
                        line.push_str(&format!("\n  Notes: {}", notes));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("**{} ({})**:\n{}", day.day, day.focus, exercises)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg_day() -> Activity {
        Activity {
            day: "Mon".to_string(),
            focus: "Legs".to_string(),
            exercises: vec![Exercise {
                name: "Squat".to_string(),
                sets: 3,
                reps: 12,
                rest: 60,
                notes: None,
            }],
        }
    }

    #[test]
    fn test_exercise_summary() {
        let exercise = &leg_day().exercises[0];
        assert_eq!(exercise.summary(), "Squat - 3 sets of 12 reps (Rest: 60s)");
    }

    #[test]
    fn test_day_summary_format() {
        let rendered = format_day_summary(&[leg_day()]);
        assert_eq!(
            rendered,
            "**Mon (Legs)**:\n- Squat: 3 sets of 12 reps (Rest: 60 seconds)"
        );
    }

    #[test]
    fn test_day_summary_includes_notes_and_separates_days() {
        let mut tuesday = leg_day();
        tuesday.day = "Tue".to_string();
        tuesday.focus = "Back".to_string();
        tuesday.exercises[0].notes = Some("Keep the bar close".to_string());

        let rendered = format_day_summary(&[leg_day(), tuesday]);
        let days: Vec<&str> = rendered.split("\n\n").collect();
        assert_eq!(days.len(), 2);
        assert!(days[1].contains("\n  Notes: Keep the bar close"));
    }

    #[test]
    fn test_plan_tolerates_missing_fields() {
        let plan: FitnessPlan = serde_json::from_str(r#"{"fitness_goal":"bulk"}"#).unwrap();
        assert!(plan.activities.is_empty());
        assert!(!plan.has_recommendations());

        let plan: FitnessPlan =
            serde_json::from_str(r#"{"activities":[{"day":"Mon","focus":"Rest"}]}"#).unwrap();
        assert!(plan.activities[0].exercises.is_empty());
    }
}
