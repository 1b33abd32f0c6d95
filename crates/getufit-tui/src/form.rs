use getufit_core::{Experience, Goal, UserProfile};

/// Onboarding form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserId,
    Name,
    Age,
    Height,
    Weight,
    Goal,
    HealthIssues,
    Experience,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::UserId,
        Field::Name,
        Field::Age,
        Field::Height,
        Field::Weight,
        Field::Goal,
        Field::HealthIssues,
        Field::Experience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::UserId => "User ID",
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Height => "Height (in feet)",
            Field::Weight => "Weight (in lbs)",
            Field::Goal => "Fitness Goal",
            Field::HealthIssues => "Health Issues",
            Field::Experience => "Experience Level",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::UserId => "Enter User ID",
            Field::Name => "Enter Name",
            Field::Age => "Enter Age",
            Field::Height => "e.g., 5.9",
            Field::Weight => "e.g., 160",
            Field::Goal => "Select Fitness Goal",
            Field::HealthIssues => "e.g., none",
            Field::Experience => "Select Experience Level",
        }
    }

    /// Select fields cycle options instead of taking typed input
    pub fn is_select(&self) -> bool {
        matches!(self, Field::Goal | Field::Experience)
    }
}

/// Editable state of the onboarding form.
///
/// Text fields hold raw strings; numeric and select constraints are only
/// checked when the form is turned into a profile at submit time, matching
/// the submit-time-only validation of the flow.
#[derive(Debug, Default)]
pub struct OnboardingForm {
    pub user_id: String,
    pub name: String,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub goal: Option<Goal>,
    pub health_issues: String,
    pub experience: Option<Experience>,
    focus: usize,
}

impl OnboardingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Current display value of a field
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::UserId => self.user_id.clone(),
            Field::Name => self.name.clone(),
            Field::Age => self.age.clone(),
            Field::Height => self.height.clone(),
            Field::Weight => self.weight.clone(),
            Field::Goal => self.goal.map(|g| g.to_string()).unwrap_or_default(),
            Field::HealthIssues => self.health_issues.clone(),
            Field::Experience => self.experience.map(|e| e.to_string()).unwrap_or_default(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focused() {
            Field::UserId => self.user_id.push(c),
            Field::Name => self.name.push(c),
            Field::Age => self.age.push(c),
            Field::Height => self.height.push(c),
            Field::Weight => self.weight.push(c),
            Field::HealthIssues => self.health_issues.push(c),
            // Selects cycle with arrow keys
            Field::Goal | Field::Experience => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focused() {
            Field::UserId => {
                self.user_id.pop();
            }
            Field::Name => {
                self.name.pop();
            }
            Field::Age => {
                self.age.pop();
            }
            Field::Height => {
                self.height.pop();
            }
            Field::Weight => {
                self.weight.pop();
            }
            Field::HealthIssues => {
                self.health_issues.pop();
            }
            Field::Goal | Field::Experience => {}
        }
    }

    /// Cycle a select field forward (`step = 1`) or backward (`step = -1`)
    pub fn cycle(&mut self, step: i32) {
        match self.focused() {
            Field::Goal => {
                self.goal = Some(cycle_option(&Goal::ALL, self.goal, step));
            }
            Field::Experience => {
                self.experience = Some(cycle_option(&Experience::ALL, self.experience, step));
            }
            _ => {}
        }
    }

    /// Apply the required/numeric constraints and build the submission
    /// payload. The error is the message shown to the user.
    pub fn to_profile(&self) -> Result<UserProfile, String> {
        if self.user_id.trim().is_empty() {
            return Err("Please enter a User ID".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Please enter a name".to_string());
        }
        let age: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|_| "Please enter a valid age".to_string())?;
        if self.height.trim().is_empty() {
            return Err("Please enter a height".to_string());
        }
        let weight: u32 = self
            .weight
            .trim()
            .parse()
            .map_err(|_| "Please enter a valid weight".to_string())?;
        let goal = self.goal.ok_or_else(|| "Please select a fitness goal".to_string())?;
        let experience = self
            .experience
            .ok_or_else(|| "Please select an experience level".to_string())?;

        Ok(UserProfile {
            user_id: self.user_id.trim().to_string(),
            name: self.name.trim().to_string(),
            age,
            height: self.height.trim().to_string(),
            weight,
            goal,
            health_issues: self.health_issues.trim().to_string(),
            experience,
        })
    }
}

fn cycle_option<T: Copy + PartialEq>(options: &[T], current: Option<T>, step: i32) -> T {
    let len = options.len() as i32;
    let index = match current {
        Some(value) => options.iter().position(|o| *o == value).unwrap_or(0) as i32,
        // First cycle lands on the first option
        None => return options[0],
    };
    let next = (index + step).rem_euclid(len);
    options[next as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> OnboardingForm {
        OnboardingForm {
            user_id: "u-42".to_string(),
            name: "Sam".to_string(),
            age: "29".to_string(),
            height: "5.9".to_string(),
            weight: "160".to_string(),
            goal: Some(Goal::Endurance),
            health_issues: "none".to_string(),
            experience: Some(Experience::Newbie),
            focus: 0,
        }
    }

    #[test]
    fn test_complete_form_builds_profile() {
        let profile = filled_form().to_profile().unwrap();
        assert_eq!(profile.user_id, "u-42");
        assert_eq!(profile.age, 29);
        assert_eq!(profile.weight, 160);
    }

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let mut form = filled_form();
        form.age = "twenty".to_string();
        assert_eq!(form.to_profile(), Err("Please enter a valid age".to_string()));
    }

    #[test]
    fn test_unselected_goal_is_rejected() {
        let mut form = filled_form();
        form.goal = None;
        assert!(form.to_profile().is_err());
    }

    #[test]
    fn test_focus_wraps_both_directions() {
        let mut form = OnboardingForm::new();
        assert_eq!(form.focused(), Field::UserId);
        form.prev_field();
        assert_eq!(form.focused(), Field::Experience);
        form.next_field();
        assert_eq!(form.focused(), Field::UserId);
    }

    #[test]
    fn test_select_cycling() {
        let mut form = OnboardingForm::new();
        while form.focused() != Field::Goal {
            form.next_field();
        }
        form.cycle(1);
        assert_eq!(form.goal, Some(Goal::WeightLoss));
        form.cycle(-1);
        assert_eq!(form.goal, Some(Goal::GeneralFitness));
    }
}
