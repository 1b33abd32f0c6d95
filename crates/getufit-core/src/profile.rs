use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fitness goal options offered at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "weight loss")]
    WeightLoss,
    #[serde(rename = "muscle gain")]
    MuscleGain,
    #[serde(rename = "endurance")]
    Endurance,
    #[serde(rename = "general fitness")]
    GeneralFitness,
}

impl Goal {
    /// All goals, in the order the onboarding form offers them
    pub const ALL: [Goal; 4] = [
        Goal::WeightLoss,
        Goal::MuscleGain,
        Goal::Endurance,
        Goal::GeneralFitness,
    ];

    /// Wire value sent to the coach service
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight loss",
            Goal::MuscleGain => "muscle gain",
            Goal::Endurance => "endurance",
            Goal::GeneralFitness => "general fitness",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Goal {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', " ").as_str() {
            "weight loss" => Ok(Goal::WeightLoss),
            "muscle gain" => Ok(Goal::MuscleGain),
            "endurance" => Ok(Goal::Endurance),
            "general fitness" => Ok(Goal::GeneralFitness),
            other => Err(ProfileError::InvalidGoal(other.to_string())),
        }
    }
}

/// Training experience levels offered at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Newbie,
    Intermediate,
    Advanced,
}

impl Experience {
    /// All levels, in the order the onboarding form offers them
    pub const ALL: [Experience; 3] = [
        Experience::Newbie,
        Experience::Intermediate,
        Experience::Advanced,
    ];

    /// Wire value sent to the coach service
    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Newbie => "newbie",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Experience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Experience {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newbie" => Ok(Experience::Newbie),
            "intermediate" => Ok(Experience::Intermediate),
            "advanced" => Ok(Experience::Advanced),
            other => Err(ProfileError::InvalidExperience(other.to_string())),
        }
    }
}

/// Full onboarding submission payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub age: u32,
    /// Height in feet, free text (e.g. "5.9")
    pub height: String,
    /// Weight in lbs
    pub weight: u32,
    pub goal: Goal,
    /// Free text, may be empty (e.g. "none")
    pub health_issues: String,
    pub experience: Experience,
}

impl UserProfile {
    /// Check the constraints the onboarding form enforces before submitting.
    ///
    /// Health issues is the only optional field; age and weight are typed so
    /// numeric validation happens at the form edge, not here.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.user_id.trim().is_empty() {
            return Err(ProfileError::MissingField("user_id"));
        }
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("name"));
        }
        if self.age == 0 {
            return Err(ProfileError::MissingField("age"));
        }
        if self.height.trim().is_empty() {
            return Err(ProfileError::MissingField("height"));
        }
        if self.weight == 0 {
            return Err(ProfileError::MissingField("weight"));
        }
        Ok(())
    }
}

/// Profile validation and parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid fitness goal: {0}")]
    InvalidGoal(String),

    #[error("invalid experience level: {0}")]
    InvalidExperience(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            user_id: "u-42".to_string(),
            name: "Sam".to_string(),
            age: 29,
            height: "5.9".to_string(),
            weight: 160,
            goal: Goal::MuscleGain,
            health_issues: "none".to_string(),
            experience: Experience::Intermediate,
        }
    }

    #[test]
    fn test_goal_wire_format() {
        let json = serde_json::to_string(&Goal::GeneralFitness).unwrap();
        assert_eq!(json, "\"general fitness\"");

        let parsed: Goal = serde_json::from_str("\"weight loss\"").unwrap();
        assert_eq!(parsed, Goal::WeightLoss);
    }

    #[test]
    fn test_experience_wire_format() {
        let json = serde_json::to_string(&Experience::Newbie).unwrap();
        assert_eq!(json, "\"newbie\"");
    }

    #[test]
    fn test_goal_from_str_accepts_hyphens() {
        assert_eq!("muscle-gain".parse::<Goal>().unwrap(), Goal::MuscleGain);
        assert!("cardio".parse::<Goal>().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_profile() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        let mut profile = sample_profile();
        profile.user_id = "   ".to_string();
        assert_eq!(
            profile.validate(),
            Err(ProfileError::MissingField("user_id"))
        );
    }

    #[test]
    fn test_validate_allows_empty_health_issues() {
        let mut profile = sample_profile();
        profile.health_issues = String::new();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_profile_serializes_all_fields() {
        let value = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(value["user_id"], "u-42");
        assert_eq!(value["goal"], "muscle gain");
        assert_eq!(value["experience"], "intermediate");
        assert_eq!(value["age"], 29);
    }
}
