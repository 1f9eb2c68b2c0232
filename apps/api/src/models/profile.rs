use serde::{Deserialize, Serialize};

/// Lowest and highest weekly frequencies a program can be built for.
pub const MIN_FREQUENCY: i32 = 1;
pub const MAX_FREQUENCY: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "BEGINNER",
            ExperienceLevel::Intermediate => "INTERMEDIATE",
            ExperienceLevel::Advanced => "ADVANCED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingEnvironment {
    Home,
    Gym,
}

/// The user's fitness profile. Owned by the caller and read-only for the
/// duration of a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessProfile {
    pub experience_level: ExperienceLevel,
    /// Sessions per week. Values outside 1–7 are clamped, never rejected.
    pub training_frequency: i32,
    #[serde(default)]
    pub goals: Vec<String>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub training_environment: Option<TrainingEnvironment>,
    #[serde(default)]
    pub body_weight_only: bool,
    /// Muscle group IDs the user wants extra volume for.
    #[serde(default)]
    pub muscle_priorities: Vec<i32>,
}

impl FitnessProfile {
    pub fn clamped_frequency(&self) -> i32 {
        self.training_frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY)
    }

    /// Kilograms between current and target weight, when both are known.
    pub fn weight_delta(&self) -> Option<f64> {
        match (self.weight, self.target_weight) {
            (Some(current), Some(target)) => Some(target - current),
            _ => None,
        }
    }
}
