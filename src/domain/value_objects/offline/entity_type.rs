use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Logical collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Content,
    Student,
    LessonPlan,
    Assessment,
    Mark,
    Image,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Content,
        EntityType::Student,
        EntityType::LessonPlan,
        EntityType::Assessment,
        EntityType::Mark,
        EntityType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Content => "content",
            EntityType::Student => "student",
            EntityType::LessonPlan => "lesson_plan",
            EntityType::Assessment => "assessment",
            EntityType::Mark => "mark",
            EntityType::Image => "image",
        }
    }

    /// Path segment used by the remote store.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityType::Content => "contents",
            EntityType::Student => "students",
            EntityType::LessonPlan => "lesson-plans",
            EntityType::Assessment => "assessments",
            EntityType::Mark => "marks",
            EntityType::Image => "images",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "content" => Ok(EntityType::Content),
            "student" => Ok(EntityType::Student),
            "lesson_plan" => Ok(EntityType::LessonPlan),
            "assessment" => Ok(EntityType::Assessment),
            "mark" => Ok(EntityType::Mark),
            "image" => Ok(EntityType::Image),
            other => Err(format!("Unknown entity type: {other}")),
        }
    }
}
