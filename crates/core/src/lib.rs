#![forbid(unsafe_code)]

pub mod graph;
pub mod model;
pub mod validate;
pub mod view;
pub mod wbs;

pub use graph::DependencyGraph;
pub use validate::ValidationError;
pub use view::{Bar, OptimisticTimeline, PendingEdit, ScheduleView, TimelineEdit, TimelineRow};
pub use wbs::WbsTree;

pub mod ids {
    use serde::{Deserialize, Serialize};

    /// Identifier of the project (work) that owns schedules.
    ///
    /// Projects live outside this engine; the id is only checked for shape here and for
    /// existence at the storage boundary.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct ProjectId(String);

    impl ProjectId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, ProjectIdError> {
            let value = value.into();
            validate_project_id(&value)?;
            Ok(Self(value))
        }
    }

    impl std::fmt::Display for ProjectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl TryFrom<String> for ProjectId {
        type Error = ProjectIdError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            Self::try_new(value)
        }
    }

    impl From<ProjectId> for String {
        fn from(value: ProjectId) -> Self {
            value.0
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
    pub enum ProjectIdError {
        #[error("project id must not be empty")]
        Empty,
        #[error("project id is too long")]
        TooLong,
        #[error("project id must start with an ASCII letter or digit")]
        InvalidFirstChar,
        #[error("project id has invalid character {ch:?} at {index}")]
        InvalidChar { ch: char, index: usize },
    }

    fn validate_project_id(value: &str) -> Result<(), ProjectIdError> {
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }
        if value.len() > 128 {
            return Err(ProjectIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(ProjectIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(ProjectIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '/' | '-') {
                continue;
            }
            return Err(ProjectIdError::InvalidChar { ch, index });
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn project_id_validation() {
            assert_eq!(ProjectId::try_new("").unwrap_err(), ProjectIdError::Empty);
            assert_eq!(
                ProjectId::try_new("-p1").unwrap_err(),
                ProjectIdError::InvalidFirstChar
            );
            assert_eq!(
                ProjectId::try_new("p 1").unwrap_err(),
                ProjectIdError::InvalidChar { ch: ' ', index: 1 }
            );
            assert_eq!(
                ProjectId::try_new("x".repeat(129)).unwrap_err(),
                ProjectIdError::TooLong
            );
            assert_eq!(ProjectId::try_new("obra/2024-07").unwrap().as_str(), "obra/2024-07");
        }
    }
}
