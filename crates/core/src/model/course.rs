use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, ModuleId};
use crate::model::module::Module;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("module {0} appears more than once in the course")]
    DuplicateModule(ModuleId),

    #[error("course {0} appears more than once in the catalog")]
    DuplicateCourse(CourseId),

    #[error("unknown course level: {0}")]
    UnknownLevel(String),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty level advertised for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseLevel {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(CourseError::UnknownLevel(s.to_owned())),
        }
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A catalog course: metadata plus its ordered module sequence.
///
/// Module order is significant. It defines next/previous navigation in the
/// player and which module opens first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    thumbnail: String,
    instructor: String,
    level: CourseLevel,
    modules: Vec<Module>,
    total_students: u32,
}

impl Course {
    /// Creates a new Course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` for a blank title and
    /// `CourseError::DuplicateModule` if two modules share an id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        thumbnail: impl Into<String>,
        instructor: impl Into<String>,
        level: CourseLevel,
        modules: Vec<Module>,
        total_students: u32,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        let mut seen = HashSet::with_capacity(modules.len());
        for module in &modules {
            if !seen.insert(module.id()) {
                return Err(CourseError::DuplicateModule(module.id().clone()));
            }
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: description.into(),
            thumbnail: thumbnail.into(),
            instructor: instructor.into(),
            level,
            modules,
            total_students,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    #[must_use]
    pub fn level(&self) -> CourseLevel {
        self.level
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn total_students(&self) -> u32 {
        self.total_students
    }

    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// The module the player opens by default.
    #[must_use]
    pub fn first_module(&self) -> Option<&Module> {
        self.modules.first()
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id() == id)
    }

    #[must_use]
    pub fn module_index(&self, id: &ModuleId) -> Option<usize> {
        self.modules.iter().position(|module| module.id() == id)
    }

    #[must_use]
    pub fn contains_module(&self, id: &ModuleId) -> bool {
        self.module_index(id).is_some()
    }

    #[must_use]
    pub fn next_module(&self, id: &ModuleId) -> Option<&Module> {
        let index = self.module_index(id)?;
        self.modules.get(index + 1)
    }

    #[must_use]
    pub fn previous_module(&self, id: &ModuleId) -> Option<&Module> {
        let index = self.module_index(id)?;
        index.checked_sub(1).and_then(|prev| self.modules.get(prev))
    }

    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.modules.iter().map(Module::duration_minutes).sum()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::ModuleKind;

    fn text_module(id: &str, minutes: u32) -> Module {
        Module::new(ModuleId::new(id), format!("Module {id}"), ModuleKind::Text, "# Body", minutes)
            .unwrap()
    }

    fn build_course(modules: Vec<Module>) -> Result<Course, CourseError> {
        Course::new(
            CourseId::new("c9"),
            "Test Course",
            "desc",
            "https://example.com/thumb.png",
            "Someone",
            CourseLevel::Beginner,
            modules,
            10,
        )
    }

    #[test]
    fn navigation_follows_module_order() {
        let course =
            build_course(vec![text_module("a", 1), text_module("b", 2), text_module("c", 3)])
                .unwrap();
        let b = ModuleId::new("b");

        assert_eq!(course.first_module().unwrap().id().as_str(), "a");
        assert_eq!(course.next_module(&b).unwrap().id().as_str(), "c");
        assert_eq!(course.previous_module(&b).unwrap().id().as_str(), "a");
        assert!(course.previous_module(&ModuleId::new("a")).is_none());
        assert!(course.next_module(&ModuleId::new("c")).is_none());
        assert!(course.next_module(&ModuleId::new("zz")).is_none());
        assert_eq!(course.total_duration_minutes(), 6);
    }

    #[test]
    fn duplicate_module_ids_are_rejected() {
        let err = build_course(vec![text_module("a", 1), text_module("a", 2)]).unwrap_err();
        assert_eq!(err, CourseError::DuplicateModule(ModuleId::new("a")));
    }

    #[test]
    fn empty_module_list_is_allowed() {
        let course = build_course(Vec::new()).unwrap();
        assert!(course.first_module().is_none());
        assert_eq!(course.module_count(), 0);
    }

    #[test]
    fn level_round_trips_through_display() {
        for level in [
            CourseLevel::Beginner,
            CourseLevel::Intermediate,
            CourseLevel::Advanced,
        ] {
            assert_eq!(level.to_string().parse::<CourseLevel>().unwrap(), level);
        }
    }
}
