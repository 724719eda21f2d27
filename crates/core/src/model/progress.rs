use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::course::Course;
use crate::model::ids::{CourseId, ModuleId, UserId};

//
// ─── PROGRESS RECORD ──────────────────────────────────────────────────────────
//

/// One completed module for one user.
///
/// A module is either absent (incomplete) or present (complete). Repeated
/// completions of the same triple never count twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub module_id: ModuleId,
    pub completed_at: DateTime<Utc>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        user_id: UserId,
        course_id: CourseId,
        module_id: ModuleId,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            course_id,
            module_id,
            completed_at,
        }
    }

    /// True when both records refer to the same (user, course, module) triple.
    #[must_use]
    pub fn same_completion(&self, other: &ProgressRecord) -> bool {
        self.user_id == other.user_id
            && self.course_id == other.course_id
            && self.module_id == other.module_id
    }
}

//
// ─── PERCENTAGE ───────────────────────────────────────────────────────────────
//

/// `round(100 * completed / total)`, rounding halves up.
///
/// Returns `None` when `total` is zero. `completed` is clamped to `total`.
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let completed = completed.min(total);
    let rounded = (200 * completed + total) / (2 * total);
    Some(u8::try_from(rounded).unwrap_or(100))
}

/// Distinct modules of `course` that appear in `records`.
///
/// Records for other courses, or for module ids the course does not contain,
/// are ignored.
#[must_use]
pub fn completed_modules(course: &Course, records: &[ProgressRecord]) -> BTreeSet<ModuleId> {
    records
        .iter()
        .filter(|record| &record.course_id == course.id())
        .filter(|record| course.contains_module(&record.module_id))
        .map(|record| record.module_id.clone())
        .collect()
}

//
// ─── COURSE STATUS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    NotStarted,
    Active,
    Completed,
}

impl CourseStatus {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            0 => CourseStatus::NotStarted,
            100.. => CourseStatus::Completed,
            _ => CourseStatus::Active,
        }
    }
}

//
// ─── PROGRESS MAP ─────────────────────────────────────────────────────────────
//

/// Per-course completion percentages for one user.
///
/// Holds an entry for every course with at least one module. Courses with
/// no modules are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap(BTreeMap<CourseId, u8>);

impl ProgressMap {
    /// Derive percentages from the static course list and a user's records.
    #[must_use]
    pub fn compute(courses: &[Course], records: &[ProgressRecord]) -> Self {
        let mut by_course: HashMap<&CourseId, HashSet<&ModuleId>> = HashMap::new();
        for record in records {
            by_course
                .entry(&record.course_id)
                .or_default()
                .insert(&record.module_id);
        }

        let mut map = BTreeMap::new();
        for course in courses {
            let completed = by_course.get(course.id()).map_or(0, |modules| {
                modules
                    .iter()
                    .filter(|module_id| course.contains_module(module_id))
                    .count()
            });
            if let Some(percentage) = completion_percentage(completed, course.module_count()) {
                map.insert(course.id().clone(), percentage);
            }
        }
        Self(map)
    }

    /// Percentage for a course, `None` when the course has no entry.
    #[must_use]
    pub fn get(&self, course_id: &CourseId) -> Option<u8> {
        self.0.get(course_id).copied()
    }

    /// Percentage for a course, treating a missing entry as 0.
    #[must_use]
    pub fn percentage(&self, course_id: &CourseId) -> u8 {
        self.get(course_id).unwrap_or(0)
    }

    #[must_use]
    pub fn status(&self, course_id: &CourseId) -> CourseStatus {
        CourseStatus::from_percentage(self.percentage(course_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CourseId, u8)> {
        self.0.iter().map(|(id, pct)| (id, *pct))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CourseId, u8)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (CourseId, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, pct)| (id, pct.min(100))).collect())
    }
}

//
// ─── CATALOG FILTER ───────────────────────────────────────────────────────────
//

/// Filter tabs of the course list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseFilter {
    #[default]
    All,
    /// Started but not finished (strictly between 0 and 100).
    Active,
    /// Exactly 100.
    Completed,
}

impl CourseFilter {
    pub const ALL: [CourseFilter; 3] = [
        CourseFilter::All,
        CourseFilter::Active,
        CourseFilter::Completed,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CourseFilter::All => "all",
            CourseFilter::Active => "active",
            CourseFilter::Completed => "completed",
        }
    }

    #[must_use]
    pub fn matches(self, percentage: u8) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Active => {
                CourseStatus::from_percentage(percentage) == CourseStatus::Active
            }
            CourseFilter::Completed => {
                CourseStatus::from_percentage(percentage) == CourseStatus::Completed
            }
        }
    }

    /// Courses passing both this filter and a case-insensitive title search.
    #[must_use]
    pub fn apply<'a>(
        self,
        courses: &'a [Course],
        progress: &ProgressMap,
        search: &str,
    ) -> Vec<&'a Course> {
        let query = search.trim().to_lowercase();
        courses
            .iter()
            .filter(|course| query.is_empty() || course.title().to_lowercase().contains(&query))
            .filter(|course| self.matches(progress.percentage(course.id())))
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
