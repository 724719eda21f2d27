use aim_core::model::{Course, CourseStatus, ProgressMap};

use crate::vm::time_fmt::{format_count, format_minutes};

/// A course tile on the dashboard and course list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseCardVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub level: &'static str,
    pub module_count: usize,
    pub percentage: u8,
    pub status: CourseStatus,
}

impl CourseCardVm {
    #[must_use]
    pub fn new(course: &Course, progress: &ProgressMap) -> Self {
        Self {
            id: course.id().to_string(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            thumbnail: course.thumbnail().to_owned(),
            level: course.level().as_str(),
            module_count: course.module_count(),
            percentage: progress.percentage(course.id()),
            status: progress.status(course.id()),
        }
    }

    /// Started courses link straight into the player.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.status != CourseStatus::NotStarted
    }
}

#[must_use]
pub fn map_course_cards(courses: &[&Course], progress: &ProgressMap) -> Vec<CourseCardVm> {
    courses
        .iter()
        .map(|course| CourseCardVm::new(course, progress))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurriculumRowVm {
    pub number: usize,
    pub title: String,
    pub kind: &'static str,
    pub duration: String,
    /// Only the first module is open before enrolling.
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseDetailVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub instructor: String,
    pub level: &'static str,
    pub students: String,
    pub total_duration: String,
    pub curriculum: Vec<CurriculumRowVm>,
}

impl From<&Course> for CourseDetailVm {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id().to_string(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            thumbnail: course.thumbnail().to_owned(),
            instructor: course.instructor().to_owned(),
            level: course.level().as_str(),
            students: format_count(course.total_students()),
            total_duration: format_minutes(course.total_duration_minutes()),
            curriculum: course
                .modules()
                .iter()
                .enumerate()
                .map(|(idx, module)| CurriculumRowVm {
                    number: idx + 1,
                    title: module.title().to_owned(),
                    kind: module.kind().as_str(),
                    duration: format_minutes(module.duration_minutes()),
                    unlocked: idx == 0,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::Catalog;
    use aim_core::model::{CourseId, ModuleId, ProgressRecord, UserId};
    use aim_core::time::fixed_now;

    #[test]
    fn card_reflects_progress_status() {
        let catalog = Catalog::builtin();
        let user = UserId::new("u1");
        let records = vec![ProgressRecord::new(
            user,
            CourseId::new("c1"),
            ModuleId::new("m1-1"),
            fixed_now(),
        )];
        let progress = ProgressMap::compute(catalog.courses(), &records);
        let courses: Vec<&Course> = catalog.courses().iter().collect();
        let cards = map_course_cards(&courses, &progress);

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].percentage, 33);
        assert!(cards[0].is_started());
        assert_eq!(cards[1].status, CourseStatus::NotStarted);
        assert!(!cards[1].is_started());
        assert_eq!(cards[2].level, "Intermediate");
    }

    #[test]
    fn detail_lists_curriculum_with_first_unlocked() {
        let catalog = Catalog::builtin();
        let course = catalog.course(&CourseId::new("c1")).unwrap();
        let detail = CourseDetailVm::from(course);

        assert_eq!(detail.students, "1,240");
        assert_eq!(detail.total_duration, "30 min");
        assert_eq!(detail.curriculum.len(), 3);
        assert!(detail.curriculum[0].unlocked);
        assert!(!detail.curriculum[2].unlocked);
        assert_eq!(detail.curriculum[1].kind, "video");
        assert_eq!(detail.curriculum[2].number, 3);
    }
}
