use std::collections::BTreeSet;
use std::sync::Arc;

use aim_core::Catalog;
use aim_core::model::{
    Course, CourseId, CourseStatus, ModuleId, ProgressMap, ProgressRecord, UserId,
    completed_modules,
};
use storage::repository::ProgressRepository;
use tracing::{debug, warn};

use crate::Clock;

/// Records module completions and derives per-course percentages.
///
/// Every operation is best-effort: repository failures are logged and turn
/// into `false` or an all-zero map instead of an error.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Record that `user_id` finished `module_id` of `course_id`.
    ///
    /// Returns `true` once the completion is stored. Repeating the call is
    /// harmless: a completion counts at most once.
    pub async fn mark_complete(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        module_id: &ModuleId,
    ) -> bool {
        if self.catalog.find_module(course_id, module_id).is_none() {
            debug!(%course_id, %module_id, "recording completion for a module outside the catalog");
        }

        let record = ProgressRecord::new(
            user_id.clone(),
            course_id.clone(),
            module_id.clone(),
            self.clock.now(),
        );
        match self.progress.record_completion(&record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    %user_id,
                    %course_id,
                    %module_id,
                    "failed to record completion"
                );
                false
            }
        }
    }

    /// Percentage per catalog course for `user_id`.
    pub async fn user_progress(&self, user_id: &UserId) -> ProgressMap {
        let records = self.records(user_id).await;
        ProgressMap::compute(self.catalog.courses(), &records)
    }

    /// Percentage for a single course, 0 when unknown or empty.
    pub async fn course_progress(&self, user_id: &UserId, course_id: &CourseId) -> u8 {
        self.user_progress(user_id).await.percentage(course_id)
    }

    /// Distinct completed modules of one course, for per-module check marks.
    pub async fn completed_modules(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> BTreeSet<ModuleId> {
        let Some(course) = self.catalog.course(course_id) else {
            return BTreeSet::new();
        };
        let records = self.records(user_id).await;
        completed_modules(course, &records)
    }

    pub async fn dashboard_summary(&self, user_id: &UserId) -> DashboardSummary {
        let progress = self.user_progress(user_id).await;
        DashboardSummary::build(&self.catalog, &progress)
    }

    async fn records(&self, user_id: &UserId) -> Vec<ProgressRecord> {
        match self.progress.list_for_user(user_id).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, %user_id, "failed to load progress, showing none");
                Vec::new()
            }
        }
    }
}

//
// ─── DASHBOARD ────────────────────────────────────────────────────────────────
//

/// Bars above this percentage are drawn highlighted.
pub const CHART_HIGHLIGHT_ABOVE: u8 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub title: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub percentage: u8,
    pub highlighted: bool,
}

/// Figures shown on the dashboard, derived from one progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub completed_courses: usize,
    /// Started but unfinished courses, in catalog order.
    pub active: Vec<CourseProgress>,
    /// Everything not in `active`, in catalog order.
    pub explore: Vec<CourseId>,
    pub chart: Vec<ChartBar>,
}

impl DashboardSummary {
    #[must_use]
    pub fn build(catalog: &Catalog, progress: &ProgressMap) -> Self {
        let mut summary = Self::default();
        for course in catalog.courses() {
            let percentage = progress.percentage(course.id());
            match progress.status(course.id()) {
                CourseStatus::Active => summary.active.push(CourseProgress {
                    course_id: course.id().clone(),
                    title: course.title().to_owned(),
                    percentage,
                }),
                CourseStatus::Completed => {
                    summary.completed_courses += 1;
                    summary.explore.push(course.id().clone());
                }
                CourseStatus::NotStarted => summary.explore.push(course.id().clone()),
            }
            summary.chart.push(ChartBar {
                label: chart_label(course),
                percentage,
                highlighted: percentage > CHART_HIGHLIGHT_ABOVE,
            });
        }
        summary
    }
}

/// First two words of the course title.
fn chart_label(course: &Course) -> String {
    course
        .title()
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}
