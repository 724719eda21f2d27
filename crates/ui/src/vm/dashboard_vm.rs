use aim_core::Catalog;
use aim_core::model::ProgressMap;
use services::DashboardSummary;

use crate::vm::course_vm::CourseCardVm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveCourseVm {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub percentage: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartBarVm {
    pub label: String,
    pub percentage: u8,
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub completed_courses: usize,
    pub active: Vec<ActiveCourseVm>,
    pub explore: Vec<CourseCardVm>,
    pub chart: Vec<ChartBarVm>,
}

#[must_use]
pub fn map_dashboard(
    catalog: &Catalog,
    progress: &ProgressMap,
    summary: &DashboardSummary,
) -> DashboardVm {
    let active = summary
        .active
        .iter()
        .filter_map(|entry| {
            let course = catalog.course(&entry.course_id)?;
            Some(ActiveCourseVm {
                id: entry.course_id.to_string(),
                title: entry.title.clone(),
                thumbnail: course.thumbnail().to_owned(),
                percentage: entry.percentage,
            })
        })
        .collect();

    let explore = summary
        .explore
        .iter()
        .filter_map(|id| catalog.course(id))
        .map(|course| CourseCardVm::new(course, progress))
        .collect();

    let chart = summary
        .chart
        .iter()
        .map(|bar| ChartBarVm {
            label: bar.label.clone(),
            percentage: bar.percentage,
            highlighted: bar.highlighted,
        })
        .collect();

    DashboardVm {
        completed_courses: summary.completed_courses,
        active,
        explore,
        chart,
    }
}
