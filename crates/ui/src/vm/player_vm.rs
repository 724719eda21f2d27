use std::collections::BTreeSet;

use aim_core::model::{Course, Module, ModuleId, ModuleKind};

use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::format_minutes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRowVm {
    pub id: String,
    pub number: usize,
    pub title: String,
    pub kind: ModuleKind,
    pub duration: String,
    pub completed: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleContentVm {
    /// Placeholder frame for the lesson video.
    Video { url: String },
    /// Sanitized HTML rendered from markdown.
    Text { html: String },
    Quiz { question: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveModuleVm {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub content: ModuleContentVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerVm {
    pub course_id: String,
    pub course_title: String,
    pub percentage: u8,
    pub modules: Vec<ModuleRowVm>,
    pub active: Option<ActiveModuleVm>,
    pub previous: Option<String>,
    pub next: Option<String>,
    /// Context string handed to the tutor.
    pub tutor_context: String,
}

/// Lay out the player for `course`.
///
/// `selected` falls back to the first module when absent or unknown.
#[must_use]
pub fn build_player_vm(
    course: &Course,
    completed: &BTreeSet<ModuleId>,
    percentage: u8,
    selected: Option<&ModuleId>,
) -> PlayerVm {
    let active = selected
        .and_then(|id| course.module(id))
        .or_else(|| course.first_module());
    let active_id = active.map(Module::id);

    let modules = course
        .modules()
        .iter()
        .enumerate()
        .map(|(idx, module)| ModuleRowVm {
            id: module.id().to_string(),
            number: idx + 1,
            title: module.title().to_owned(),
            kind: module.kind(),
            duration: format_minutes(module.duration_minutes()),
            completed: completed.contains(module.id()),
            active: Some(module.id()) == active_id,
        })
        .collect();

    let (previous, next) = match active_id {
        Some(id) => (
            course.previous_module(id).map(|m| m.id().to_string()),
            course.next_module(id).map(|m| m.id().to_string()),
        ),
        None => (None, None),
    };

    PlayerVm {
        course_id: course.id().to_string(),
        course_title: course.title().to_owned(),
        percentage,
        modules,
        tutor_context: active.map_or(course.title(), Module::title).to_owned(),
        active: active.map(|module| ActiveModuleVm {
            id: module.id().to_string(),
            title: module.title().to_owned(),
            completed: completed.contains(module.id()),
            content: content_vm(module),
        }),
        previous,
        next,
    }
}

fn content_vm(module: &Module) -> ModuleContentVm {
    match module.kind() {
        ModuleKind::Video => ModuleContentVm::Video {
            url: module.content().to_owned(),
        },
        ModuleKind::Text => ModuleContentVm::Text {
            html: markdown_to_html(module.content()),
        },
        ModuleKind::Quiz => ModuleContentVm::Quiz {
            question: module.content().to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::Catalog;
    use aim_core::model::CourseId;

    fn c1() -> Course {
        Catalog::builtin()
            .course(&CourseId::new("c1"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn first_module_is_active_by_default() {
        let vm = build_player_vm(&c1(), &BTreeSet::new(), 0, None);
        let active = vm.active.unwrap();
        assert_eq!(active.id, "m1-1");
        assert!(matches!(
            active.content,
            ModuleContentVm::Text { ref html } if html.contains("<h1>")
        ));
        assert_eq!(vm.previous, None);
        assert_eq!(vm.next.as_deref(), Some("m1-2"));
        assert_eq!(vm.tutor_context, "Introduction to Hooks");
        assert!(vm.modules[0].active);
    }

    #[test]
    fn selection_drives_navigation_and_marks() {
        let completed: BTreeSet<ModuleId> = [ModuleId::new("m1-1")].into_iter().collect();
        let selected = ModuleId::new("m1-3");
        let vm = build_player_vm(&c1(), &completed, 33, Some(&selected));

        assert_eq!(vm.previous.as_deref(), Some("m1-2"));
        assert_eq!(vm.next, None);
        assert!(vm.modules[0].completed);
        assert!(!vm.modules[2].completed);
        assert!(vm.modules[2].active);
        assert_eq!(
            vm.active.unwrap().content,
            ModuleContentVm::Quiz {
                question: "What is the primary rule for naming custom hooks?".into()
            }
        );
    }

    #[test]
    fn unknown_selection_falls_back_to_first_module() {
        let selected = ModuleId::new("m9-9");
        let vm = build_player_vm(&c1(), &BTreeSet::new(), 0, Some(&selected));
        assert_eq!(vm.active.unwrap().id, "m1-1");
    }

    #[test]
    fn empty_course_uses_course_title_as_context() {
        let course = Course::new(
            CourseId::new("c9"),
            "Empty",
            "No modules yet",
            "https://example.com/t.png",
            "Nobody",
            aim_core::model::CourseLevel::Beginner,
            Vec::new(),
            0,
        )
        .unwrap();
        let vm = build_player_vm(&course, &BTreeSet::new(), 0, None);
        assert!(vm.active.is_none());
        assert!(vm.modules.is_empty());
        assert_eq!(vm.tutor_context, "Empty");
    }
}
