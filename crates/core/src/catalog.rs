//! Static, read-only course catalog.

use std::collections::HashSet;

use crate::error::Error;
use crate::model::{
    Course, CourseError, CourseId, CourseLevel, Module, ModuleId, ModuleKind,
};

/// In-memory list of courses, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Build a catalog from an ordered course list.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::DuplicateCourse` if two courses share an id.
    pub fn new(courses: Vec<Course>) -> Result<Self, CourseError> {
        let mut seen = HashSet::with_capacity(courses.len());
        for course in &courses {
            if !seen.insert(course.id()) {
                return Err(CourseError::DuplicateCourse(course.id().clone()));
            }
        }
        Ok(Self { courses })
    }

    /// The catalog shipped with the app.
    ///
    /// # Panics
    ///
    /// Panics if the built-in course data fails validation.
    #[must_use]
    pub fn builtin() -> Self {
        builtin_courses()
            .and_then(|courses| Self::new(courses).map_err(Error::from))
            .expect("built-in catalog should be valid")
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id() == id)
    }

    #[must_use]
    pub fn find_module(&self, course_id: &CourseId, module_id: &ModuleId) -> Option<&Module> {
        self.course(course_id)?.module(module_id)
    }

    /// Courses whose title contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Course> {
        let query = query.trim().to_lowercase();
        self.courses
            .iter()
            .filter(|course| course.title().to_lowercase().contains(&query))
            .collect()
    }
}

fn module(
    id: &str,
    title: &str,
    kind: ModuleKind,
    minutes: u32,
    content: &str,
) -> Result<Module, Error> {
    Ok(Module::new(ModuleId::new(id), title, kind, content, minutes)?)
}

fn builtin_courses() -> Result<Vec<Course>, Error> {
    let react = Course::new(
        CourseId::new("c1"),
        "Modern React Patterns",
        "Master advanced React hooks, performance optimization, and scalable architecture.",
        "https://picsum.photos/400/225?random=1",
        "Sarah Drasner",
        CourseLevel::Advanced,
        vec![
            module(
                "m1-1",
                "Introduction to Hooks",
                ModuleKind::Text,
                10,
                "# Introduction to Hooks\n\nHooks are a new addition in React 16.8. They let you use state and other React features without writing a class.\n\n### Rules of Hooks\n1. Only call Hooks at the top level.\n2. Only call Hooks from React function components.",
            )?,
            module(
                "m1-2",
                "The useEffect Dependency Array",
                ModuleKind::Video,
                15,
                "https://picsum.photos/800/450?random=10",
            )?,
            module(
                "m1-3",
                "Custom Hooks Quiz",
                ModuleKind::Quiz,
                5,
                "What is the primary rule for naming custom hooks?",
            )?,
        ],
        1240,
    )?;

    let design = Course::new(
        CourseId::new("c2"),
        "UI/UX Principles for Devs",
        "Learn the fundamentals of color theory, typography, and layout design.",
        "https://picsum.photos/400/225?random=2",
        "Gary Simon",
        CourseLevel::Beginner,
        vec![
            module(
                "m2-1",
                "Color Theory 101",
                ModuleKind::Text,
                12,
                "# Color Theory\n\nUnderstanding the color wheel is essential for creating visually appealing interfaces.",
            )?,
            module(
                "m2-2",
                "Typography Basics",
                ModuleKind::Text,
                20,
                "# Typography\n\nLearn about serif vs sans-serif, line-height, and hierarchy.",
            )?,
        ],
        850,
    )?;

    let nextjs = Course::new(
        CourseId::new("c3"),
        "Fullstack Next.js 14",
        "Build production-ready applications with the App Router and Server Actions.",
        "https://picsum.photos/400/225?random=3",
        "Lee Robinson",
        CourseLevel::Intermediate,
        vec![module(
            "m3-1",
            "App Router Fundamentals",
            ModuleKind::Video,
            25,
            "https://picsum.photos/800/450?random=11",
        )?],
        3200,
    )?;

    Ok(vec![react, design, nextjs])
}
