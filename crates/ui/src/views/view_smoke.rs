use std::sync::Arc;

use aim_core::model::{CourseId, ModuleId};
use dioxus::prelude::*;
use services::AppServices;
use services::auth::simulated_user;

use super::player::begin_marking;
use super::test_harness::{
    SignedOutIdentity, ViewKind, services_with_identity, setup_view_harness, signed_in_services,
    simulated_services,
};

async fn render_view(view: ViewKind) -> String {
    let services = signed_in_services().await;
    let mut harness = setup_view_harness(view, services);
    harness.rebuild();
    harness.drive_async().await;
    harness.render()
}

async fn complete(services: &AppServices, course: &str, module: &str) {
    let stored = services
        .progress()
        .mark_complete(
            &simulated_user().id,
            &CourseId::new(course),
            &ModuleId::new(module),
        )
        .await;
    assert!(stored);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_greets_learner_with_no_active_courses() {
    let html = render_view(ViewKind::Dashboard).await;

    assert!(html.contains("Welcome back, Alex!"), "{html}");
    assert!(html.contains("No active courses. Start one below!"), "{html}");
    assert!(html.contains("Explore New Courses"), "{html}");
    assert!(html.contains("Fullstack Next.js 14"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_lists_started_course_with_percentage() {
    let services = signed_in_services().await;
    complete(&services, "c1", "m1-1").await;

    let mut harness = setup_view_harness(ViewKind::Dashboard, services);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Resume"), "{html}");
    assert!(html.contains("33%"), "{html}");
    assert!(!html.contains("No active courses"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn courses_lists_whole_catalog() {
    let services = signed_in_services().await;
    complete(&services, "c2", "m2-1").await;

    let mut harness = setup_view_harness(ViewKind::Courses, services);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("My Courses"), "{html}");
    for title in [
        "Modern React Patterns",
        "UI/UX Principles for Devs",
        "Fullstack Next.js 14",
    ] {
        assert!(html.contains(title), "missing {title}: {html}");
    }
    assert_eq!(html.matches(">Continue<").count(), 1, "{html}");
    assert!(html.contains(">completed<"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_details_shows_curriculum_and_facts() {
    let html = render_view(ViewKind::CourseDetails("c2".into())).await;

    assert!(html.contains("UI/UX Principles for Devs"), "{html}");
    assert!(html.contains("Color Theory 101"), "{html}");
    assert!(html.contains("Typography Basics"), "{html}");
    assert!(html.contains("850 Students"), "{html}");
    assert!(html.contains("2 Modules"), "{html}");
    assert!(html.contains("Start Learning Now"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_course_renders_not_found() {
    let html = render_view(ViewKind::CourseDetails("nope".into())).await;
    assert!(html.contains("Course not found"), "{html}");

    let html = render_view(ViewKind::Player("nope".into())).await;
    assert!(html.contains("Course not found"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_opens_first_module_as_rendered_markdown() {
    let html = render_view(ViewKind::Player("c1".into())).await;

    assert!(html.contains("<h1>Introduction to Hooks</h1>"), "{html}");
    assert!(html.contains("Mark as Complete"), "{html}");
    assert!(html.contains("0% Completed"), "{html}");
    assert!(html.contains("Ask Aim AI"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn player_reflects_stored_completion() {
    let services = signed_in_services().await;
    complete(&services, "c1", "m1-1").await;

    let mut harness = setup_view_harness(ViewKind::Player("c1".into()), services);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("33% Completed"), "{html}");
    assert!(html.contains("module-row active completed"), "{html}");
}

#[component]
fn RepeatedCompleteClicks() -> Element {
    let mut marking = use_signal(|| false);
    let (first, second) = use_hook(|| (begin_marking(&mut marking), begin_marking(&mut marking)));
    let saving = *marking.peek();
    rsx! { p { "{first} {second} {saving}" } }
}

#[test]
fn second_complete_click_is_ignored_while_saving() {
    let mut dom = VirtualDom::new(RepeatedCompleteClicks);
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("true false true"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn gate_shows_spinner_until_identity_resolves() {
    let mut harness = setup_view_harness(ViewKind::Gate, simulated_services());
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("spinner"), "{html}");
    assert!(!html.contains("protected content"), "{html}");

    harness.services.auth().bootstrap().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("protected content"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn gate_asks_signed_out_learner_to_sign_in() {
    let services = services_with_identity(Arc::new(SignedOutIdentity::default()));
    services.auth().bootstrap().await;

    let mut harness = setup_view_harness(ViewKind::Gate, services);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Sign in with Magic Link"), "{html}");
    assert!(!html.contains("Demo Mode"), "{html}");
    assert!(!html.contains("protected content"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_shows_demo_profile() {
    let html = render_view(ViewKind::Settings).await;

    assert!(html.contains("Account Settings"), "{html}");
    assert!(html.contains("Alex Johnson"), "{html}");
    assert!(html.contains("alex.design@example.com"), "{html}");
    assert!(html.contains("Demo User"), "{html}");
    assert!(html.contains("Weekly progress summary"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_path_renders_not_found_page() {
    let html = render_view(ViewKind::NotFound(vec!["missing".into()])).await;

    assert!(html.contains("Page not found"), "{html}");
    assert!(html.contains("/missing"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn open_tutor_greets_with_context() {
    let html = render_view(ViewKind::Tutor("Color Theory 101".into())).await;

    assert!(html.contains("Aim AI Tutor"), "{html}");
    assert!(html.contains("Color Theory 101"), "{html}");
    assert!(html.contains("How can I help?"), "{html}");
    assert!(html.contains("Ask about this topic..."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn app_router_starts_on_dashboard_inside_main_layout() {
    let html = render_view(ViewKind::App).await;

    assert!(html.contains("Student Portal"), "{html}");
    assert!(html.contains("Using Mock Data"), "{html}");
    assert!(html.contains("Sign Out"), "{html}");
    assert!(html.contains("Welcome back, Alex!"), "{html}");
}
