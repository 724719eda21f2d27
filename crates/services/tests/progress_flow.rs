use std::sync::Arc;

use aim_core::model::{CourseFilter, CourseId, CourseStatus, ModuleId};
use aim_core::time::fixed_now;
use services::{AppConfig, AppServices, BackendMode, Catalog, Clock, ProgressService};
use storage::repository::Storage;

#[tokio::test]
async fn local_store_progress_survives_service_restart() {
    let url = "sqlite:file:memdb_progress_flow?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("connect sqlite");
    let catalog = Arc::new(Catalog::builtin());
    let clock = Clock::fixed(fixed_now());
    let user = aim_core::model::UserId::new("mock-user-123");
    let c1 = CourseId::new("c1");

    let first = ProgressService::new(clock, Arc::clone(&catalog), Arc::clone(&storage.progress));
    assert!(first.mark_complete(&user, &c1, &ModuleId::new("m1-1")).await);
    assert!(first.mark_complete(&user, &c1, &ModuleId::new("m1-2")).await);
    assert!(first.mark_complete(&user, &c1, &ModuleId::new("m1-2")).await);

    let reopened = Storage::sqlite(url).await.expect("reconnect sqlite");
    let second = ProgressService::new(clock, Arc::clone(&catalog), Arc::clone(&reopened.progress));
    let map = second.user_progress(&user).await;
    assert_eq!(map.percentage(&c1), 67);
    assert_eq!(map.status(&c1), CourseStatus::Active);

    let active = CourseFilter::Active.apply(catalog.courses(), &map, "");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id(), &c1);

    assert!(second.mark_complete(&user, &c1, &ModuleId::new("m1-3")).await);
    let map = second.user_progress(&user).await;
    assert_eq!(map.percentage(&c1), 100);
    assert!(CourseFilter::Active.apply(catalog.courses(), &map, "").is_empty());
    assert_eq!(CourseFilter::Completed.apply(catalog.courses(), &map, "").len(), 1);
}

#[tokio::test]
async fn local_mode_composes_simulated_identity() {
    let config = AppConfig {
        database_url: "sqlite:file:memdb_app_services?mode=memory&cache=shared".into(),
        simulated_delay: std::time::Duration::ZERO,
        ..AppConfig::default()
    };
    let services = AppServices::from_config(&config, Clock::fixed(fixed_now()))
        .await
        .expect("services");

    assert_eq!(services.mode(), BackendMode::Local);
    assert!(!services.tutor().enabled());

    let auth = services.auth();
    assert!(auth.is_loading());
    auth.bootstrap().await;
    let user = auth.user().expect("demo user");
    assert_eq!(user.display_name(), "Alex Johnson");

    let progress = services.progress();
    assert!(
        progress
            .mark_complete(&user.id, &CourseId::new("c3"), &ModuleId::new("m3-1"))
            .await
    );
    let summary = progress.dashboard_summary(&user.id).await;
    assert_eq!(summary.completed_courses, 1);
}
