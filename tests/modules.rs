mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, create_course_action, create_lesson_action, create_module_action,
    login_admin_action, register_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn route_modules_by_course_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(login_admin_action())
        .step(create_course_action("A1").with_save_as("a1"))
        .step(create_course_action("A2").with_save_as("a2"))
        .step(create_module_action("a1", "Alphabet"))
        .step(create_module_action("a1", "Zahlen"))
        .step(create_module_action("a2", "Perfekt").with_save_as("perfekt"))
        .step(
            Action::new("filter_by_course", "GET", "/api/modules")
                .with_dyn_path(|ctx| format!("/api/modules?courseId={}", ctx.id_of("a1")))
                .assert_body(|body| {
                    let modules = body["data"].as_array().unwrap();
                    assert_eq!(modules.len(), 2);
                    assert!(modules.iter().all(|m| m["courseId"] == modules[0]["courseId"]));
                    // appended in creation order when no order is given
                    assert_eq!(modules[0]["title"], "Alphabet");
                    assert_eq!(modules[1]["title"], "Zahlen");
                }),
        )
        .step(
            Action::new("course_path", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/modules/course/{}", ctx.id_of("a2")))
                .assert_body(|body| {
                    assert_eq!(body["data"].as_array().unwrap().len(), 1);
                    assert_eq!(body["data"][0]["title"], "Perfekt");
                }),
        )
        .step(
            Action::new("course_modules", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/courses/{}/modules", ctx.id_of("a1")))
                .assert_body(|body| assert_eq!(body["data"].as_array().unwrap().len(), 2)),
        )
        .step(
            Action::new("missing_course_modules", "GET", "/api/courses/424242/modules")
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("bad_filter", "GET", "/api/modules")
                .with_param("courseId", "abc")
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("update_module", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/modules/{}", ctx.id_of("perfekt")))
                .with_body(json!({ "isLocked": true }))
                .assert_body(|body| {
                    assert_eq!(body["data"]["isLocked"], true);
                    assert_eq!(body["data"]["title"], "Perfekt");
                }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_module_progress_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(login_admin_action())
        .step(create_course_action("A1").with_save_as("course"))
        .step(create_module_action("course", "Farben").with_save_as("farben"))
        .step(create_module_action("course", "Leer"))
        .step(create_lesson_action("farben", "Rot", 0, 10).with_save_as("rot"))
        .step(create_lesson_action("farben", "Blau", 1, 10))
        .step(create_lesson_action("farben", "Grün", 2, 10))
        .step(register_action("bunt", "passwort").with_clear_cookies(true))
        .step(
            Action::new("complete", "POST", "/api/users/progress")
                .with_dyn_body(|ctx| json!({ "lessonId": ctx.id_of("rot") })),
        )
        .step(
            Action::new("module_progress", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/modules/course/{}/progress", ctx.id_of("course"))
                })
                .assert_body(|body| {
                    let modules = body["data"].as_array().unwrap();
                    assert_eq!(modules.len(), 2);
                    assert_eq!(modules[0]["totalLessons"], 3);
                    assert_eq!(modules[0]["completedLessons"], 1);
                    assert_eq!(modules[0]["progressPercent"], 33);
                    assert_eq!(modules[0]["isCompleted"], false);
                    assert_eq!(modules[1]["totalLessons"], 0);
                    assert_eq!(modules[1]["progressPercent"], 0);
                }),
        )
        .run(&mut server)
        .await;
}
