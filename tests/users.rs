mod common;
use axum::http::StatusCode;
use germangains::model::entity::UserEntity;
use germangains::web::middlewares::AUTH_TOKEN;
use serde_json::json;
use tower_cookies::cookie::SameSite;

use crate::common::{
    Action, Flow, create_course_action, create_lesson_action, create_module_action,
    login_action, login_admin_action, register_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn route_register_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            register_action("anna", "geheim123")
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    assert_eq!(body["success"], true);
                    assert_eq!(body["data"]["username"], "anna");
                    assert_eq!(body["data"]["level"], 1);
                    assert_eq!(body["data"]["xp"], 0);
                    assert!(body["data"].get("passwordHash").is_none());
                }),
        )
        // try to register twice
        .step(register_action("anna", "geheim123").with_expect(StatusCode::CONFLICT))
        // password too short
        .step(
            register_action("jonas", "123")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert_eq!(body["success"], false)),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_login_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(register_action("lena", "passwort").with_save_cookies(false))
        .step(
            login_action("lena", "passwort")
                .with_clear_cookies(true)
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    let user: UserEntity =
                        serde_json::from_value(body["data"].clone()).expect("Invalid body format");
                    assert_eq!(user.username(), "lena");
                }),
        )
        .step(
            Action::new("me", "GET", "/api/users/me")
                .assert_body(|body| assert_eq!(body["data"]["username"], "lena")),
        )
        // wrong credentials
        .step(
            login_action("lena", "WRONGPASSWORD")
                .with_save_cookies(false)
                .with_clear_cookies(true)
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_body(|body| {
                    assert_eq!(body["statusCode"], 401);
                    assert!(body["message"].as_str().unwrap().contains("Authentication error"));
                }),
        )
        // non-existing account
        .step(login_action("nobody", "whatever").with_expect(StatusCode::UNAUTHORIZED))
        .step(Action::new("me", "GET", "/api/users/me").with_expect(StatusCode::UNAUTHORIZED))
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_logout_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(register_action("max", "passwort"))
        .step(Action::new("me", "GET", "/api/users/me"))
        .step(Action::new("logout", "POST", "/api/users/logout"))
        .step(Action::new("me", "GET", "/api/users/me").with_expect(StatusCode::UNAUTHORIZED))
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_complete_lesson_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(login_admin_action())
        .step(create_course_action("Deutsch A1").with_save_as("course"))
        .step(create_module_action("course", "Begrüßungen").with_save_as("module"))
        .step(create_lesson_action("module", "Hallo", 0, 60).with_save_as("lesson1"))
        .step(create_lesson_action("module", "Tschüss", 1, 60).with_save_as("lesson2"))
        .step(register_action("schueler", "passwort").with_clear_cookies(true))
        .step(
            Action::new("summary", "GET", "/api/users/progress").assert_body(|body| {
                assert_eq!(body["data"]["totalLessons"], 2);
                assert_eq!(body["data"]["completedLessons"], 0);
                assert_eq!(body["data"]["level"], 1);
            }),
        )
        .step(
            Action::new("complete", "POST", "/api/users/progress")
                .with_dyn_body(|ctx| json!({ "lessonId": ctx.id_of("lesson1"), "score": 80 }))
                .assert_body(|body| {
                    assert_eq!(body["data"]["xpAwarded"], 60);
                    assert_eq!(body["data"]["xp"], 60);
                    assert_eq!(body["data"]["level"], 1);
                    assert_eq!(body["data"]["progress"]["completed"], true);
                }),
        )
        // completing again keeps the best score and awards nothing
        .step(
            Action::new("complete_again", "POST", "/api/users/progress")
                .with_dyn_body(|ctx| json!({ "lessonId": ctx.id_of("lesson1"), "score": 95 }))
                .assert_body(|body| {
                    assert_eq!(body["data"]["xpAwarded"], 0);
                    assert_eq!(body["data"]["xp"], 60);
                    assert_eq!(body["data"]["progress"]["score"], 95);
                }),
        )
        .step(
            Action::new("complete_second", "POST", "/api/users/progress")
                .with_dyn_body(|ctx| json!({ "lessonId": ctx.id_of("lesson2") }))
                .assert_body(|body| {
                    assert_eq!(body["data"]["xp"], 120);
                    assert_eq!(body["data"]["level"], 2);
                }),
        )
        .step(
            Action::new("complete_missing", "POST", "/api/users/progress")
                .with_body(json!({ "lessonId": 999_999 }))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("summary", "GET", "/api/users/progress").assert_body(|body| {
                assert_eq!(body["data"]["completedLessons"], 2);
                assert_eq!(body["data"]["xp"], 120);
            }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_leaderboard_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(login_admin_action())
        .step(create_course_action("Deutsch A1").with_save_as("course"))
        .step(create_module_action("course", "Zahlen").with_save_as("module"))
        .step(create_lesson_action("module", "Eins bis zehn", 0, 50).with_save_as("lesson"))
        .step(register_action("erika", "passwort").with_clear_cookies(true))
        .step(
            Action::new("complete", "POST", "/api/users/progress")
                .with_dyn_body(|ctx| json!({ "lessonId": ctx.id_of("lesson") })),
        )
        .step(
            Action::new("leaderboard", "GET", "/api/users/leaderboard")
                .with_param("viewportWidth", "1280")
                .assert_body(|body| {
                    let ranking = &body["data"];
                    assert_eq!(ranking["maxVisible"], 10);
                    let first = &ranking["entries"][0];
                    assert_eq!(first["rank"], 1);
                    assert_eq!(first["name"], "erika");
                    assert_eq!(first["avatar"], "E");
                    assert_eq!(first["tier"], "gold");
                    assert_eq!(first["isCurrentUser"], true);
                    assert_eq!(ranking["entries"][1]["tier"], "silver");
                }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_user_list_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(register_action("FOOBAR", "FOOBAZ"))
        // try to request without admin perms
        .step(
            Action::new("user_list", "GET", "/api/users")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(login_admin_action())
        .step(
            Action::new("user_list", "GET", "/api/users")
                .with_param("limit", "5")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert_eq!(body["data"]["total"], 2);
                    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
                }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_user_update_delete_test() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            register_action("FOOBAR", "FOOBAZ")
                .with_save_cookies(false)
                .with_save_as("foobar"),
        )
        .step(register_action("FOOBAZ", "FOOBAR").with_save_as("foobaz"))
        // we can't allow everybody to update anybody
        .step(
            Action::new("user_update", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobar")))
                .with_body(json!({ "firstName": "should fail" }))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("user_update", "PUT", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobaz")))
                .with_body(json!({ "firstName": "Foo", "lastName": "Baz" }))
                .assert_body(|body| assert_eq!(body["data"]["firstName"], "Foo")),
        )
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobar")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        // self deletion is allowed
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobaz"))),
        )
        .step(login_admin_action().with_clear_cookies(true))
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobaz")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("user_delete", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/users/{}", ctx.id_of("foobar"))),
        )
        .run(&mut server)
        .await;
}
