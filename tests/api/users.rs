use cloudtrack::schema::users;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::helpers::TestApp;

async fn registered_user_id(app: &TestApp, email: &str, role: Option<&str>) -> Uuid{
    let response = app.register_user("Target User", email, "testpassword", role).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    serde_json::from_value(body["data"]["id"].clone()).unwrap()
}

#[actix_web::test]
async fn get_users_lists_accounts_without_passwords(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    registered_user_id(&app, "jane@cloudtrack.test", None).await;

    let response = app.api_client
        .get(format!("{}/users", app.get_app_url()))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let listed = body["data"].as_array().unwrap();
    // The admin created by register_and_login plus the explicit registration
    assert_eq!(listed.len(), 2);
    for user in listed {
        assert!(user.get("password").is_none());
        assert!(user["email"].as_str().is_some());
    }
}

#[actix_web::test]
async fn get_users_is_admin_only(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client
        .get(format!("{}/users", app.get_app_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);

    let staff_token = app.register_and_login("staff").await;
    let response = app.api_client
        .get(format!("{}/users", app.get_app_url()))
        .header("Authorization", format!("Bearer {}", staff_token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn admin_can_delete_a_customer(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let target = registered_user_id(&app, "jane@cloudtrack.test", None).await;

    let body = serde_json::json!({ "id": target });
    let response = app.post_json("/users/delete", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let remaining: i64 = users::table
        .filter(users::id.eq(target))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);
}

#[actix_web::test]
async fn deleting_an_admin_account_is_refused(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let target = registered_user_id(&app, "other-admin@cloudtrack.test", Some("admin")).await;

    let body = serde_json::json!({ "id": target });
    let response = app.post_json("/users/delete", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 403);

    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["success"], false);
    assert_eq!(response_body["error"], "admin users cannot be deleted");

    let mut conn = app.pool.get().unwrap();
    let remaining: i64 = users::table
        .filter(users::id.eq(target))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(remaining, 1);
}

#[actix_web::test]
async fn deleting_a_missing_user_is_not_found(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let body = serde_json::json!({ "id": Uuid::new_v4() });
    let response = app.post_json("/users/delete", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 404);

    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["error"], "user not found");
}
