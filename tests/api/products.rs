use cloudtrack::{models::Product, schema::products};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use uuid::Uuid;

use crate::helpers::TestApp;

fn seed_product(app: &TestApp, name: &str, price: f64, stock: i32, category: &str) -> Uuid{
    let product = Product{
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        price,
        stock_quantity: stock,
        category: category.to_string()
    };
    let id = product.id;

    let mut conn = app.pool.get().unwrap();
    diesel::insert_into(products::table)
        .values(product)
        .execute(&mut conn)
        .unwrap();

    id
}

async fn list(app: &TestApp, query: &str) -> serde_json::Value{
    let response = app.api_client
        .get(format!("{}/products?{}", app.get_app_url(), query))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);

    response.json().await.unwrap()
}

#[actix_web::test]
async fn add_product_with_valid_fields_creates_row(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let body = serde_json::json!({
        "name": "Wireless Mouse",
        "description": "2.4GHz, USB receiver",
        "price": 19.99,
        "stock_quantity": 120,
        "category": "Electronics"
    });

    let response = app.post_json("/products", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 201);

    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["success"], true);
    let id: Uuid = serde_json::from_value(response_body["data"]["id"].clone()).unwrap();

    let mut conn = app.pool.get().unwrap();
    let stored: Product = products::table
        .filter(products::id.eq(id))
        .get_result(&mut conn)
        .unwrap();

    assert_eq!(stored.name, "Wireless Mouse");
    assert_eq!(stored.stock_quantity, 120);
    assert_eq!(stored.category, "Electronics");
}

#[actix_web::test]
async fn add_product_requires_an_admin_token(){
    let app = TestApp::spawn_app().await;

    let body = serde_json::json!({
        "name": "Wireless Mouse",
        "price": 19.99,
        "stock_quantity": 120,
        "category": "Electronics"
    });

    let response = app.post_json("/products", &body, None).await;
    assert_eq!(response.status().as_u16(), 401);

    let staff_token = app.register_and_login("staff").await;
    let response = app.post_json("/products", &body, Some(&staff_token)).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn add_product_with_negative_price_is_rejected(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let body = serde_json::json!({
        "name": "Wireless Mouse",
        "price": -1.0,
        "stock_quantity": 120,
        "category": "Electronics"
    });

    let response = app.post_json("/products", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["success"], false);
}

#[actix_web::test]
async fn add_product_with_missing_category_is_rejected(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let body = serde_json::json!({
        "name": "Wireless Mouse",
        "price": 19.99,
        "stock_quantity": 120
    });

    let response = app.post_json("/products", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let body = serde_json::json!({
        "name": "Wireless Mouse",
        "price": 19.99,
        "stock_quantity": 120,
        "category": ""
    });

    let response = app.post_json("/products", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn listing_paginates_and_reports_totals(){
    let app = TestApp::spawn_app().await;

    for i in 0..12 {
        seed_product(&app, &format!("Product {:02}", i), 10.0 + i as f64, i, "Electronics");
    }

    let body = list(&app, "page=1&page_size=5").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["page_size"], 5);
    assert_eq!(body["data"]["total"], 12);
    assert_eq!(body["data"]["total_pages"], 3);

    let body = list(&app, "page=3&page_size=5").await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);

    let body = list(&app, "page=4&page_size=5").await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 0);

    // Pages way past the end still answer an empty page
    let body = list(&app, "page=9223372036854775807&page_size=200").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn listing_filters_by_category_and_min_stock(){
    let app = TestApp::spawn_app().await;

    seed_product(&app, "Mouse", 19.99, 5, "Electronics");
    seed_product(&app, "Keyboard", 49.99, 0, "Electronics");
    seed_product(&app, "Desk", 149.99, 9, "Furniture");

    let body = list(&app, "category=Electronics").await;
    assert_eq!(body["data"]["total"], 2);

    let body = list(&app, "category=Electronics&min_stock=1").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["products"][0]["name"], "Mouse");

    let body = list(&app, "category=Groceries").await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["total_pages"], 0);
}

#[actix_web::test]
async fn listing_searches_name_and_description(){
    let app = TestApp::spawn_app().await;

    seed_product(&app, "Wireless Mouse", 19.99, 5, "Electronics");
    seed_product(&app, "Keyboard", 49.99, 3, "Electronics");

    let body = list(&app, "q=mouse").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["products"][0]["name"], "Wireless Mouse");

    // "description" only appears in the seeded description column
    let body = list(&app, "q=description").await;
    assert_eq!(body["data"]["total"], 2);
}

#[actix_web::test]
async fn listing_sorts_by_whitelisted_columns(){
    let app = TestApp::spawn_app().await;

    seed_product(&app, "Mid", 20.0, 5, "Electronics");
    seed_product(&app, "Cheap", 10.0, 1, "Electronics");
    seed_product(&app, "Expensive", 30.0, 9, "Electronics");

    let body = list(&app, "sort_by=price&sort_dir=asc").await;
    let names: Vec<&str> = body["data"]["products"]
        .as_array().unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cheap", "Mid", "Expensive"]);

    let body = list(&app, "sort_by=price").await;
    let names: Vec<&str> = body["data"]["products"]
        .as_array().unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Expensive", "Mid", "Cheap"]);

    // Unknown sort columns are ignored rather than interpolated
    let body = list(&app, "sort_by=price%3B%20DROP%20TABLE%20products").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 3);
}

#[actix_web::test]
async fn update_product_changes_price_and_stock(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let id = seed_product(&app, "Mouse", 19.99, 5, "Electronics");

    let body = serde_json::json!({
        "id": id,
        "price": 24.99,
        "stock_quantity": 40
    });
    let response = app.post_json("/products/update", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let stored: Product = products::table
        .filter(products::id.eq(id))
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(stored.price, 24.99);
    assert_eq!(stored.stock_quantity, 40);
}

#[actix_web::test]
async fn update_missing_product_is_not_found(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let body = serde_json::json!({
        "id": Uuid::new_v4(),
        "price": 24.99,
        "stock_quantity": 40
    });
    let response = app.post_json("/products/update", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 404);

    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(response_body["success"], false);
    assert_eq!(response_body["error"], "product not found");
}

#[actix_web::test]
async fn delete_product_removes_the_row(){
    let app = TestApp::spawn_app().await;
    let token = app.register_and_login("admin").await;

    let id = seed_product(&app, "Mouse", 19.99, 5, "Electronics");

    let body = serde_json::json!({ "id": id });
    let response = app.post_json("/products/delete", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let remaining: i64 = products::table
        .filter(products::id.eq(id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);

    // Second delete of the same id reports not found
    let response = app.post_json("/products/delete", &body, Some(&token)).await;
    assert_eq!(response.status().as_u16(), 404);
}
