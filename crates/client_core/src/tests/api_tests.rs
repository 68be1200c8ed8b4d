use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use shared::domain::RecipeId;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct MockApiState {
    recipe_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    posted: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

async fn mock_list_recipes(
    State(state): State<MockApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.recipe_queries.lock().await.push(params);
    Json(json!([
        {
            "_id": "r1",
            "title": "Overnight Oats",
            "image": "https://img.example/oats.jpg",
            "recipeLink": "https://recipes.example/oats",
            "mealType": "Breakfast"
        },
        {
            "_id": "r2",
            "title": "Miso Soup",
            "image": "https://img.example/miso.jpg",
            "recipeLink": "https://recipes.example/miso"
        }
    ]))
}

async fn mock_list_planned() -> Json<Value> {
    Json(json!([
        { "_id": "p1", "title": "Miso Soup", "image": "", "recipeLink": "https://recipes.example/miso" }
    ]))
}

async fn mock_add_planned(State(state): State<MockApiState>, Json(body): Json<Value>) -> StatusCode {
    state.posted.lock().await.push(body);
    StatusCode::CREATED
}

async fn mock_remove_planned(
    State(state): State<MockApiState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.deleted.lock().await.push(id);
    StatusCode::NO_CONTENT
}

async fn spawn_mock_api() -> anyhow::Result<(String, MockApiState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockApiState::default();
    let app = Router::new()
        .route("/recipes", get(mock_list_recipes))
        .route(
            "/plannedMeal",
            get(mock_list_planned).post(mock_add_planned),
        )
        .route("/plannedMeal/:id", delete(mock_remove_planned))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

async fn spawn_router(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn api_for(base_url: &str) -> HttpRecipeApi {
    HttpRecipeApi::new(base_url, Duration::from_secs(5)).expect("build api")
}

#[tokio::test]
async fn list_recipes_sends_every_filter_parameter() {
    let (base_url, state) = spawn_mock_api().await.expect("spawn server");
    let api = api_for(&base_url);

    let query = RecipeQuery {
        meal_type: "Breakfast".to_string(),
        dietary: "Vegan,Gluten-Free".to_string(),
        ingredient: "oats,banana".to_string(),
        recipe_name: "over night".to_string(),
    };
    let recipes = api.list_recipes(&query).await.expect("list recipes");

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].id, RecipeId::from("r1"));
    assert_eq!(recipes[1].recipe_link, "https://recipes.example/miso");

    let queries = state.recipe_queries.lock().await;
    let params = &queries[0];
    assert_eq!(params.get("mealType").map(String::as_str), Some("Breakfast"));
    assert_eq!(params.get("dietary").map(String::as_str), Some("Vegan,Gluten-Free"));
    assert_eq!(params.get("ingredient").map(String::as_str), Some("oats,banana"));
    assert_eq!(params.get("recipeName").map(String::as_str), Some("over night"));
}

#[tokio::test]
async fn unfiltered_query_still_sends_empty_parameters() {
    let (base_url, state) = spawn_mock_api().await.expect("spawn server");
    let api = api_for(&base_url);

    api.list_recipes(&RecipeQuery::default())
        .await
        .expect("list recipes");

    let queries = state.recipe_queries.lock().await;
    let params = &queries[0];
    assert_eq!(params.len(), 4);
    assert!(params.values().all(String::is_empty));
}

#[tokio::test]
async fn add_planned_meal_posts_the_full_recipe() {
    let (base_url, state) = spawn_mock_api().await.expect("spawn server");
    let api = api_for(&base_url);
    let recipes = api
        .list_recipes(&RecipeQuery::default())
        .await
        .expect("list recipes");

    api.add_planned_meal(&recipes[0]).await.expect("post recipe");

    let posted = state.posted.lock().await;
    assert_eq!(
        posted[0],
        json!({
            "_id": "r1",
            "title": "Overnight Oats",
            "image": "https://img.example/oats.jpg",
            "recipeLink": "https://recipes.example/oats",
            "mealType": "Breakfast"
        })
    );
}

#[tokio::test]
async fn remove_planned_meal_encodes_the_id_as_one_segment() {
    let (base_url, state) = spawn_mock_api().await.expect("spawn server");
    let api = api_for(&format!("{base_url}/"));

    api.remove_planned_meal(&PlannedMealId::from("p/1 x"))
        .await
        .expect("delete planned meal");

    assert_eq!(*state.deleted.lock().await, vec!["p/1 x".to_string()]);
}

#[tokio::test]
async fn server_errors_carry_status_and_json_message() {
    let app = Router::new().route(
        "/plannedMeal",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "database unavailable" })),
            )
        }),
    );
    let base_url = spawn_router(app).await.expect("spawn server");
    let api = api_for(&base_url);

    let err = api.list_planned_meals().await.expect_err("should fail");
    let client_err = err.downcast_ref::<ClientError>().expect("client error");
    assert_eq!(client_err.status(), Some(500));
    match client_err {
        ClientError::Status { message, .. } => assert_eq!(message, "database unavailable"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let app = Router::new().route("/recipes", get(|| async { "definitely not json" }));
    let base_url = spawn_router(app).await.expect("spawn server");
    let api = api_for(&base_url);

    let err = api
        .list_recipes(&RecipeQuery::default())
        .await
        .expect_err("should fail");
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Decode { .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = api_for(&format!("http://{addr}"));
    let err = api.list_planned_meals().await.expect_err("should fail");
    assert!(matches!(
        err.downcast_ref::<ClientError>(),
        Some(ClientError::Transport { .. })
    ));
}

#[test]
fn endpoints_extend_the_base_path() {
    let api = api_for("http://localhost:5000");
    assert_eq!(
        api.endpoint(&[RECIPES_PATH]).as_str(),
        "http://localhost:5000/recipes"
    );

    let api = api_for("https://food.example/api/");
    assert_eq!(
        api.endpoint(&[PLANNED_MEAL_PATH, "abc"]).as_str(),
        "https://food.example/api/plannedMeal/abc"
    );
}

#[test]
fn rejects_unusable_base_urls() {
    for raw in ["localhost:5000", "ftp://files.example", "not a url", "mailto:chef@example.com"] {
        assert!(
            matches!(
                HttpRecipeApi::new(raw, Duration::from_secs(1)),
                Err(ClientError::InvalidBaseUrl { .. })
            ),
            "{raw}"
        );
    }
}

#[test]
fn error_message_prefers_json_fields_then_body_then_reason() {
    assert_eq!(
        error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad mealType"}"#),
        "bad mealType"
    );
    assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
    assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
}
