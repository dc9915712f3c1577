//! Integration tests for layer and node edits.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::script_uri;

/// Opens a seeded script and returns its id plus the current view.
async fn seeded(app: &common::TestApp) -> (Uuid, serde_json::Value) {
    let script_id = app.new_script().await;
    let (status, view) = common::get_json(app.app(), &script_uri(script_id, "/view")).await;
    assert_eq!(status, StatusCode::OK);
    (script_id, view)
}

#[tokio::test]
async fn test_add_layer_appends_after_existing_layers() {
    // Arrange
    let app = common::build_test_app();
    let (script_id, _) = seeded(&app).await;

    // Act
    let (status, layer) = common::post_json(
        app.app(),
        &script_uri(script_id, "/layers"),
        &json!({ "title": "Epilogue", "description": "Loose ends" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(layer["layer_order"], 7);
    assert_eq!(layer["title"], "Epilogue");
    assert!(layer["nodes"].as_array().unwrap().is_empty());

    assert_eq!(app.flush().await, 1);
    assert_eq!(app.stored(script_id).await.len(), 7);
}

#[tokio::test]
async fn test_add_node_then_fetch_it() {
    // Arrange
    let app = common::build_test_app();
    let (script_id, view) = seeded(&app).await;
    let layer_id = view["nodes"][0]["layer_id"].clone();

    // Act
    let (status, node) = common::post_json(
        app.app(),
        &script_uri(script_id, "/nodes"),
        &json!({ "layer_id": layer_id, "title": "Cold open", "duration": 45 }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(node["layer_id"], layer_id);
    assert_eq!(node["node_order"], 2);
    assert_eq!(node["metadata"]["scene"], "Act 1");
    assert!(node["branches"].as_array().unwrap().is_empty());

    let node_id = node["id"].as_str().unwrap();
    let (status, fetched) =
        common::get_json(app.app(), &script_uri(script_id, &format!("/nodes/{node_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Cold open");
    assert_eq!(fetched["duration"], 45);
}

#[tokio::test]
async fn test_add_node_to_unknown_layer_returns_404() {
    let app = common::build_test_app();
    let (script_id, _) = seeded(&app).await;

    let (status, json) = common::post_json(
        app.app(),
        &script_uri(script_id, "/nodes"),
        &json!({ "layer_id": Uuid::new_v4(), "title": "Lost" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(app.scheduler.pending_count(), 0);
}

#[tokio::test]
async fn test_get_unknown_node_returns_404() {
    let app = common::build_test_app();
    let (script_id, _) = seeded(&app).await;

    let (status, json) = common::get_json(
        app.app(),
        &script_uri(script_id, &format!("/nodes/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_update_content_writes_through_to_store() {
    // Arrange
    let app = common::build_test_app();
    let (script_id, view) = seeded(&app).await;
    let node_id = view["nodes"][2]["id"].as_str().unwrap().to_string();

    // Act
    let (status, node) = common::put_json(
        app.app(),
        &script_uri(script_id, &format!("/nodes/{node_id}/content")),
        &json!({ "content": "She opens the letter.", "title": "The Letter" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["content"], "She opens the letter.");
    assert_eq!(node["title"], "The Letter");

    let (_, view) = common::get_json(app.app(), &script_uri(script_id, "/view")).await;
    assert_eq!(view["nodes"][2]["display_label"], "The Letter");
    assert_eq!(view["nodes"][2]["display_content"], "She opens the letter.");

    let stored = app.stored(script_id).await;
    assert_eq!(stored[1].nodes[1].content, "She opens the letter.");
}

#[tokio::test]
async fn test_blank_content_shows_placeholders() {
    let app = common::build_test_app();
    let (script_id, view) = seeded(&app).await;
    let node_id = view["nodes"][0]["id"].as_str().unwrap().to_string();

    common::put_json(
        app.app(),
        &script_uri(script_id, &format!("/nodes/{node_id}/content")),
        &json!({ "content": "   ", "title": "" }),
    )
    .await;

    let (_, view) = common::get_json(app.app(), &script_uri(script_id, "/view")).await;
    assert_eq!(view["nodes"][0]["display_label"], "Untitled beat");
    assert_eq!(view["nodes"][0]["display_content"], "No description");
}

#[tokio::test]
async fn test_update_content_of_unknown_node_returns_404() {
    let app = common::build_test_app();
    let (script_id, _) = seeded(&app).await;

    let (status, _) = common::put_json(
        app.app(),
        &script_uri(script_id, &format!("/nodes/{}/content", Uuid::new_v4())),
        &json!({ "content": "nothing here" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_node_removes_it_and_its_edges() {
    // Arrange
    let app = common::build_test_app();
    let (script_id, view) = seeded(&app).await;
    // Second node of layer 2: one incoming edge, two outgoing.
    let node_id = view["nodes"][2]["id"].as_str().unwrap().to_string();
    let node_uri = script_uri(script_id, &format!("/nodes/{node_id}"));

    // Act
    let status = common::delete(app.app(), &node_uri).await;

    // Assert
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, view) = common::get_json(app.app(), &script_uri(script_id, "/view")).await;
    assert_eq!(view["nodes"].as_array().unwrap().len(), 62);
    assert_eq!(view["edges"].as_array().unwrap().len(), 59);
    let (status, _) = common::get_json(app.app(), &node_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.flush().await, 1);
    let stored_nodes: usize = app
        .stored(script_id)
        .await
        .iter()
        .map(|layer| layer.nodes.len())
        .sum();
    assert_eq!(stored_nodes, 62);
}

#[tokio::test]
async fn test_delete_unknown_node_is_no_op() {
    let app = common::build_test_app();
    let (script_id, _) = seeded(&app).await;

    let status = common::delete(
        app.app(),
        &script_uri(script_id, &format!("/nodes/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.scheduler.pending_count(), 0);
}
