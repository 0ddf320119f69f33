//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::adapters::records::{parse_kind, ItemRecord, MessageRecord, PointRecord, ProjectRecord};
use crate::web::protocol::{
    BlankItemRequest, ChatRequest, ChatTurnResponse, CreateItemRequest, UpdateItemRequest,
    UpdateProjectRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use thought_partner_core::ports::PortError;
use thought_partner_core::store::ProjectStore;
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_project_handler,
        update_project_handler,
        list_items_handler,
        create_item_handler,
        create_blank_item_handler,
        update_item_handler,
        delete_item_handler,
        delete_all_items_handler,
        list_messages_handler,
        chat_handler,
    ),
    components(
        schemas(
            ProjectRecord,
            ItemRecord,
            MessageRecord,
            PointRecord,
            CreateItemRequest,
            BlankItemRequest,
            UpdateItemRequest,
            UpdateProjectRequest,
            ChatRequest,
            ChatTurnResponse,
        )
    ),
    tags(
        (name = "Thought Partner API", description = "Whiteboard items and the agent chat behind them.")
    )
)]
pub struct ApiDoc;

/// Builds the API routes over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/project",
            get(get_project_handler).patch(update_project_handler),
        )
        .route(
            "/items",
            get(list_items_handler)
                .post(create_item_handler)
                .delete(delete_all_items_handler),
        )
        .route("/items/blank", post(create_blank_item_handler))
        .route(
            "/items/{id}",
            patch(update_item_handler).delete(delete_item_handler),
        )
        .route("/messages", get(list_messages_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
}

type HandlerError = (StatusCode, String);

fn bad_request(e: PortError) -> HandlerError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn item_not_found(id: Uuid) -> HandlerError {
    (StatusCode::NOT_FOUND, format!("Item {} not found", id))
}

fn item_record(store: &ProjectStore, id: Uuid) -> Result<ItemRecord, HandlerError> {
    store
        .item(id)
        .map(ItemRecord::from_domain)
        .ok_or_else(|| item_not_found(id))
}

//=========================================================================================
// Project Handlers
//=========================================================================================

/// Get the whole project: metadata, items and messages.
#[utoipa::path(
    get,
    path = "/project",
    responses((status = 200, description = "The current project", body = ProjectRecord))
)]
pub async fn get_project_handler(State(state): State<Arc<AppState>>) -> Json<ProjectRecord> {
    let store = state.store.lock().await;
    Json(ProjectRecord::from_domain(store.project()))
}

/// Rename the project or change its description.
#[utoipa::path(
    patch,
    path = "/project",
    request_body = UpdateProjectRequest,
    responses((status = 200, description = "Project updated", body = ProjectRecord))
)]
pub async fn update_project_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateProjectRequest>,
) -> Json<ProjectRecord> {
    let mut store = state.store.lock().await;
    store.update_project(request.into()).await;
    Json(ProjectRecord::from_domain(store.project()))
}

//=========================================================================================
// Item Handlers
//=========================================================================================

/// List every item on the whiteboard, in creation order.
#[utoipa::path(
    get,
    path = "/items",
    responses((status = 200, description = "All items", body = Vec<ItemRecord>))
)]
pub async fn list_items_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ItemRecord>> {
    let store = state.store.lock().await;
    Json(store.items().iter().map(ItemRecord::from_domain).collect())
}

/// Add an item to the whiteboard.
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemRecord),
        (status = 400, description = "Unknown item type, shape or provenance")
    )
)]
pub async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let descriptor = request.to_descriptor().map_err(bad_request)?;
    let mut store = state.store.lock().await;
    let id = store.add_item(descriptor).await;
    Ok((StatusCode::CREATED, Json(item_record(&store, id)?)))
}

/// Add a placeholder item of the given type, as the toolbar does.
#[utoipa::path(
    post,
    path = "/items/blank",
    request_body = BlankItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemRecord),
        (status = 400, description = "Unknown item type")
    )
)]
pub async fn create_blank_item_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BlankItemRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let kind = parse_kind(&request.kind).map_err(bad_request)?;
    let mut store = state.store.lock().await;
    let id = store.add_blank_item(kind, request.center.into()).await;
    Ok((StatusCode::CREATED, Json(item_record(&store, id)?)))
}

/// Update some fields of an item.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    request_body = UpdateItemRequest,
    params(("id" = Uuid, Path, description = "The item to update.")),
    responses(
        (status = 200, description = "Item updated", body = ItemRecord),
        (status = 400, description = "Unknown shape type"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ItemRecord>, HandlerError> {
    let item_patch = request.to_patch().map_err(bad_request)?;
    let mut store = state.store.lock().await;
    if !store.update_item(id, item_patch).await {
        return Err(item_not_found(id));
    }
    Ok(Json(item_record(&store, id)?))
}

/// Remove one item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = Uuid, Path, description = "The item to delete.")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    let mut store = state.store.lock().await;
    if store.delete_item(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(item_not_found(id))
    }
}

/// Clear the whiteboard. Chat history is kept.
#[utoipa::path(
    delete,
    path = "/items",
    responses((status = 204, description = "All items deleted"))
)]
pub async fn delete_all_items_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let mut store = state.store.lock().await;
    store.delete_all_items().await;
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Chat Handlers
//=========================================================================================

/// List the chat history, oldest first.
#[utoipa::path(
    get,
    path = "/messages",
    responses((status = 200, description = "All messages", body = Vec<MessageRecord>))
)]
pub async fn list_messages_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<MessageRecord>> {
    let store = state.store.lock().await;
    Json(store.messages().iter().map(MessageRecord::from_domain).collect())
}

/// Send a chat message to the agent.
///
/// The agent's reply is stored as a message; any items it asked for are
/// placed on the board inside the given viewport.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The turn's messages and new items", body = ChatTurnResponse),
        (status = 400, description = "Empty message")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatTurnResponse>, HandlerError> {
    if request.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message is empty".to_string()));
    }

    let turn = state
        .orchestrator
        .handle_user_message(&request.content, request.viewport())
        .await;
    if turn.provider_failed {
        warn!("Chat turn completed with the fallback reply.");
    } else {
        info!("Chat turn added {} items.", turn.created_items.len());
    }

    let store = state.store.lock().await;
    let message_record = |id: Uuid| {
        store
            .messages()
            .iter()
            .find(|message| message.id == id)
            .map(MessageRecord::from_domain)
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Message {} vanished", id),
                )
            })
    };

    Ok(Json(ChatTurnResponse {
        user_message: message_record(turn.user_message_id)?,
        agent_message: message_record(turn.agent_message_id)?,
        created_items: turn
            .created_items
            .iter()
            .filter_map(|id| store.item(*id))
            .map(ItemRecord::from_domain)
            .collect(),
        provider_failed: turn.provider_failed,
    }))
}
