//! Admin API routes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::response::ApiResponse;
use super::service::{AdminService, UpdateOutcome};
use crate::database::{Group, GroupPatch, NewGroup, Plugin, PluginPatch};

/// Body of `POST /groups/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteGroupRequest {
    pub id: i64,
}

/// Body of `POST /plugins/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterPluginRequest {
    pub name: String,
    #[serde(default)]
    pub internal: bool,
}

/// Build the admin router.
pub fn router(admin: Arc<AdminService>) -> Router {
    Router::new()
        .route("/plugins", get(list_plugins))
        .route("/plugins/update", post(update_plugin))
        .route("/plugins/register", post(register_plugin))
        .route("/plugins/clear-external", post(clear_external_plugins))
        .route("/groups", get(list_groups))
        .route("/groups/update", post(update_group))
        .route("/groups/add", post(add_group))
        .route("/groups/delete", post(delete_group))
        .with_state(admin)
}

/// Serve the admin API until the process exits.
pub async fn serve(addr: SocketAddr, admin: Arc<AdminService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Admin API listening on http://{}", addr);
    axum::serve(listener, router(admin)).await?;
    Ok(())
}

async fn list_plugins(State(admin): State<Arc<AdminService>>) -> ApiResponse<Vec<Plugin>> {
    admin.list_plugins().await.into()
}

async fn update_plugin(
    State(admin): State<Arc<AdminService>>,
    Json(patch): Json<PluginPatch>,
) -> ApiResponse<UpdateOutcome> {
    admin.update_plugin(&patch).await.into()
}

async fn register_plugin(
    State(admin): State<Arc<AdminService>>,
    Json(req): Json<RegisterPluginRequest>,
) -> ApiResponse<String> {
    let result = admin.register_external_plugin(&req.name, req.internal).await;
    result.map(|()| req.name).into()
}

async fn clear_external_plugins(State(admin): State<Arc<AdminService>>) -> ApiResponse<Vec<String>> {
    ApiResponse::ok(admin.clear_external_plugins())
}

async fn list_groups(State(admin): State<Arc<AdminService>>) -> ApiResponse<Vec<Group>> {
    admin.list_groups().await.into()
}

async fn update_group(
    State(admin): State<Arc<AdminService>>,
    Json(patch): Json<GroupPatch>,
) -> ApiResponse<UpdateOutcome> {
    admin.update_group(patch).await.into()
}

async fn add_group(
    State(admin): State<Arc<AdminService>>,
    Json(group): Json<NewGroup>,
) -> ApiResponse<Group> {
    admin.add_group(group).await.into()
}

async fn delete_group(
    State(admin): State<Arc<AdminService>>,
    Json(req): Json<DeleteGroupRequest>,
) -> ApiResponse<u64> {
    admin.delete_group(req.id).await.into()
}
