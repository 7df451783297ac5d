use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, HttpResponse};
use paycrypt_admin_core::{AdminError, SelectOutcome};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::state::AppState;
use crate::domain::error::{DashboardError, DashboardResult};

const DEFAULT_NOTICE_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SelectChainRequest {
    pub chain: String,
}

#[derive(Debug, Deserialize)]
pub struct NoticesQuery {
    pub limit: Option<usize>,
}

/// Registry, current selection and initialization flag.
#[get("/chains")]
pub async fn get_chains(state: Data<AppState>) -> HttpResponse {
    let selection = state.selection();
    let registry = &state.admin.registry;

    HttpResponse::Ok().json(json!({
        "success": true,
        "chains": registry.iter().collect::<Vec<_>>(),
        "currentKey": selection.current_key,
        "isInitializing": selection.is_initializing,
        "current": state.admin.coordinator.chain_config(),
    }))
}

#[post("/chains/select")]
pub async fn select_chain(
    state: Data<AppState>,
    req: Json<SelectChainRequest>,
) -> DashboardResult<HttpResponse> {
    match state.admin.coordinator.select(&req.chain).await {
        SelectOutcome::Ignored => Err(DashboardError::bad_request(format!(
            "Unsupported chain '{}', selection unchanged ({})",
            req.chain.trim(),
            state.admin.coordinator.current_key()
        ))),
        SelectOutcome::Selected { key, wallet } => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "currentKey": key,
            "chain": state.admin.registry.get(key),
            "wallet": wallet,
        }))),
    }
}

/// Toast feed, newest first.
#[get("/notices")]
pub async fn get_notices(state: Data<AppState>, query: Query<NoticesQuery>) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_NOTICE_LIMIT);
    HttpResponse::Ok().json(json!({
        "success": true,
        "notices": state.admin.notices.recent(limit),
    }))
}

#[delete("/notices/{id}")]
pub async fn dismiss_notice(state: Data<AppState>, id: Path<String>) -> DashboardResult<HttpResponse> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|e| DashboardError::bad_request(format!("Invalid notice id: {e}")))?;

    if state.admin.notices.dismiss(id) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AdminError::not_found(format!("Notice {id}")).into())
    }
}

/// Explorer links for an address or transaction on a given chain.
#[get("/chains/{key}/explorer/{kind}/{value}")]
pub async fn explorer_link(
    state: Data<AppState>,
    path: Path<(String, String, String)>,
) -> DashboardResult<HttpResponse> {
    let (key, kind, value) = path.into_inner();
    let descriptor = state.admin.registry.describe(&key)?;
    let url = match kind.as_str() {
        "tx" => descriptor.tx_url(&value),
        "address" => descriptor.address_url(&value),
        "token" => descriptor.token_url(&value),
        other => return Err(DashboardError::bad_request(format!("Unknown explorer link kind '{other}'"))),
    };
    Ok(HttpResponse::Ok().json(json!({ "chain": descriptor.key, "url": url })))
}
