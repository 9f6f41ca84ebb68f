// 目录 API 处理器

use axum::{
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    Form, Json,
};
use serde::{Deserialize, Deserializer};
use tracing::{error, info};

use crate::filesystem::{DirectoryName, StorageError};
use crate::server::error::{ApiError, ApiResult, MessageResponse};
use crate::server::state::AppState;

pub const DIRECTORY_CREATED: &str = "Directorio creado correctamente";
pub const DIRECTORY_EXISTS: &str = "El directorio ya existe";
pub const DIRECTORY_NAME_INVALID: &str = "Nombre de directorio inválido";
pub const DIRECTORY_CREATE_FAILED: &str = "Error al crear el directorio";
pub const DIRECTORY_LIST_FAILED: &str = "Error al listar directorios";

/// POST /crear-directorio 请求体
#[derive(Debug, Deserialize)]
pub struct CreateDirectoryRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub nombre: String,
    #[serde(deserialize_with = "string_or_number")]
    pub apellido: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cod: String,
}

/// JSON 客户端可能把 `cod` 作为数字发送
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// 同时接受 urlencoded 表单和 JSON 请求体
async fn parse_create_request(request: Request) -> ApiResult<CreateDirectoryRequest> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        let Json(body) = Json::<CreateDirectoryRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::mensaje(StatusCode::BAD_REQUEST, e.body_text()))?;
        Ok(body)
    } else {
        let Form(body) = Form::<CreateDirectoryRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::mensaje(StatusCode::BAD_REQUEST, e.body_text()))?;
        Ok(body)
    }
}

/// POST /crear-directorio
pub async fn create_directory(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<MessageResponse>> {
    let req = parse_create_request(request).await?;
    let name = DirectoryName::compose(&req.nombre, &req.apellido, &req.cod);
    info!("API: create directory {}", name);

    match state.storage.create_directory(&name) {
        Ok(_) => Ok(Json(MessageResponse::new(DIRECTORY_CREATED))),
        Err(StorageError::AlreadyExists(_)) => {
            Err(ApiError::mensaje(StatusCode::BAD_REQUEST, DIRECTORY_EXISTS))
        }
        Err(StorageError::InvalidName { .. }) => {
            Err(ApiError::mensaje(StatusCode::BAD_REQUEST, DIRECTORY_NAME_INVALID))
        }
        Err(e) => {
            error!("Failed to create directory {}: {}", name, e);
            Err(ApiError::mensaje(
                StatusCode::INTERNAL_SERVER_ERROR,
                DIRECTORY_CREATE_FAILED,
            ))
        }
    }
}

/// GET /listar-directorios
pub async fn list_directories(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    state.storage.list_directories().map(Json).map_err(|e| {
        error!("Failed to list directories: {}", e);
        ApiError::mensaje(StatusCode::INTERNAL_SERVER_ERROR, DIRECTORY_LIST_FAILED)
    })
}
