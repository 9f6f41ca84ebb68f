// 文件 API 处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::filesystem::StorageError;
use crate::server::error::{ApiError, ApiResult, MessageResponse};
use crate::server::state::AppState;

pub const DIRECTORY_NOT_FOUND: &str = "El directorio no existe.";
pub const DIRECTORY_NAME_INVALID: &str = "Nombre de directorio inválido.";
pub const FILES_LIST_FAILED: &str = "No se pudieron listar los archivos.";
pub const FILE_NOT_FOUND: &str = "El archivo no existe.";
pub const FILE_NAME_INVALID: &str = "Nombre de archivo inválido.";
pub const FILE_DELETE_FAILED: &str = "No se pudo eliminar el archivo.";
pub const FILE_DELETED: &str = "Archivo eliminado exitosamente.";

/// GET /listar-archivos/:directorio
pub async fn list_files(
    State(state): State<AppState>,
    Path(directorio): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    match state.storage.list_files(&directorio) {
        Ok(names) => Ok(Json(names)),
        Err(StorageError::InvalidName { .. }) => {
            Err(ApiError::error(StatusCode::BAD_REQUEST, DIRECTORY_NAME_INVALID))
        }
        Err(StorageError::DirectoryNotFound(_)) => {
            Err(ApiError::error(StatusCode::NOT_FOUND, DIRECTORY_NOT_FOUND))
        }
        Err(e) => {
            error!("Failed to list files in {}: {}", directorio, e);
            Err(ApiError::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                FILES_LIST_FAILED,
            ))
        }
    }
}

/// DELETE /eliminar-archivo/:directorio/:archivo
pub async fn delete_file(
    State(state): State<AppState>,
    Path((directorio, archivo)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    info!("API: delete {}/{}", directorio, archivo);

    match state.storage.delete_file(&directorio, &archivo) {
        Ok(()) => Ok(Json(MessageResponse::new(FILE_DELETED))),
        Err(StorageError::InvalidName { .. }) => {
            Err(ApiError::error(StatusCode::BAD_REQUEST, FILE_NAME_INVALID))
        }
        Err(StorageError::NotFound(_)) => {
            Err(ApiError::error(StatusCode::NOT_FOUND, FILE_NOT_FOUND))
        }
        Err(e) => {
            error!("Failed to delete {}/{}: {}", directorio, archivo, e);
            Err(ApiError::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                FILE_DELETE_FAILED,
            ))
        }
    }
}
