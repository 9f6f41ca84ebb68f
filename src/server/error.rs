// HTTP 错误
//
// 按接口不同，错误响应为 `{"mensaje": ...}` 或 `{"error": ...}` 两种 JSON 格式。
// 服务器错误不返回底层细节，只记录日志。

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::filesystem::StorageError;

/// JSON 错误体的键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKey {
    Mensaje,
    Error,
}

impl BodyKey {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Mensaje => "mensaje",
            Self::Error => "error",
        }
    }
}

/// 处理器显式构建的错误响应
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    key: BodyKey,
    message: String,
}

impl ApiError {
    /// `{"mensaje": message}`
    pub fn mensaje(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            key: BodyKey::Mensaje,
            message: message.into(),
        }
    }

    /// `{"error": message}`
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            key: BodyKey::Error,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn key(&self) -> BodyKey {
        self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key.as_str().to_string(), Value::String(self.message));
        (self.status, Json(Value::Object(body))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 成功响应体：`{"mensaje": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensaje: String,
}

impl MessageResponse {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}

/// 上传失败的所有原因
///
/// 上传路由的统一错误出口：目标检查、multipart 解析和字节写入的错误都汇总到这里，
/// 以 `{"mensaje": ...}` 响应。
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Directorio no existe")]
    DirectoryNotFound,

    #[error("Ya existe un archivo con ese nombre")]
    AlreadyExists,

    #[error("Directorio no especificado")]
    MissingDirectory,

    #[error("No se recibió ningún archivo")]
    MissingFile,

    #[error("Campo inesperado: {0}")]
    UnexpectedField(String),

    #[error("Nombre inválido: {0}")]
    InvalidName(String),

    /// 请求不是可读的 multipart 请求体
    #[error("{0}")]
    Rejected(String),

    /// 读取 multipart 流时中断
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// 写入文件时磁盘错误
    #[error("Error al guardar el archivo")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DirectoryNotFound(_) => Self::DirectoryNotFound,
            StorageError::AlreadyExists(_) => Self::AlreadyExists,
            StorageError::InvalidName { segment, .. } => Self::InvalidName(segment),
            other => Self::Storage(other),
        }
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Storage(source) => error!("Upload failed: {}", source),
            other => warn!("Upload rejected: {}", other),
        }
        ApiError::mensaje(status, self.to_string()).into_response()
    }
}
