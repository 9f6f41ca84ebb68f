// 上传 API 处理器

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::filesystem::UploadSink;
use crate::server::error::{MessageResponse, UploadError};
use crate::server::state::AppState;

/// 目标用户目录的文本字段
pub const DIRECTORY_FIELD: &str = "directorio";
/// 上传文件字段
pub const FILE_FIELD: &str = "archivo";

pub const FILE_UPLOADED: &str = "Archivo subido exitosamente";

/// POST /subir-archivo
///
/// `directorio` 必须在 `archivo` 之前出现：读取文件第一个字节前就要确定目标路径。
/// 文件直接流式写入磁盘，但只有整个 multipart 请求读取完毕后才提交；
/// 之前的任何错误都会删除已写入的文件。
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, UploadError> {
    let mut multipart = multipart?;
    let mut directory: Option<String> = None;
    // 未提交的上传，出错返回时随 Drop 删除
    let mut pending: Option<UploadSink> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_none() {
            // 忽略未知文本字段
            if field_name == DIRECTORY_FIELD {
                directory = Some(field.text().await?);
            }
            continue;
        }

        if field_name != FILE_FIELD || pending.is_some() {
            return Err(UploadError::UnexpectedField(field_name));
        }

        let directory = directory.as_deref().ok_or(UploadError::MissingDirectory)?;
        let file_name = field.file_name().unwrap_or_default().to_string();

        let mut sink = state.storage.begin_upload(directory, &file_name)?;
        while let Some(chunk) = field.chunk().await? {
            sink.write_chunk(&chunk).await?;
        }
        pending = Some(sink);
    }

    let sink = pending.ok_or(UploadError::MissingFile)?;
    let path = sink.path().to_path_buf();
    let size = sink.finish().await?;
    info!("Uploaded {:?} ({} bytes)", path, size);

    Ok(Json(MessageResponse::new(FILE_UPLOADED)))
}
