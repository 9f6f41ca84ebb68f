// 上传写入器
//
// 一个上传文件的落盘目标。目标文件由 `UserStorage::begin_upload` 独占创建；
// `finish` 成功之前视为不完整文件，写入器被丢弃时自动删除。

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::types::{StorageError, StorageResult};

pub struct UploadSink {
    file: Option<File>,
    path: PathBuf,
    written: u64,
    committed: bool,
}

impl UploadSink {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            file: Some(file),
            path,
            written: 0,
            committed: false,
        }
    }

    /// 目标文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 原样追加一个数据块
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        let file = self.file.as_mut().ok_or_else(|| {
            StorageError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::Other, "upload already closed"),
            )
        })?;
        file.write_all(chunk)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// 刷新并保留文件，返回总字节数
    pub async fn finish(mut self) -> StorageResult<u64> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| StorageError::io(&self.path, e))?;
        }
        self.committed = true;
        debug!("Upload stored: {:?} ({} bytes)", self.path, self.written);
        Ok(self.written)
    }

    /// 丢弃不完整文件
    pub fn abort(self) {
        // 删除在 Drop 中完成
        debug!("Upload aborted after {} bytes: {:?}", self.written, self.path);
    }
}

impl Drop for UploadSink {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // 先关闭句柄再删除
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove partial upload {:?}: {}", self.path, e);
            }
        }
    }
}
