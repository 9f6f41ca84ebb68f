// 存储数据类型

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 路径片段被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSegment {
    Empty,
    DotSegment,
    Separator,
    NulByte,
}

impl InvalidSegment {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "empty segment",
            Self::DotSegment => "relative segment",
            Self::Separator => "contains a path separator",
            Self::NulByte => "contains a NUL byte",
        }
    }
}

/// 存储错误
///
/// 每个变体都带有相关路径（或片段）用于日志；对外消息由 HTTP 处理器决定。
#[derive(Debug, Error)]
pub enum StorageError {
    /// 目录或文件已存在
    #[error("already exists: {0:?}")]
    AlreadyExists(PathBuf),

    /// 用户目录不存在
    #[error("directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    /// 文件不存在
    #[error("not found: {0:?}")]
    NotFound(PathBuf),

    /// 调用方提供的片段不能作为路径组成部分
    #[error("invalid name {segment:?}: {}", .reason.message())]
    InvalidName {
        segment: String,
        reason: InvalidSegment,
    },

    /// 其他读写或遍历错误
    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// 用户目录名：`{name}_{lastname}_{code}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryName(String);

impl DirectoryName {
    /// 用下划线原样拼接三部分
    pub fn compose(name: &str, lastname: &str, code: &str) -> Self {
        Self(format!("{}_{}_{}", name, lastname, code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DirectoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
