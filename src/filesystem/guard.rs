// 路径片段守卫
//
// 调用方提供的每个名称只能成为基础目录下的一级路径，可能越界或指向嵌套路径的一律拒绝。

use std::path::{Path, PathBuf};

use super::types::{InvalidSegment, StorageError, StorageResult};

/// 校验片段并拼接到基础目录下
#[derive(Debug, Clone)]
pub struct SegmentGuard {
    base_dir: PathBuf,
}

impl SegmentGuard {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 检查 `segment` 是单个非相对的路径组成部分
    pub fn check(&self, segment: &str) -> StorageResult<()> {
        let reason = if segment.is_empty() {
            Some(InvalidSegment::Empty)
        } else if segment == "." || segment == ".." {
            Some(InvalidSegment::DotSegment)
        } else if segment.contains(['/', '\\']) {
            Some(InvalidSegment::Separator)
        } else if segment.contains('\0') {
            Some(InvalidSegment::NulByte)
        } else {
            None
        };

        match reason {
            Some(reason) => Err(StorageError::InvalidName {
                segment: segment.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// `base_dir/directory`
    pub fn directory_path(&self, directory: &str) -> StorageResult<PathBuf> {
        self.check(directory)?;
        Ok(self.base_dir.join(directory))
    }

    /// `base_dir/directory/file`
    pub fn file_path(&self, directory: &str, file: &str) -> StorageResult<PathBuf> {
        let dir = self.directory_path(directory)?;
        self.check(file)?;
        Ok(dir.join(file))
    }
}
