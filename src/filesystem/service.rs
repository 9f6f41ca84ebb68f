// 用户存储服务
//
// 基础目录下的目录创建、上传、列表和删除

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::guard::SegmentGuard;
use super::types::*;
use super::upload::UploadSink;

/// 以配置的基础目录为根的文件系统适配器
#[derive(Debug, Clone)]
pub struct UserStorage {
    guard: SegmentGuard,
}

impl UserStorage {
    /// 以 `base_dir` 为根创建存储，不访问磁盘
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            guard: SegmentGuard::new(base_dir.into()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        self.guard.base_dir()
    }

    /// 基础目录（及父目录）不存在时创建
    pub fn ensure_base_dir(&self) -> StorageResult<()> {
        let base = self.base_dir();
        if base.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(base).map_err(|e| StorageError::io(base, e))?;
        tracing::info!("Created base directory: {:?}", base);
        Ok(())
    }

    /// 创建用户目录
    ///
    /// 路径已存在时 `create_dir` 原子地失败，同名并发请求只有一个能成功。
    pub fn create_directory(&self, name: &DirectoryName) -> StorageResult<PathBuf> {
        let path = self.guard.directory_path(name.as_str())?;

        fs::create_dir(&path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.clone()),
            _ => StorageError::io(&path, e),
        })?;

        tracing::info!("Created directory: {:?}", path);
        Ok(path)
    }

    /// 基础目录下的直接子目录名
    ///
    /// 跟随符号链接判断类型，跳过普通文件；任一条目无法读取则整个列表失败。
    pub fn list_directories(&self) -> StorageResult<Vec<String>> {
        let base = self.base_dir();
        let read_dir = fs::read_dir(base).map_err(|e| {
            tracing::error!("Failed to read base directory {:?}: {}", base, e);
            StorageError::io(base, e)
        })?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StorageError::io(base, e))?;
            let path = entry.path();
            let metadata = fs::metadata(&path).map_err(|e| StorageError::io(&path, e))?;
            if metadata.is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(names)
    }

    /// 用户目录下所有条目名（文件和子目录）
    pub fn list_files(&self, directory: &str) -> StorageResult<Vec<String>> {
        let path = self.guard.directory_path(directory)?;
        if !path.exists() {
            return Err(StorageError::DirectoryNotFound(path));
        }

        let read_dir = fs::read_dir(&path).map_err(|e| {
            tracing::error!("Failed to read directory {:?}: {}", path, e);
            StorageError::io(&path, e)
        })?;

        read_dir
            .map(|entry| {
                entry
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .map_err(|e| StorageError::io(&path, e))
            })
            .collect()
    }

    /// 删除单个文件，从不删除目录
    pub fn delete_file(&self, directory: &str, file: &str) -> StorageResult<()> {
        let path = self.guard.file_path(directory, file)?;
        if !path.exists() {
            return Err(StorageError::NotFound(path));
        }

        fs::remove_file(&path).map_err(|e| {
            tracing::error!("Failed to delete {:?}: {}", path, e);
            StorageError::io(&path, e)
        })?;

        tracing::info!("Deleted file: {:?}", path);
        Ok(())
    }

    /// 解析并打开上传目标
    ///
    /// 写入任何字节前完成校验：目录必须存在，目标以 `create_new` 打开，
    /// 已存在的文件返回 `AlreadyExists` 且不被改动。
    pub fn begin_upload(&self, directory: &str, file_name: &str) -> StorageResult<UploadSink> {
        let dir = self.guard.directory_path(directory)?;
        if !dir.is_dir() {
            return Err(StorageError::DirectoryNotFound(dir));
        }

        self.guard.check(file_name)?;
        let target = dir.join(file_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::AlreadyExists(target.clone()),
                _ => StorageError::io(&target, e),
            })?;

        tracing::debug!("Upload target opened: {:?}", target);
        Ok(UploadSink::new(tokio::fs::File::from_std(file), target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, UserStorage) {
        let temp = TempDir::new().unwrap();
        let storage = UserStorage::new(temp.path().join("usuarios"));
        storage.ensure_base_dir().unwrap();
        (temp, storage)
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn test_ensure_base_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let storage = UserStorage::new(temp.path().join("a").join("usuarios"));
        storage.ensure_base_dir().unwrap();
        storage.ensure_base_dir().unwrap();
        assert!(storage.base_dir().is_dir());
    }

    #[test]
    fn test_create_directory_then_listed() {
        let (_temp, storage) = storage();
        let name = DirectoryName::compose("Ana", "Lopez", "42");

        let path = storage.create_directory(&name).unwrap();
        assert!(path.is_dir());
        assert_eq!(storage.list_directories().unwrap(), vec!["Ana_Lopez_42"]);
    }

    #[test]
    fn test_create_directory_collision_keeps_existing() {
        let (_temp, storage) = storage();
        let name = DirectoryName::compose("Ana", "Lopez", "42");
        let path = storage.create_directory(&name).unwrap();
        fs::write(path.join("keep.txt"), b"data").unwrap();

        let err = storage.create_directory(&name).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(fs::read(path.join("keep.txt")).unwrap(), b"data");
    }

    #[test]
    fn test_create_directory_rejects_separator() {
        let (_temp, storage) = storage();
        let name = DirectoryName::compose("..", "x/y", "1");
        let err = storage.create_directory(&name).unwrap_err();
        assert!(matches!(err, StorageError::InvalidName { .. }));
    }

    #[test]
    fn test_list_directories_skips_files() {
        let (_temp, storage) = storage();
        fs::create_dir(storage.base_dir().join("one")).unwrap();
        fs::create_dir(storage.base_dir().join("two")).unwrap();
        fs::write(storage.base_dir().join("stray.txt"), b"x").unwrap();

        assert_eq!(sorted(storage.list_directories().unwrap()), vec!["one", "two"]);
    }

    #[test]
    fn test_list_directories_missing_root_is_io_error() {
        let temp = TempDir::new().unwrap();
        let storage = UserStorage::new(temp.path().join("missing"));
        let err = storage.list_directories().unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_list_files_returns_files_and_subdirectories() {
        let (_temp, storage) = storage();
        let dir = storage.base_dir().join("Ana_Lopez_42");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), b"a").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();

        assert_eq!(
            sorted(storage.list_files("Ana_Lopez_42").unwrap()),
            vec!["a.txt", "nested"]
        );
    }

    #[test]
    fn test_list_files_missing_directory() {
        let (_temp, storage) = storage();
        let err = storage.list_files("nobody").unwrap_err();
        assert!(matches!(err, StorageError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_delete_file() {
        let (_temp, storage) = storage();
        let dir = storage.base_dir().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("f.bin"), b"x").unwrap();

        storage.delete_file("d", "f.bin").unwrap();
        assert!(storage.list_files("d").unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_file_leaves_directory_alone() {
        let (_temp, storage) = storage();
        let dir = storage.base_dir().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.bin"), b"x").unwrap();

        let err = storage.delete_file("d", "gone.bin").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert_eq!(storage.list_files("d").unwrap(), vec!["keep.bin"]);
    }

    #[test]
    fn test_delete_refuses_directories() {
        let (_temp, storage) = storage();
        fs::create_dir_all(storage.base_dir().join("d").join("sub")).unwrap();

        let err = storage.delete_file("d", "sub").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(storage.base_dir().join("d").join("sub").is_dir());
    }

    #[tokio::test]
    async fn test_upload_writes_bytes() {
        let (_temp, storage) = storage();
        fs::create_dir(storage.base_dir().join("d")).unwrap();

        let mut sink = storage.begin_upload("d", "report.pdf").unwrap();
        sink.write_chunk(b"%PDF-").await.unwrap();
        sink.write_chunk(b"1.7").await.unwrap();
        assert_eq!(sink.finish().await.unwrap(), 8);

        let stored = fs::read(storage.base_dir().join("d").join("report.pdf")).unwrap();
        assert_eq!(stored, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_upload_missing_directory_writes_nothing() {
        let (_temp, storage) = storage();
        let err = storage.begin_upload("nobody", "report.pdf").err().unwrap();
        assert!(matches!(err, StorageError::DirectoryNotFound(_)));
        assert!(!storage.base_dir().join("nobody").exists());
    }

    #[tokio::test]
    async fn test_upload_collision_keeps_original() {
        let (_temp, storage) = storage();
        let dir = storage.base_dir().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("report.pdf"), b"original").unwrap();

        let err = storage.begin_upload("d", "report.pdf").err().unwrap();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(fs::read(dir.join("report.pdf")).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_aborted_upload_leaves_no_partial_file() {
        let (_temp, storage) = storage();
        fs::create_dir(storage.base_dir().join("d")).unwrap();

        let mut sink = storage.begin_upload("d", "big.bin").unwrap();
        sink.write_chunk(b"partial").await.unwrap();
        sink.abort();

        assert!(storage.list_files("d").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_traversal_file_name() {
        let (_temp, storage) = storage();
        fs::create_dir(storage.base_dir().join("d")).unwrap();

        let err = storage.begin_upload("d", "../escape.txt").err().unwrap();
        assert!(matches!(err, StorageError::InvalidName { .. }));
        assert!(!storage.base_dir().join("escape.txt").exists());
    }
}
