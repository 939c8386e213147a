use std::io;
use std::path::Path;
use crate::service::traits::i_service::{DirOutcome, DirectoryServiceTrait};

/// 以本機檔案系統實作的目錄準備服務
pub struct DirectoryService;

impl DirectoryService {
    pub fn new() -> Self {
        DirectoryService
    }
}

impl Default for DirectoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryServiceTrait for DirectoryService {
    fn ensure(&self, dir: &Path) -> io::Result<DirOutcome> {
        if dir.is_dir() {
            return Ok(DirOutcome::AlreadyPresent);
        }
        if dir.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{}' 已存在但不是目錄", dir.display()),
            ));
        }
        create_dir(dir)?;
        Ok(DirOutcome::Created)
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::fs::DirBuilder;
    use std::os::unix::fs::DirBuilderExt;
    DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}
