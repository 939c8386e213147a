use std::fs;
use std::path::Path;
use log::{debug, error, warn};
use crate::service::traits::i_service::{CleanupServiceTrait, SweepReport};

/// 清理外部工具留在暫存目錄的殘留檔案
pub struct CleanupService;

impl CleanupService {
    pub fn new() -> Self {
        CleanupService
    }
}

impl Default for CleanupService {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupServiceTrait for CleanupService {
    fn sweep(&self, temp_path: &Path, pattern: &str) -> SweepReport {
        let mut report = SweepReport::default();
        let entries = match fs::read_dir(temp_path) {
            Ok(entries) => entries,
            Err(e) => {
                error!("無法讀取暫存目錄 {}：{}", temp_path.display(), e);
                report.listing_failed = true;
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("讀取暫存目錄項目失敗：{}", e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            // 僅做區分大小寫的子字串比對
            if !name.contains(pattern) {
                continue;
            }
            let path = entry.path();
            // 符號連結只刪除連結本身
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let removed = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match removed {
                Ok(()) => report.deleted.push(name),
                Err(e) => {
                    warn!("刪除暫存檔 {} 失敗：{}", path.display(), e);
                    report.failed.push(name);
                }
            }
        }

        report.deleted.sort();
        report.failed.sort();
        debug!("暫存目錄 {} 清理完成，刪除 {} 個項目", temp_path.display(), report.deleted.len());
        report
    }
}
