use std::io;
use std::path::{Path, PathBuf};
use regex::RegexSet;
use walkdir::WalkDir;
use log::warn;

/// 展開輸入路徑：檔案直接加入，目錄則遞迴收集符合包含模式的檔案（依路徑排序）
pub fn collect_inputs(inputs: &[String], include_set: &RegexSet) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            files.extend(collect_dir(path, include_set)?);
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("輸入路徑 '{}' 不存在", input),
            ));
        }
    }
    Ok(files)
}

fn collect_dir(dir: &Path, include_set: &RegexSet) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("略過無法讀取的項目：{}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && include_set.is_match(&entry.path().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    if files.is_empty() {
        warn!("目錄 {} 中沒有符合條件的 TIFF 檔案", dir.display());
    }
    Ok(files)
}
