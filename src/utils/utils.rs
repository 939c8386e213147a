use std::io;
use std::sync::Mutex;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use regex::RegexSet;
use crate::facade::traits::i_conversion::ConversionObserver;
use crate::models::conversion::{ConversionError, ConversionRecord};
use crate::models::job::LogVerbosity;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "debug" => log::LevelFilter::Debug,
        _ => log::LevelFilter::Error,
    };
    // 互動模式與 CLI 模式可能都會呼叫，重複初始化時忽略
    let _ = env_logger::Builder::new()
        .filter_level(log_level_filter)
        .format_target(false)
        .try_init();
    Ok(())
}

/// 日誌等級對應到轉換流程的輸出詳細程度
pub fn verbosity_for(log_level: &str) -> LogVerbosity {
    match log_level {
        "info" | "debug" => LogVerbosity::Info,
        _ => LogVerbosity::ErrorsOnly,
    }
}

/// 以 indicatif 進度條顯示批次進度
pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
    failed: Mutex<usize>,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
            failed: Mutex::new(0),
        }
    }

    pub fn update(&self, count: u64, failed: usize, current: &str) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };
        self.pb.set_message(format!(
            "轉換 {}，失敗 {} 個，速度：{:.2} 檔案/秒",
            current, failed, speed
        ));
        self.pb.set_position(count);
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(format!(
            "完成，成功 {} 個，失敗 {} 個，耗時 {:.1} 秒",
            succeeded,
            failed,
            self.start.elapsed().as_secs_f64()
        ));
    }
}

impl ConversionObserver for ProgressManager {
    fn on_progress(&self, records: &[ConversionRecord], _total: usize) {
        let Some(last) = records.last() else {
            return;
        };
        let mut failed = self.failed.lock().unwrap_or_else(|e| e.into_inner());
        if !last.success {
            *failed += 1;
        }
        let name = last
            .original
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.update(records.len() as u64, *failed, &name);
    }

    fn on_complete(&self, errors: &[ConversionError], records: &[ConversionRecord], _total: usize) {
        self.finish(records.len() - errors.len(), errors.len());
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}

/// 將 `*.tif` 之類的萬用字元模式轉成 RegexSet
pub fn create_regex_set(patterns: &[String]) -> RegexSet {
    let regex_patterns: Vec<_> = patterns
        .iter()
        .map(|p| format!("(?i){}$", regex::escape(p).replace(r"\*", ".*").replace(r"\?", ".")))
        .collect();

    RegexSet::new(&regex_patterns).unwrap_or_else(|e| {
        log::warn!("無效的包含模式: {}，使用空集作為回退", e);
        RegexSet::empty()
    })
}
