use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use chrono::Local;
use log::{error, info, warn};
use rayon::prelude::*;
use crate::error::{BatchError, Result};
use crate::facade::traits::i_conversion::{ConversionFacadeTrait, ConversionObserver};
use crate::models::conversion::{ConversionError, ConversionRecord, InvokeError};
use crate::models::job::{ConversionJob, ConversionOptions, LogVerbosity, RunSummary, TEMP_ARTIFACT_PATTERN};
use crate::service::cleanup::CleanupService;
use crate::service::converter::ConverterService;
use crate::service::directory::DirectoryService;
use crate::service::tracker::ResultTracker;
use crate::service::traits::i_service::{
    CleanupServiceTrait, ConverterServiceTrait, DirOutcome, DirectoryServiceTrait,
};
use crate::utils::command::{build_command, derive_filename, resolve_target_dir};

/// 批次轉換的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Validating,
    /// 正在處理的項目索引；平行模式下為已完成數量
    Processing(usize),
    Finalizing,
}

/// 取消目前批次的控制代碼，在每個項目開始前檢查
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 平行模式下依輸入位置存放的結果
struct Slots {
    items: Vec<Option<(ConversionRecord, Option<ConversionError>)>>,
    completed: Vec<ConversionRecord>,
}

/// 批次轉換協調者：依序（或以有限執行緒池）轉換每個 TIFF，彙整結果並清理暫存檔
pub struct ConversionFacade {
    directory_service: Box<dyn DirectoryServiceTrait>,
    converter_service: Box<dyn ConverterServiceTrait>,
    cleanup_service: Box<dyn CleanupServiceTrait>,
    state: Mutex<BatchState>,
    cancelled: Arc<AtomicBool>,
}

impl ConversionFacade {
    pub fn new(
        directory_service: Box<dyn DirectoryServiceTrait>,
        converter_service: Box<dyn ConverterServiceTrait>,
        cleanup_service: Box<dyn CleanupServiceTrait>,
    ) -> Self {
        ConversionFacade {
            directory_service,
            converter_service,
            cleanup_service,
            state: Mutex::new(BatchState::Idle),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 使用本機檔案系統與 ImageMagick 的預設組合
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(DirectoryService::new()),
            Box::new(ConverterService::new()),
            Box::new(CleanupService::new()),
        )
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    pub fn state(&self) -> BatchState {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: BatchState) {
        *self.lock_state() = state;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 轉換單一項目，回傳目標目錄與轉換結果
    fn convert_item(&self, input: &Path, job: &ConversionJob) -> (PathBuf, std::result::Result<(), InvokeError>) {
        let options = &job.options;
        let verbose = options.log_verbosity == LogVerbosity::Info;
        let filename = derive_filename(input);
        let target = resolve_target_dir(&job.destination, options.save_folder.as_deref(), &filename);

        match self.directory_service.ensure(&target) {
            Ok(DirOutcome::AlreadyPresent) if verbose => info!("{}：目錄已存在", filename.to_string_lossy()),
            Ok(DirOutcome::Created) if verbose => info!("{}：已建立目錄 {}", filename.to_string_lossy(), target.display()),
            Ok(_) => {}
            // 目錄建立失敗仍嘗試轉換，由轉換工具回報最終結果
            Err(e) => error!("建立目錄 {} 失敗：{}", target.display(), e),
        }

        let command = build_command(input, &target, options);
        let outcome = self
            .converter_service
            .run(&command, options.timeout)
            .map(|_| ());
        match &outcome {
            Ok(()) if verbose => info!("  轉換成功：{}", input.display()),
            Ok(()) => {}
            Err(e) => warn!("  轉換失敗：{}（{}）", input.display(), e),
        }
        (target, outcome)
    }

    fn process_sequential(&self, job: &ConversionJob, observer: &dyn ConversionObserver) -> (ResultTracker, bool) {
        let total = job.total();
        let mut tracker = ResultTracker::with_capacity(total);
        for (index, input) in job.inputs.iter().enumerate() {
            if self.is_cancelled() {
                warn!("批次已取消，剩餘 {} 個檔案未處理", total - index);
                return (tracker, true);
            }
            self.set_state(BatchState::Processing(index));
            let (target, outcome) = self.convert_item(input, job);
            tracker.record_outcome(input.clone(), target, outcome);
            observer.on_progress(tracker.records(), total);
        }
        (tracker, false)
    }

    fn process_parallel(
        &self,
        job: &ConversionJob,
        observer: &dyn ConversionObserver,
        pool: rayon::ThreadPool,
    ) -> (ResultTracker, bool) {
        let total = job.total();
        let slots = Mutex::new(Slots {
            items: vec![None; total],
            completed: Vec::with_capacity(total),
        });

        pool.install(|| {
            job.inputs.par_iter().enumerate().for_each(|(index, input)| {
                if self.is_cancelled() {
                    return;
                }
                let (target, outcome) = self.convert_item(input, job);
                let record = ConversionRecord {
                    original: input.clone(),
                    target: target.clone(),
                    success: outcome.is_ok(),
                };
                let error = outcome.err().map(|error| ConversionError { target, error });

                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                slots.completed.push(record.clone());
                slots.items[index] = Some((record, error));
                self.set_state(BatchState::Processing(slots.completed.len()));
                observer.on_progress(&slots.completed, total);
            });
        });

        let slots = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
        let cancelled = slots.completed.len() < total;
        if cancelled {
            warn!("批次已取消，剩餘 {} 個檔案未處理", total - slots.completed.len());
        }

        let mut tracker = ResultTracker::with_capacity(total);
        for (record, error) in slots.items.into_iter().flatten() {
            tracker.append_record(record);
            if let Some(error) = error {
                tracker.append_error(error);
            }
        }
        (tracker, cancelled)
    }

    /// 只有在目標目錄互不重疊時才能平行處理，否則輸出檔名會互相覆蓋
    fn worker_pool(&self, job: &ConversionJob) -> Option<rayon::ThreadPool> {
        let options = &job.options;
        if options.jobs <= 1 || job.total() <= 1 {
            return None;
        }
        let mut targets = HashSet::with_capacity(job.total());
        let disjoint = job.inputs.iter().all(|input| {
            targets.insert(resolve_target_dir(
                &job.destination,
                options.save_folder.as_deref(),
                &derive_filename(input),
            ))
        });
        if !disjoint {
            warn!("多個輸入檔案共用同一輸出目錄，改為逐一轉換");
            return None;
        }
        match rayon::ThreadPoolBuilder::new().num_threads(options.jobs).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("建立執行緒池失敗，改為逐一轉換：{}", e);
                None
            }
        }
    }

    fn finalize(&self, job: &ConversionJob, tracker: &ResultTracker) {
        let options = &job.options;
        let succeeded = tracker.succeeded();
        let failed = tracker.failed();
        if options.log_verbosity == LogVerbosity::Info {
            info!("{} 個檔案轉換成功", succeeded);
            info!("{} 個檔案轉換失敗", failed);
        } else if failed > 0 {
            error!("{} 個檔案轉換成功，{} 個檔案轉換失敗", succeeded, failed);
        }
        for err in tracker.errors() {
            error!("{}：{}", err.target.display(), err.error);
        }

        if let (Some(temp_path), true) = (&options.temp_path, options.auto_cleanup_temp) {
            let report = self.cleanup_service.sweep(temp_path, TEMP_ARTIFACT_PATTERN);
            if options.log_verbosity == LogVerbosity::Info {
                info!("已清理暫存目錄 {}，刪除 {} 個項目", temp_path.display(), report.deleted.len());
            }
            if !report.failed.is_empty() {
                warn!("{} 個暫存檔無法刪除：{:?}", report.failed.len(), report.failed);
            }
        }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn submit(
        &self,
        inputs: Vec<PathBuf>,
        destination: PathBuf,
        options: ConversionOptions,
        observer: &dyn ConversionObserver,
    ) -> Result<RunSummary> {
        {
            let mut state = self.lock_state();
            if *state != BatchState::Idle {
                return Err(BatchError::JobInFlight);
            }
            *state = BatchState::Validating;
        }
        let _idle = IdleGuard(self);

        let job = ConversionJob::new(inputs, destination, options).inspect_err(|e| error!("{}", e))?;
        self.cancelled.store(false, Ordering::SeqCst);
        let started_at = Local::now();
        let total = job.total();
        if job.options.log_verbosity == LogVerbosity::Info {
            info!("開始轉換 {} 個 TIFF 檔案，輸出目錄：{}", total, job.destination.display());
        }

        let (tracker, cancelled) = match self.worker_pool(&job) {
            Some(pool) => self.process_parallel(&job, observer, pool),
            None => self.process_sequential(&job, observer),
        };

        self.set_state(BatchState::Finalizing);
        self.finalize(&job, &tracker);
        observer.on_complete(tracker.errors(), tracker.records(), total);

        let succeeded = tracker.succeeded();
        let failed = tracker.failed();
        let (records, errors) = tracker.into_parts();
        Ok(RunSummary {
            total,
            succeeded,
            failed,
            cancelled,
            records,
            errors,
            started_at,
            finished_at: Local::now(),
        })
    }
}

/// 離開 submit 時（包含驗證失敗）回到 Idle
struct IdleGuard<'a>(&'a ConversionFacade);

impl Drop for IdleGuard<'_> {
    fn drop(&mut self) {
        self.0.set_state(BatchState::Idle);
    }
}
