use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::{debug, warn};
use crate::models::conversion::{ConversionCommand, InvokeError};
use crate::service::traits::i_service::ConverterServiceTrait;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 以子行程呼叫 ImageMagick（或相容工具）的轉換服務
pub struct ConverterService;

impl ConverterService {
    pub fn new() -> Self {
        ConverterService
    }
}

impl Default for ConverterService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterServiceTrait for ConverterService {
    fn run(&self, command: &ConversionCommand, timeout: Option<Duration>) -> Result<String, InvokeError> {
        debug!("執行轉換指令：{}", command.display());
        let mut child = Command::new(&command.tool)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| InvokeError::Spawn {
                tool: command.tool.clone(),
                message: e.to_string(),
            })?;

        // 另開執行緒讀取輸出，避免管線塞滿時子行程卡住
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match timeout {
            Some(limit) => wait_with_timeout(&mut child, limit),
            None => child.wait().map(Some),
        }
        .map_err(|e| InvokeError::Spawn {
            tool: command.tool.clone(),
            message: e.to_string(),
        })?;

        let Some(status) = status else {
            // 孫行程可能仍持有管線，不等待讀取執行緒
            drop(stdout);
            drop(stderr);
            return Err(InvokeError::Timeout {
                tool: command.tool.clone(),
                limit: timeout.unwrap_or_default(),
            });
        };

        let stdout = join_output(stdout);
        let stderr = join_output(stderr);
        if status.success() {
            Ok(stdout)
        } else {
            Err(InvokeError::ExitStatus {
                tool: command.tool.clone(),
                code: status.code(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

/// 逾時則終止子行程並回傳 None
fn wait_with_timeout(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            if let Err(e) = child.kill() {
                warn!("終止逾時子行程失敗：{}", e);
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).to_string()
        })
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
