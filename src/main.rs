use std::io;
use std::process::ExitCode;

use tiff_to_image::action::cli::process_args;

fn main() -> io::Result<ExitCode> {
    let args: Vec<String> = std::env::args().collect();
    let summary = process_args(args)?;
    log::info!("程式執行完成，共 {} 個檔案", summary.total);
    println!(
        "轉換完成！成功 {} 個，失敗 {} 個{}",
        summary.succeeded,
        summary.failed,
        if summary.cancelled { "（已取消）" } else { "" }
    );
    for err in &summary.errors {
        eprintln!("  {}：{}", err.target.display(), err.error);
    }
    Ok(if summary.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
