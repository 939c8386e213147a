use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use regex::Regex;
use crate::models::conversion::ConversionCommand;
use crate::models::job::{ConversionOptions, DEFAULT_FORMAT, DEFAULT_PREFIX};

fn filename_regex() -> &'static Regex {
    static FILENAME: OnceLock<Regex> = OnceLock::new();
    FILENAME.get_or_init(|| Regex::new(r"([^\\/]*)\.[a-zA-Z]+$").expect("檔名規則必須是合法的正則表達式"))
}

/// 取得不含副檔名的檔名，例如 `/a/b/scan.tiff` -> `scan`
///
/// UTF-8 路徑同時接受 `/` 與 `\` 作為分隔；其他路徑依平台規則取 file_stem，保留原始位元組。
pub fn derive_filename(input: &Path) -> OsString {
    let Some(path_str) = input.to_str() else {
        return input
            .file_stem()
            .or_else(|| input.file_name())
            .unwrap_or_default()
            .to_os_string();
    };
    if let Some(caps) = filename_regex().captures(path_str) {
        return OsString::from(&caps[1]);
    }
    // 沒有副檔名時直接使用最後一段
    OsString::from(path_str.rsplit(['/', '\\']).next().unwrap_or_default())
}

/// 指定 save_folder 時所有輸入共用同一個目錄，否則每個檔案各自一個目錄
pub fn resolve_target_dir(destination: &Path, save_folder: Option<&str>, filename: &OsStr) -> PathBuf {
    match save_folder.filter(|f| !f.is_empty()) {
        Some(folder) => destination.join(folder.trim_start_matches(['/', '\\'])),
        None => destination.join(filename),
    }
}

/// 輸出樣板：`<target>/<prefix>%d<suffix>.<format>`，頁碼由轉換工具填入
pub fn output_template(target: &Path, options: &ConversionOptions) -> OsString {
    let prefix = if options.prefix.is_empty() { DEFAULT_PREFIX } else { &options.prefix };
    let format = if options.format.is_empty() { DEFAULT_FORMAT } else { &options.format };
    let mut template = target.as_os_str().to_os_string();
    if !matches!(target.as_os_str().as_encoded_bytes().last(), Some(b'/') | Some(b'\\')) {
        template.push("/");
    }
    template.push(format!("{}%d{}.{}", prefix, options.suffix, format));
    template
}

pub fn build_command(input: &Path, target: &Path, options: &ConversionOptions) -> ConversionCommand {
    let mut args: Vec<OsString> = Vec::with_capacity(6);
    if let Some(temp_path) = &options.temp_path {
        let mut define = OsString::from("registry:temporary-path=");
        define.push(temp_path);
        args.push("-define".into());
        args.push(define);
    }
    args.push(input.as_os_str().to_os_string());
    args.push("-scene".into());
    args.push("1".into());
    args.push(output_template(target, options));
    ConversionCommand {
        tool: options.tool.clone(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_drops_directories_and_extension() {
        assert_eq!(derive_filename(Path::new("/a/b/scan.tiff")), "scan");
        assert_eq!(derive_filename(Path::new("report.final.tif")), "report.final");
        assert_eq!(derive_filename(Path::new(r"C:\scans\fax.TIF")), "fax");
    }

    #[test]
    fn filename_without_extension_falls_back_to_last_segment() {
        assert_eq!(derive_filename(Path::new("/in/noext")), "noext");
    }

    #[test]
    fn target_dir_uses_filename_or_save_folder() {
        let dest = Path::new("/out");
        let scan = OsStr::new("scan");
        assert_eq!(resolve_target_dir(dest, None, scan), PathBuf::from("/out/scan"));
        assert_eq!(resolve_target_dir(dest, Some("all"), scan), PathBuf::from("/out/all"));
        assert_eq!(resolve_target_dir(dest, Some(""), scan), PathBuf::from("/out/scan"));
    }

    #[test]
    fn default_output_template() {
        let options = ConversionOptions::default();
        let command = build_command(Path::new("/in/scan.tiff"), Path::new("/out/scan"), &options);
        assert_eq!(command.tool, "convert");
        assert_eq!(command.output_template(), Some(OsStr::new("/out/scan/page%d.png")));
        assert_eq!(command.display(), "convert /in/scan.tiff -scene 1 /out/scan/page%d.png");
    }

    #[test]
    fn temp_path_directive_precedes_input() {
        let options = ConversionOptions {
            temp_path: Some(PathBuf::from("/tmp/magick")),
            prefix: "p".to_string(),
            suffix: "_x".to_string(),
            format: "jpg".to_string(),
            ..Default::default()
        };
        let command = build_command(Path::new("a.tif"), Path::new("/out/a"), &options);
        assert_eq!(
            command.args,
            [
                "-define",
                "registry:temporary-path=/tmp/magick",
                "a.tif",
                "-scene",
                "1",
                "/out/a/p%d_x.jpg",
            ]
            .map(OsString::from)
        );
    }

    #[test]
    fn empty_prefix_and_format_fall_back_to_defaults() {
        let options = ConversionOptions {
            prefix: String::new(),
            format: String::new(),
            ..Default::default()
        };
        assert_eq!(output_template(Path::new("/out/a"), &options), "/out/a/page%d.png");
        assert_eq!(output_template(Path::new("/out/a/"), &options), "/out/a/page%d.png");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_reach_the_command_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"/in/scan\xff.tif"));
        let filename = derive_filename(input);
        assert_eq!(filename.as_bytes(), b"scan\xff");

        let target = resolve_target_dir(Path::new("/out"), None, &filename);
        assert_eq!(target.as_os_str().as_bytes(), b"/out/scan\xff");

        let options = ConversionOptions {
            temp_path: Some(PathBuf::from(OsStr::from_bytes(b"/tmp/t\xfe"))),
            ..Default::default()
        };
        let command = build_command(input, &target, &options);
        assert_eq!(command.args[1].as_bytes(), b"registry:temporary-path=/tmp/t\xfe");
        assert_eq!(command.args[2].as_os_str(), input.as_os_str());
        assert_eq!(command.output_template().unwrap().as_bytes(), b"/out/scan\xff/page%d.png");
    }
}
