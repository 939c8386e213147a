use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tiff_to_image::{
    BatchError, CallbackObserver, ConversionError, ConversionFacade, ConversionFacadeTrait,
    ConversionOptions, ConversionRecord, NoopObserver,
};

/// 模擬 convert：輸出兩頁，輸入檔名含 broken 時失敗，並在暫存目錄留下 magick- 檔案
#[cfg(unix)]
const FAKE_CONVERT: &str = r#"#!/bin/sh
tmp=""
if [ "$1" = "-define" ]; then
  tmp="${2#registry:temporary-path=}"
  shift 2
fi
input="$1"
out="$4"
if [ -n "$tmp" ]; then
  touch "$tmp/magick-$$"
fi
case "$input" in
  *broken*) echo "convert: improper image header '$input'" >&2; exit 1 ;;
esac
for page in 1 2; do
  touch "$(printf '%s' "$out" | sed "s/%d/$page/")"
done
"#;

/// 寫入腳本後立即執行時，若其他測試執行緒同時 fork 會出現 ETXTBSY，因此序列化
#[cfg(unix)]
static SCRIPT_LOCK: Mutex<()> = Mutex::new(());

#[cfg(unix)]
fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let script = dir.join(name);
    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
fn install_fake_convert(dir: &Path) -> PathBuf {
    install_script(dir, "fake-convert", FAKE_CONVERT)
}

#[cfg(unix)]
#[test]
fn converts_batch_reports_failures_and_sweeps_temp() {
    let _serial = SCRIPT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let root = tempfile::tempdir().unwrap();
    let tool = install_fake_convert(root.path());
    let in_dir = root.path().join("in");
    let out_dir = root.path().join("out");
    let tmp_dir = root.path().join("tmp");
    fs::create_dir_all(&in_dir).unwrap();
    fs::create_dir_all(&tmp_dir).unwrap();
    fs::write(tmp_dir.join("keep.txt"), b"keep").unwrap();

    let inputs: Vec<PathBuf> = ["scan.tiff", "broken.tif", "fax.tif"]
        .iter()
        .map(|name| {
            let path = in_dir.join(name);
            fs::write(&path, b"II*\0").unwrap();
            path
        })
        .collect();

    let progress = Mutex::new(Vec::new());
    let observer = CallbackObserver::new(
        |records: &[ConversionRecord], total: usize| progress.lock().unwrap().push((records.len(), total)),
        |_errors: &[ConversionError], _records: &[ConversionRecord], _total: usize| {},
    );
    let options = ConversionOptions {
        tool: tool.to_string_lossy().to_string(),
        temp_path: Some(tmp_dir.clone()),
        auto_cleanup_temp: true,
        ..Default::default()
    };

    let facade = ConversionFacade::with_defaults();
    let summary = facade.submit(inputs.clone(), out_dir.clone(), options, &observer).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].target, out_dir.join("broken"));
    assert!(summary.errors[0].error.to_string().contains("improper image header"));
    assert_eq!(*progress.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);

    assert!(out_dir.join("scan/page1.png").is_file());
    assert!(out_dir.join("scan/page2.png").is_file());
    assert!(out_dir.join("fax/page1.png").is_file());
    assert!(out_dir.join("broken").is_dir());
    assert!(!out_dir.join("broken/page1.png").exists());

    let leftovers: Vec<_> = fs::read_dir(&tmp_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["keep.txt"]);
}

#[test]
fn validation_errors_abort_before_any_output() {
    let root = tempfile::tempdir().unwrap();
    let out_dir = root.path().join("out");
    let facade = ConversionFacade::with_defaults();

    let err = facade
        .submit(vec![], out_dir.clone(), ConversionOptions::default(), &NoopObserver)
        .unwrap_err();
    assert!(matches!(err, BatchError::NoInputs));

    let err = facade
        .submit(vec![root.path().join("a.tif")], PathBuf::new(), ConversionOptions::default(), &NoopObserver)
        .unwrap_err();
    assert!(matches!(err, BatchError::NoDestination));

    assert!(!out_dir.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_file_names_are_passed_through_untouched() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let _serial = SCRIPT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let root = tempfile::tempdir().unwrap();
    let tool = install_script(
        root.path(),
        "check-input",
        "#!/bin/sh\n[ -f \"$1\" ] || { echo \"missing $1\" >&2; exit 1; }\n",
    );
    let input = root.path().join(OsStr::from_bytes(b"scan\xff.tif"));
    fs::write(&input, b"II*\0").unwrap();
    let out_dir = root.path().join("out");

    let options = ConversionOptions {
        tool: tool.to_string_lossy().to_string(),
        ..Default::default()
    };
    let summary = ConversionFacade::with_defaults()
        .submit(vec![input.clone()], out_dir.clone(), options, &NoopObserver)
        .unwrap();

    assert_eq!(summary.failed, 0, "errors: {:?}", summary.errors);
    assert_eq!(summary.succeeded, 1);
    let expected_target = out_dir.join(OsStr::from_bytes(b"scan\xff"));
    assert_eq!(summary.records[0].target, expected_target);
    assert!(expected_target.is_dir());
}
