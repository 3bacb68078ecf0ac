/// Integration tests for batchkit
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end functionality of the batch file toolkit.
///
/// Test categories:
/// 1. Organize-by-type workflows (classification, collision handling)
/// 2. Custom category table configuration
/// 3. Batch rename workflows
/// 4. Text replacement with encodings
/// 5. Image and tabular format conversion
/// 6. Edge cases and error scenarios
use batchkit::category::{CategoryTable, FALLBACK_CATEGORY};
use batchkit::config::CategoryConfig;
use batchkit::image_convert::{self, ImageTarget};
use batchkit::organizer::{self, OrganizeError, OrganizeStats};
use batchkit::rename::{self, RenameRule};
use batchkit::scanner;
use batchkit::table_convert;
use batchkit::text_replace::{self, ReplaceOptions};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with configurable
/// file structure for testing.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content in the test directory.
    fn create_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
        file_path
    }

    /// Create multiple files at once.
    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, b"content");
        }
    }

    /// Create a subdirectory in the test directory.
    fn create_subdir(&self, name: &str) -> PathBuf {
        let dir_path = self.path().join(name);
        fs::create_dir(&dir_path).expect("Failed to create subdirectory");
        dir_path
    }

    /// Assert that a file exists at the given relative path.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist at the given relative path.
    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }
}

// ============================================================================
// Organize-by-type
// ============================================================================

#[test]
fn test_organize_mixed_files_into_categories() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.png", "c.txt", "d.xyz"]);

    let stats = organizer::organize_by_type(fixture.path(), &CategoryTable::default())
        .expect("Organize failed");

    assert_eq!(stats.files_moved, 4);
    // 图片, 文档 and Other are all created by this run.
    assert_eq!(stats.folders_created, 3);
    fixture.assert_file_exists("图片/a.jpg");
    fixture.assert_file_exists("图片/b.png");
    fixture.assert_file_exists("文档/c.txt");
    fixture.assert_file_exists("Other/d.xyz");
    fixture.assert_file_not_exists("a.jpg");
}

#[test]
fn test_organize_already_organized_folder_is_a_noop() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "c.txt"]);

    let table = CategoryTable::default();
    organizer::organize_by_type(fixture.path(), &table).expect("First organize failed");
    let stats = organizer::organize_by_type(fixture.path(), &table).expect("Second organize failed");

    assert_eq!(stats, OrganizeStats::default());
    fixture.assert_file_exists("图片/a.jpg");
    fixture.assert_file_exists("文档/c.txt");
}

#[test]
fn test_organize_nonexistent_folder_fails_and_moves_nothing() {
    let result = organizer::organize_by_type(
        Path::new("/non/existent/folder"),
        &CategoryTable::default(),
    );
    assert!(matches!(result, Err(OrganizeError::FolderNotFound { .. })));
}

#[test]
fn test_organize_resolves_name_collision_with_suffix() {
    let fixture = TestFixture::new();
    let docs = fixture.create_subdir("文档");
    fs::write(docs.join("report.txt"), "existing").unwrap();
    fixture.create_file("report.txt", b"incoming");

    let stats = organizer::organize_by_type(fixture.path(), &CategoryTable::default())
        .expect("Organize failed");

    assert_eq!(stats.files_moved, 1);
    // 文档 already existed, so no folder was created.
    assert_eq!(stats.folders_created, 0);
    fixture.assert_file_exists("文档/report_1.txt");
    let untouched = fs::read_to_string(docs.join("report.txt")).unwrap();
    assert_eq!(untouched, "existing");
}

#[test]
fn test_organize_ignores_subdirectories() {
    let fixture = TestFixture::new();
    let nested = fixture.create_subdir("projects");
    fs::write(nested.join("photo.jpg"), "x").unwrap();
    fixture.create_file("loose.jpg", b"y");

    let stats = organizer::organize_by_type(fixture.path(), &CategoryTable::default())
        .expect("Organize failed");

    assert_eq!(stats.files_moved, 1);
    fixture.assert_file_exists("projects/photo.jpg");
    fixture.assert_file_exists("图片/loose.jpg");
}

#[test]
fn test_organize_extensionless_file_goes_to_other() {
    let fixture = TestFixture::new();
    fixture.create_file("README", b"hello");

    organizer::organize_by_type(fixture.path(), &CategoryTable::default())
        .expect("Organize failed");

    fixture.assert_file_exists("Other/README");
}

#[test]
fn test_move_unique_missing_source_is_a_move_error() {
    let fixture = TestFixture::new();
    let result = organizer::move_unique(
        &fixture.path().join("ghost.txt"),
        &fixture.path().join("文档"),
    );
    assert!(matches!(result, Err(OrganizeError::MoveFailed { .. })));
}

// ============================================================================
// Classification properties
// ============================================================================

#[test]
fn test_every_table_extension_classifies_to_its_category() {
    let table = CategoryTable::default();
    let cases = [
        (".jpg", "图片"),
        (".jpeg", "图片"),
        (".png", "图片"),
        (".gif", "图片"),
        (".bmp", "图片"),
        (".webp", "图片"),
        (".pdf", "文档"),
        (".doc", "文档"),
        (".docx", "文档"),
        (".txt", "文档"),
        (".rtf", "文档"),
        (".xls", "表格"),
        (".xlsx", "表格"),
        (".csv", "表格"),
        (".mp4", "视频"),
        (".avi", "视频"),
        (".mov", "视频"),
        (".wmv", "视频"),
        (".flv", "视频"),
        (".mp3", "音频"),
        (".wav", "音频"),
        (".flac", "音频"),
        (".aac", "音频"),
        (".zip", "压缩包"),
        (".rar", "压缩包"),
        (".7z", "压缩包"),
        (".tar", "压缩包"),
        (".gz", "压缩包"),
        (".exe", "程序"),
        (".msi", "程序"),
        (".bat", "程序"),
        (".sh", "程序"),
        (".py", "程序"),
    ];
    for (ext, expected) in cases {
        assert_eq!(table.classify(ext), expected, "extension {}", ext);
    }
    assert_eq!(table.classify(".unknown"), FALLBACK_CATEGORY);
}

#[test]
fn test_organize_with_custom_config_table() {
    let fixture = TestFixture::new();
    let config_path = fixture.create_file(
        "table.toml",
        br#"
[[category]]
name = "snapshots"
extensions = [".jpg", ".toml"]
"#,
    );
    fixture.create_file("a.jpg", b"a");

    let table = CategoryConfig::load(Some(&config_path))
        .expect("Config load failed")
        .into_table()
        .expect("Table build failed");
    let stats = organizer::organize_by_type(fixture.path(), &table).expect("Organize failed");

    // Both the image and the config file itself match the custom table.
    assert_eq!(stats.files_moved, 2);
    fixture.assert_file_exists("snapshots/a.jpg");
    fixture.assert_file_exists("snapshots/table.toml");
}

// ============================================================================
// Batch rename
// ============================================================================

#[test]
fn test_scan_then_pattern_rename_workflow() {
    let fixture = TestFixture::new();
    fixture.create_files(&["holiday1.jpg", "holiday2.jpg", "holiday3.jpg"]);

    let mut entries = scanner::scan_folder(fixture.path()).expect("Scan failed");
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    let files: Vec<PathBuf> = entries.into_iter().map(|e| e.path).collect();

    let rule = RenameRule::Pattern {
        template: "trip_{n}".to_string(),
        start: 10,
    };
    let plans = rename::plan(&files, &rule).expect("Plan failed");
    let count = rename::apply(&plans).expect("Apply failed");

    assert_eq!(count, 3);
    fixture.assert_file_exists("trip_10.jpg");
    fixture.assert_file_exists("trip_11.jpg");
    fixture.assert_file_exists("trip_12.jpg");
    fixture.assert_file_not_exists("holiday1.jpg");
}

#[test]
fn test_affix_rename_keeps_extension() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("notes.txt", b"x");

    let rule = RenameRule::Affix {
        prefix: "old_".to_string(),
        suffix: "_2024".to_string(),
    };
    let plans = rename::plan(&[file], &rule).expect("Plan failed");
    rename::apply(&plans).expect("Apply failed");

    fixture.assert_file_exists("old_notes_2024.txt");
}

#[test]
fn test_rename_collision_aborts_and_keeps_remaining_files() {
    let fixture = TestFixture::new();
    let a = fixture.create_file("a.txt", b"a");
    fixture.create_file("b.txt", b"b");

    let rule = RenameRule::FindReplace {
        find: "a".to_string(),
        replace: "b".to_string(),
    };
    let plans = rename::plan(&[a], &rule).expect("Plan failed");
    let result = rename::apply(&plans);

    assert!(result.is_err());
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("b.txt");
}

// ============================================================================
// Text replacement
// ============================================================================

#[test]
fn test_replace_across_multiple_files() {
    let fixture = TestFixture::new();
    let a = fixture.create_file("a.txt", b"draft version, DRAFT copy");
    let b = fixture.create_file("b.txt", b"no match here");

    let count = text_replace::batch_replace(
        &[a.clone(), b],
        "draft",
        "final",
        &ReplaceOptions::default(),
    )
    .expect("Replace failed");

    assert_eq!(count, 2);
    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "final version, final copy"
    );
}

#[test]
fn test_regex_replace_workflow() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("log.txt", b"error=404 error=500");

    let options = ReplaceOptions {
        use_regex: true,
        case_sensitive: true,
        ..Default::default()
    };
    text_replace::batch_replace(&[file.clone()], r"error=(\d+)", "code $1", &options)
        .expect("Replace failed");

    assert_eq!(fs::read_to_string(&file).unwrap(), "code 404 code 500");
}

#[test]
fn test_replace_in_gbk_file_preserves_encoding() {
    let fixture = TestFixture::new();
    // "测试文本" in GBK.
    let gbk: &[u8] = &[0xB2, 0xE2, 0xCA, 0xD4, 0xCE, 0xC4, 0xB1, 0xBE];
    let file = fixture.create_file("cn.txt", gbk);

    let options = ReplaceOptions {
        encoding: "gbk".to_string(),
        ..Default::default()
    };
    text_replace::batch_replace(&[file.clone()], "文本", "内容", &options)
        .expect("Replace failed");

    let bytes = fs::read(&file).unwrap();
    let (decoded, _, had_errors) = encoding_rs::GBK.decode(&bytes);
    assert!(!had_errors);
    assert_eq!(decoded, "测试内容");
}

// ============================================================================
// Format conversion
// ============================================================================

#[test]
fn test_image_conversion_then_organize() {
    let fixture = TestFixture::new();
    let png = fixture.path().join("shot.png");
    image::RgbImage::from_pixel(2, 2, image::Rgb([0, 128, 255]))
        .save(&png)
        .expect("Failed to write test image");

    image_convert::convert_images(&[png], ImageTarget::Bmp, 85).expect("Convert failed");
    fixture.assert_file_exists("shot.bmp");

    let stats = organizer::organize_by_type(fixture.path(), &CategoryTable::default())
        .expect("Organize failed");
    // Both the original png and the converted bmp are images.
    assert_eq!(stats.files_moved, 2);
    fixture.assert_file_exists("图片/shot.png");
    fixture.assert_file_exists("图片/shot.bmp");
}

#[test]
fn test_csv_to_xlsx_and_back() {
    let fixture = TestFixture::new();
    let csv = fixture.create_file("inventory.csv", b"item,qty\nbolts,120\nnuts,80\n");

    let count = table_convert::csv_to_xlsx(&[csv]).expect("csv2xlsx failed");
    assert_eq!(count, 1);
    fixture.assert_file_exists("inventory.xlsx");

    let out = TestFixture::new();
    let xlsx = out.path().join("inventory.xlsx");
    fs::copy(fixture.path().join("inventory.xlsx"), &xlsx).unwrap();
    table_convert::xlsx_to_csv(&[xlsx]).expect("xlsx2csv failed");

    let text = fs::read_to_string(out.path().join("inventory.csv")).unwrap();
    assert_eq!(
        text.trim_start_matches('\u{feff}'),
        "item,qty\nbolts,120\nnuts,80\n"
    );
}

// ============================================================================
// Scanner
// ============================================================================

#[test]
fn test_background_scan_handoff() {
    let fixture = TestFixture::new();
    fixture.create_files(&["one.txt", "two.txt"]);
    fixture.create_subdir("ignored");

    let rx = scanner::scan_in_background(fixture.path().to_path_buf());
    let entries = rx
        .recv()
        .expect("Worker dropped without sending")
        .expect("Scan failed");

    assert_eq!(entries.len(), 2);
}
