//! End-to-end runs against temporary folders

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use blockmove::{
    ConfigStore, FileConfigStore, FileOutcome, Host, InsertAnchor, MemoryConfigStore, MoveError,
    Notice, NoticeLevel, Orchestrator, RunOptions, SettingKey,
};

struct ScriptedHost {
    folder: Option<PathBuf>,
    answers: VecDeque<String>,
    notices: Vec<Notice>,
}

impl ScriptedHost {
    fn new(folder: &std::path::Path, answers: &[&str]) -> Self {
        Self {
            folder: Some(folder.to_path_buf()),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            notices: Vec::new(),
        }
    }
}

impl Host for ScriptedHost {
    fn choose_folder(&mut self) -> Option<PathBuf> {
        self.folder.take()
    }

    fn prompt(&mut self, _message: &str, default: Option<&str>) -> Option<String> {
        self.answers
            .pop_front()
            .or_else(|| default.map(str::to_string))
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

const FILE_A: &str = "header\n/* start */\nBODY\n/* end */\nfooter\ninsert_here\n";
const FILE_B: &str = "nothing matches here";

#[test]
fn two_file_folder_moves_block_and_skips_the_other() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, FILE_A).unwrap();
    fs::write(&b, FILE_B).unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["/* start */ ... /* end */", "insert_here"]);
    let mut store = MemoryConfigStore::new();
    let report = Orchestrator::new(&mut host, &mut store).run().unwrap();

    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "header\n\nfooter\ninsert_here\n/* start */\nBODY\n/* end */\n\n"
    );
    assert_eq!(fs::read_to_string(&b).unwrap(), FILE_B);

    assert!(report.outcome_for(&a).unwrap().is_relocated());
    assert_eq!(report.outcome_for(&b), Some(&FileOutcome::NoSourceMatch));
    assert_eq!(report.relocated(), 1);
    assert_eq!(report.skipped(), 1);

    let last = host.notices.last().unwrap();
    assert_eq!(last.level, NoticeLevel::Info);
    assert!(last.message.contains("moved successfully"));
    assert!(
        host.notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("b.txt"))
    );
}

#[test]
fn empty_folder_reports_no_files_found() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["a ... b", "c"]);
    let mut store = MemoryConfigStore::new();
    let result = Orchestrator::new(&mut host, &mut store).run();

    assert!(matches!(result, Err(MoveError::NoFilesFound { .. })));
    assert_eq!(host.notices.len(), 1);
    assert_eq!(host.notices[0].level, NoticeLevel::Error);
}

#[test]
fn missing_folder_is_fatal_io_error() {
    let dir = TempDir::new().unwrap();
    let mut host = ScriptedHost::new(&dir.path().join("gone"), &["a", "b"]);
    let mut store = MemoryConfigStore::new();

    let result = Orchestrator::new(&mut host, &mut store).run();
    assert!(matches!(result, Err(MoveError::Io { .. })));
}

#[test]
fn binary_and_unmatched_files_do_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    let binary = dir.path().join("0-image.bin");
    let no_dest = dir.path().join("1-no-dest.txt");
    let good = dir.path().join("sub").join("2-good.txt");
    fs::write(&binary, [0x89u8, b'P', b'N', b'G', 0xFF]).unwrap();
    fs::write(&no_dest, "BEGIN x END").unwrap();
    fs::write(&good, "BEGIN x END\nanchor\n").unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["BEGIN ... END", "^anchor$"]);
    let mut store = MemoryConfigStore::new();
    let report = Orchestrator::new(&mut host, &mut store).run().unwrap();

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.outcome_for(&binary), Some(&FileOutcome::SkippedBinary));
    assert_eq!(
        report.outcome_for(&no_dest),
        Some(&FileOutcome::NoDestinationMatch)
    );
    assert!(report.outcome_for(&good).unwrap().is_relocated());
    assert_eq!(fs::read_to_string(&good).unwrap(), "\nanchor\nBEGIN x END\n\n");
    assert_eq!(fs::read(&binary).unwrap(), vec![0x89u8, b'P', b'N', b'G', 0xFF]);
}

#[test]
fn before_anchor_inserts_ahead_of_destination() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, FILE_A).unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["/* start */ ... /* end */", "insert_here"]);
    let mut store = MemoryConfigStore::new();
    Orchestrator::new(&mut host, &mut store)
        .with_options(RunOptions {
            anchor: InsertAnchor::Before,
            ..RunOptions::default()
        })
        .run()
        .unwrap();

    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "header\n\nfooter\n\n/* start */\nBODY\n/* end */\ninsert_here\n"
    );
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, FILE_A).unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["/* start */ ... /* end */", "insert_here"]);
    let mut store = MemoryConfigStore::new();
    let report = Orchestrator::new(&mut host, &mut store)
        .with_options(RunOptions {
            dry_run: true,
            ..RunOptions::default()
        })
        .run()
        .unwrap();

    assert_eq!(fs::read_to_string(&a).unwrap(), FILE_A);
    let change = report.files[0].change.as_ref().unwrap();
    assert_eq!(change.before, FILE_A);
    assert!(change.after.ends_with("insert_here\n/* start */\nBODY\n/* end */\n\n"));
}

#[test]
fn saved_patterns_survive_in_file_store() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config").join("config.toml");
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    fs::write(work.join("a.txt"), FILE_A).unwrap();

    {
        let mut store = FileConfigStore::open(config_path.clone()).unwrap();
        let mut host = ScriptedHost::new(&work, &["/* start */ ... /* end */", "insert_here"]);
        let mut orchestrator = Orchestrator::new(&mut host, &mut store);
        orchestrator.set_source_pattern().unwrap();
        orchestrator.set_destination_pattern().unwrap();
    }

    // a fresh store reads the saved values back as prompt defaults
    let mut store = FileConfigStore::open(config_path).unwrap();
    assert_eq!(
        store.get(SettingKey::DestinationRegex).as_deref(),
        Some("insert_here")
    );
    let mut host = ScriptedHost::new(&work, &[]);
    let report = Orchestrator::new(&mut host, &mut store).run().unwrap();
    assert_eq!(report.relocated(), 1);
}

#[test]
fn report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.txt"), FILE_B).unwrap();

    let mut host = ScriptedHost::new(dir.path(), &["x ... y", "z"]);
    let mut store = MemoryConfigStore::new();
    let report = Orchestrator::new(&mut host, &mut store).run().unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["files"][0]["status"], "no_source_match");
    assert_eq!(json["source"], "x ... y");
    assert!(json["files"][0].get("change").is_none());
}
