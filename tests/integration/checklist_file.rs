//! Checklist file format on disk: line content, parsing policy, and write
//! atomicity.

use super::test_utils::Fixture;
use chkdigest::checklist::{load_checklist, write_checklist};
use chkdigest::error::StorageError;
use chkdigest::types::{DigestList, FileDigest};
use std::fs;

fn list(entries: &[(&str, &str)]) -> DigestList {
    entries
        .iter()
        .map(|(p, d)| FileDigest::new(*p, *d))
        .collect()
}

#[test]
fn test_written_file_has_one_line_per_entry() {
    let fx = Fixture::new();
    let path = fx.checklist_path();
    let digests = list(&[
        ("files/a", "5d41402abc4b2a76b9719d911017c592"),
        ("files/my file.txt", "7d793037a0760186574b0282f2f435e7"),
    ]);

    assert_eq!(write_checklist(&path, &digests).unwrap(), 2);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "5d41402abc4b2a76b9719d911017c592 files/a\n\
         7d793037a0760186574b0282f2f435e7 files/my file.txt\n"
    );

    let (map, stats) = load_checklist(&path).unwrap();
    assert_eq!(map.get("files/my file.txt"), Some("7d793037a0760186574b0282f2f435e7"));
    assert_eq!(stats.malformed, 0);
    assert!(!path.with_file_name("checklist.chk.tmp").exists());
}

#[test]
fn test_hand_edited_checklist_parsing() {
    let fx = Fixture::new();
    let path = fx.checklist_path();
    fs::write(
        &path,
        "aaaa x\r\n\
         \n\
         no-space-here\n\
         bbbb y\n\
         cccc x\n\
         dddd\t z\n",
    )
    .unwrap();

    let (map, stats) = load_checklist(&path).unwrap();
    assert_eq!(map.get("x"), Some("aaaa"));
    assert_eq!(map.get("y"), Some("bbbb"));
    // Only spaces separate fields; the tab belongs to the digest.
    assert_eq!(map.get("z"), Some("dddd\t"));
    assert_eq!(map.len(), 3);
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.duplicates, 1);
}

#[test]
fn test_non_utf8_line_is_skipped() {
    let fx = Fixture::new();
    let path = fx.checklist_path();
    let mut content = b"aaaa ok\n".to_vec();
    content.extend_from_slice(b"bbbb \xff\xfe\n");
    fs::write(&path, content).unwrap();

    let (map, stats) = load_checklist(&path).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(stats.malformed, 1);
}

#[test]
fn test_unrepresentable_path_leaves_existing_checklist() {
    let fx = Fixture::new();
    let path = fx.checklist_path();
    write_checklist(&path, &list(&[("a", "01")])).unwrap();

    let err = write_checklist(&path, &list(&[("b", "02"), ("bad\nname", "03")])).unwrap_err();
    assert!(matches!(err, StorageError::UnrepresentablePath(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "01 a\n");
}

#[test]
fn test_write_into_missing_directory_fails() {
    let fx = Fixture::new();
    let path = fx.root().join("absent").join("checklist.chk");
    let err = write_checklist(&path, &list(&[("a", "01")])).unwrap_err();
    assert!(matches!(err, StorageError::ChecklistCreate { .. }));
}

#[test]
fn test_load_missing_checklist_is_open_error() {
    let fx = Fixture::new();
    let err = load_checklist(&fx.checklist_path()).unwrap_err();
    assert!(matches!(err, StorageError::ChecklistOpen { .. }));
}

#[test]
fn test_empty_checklist_reports_everything_unknown() {
    let fx = Fixture::new();
    fx.write("a", "1");
    fx.write("b", "2");
    fs::write(fx.checklist_path(), "").unwrap();

    let outcome = fx.service().verify(&fx.pattern("*")).unwrap();
    assert!(!outcome.passed());
    match outcome {
        chkdigest::service::VerifyOutcome::Verified { verification, .. } => {
            assert_eq!(verification.entries.len(), 2);
            assert!(verification
                .entries
                .iter()
                .all(|e| matches!(e.status, chkdigest::checklist::EntryStatus::Unknown { .. })));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_leading_space_path_survives_round_trip() {
    let fx = Fixture::new();
    let path = fx.checklist_path();
    let digests = list(&[
        (" lead", "5d41402abc4b2a76b9719d911017c592"),
        ("  two leading", "7d793037a0760186574b0282f2f435e7"),
    ]);
    write_checklist(&path, &digests).unwrap();

    let (map, stats) = load_checklist(&path).unwrap();
    assert_eq!(stats.malformed, 0);
    assert_eq!(map.get(" lead"), Some("5d41402abc4b2a76b9719d911017c592"));
    assert_eq!(map.get("  two leading"), Some("7d793037a0760186574b0282f2f435e7"));
    assert!(!map.contains("lead"));
}

#[test]
fn test_empty_digest_line_reconciles_as_mismatch() {
    let fx = Fixture::new();
    fx.write("x", "hello");
    fs::write(fx.checklist_path(), format!(" {}\n", fx.key("x"))).unwrap();

    let outcome = fx.service().verify(&fx.pattern("*")).unwrap();
    assert!(!outcome.passed());
    match outcome {
        chkdigest::service::VerifyOutcome::Verified { verification, parse, .. } => {
            assert_eq!(parse.malformed, 0);
            assert_eq!(verification.entries.len(), 1);
            assert!(matches!(
                verification.entries[0].status,
                chkdigest::checklist::EntryStatus::Mismatch { ref expected, .. } if expected.is_empty()
            ));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
