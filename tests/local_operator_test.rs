use hashiup::{CommandOperator, Executor, ProvisionError};
use std::fs;
use std::io::Cursor;

#[cfg(unix)]
fn mode_of(path: &std::path::Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[cfg(unix)]
#[test]
fn test_upload_sets_exact_mode() {
    let dir = tempfile::tempdir().unwrap();
    for (name, mode, expected) in [
        ("config.hcl", "0640", 0o640),
        ("install.sh", "0755", 0o755),
        ("secret", "600", 0o600),
        ("shared", "0666", 0o666),
    ] {
        let path = dir.path().join(name);
        Executor::Local
            .upload(&mut Cursor::new(b"data".to_vec()), path.to_str().unwrap(), mode)
            .unwrap();
        assert_eq!(mode_of(&path), expected, "mode for {}", name);
    }
}

/// Reader that records the destination's mode while the upload is in progress
#[cfg(unix)]
struct ModeSnooper {
    path: std::path::PathBuf,
    seen: Option<u32>,
    data: Cursor<Vec<u8>>,
}

#[cfg(unix)]
impl std::io::Read for ModeSnooper {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.seen.is_none() {
            self.seen = Some(mode_of(&self.path));
        }
        std::io::Read::read(&mut self.data, buf)
    }
}

#[cfg(unix)]
#[test]
fn test_upload_never_exposes_wider_mode_while_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boundary.hcl");
    let mut reader = ModeSnooper {
        path: path.clone(),
        seen: None,
        data: Cursor::new(b"key = \"secret\"".to_vec()),
    };

    Executor::Local
        .upload(&mut reader, path.to_str().unwrap(), "0640")
        .unwrap();

    let during = reader.seen.unwrap();
    assert_eq!(during & 0o007, 0, "world bits set during write: {:o}", during);
    assert_eq!(during & !0o640, 0, "wider than requested: {:o}", during);
    assert_eq!(mode_of(&path), 0o640);
}

#[test]
fn test_upload_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boundary.hcl");
    fs::write(&path, "old contents that are longer than the new ones").unwrap();

    Executor::Local
        .upload(&mut Cursor::new(b"new".to_vec()), path.to_str().unwrap(), "0640")
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
}

#[test]
fn test_upload_file_copies_content() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("boundary.zip");
    let dst = dir.path().join("uploaded.zip");
    fs::write(&src, b"PK\x03\x04").unwrap();

    Executor::Local
        .upload_file(&src, dst.to_str().unwrap(), "0640")
        .unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"PK\x03\x04");
}

#[test]
fn test_upload_rejects_invalid_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never");
    let err = Executor::Local
        .upload(&mut Cursor::new(Vec::new()), path.to_str().unwrap(), "rwx")
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Configuration(_)));
    assert!(!path.exists());
}

#[test]
fn test_upload_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing/boundary.hcl");
    let err = Executor::Local
        .upload(&mut Cursor::new(b"x".to_vec()), path.to_str().unwrap(), "0640")
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Io { .. }));
}

#[test]
fn test_execute_success_and_failure() {
    let out = Executor::Local.execute("printf 'a\\nb'").unwrap();
    assert_eq!(out, "a\nb");

    match Executor::Local.execute("echo nope 1>&2; exit 42").unwrap_err() {
        ProvisionError::Execution {
            command,
            status,
            output,
        } => {
            assert_eq!(command, "echo nope 1>&2; exit 42");
            assert_eq!(status, Some(42));
            assert_eq!(output.trim(), "nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
