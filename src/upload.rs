//! Scoped on-disk copies of uploaded files.
//!
//! The temp file lives exactly as long as the closure runs; `NamedTempFile`
//! removes it on drop, so every exit path (including `?` and panics) cleans up.

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

pub fn with_scoped_upload<T, F>(bytes: &[u8], extension: &str, f: F) -> io::Result<T>
where
  F: FnOnce(&Path) -> T,
{
  let mut tmp = tempfile::Builder::new()
    .prefix("quizgen-upload-")
    .suffix(&format!(".{extension}"))
    .tempfile()?;
  tmp.write_all(bytes)?;
  tmp.flush()?;
  debug!(target: "quizgen", path = %tmp.path().display(), bytes = bytes.len(), "Upload staged");
  Ok(f(tmp.path()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn file_exists_during_use_and_is_removed_after() {
    let mut seen: Option<PathBuf> = None;
    let len = with_scoped_upload(b"hello world", "txt", |p| {
      seen = Some(p.to_path_buf());
      assert!(p.exists());
      assert_eq!(p.extension().and_then(|e| e.to_str()), Some("txt"));
      std::fs::read(p).unwrap().len()
    })
    .unwrap();

    assert_eq!(len, 11);
    assert!(!seen.unwrap().exists());
  }

  #[test]
  fn file_is_removed_when_the_closure_panics() {
    let seen = std::sync::Mutex::new(None::<PathBuf>);
    let result = std::panic::catch_unwind(|| {
      with_scoped_upload(b"x", "pdf", |p| {
        *seen.lock().unwrap() = Some(p.to_path_buf());
        panic!("extraction blew up");
      })
    });
    assert!(result.is_err());
    let path = seen.lock().unwrap().clone().unwrap();
    assert!(!path.exists());
  }
}
