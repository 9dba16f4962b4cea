//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge model responses.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// Lowercased extension of an uploaded filename, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
  let (stem, ext) = filename.rsplit_once('.')?;
  if ext.is_empty() && stem.is_empty() { return None; }
  Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_key() {
    let out = fill_template("a={a}, b={b}, a again={a}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "a=1, b=2, a again=1");
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    let s = "ééééé";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with('é'));
    assert!(t.contains("10 bytes total"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn extension_is_lowercased_last_segment() {
    assert_eq!(file_extension("Notes.Final.PDF").as_deref(), Some("pdf"));
    assert_eq!(file_extension("readme").as_deref(), None);
    assert_eq!(file_extension("archive.").as_deref(), Some(""));
  }
}
