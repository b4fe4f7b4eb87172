use super::*;

#[test]
fn safe_filename_replaces_dangerous_chars() {
    assert_eq!(safe_filename("a/b\\c:d*e"), "a_b_c_d_e");
    assert_eq!(safe_filename("file<>|name"), "file___name");
}

#[test]
fn safe_filename_keeps_message_ids() {
    assert_eq!(safe_filename("3EB0C767D26A1D8E"), "3EB0C767D26A1D8E");
}

#[test]
fn safe_filename_neutralizes_dot_names() {
    assert_eq!(safe_filename(".."), "_..");
    assert_eq!(safe_filename(""), "_");
    assert_eq!(safe_filename("a\nb"), "a_b");
}

#[test]
fn ensure_dir_creates_and_returns() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let result = ensure_dir(&nested).unwrap();
    assert_eq!(result, nested);
    assert!(nested.is_dir());
}
