use super::*;

#[test]
fn test_ext_simple_subtype() {
    assert_eq!(extension_from_mime(Some("image/jpeg")), "jpeg");
    assert_eq!(extension_from_mime(Some("video/mp4")), "mp4");
    assert_eq!(extension_from_mime(Some("application/pdf")), "pdf");
}

#[test]
fn test_ext_strips_parameters() {
    assert_eq!(extension_from_mime(Some("audio/ogg; codecs=opus")), "ogg");
}

#[test]
fn test_ext_lowercases() {
    assert_eq!(extension_from_mime(Some("image/PNG")), "png");
}

#[test]
fn test_ext_missing_mime() {
    assert_eq!(extension_from_mime(None), "bin");
}

#[test]
fn test_ext_unparseable_mime() {
    assert_eq!(extension_from_mime(Some("garbage")), "bin");
    assert_eq!(extension_from_mime(Some("image/")), "bin");
    assert_eq!(extension_from_mime(Some("image/;charset=x")), "bin");
}

#[test]
fn test_ext_cannot_escape_directory() {
    assert_eq!(extension_from_mime(Some("image/../../etc")), ".._.._etc");
}
