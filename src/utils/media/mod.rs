/// File extension for a staged media file, taken from the mime subtype.
///
/// Parameters after `;` are dropped (`audio/ogg; codecs=opus` → `ogg`).
/// Falls back to `bin` when the mime type is missing or has no usable subtype.
pub fn extension_from_mime(mime: Option<&str>) -> String {
    let subtype = mime
        .and_then(|m| m.split_once('/'))
        .map(|(_, rest)| rest.split(';').next().unwrap_or("").trim())
        .filter(|s| !s.is_empty());

    match subtype {
        Some(ext) => super::safe_filename(&ext.to_ascii_lowercase()),
        None => "bin".to_string(),
    }
}

#[cfg(test)]
mod tests;
