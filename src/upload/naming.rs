use chrono::Utc;
use recipebook_common::ids::random_base36;

/// Longest extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 8;

/// Name an uploaded image is stored under:
/// `<unix-millis>-<6 base36 chars>.<extension>`.
///
/// The extension comes from the original file name, reduced to lowercase
/// ASCII alphanumerics, and is kept only when it is one of the extensions
/// registered for the content type. Otherwise it is derived from the content
/// type, so a part declared `image/png` never lands on disk as `.html`.
pub fn stored_file_name(original: Option<&str>, content_type: &str) -> String {
    let essence = mime_essence(content_type);
    let extension = original
        .and_then(sanitize_extension)
        .filter(|ext| matches_content_type(ext, &essence))
        .unwrap_or_else(|| extension_for(&essence));
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        random_base36(6),
        extension
    )
}

fn sanitize_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_EXTENSION_LEN)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn known_extension(essence: &str) -> Option<&'static str> {
    match essence {
        "image/jpeg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn matches_content_type(ext: &str, essence: &str) -> bool {
    known_extension(essence) == Some(ext)
        || mime_guess::get_mime_extensions_str(essence)
            .is_some_and(|exts| exts.contains(&ext))
}

fn extension_for(essence: &str) -> String {
    if let Some(ext) = known_extension(essence) {
        return ext.to_string();
    }
    mime_guess::get_mime_extensions_str(essence)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| "img".to_string())
}
