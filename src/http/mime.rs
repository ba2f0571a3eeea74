//! MIME type detection for the static front-end

/// Content-Type for a file extension (case-insensitive)
///
/// # Examples
/// ```
/// use geodist::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("JS")), "text/javascript; charset=utf-8");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(extension) = extension else {
        return "application/octet-stream";
    };
    match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "geojson" => "application/geo+json",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "wasm" => "application/wasm",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        "pdf" => "application/pdf",

        _ => "application/octet-stream",
    }
}
