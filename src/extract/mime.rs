use std::collections::HashMap;

use lazy_static::lazy_static;

pub const DEFAULT_MIME: &str = "application/octet-stream";

lazy_static! {
    static ref MIME_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("txt", "text/plain");
        m.insert("md", "text/markdown");
        m.insert("html", "text/html");
        m.insert("htm", "text/html");
        m.insert("css", "text/css");
        m.insert("csv", "text/csv");
        m.insert("js", "text/javascript");
        m.insert("mjs", "text/javascript");
        m.insert("ts", "text/typescript");
        m.insert("json", "application/json");
        m.insert("xml", "application/xml");
        m.insert("yaml", "application/yaml");
        m.insert("yml", "application/yaml");
        m.insert("toml", "application/toml");
        m.insert("pdf", "application/pdf");
        m.insert("zip", "application/zip");
        m.insert("gz", "application/gzip");
        m.insert("tar", "application/x-tar");
        m.insert("wasm", "application/wasm");
        m.insert("png", "image/png");
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("gif", "image/gif");
        m.insert("svg", "image/svg+xml");
        m.insert("webp", "image/webp");
        m.insert("ico", "image/x-icon");
        m.insert("mp3", "audio/mpeg");
        m.insert("wav", "audio/wav");
        m.insert("flac", "audio/flac");
        m.insert("mp4", "video/mp4");
        m.insert("mkv", "video/x-matroska");
        m.insert("avi", "video/x-msvideo");
        m.insert("woff", "font/woff");
        m.insert("woff2", "font/woff2");
        m.insert("ttf", "font/ttf");
        m.insert("rs", "text/x-rust");
        m.insert("py", "text/x-python");
        m.insert("c", "text/x-c");
        m.insert("h", "text/x-c");
        m.insert("cpp", "text/x-c++");
        m.insert("java", "text/x-java-source");
        m.insert("go", "text/x-go");
        m.insert("sh", "application/x-sh");
        m.insert("sql", "application/sql");
        m
    };
}

/// MIME type for a file name, by extension only. Unknown or missing
/// extensions fall back to `application/octet-stream`.
pub fn mime_for_name(name: &str) -> &'static str {
    crate::types::file_extension(name)
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| MIME_TYPES.get(ext.as_str()).copied())
        .unwrap_or(DEFAULT_MIME)
}
