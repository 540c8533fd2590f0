//! MIME type detection module
//!
//! Classifies a resource from a bounded prefix of its bytes, falling back to
//! the file extension and finally to a text/binary guess.

/// Number of leading bytes inspected when sniffing
pub const SNIFF_LEN: usize = 512;

/// Sniffing result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sniffed {
    pub content_type: &'static str,
    /// False when the type is only a best guess
    pub confident: bool,
}

/// Binary signatures recognized from the first bytes of a resource
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b\x08", "application/gzip"),
    (b"\x00asm", "application/wasm"),
    (b"wOFF", "font/woff"),
    (b"wOF2", "font/woff2"),
    (b"OggS", "video/ogg"),
    (b"fLaC", "audio/flac"),
    (b"ID3", "audio/mpeg"),
];

/// Determine the content type of a resource
///
/// Order: binary signature, then extension, then a UTF-8 check on the prefix.
pub fn sniff(prefix: &[u8], extension: Option<&str>) -> Sniffed {
    let prefix = &prefix[..prefix.len().min(SNIFF_LEN)];

    if let Some(content_type) = sniff_signature(prefix) {
        return Sniffed {
            content_type,
            confident: true,
        };
    }

    let by_extension = get_content_type(extension.map(str::to_ascii_lowercase).as_deref());
    if by_extension != OCTET_STREAM {
        return Sniffed {
            content_type: by_extension,
            confident: true,
        };
    }

    if looks_like_html(prefix) {
        return Sniffed {
            content_type: "text/html; charset=utf-8",
            confident: true,
        };
    }

    let content_type = if !prefix.is_empty() && is_text(prefix) {
        "text/plain; charset=utf-8"
    } else {
        OCTET_STREAM
    };
    Sniffed {
        content_type,
        confident: false,
    }
}

fn sniff_signature(prefix: &[u8]) -> Option<&'static str> {
    if prefix.len() >= 12 && &prefix[..4] == b"RIFF" && &prefix[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| prefix.starts_with(magic))
        .map(|(_, content_type)| *content_type)
}

fn looks_like_html(prefix: &[u8]) -> bool {
    let start = prefix
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(prefix.len());
    let head = &prefix[start..prefix.len().min(start + 14)];
    let head = head.to_ascii_lowercase();
    head.starts_with(b"<!doctype html") || head.starts_with(b"<html")
}

fn is_text(prefix: &[u8]) -> bool {
    let valid = match std::str::from_utf8(prefix) {
        Ok(_) => true,
        // A multi-byte character cut by the sniff window is still text
        Err(e) => e.error_len().is_none(),
    };
    valid
        && !prefix
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c))
}

const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",

        _ => OCTET_STREAM,
    }
}
