/// 文件签名：在 `offset` 处出现 `bytes`
struct Signature {
    offset: usize,
    bytes: &'static [u8],
}

const fn sig(offset: usize, bytes: &'static [u8]) -> Signature {
    Signature { offset, bytes }
}

const PNG: &[Signature] = &[sig(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])];
const JPEG: &[Signature] = &[sig(0, &[0xFF, 0xD8, 0xFF])];
const PDF: &[Signature] = &[sig(0, b"%PDF")];
// zip 与 OOXML 文档共用
const ZIP: &[Signature] = &[sig(0, &[0x50, 0x4B, 0x03, 0x04])];
// ISO base media：第 4 字节起为 ftyp box
const ISO_MEDIA: &[Signature] = &[sig(4, b"ftyp")];
// Matroska / WebM 的 EBML 头
const EBML: &[Signature] = &[sig(0, &[0x1A, 0x45, 0xDF, 0xA3])];
const AVI: &[Signature] = &[sig(0, b"RIFF"), sig(8, b"AVI ")];

enum Rule {
    /// 所有签名都必须匹配
    Match(&'static [Signature]),
    /// 文本类文件不检查
    Any,
}

fn rule_for(extension: &str) -> Option<Rule> {
    let rule = match extension {
        ".png" => Rule::Match(PNG),
        ".jpg" | ".jpeg" => Rule::Match(JPEG),
        ".pdf" => Rule::Match(PDF),
        ".zip" | ".docx" | ".xlsx" | ".pptx" => Rule::Match(ZIP),
        ".mp4" | ".m4v" | ".mov" => Rule::Match(ISO_MEDIA),
        ".webm" | ".mkv" => Rule::Match(EBML),
        ".avi" => Rule::Match(AVI),
        ".txt" | ".md" | ".csv" | ".json" | ".rs" | ".toml" => Rule::Any,
        _ => return None,
    };
    Some(rule)
}

/// 验证文件头部字节是否与扩展名相符
///
/// `extension` 含点号，大小写不敏感。未知扩展名一律拒绝，空内容一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match rule_for(&extension.to_ascii_lowercase()) {
        Some(Rule::Any) => true,
        Some(Rule::Match(signatures)) => signatures.iter().all(|s| {
            data.get(s.offset..s.offset + s.bytes.len())
                .is_some_and(|window| window == s.bytes)
        }),
        None => false,
    }
}

/// 根据扩展名推断 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".pdf" => "application/pdf",
        ".zip" => "application/zip",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".mp4" | ".m4v" => "video/mp4",
        ".mov" => "video/quicktime",
        ".webm" => "video/webm",
        ".mkv" => "video/x-matroska",
        ".avi" => "video/x-msvideo",
        ".txt" | ".rs" | ".toml" => "text/plain; charset=utf-8",
        ".md" => "text/markdown; charset=utf-8",
        ".csv" => "text/csv; charset=utf-8",
        ".json" => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_and_document_headers() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
    }

    #[test]
    fn test_video_headers() {
        let mp4 = b"\x00\x00\x00\x20ftypisom\x00\x00\x02\x00";
        assert!(validate_magic_bytes(mp4, ".mp4"));
        assert!(validate_magic_bytes(mp4, ".mov"));
        assert!(!validate_magic_bytes(mp4, ".webm"));

        let webm = [0x1A, 0x45, 0xDF, 0xA3, 0x9F];
        assert!(validate_magic_bytes(&webm, ".webm"));
        assert!(validate_magic_bytes(&webm, ".mkv"));

        let avi = b"RIFF\x10\x00\x00\x00AVI LIST";
        assert!(validate_magic_bytes(avi, ".avi"));
        let wav = b"RIFF\x10\x00\x00\x00WAVEfmt ";
        assert!(!validate_magic_bytes(wav, ".avi"));
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        assert!(!validate_magic_bytes(b"\x00\x00\x00", ".mp4"));
    }

    #[test]
    fn test_text_and_unknown() {
        assert!(validate_magic_bytes(b"fn main() {}", ".rs"));
        assert!(validate_magic_bytes(b"# notes", ".md"));
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for(".MP4"), "video/mp4");
        assert_eq!(content_type_for(".bin"), "application/octet-stream");
    }
}
