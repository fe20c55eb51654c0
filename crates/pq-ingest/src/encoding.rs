//! Source encoding detection.

use std::borrow::Cow;

use serde::Serialize;

/// Encoding a file was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    /// Central European code page used by instrument software on Windows.
    #[serde(rename = "windows-1250")]
    Windows1250,
}

impl SourceEncoding {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Windows1250 => "windows-1250",
        }
    }
}

/// Decodes as UTF-8 when the bytes are valid, otherwise as Windows-1250.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, SourceEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), SourceEncoding::Utf8),
        Err(_) => {
            let (text, _) = encoding_rs::WINDOWS_1250.decode_without_bom_handling(bytes);
            (text, SourceEncoding::Windows1250)
        }
    }
}
