use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Why a file's content could not be embedded in the report.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0}")]
    Read(#[from] io::Error),
    #[error("content is not valid {encoding}")]
    Decode { encoding: &'static str },
}

/// Best-guess encoding for raw file bytes, or `None` when there is nothing
/// to guess from. A byte order mark wins, then strict UTF-8, then the
/// statistical guess.
pub fn detect(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Some(UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    Some(detector.guess(None, true))
}

/// Strictly decode `bytes` as `encoding`. A leading BOM overrides the
/// requested encoding and is stripped.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ContentError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| text.into_owned())
        .ok_or(ContentError::Decode {
            encoding: encoding.name(),
        })
}

/// Read a file once and decode it under its detected encoding, defaulting
/// to UTF-8 when detection has nothing to say.
pub fn read_text(path: &Path) -> Result<String, ContentError> {
    let bytes = fs::read(path)?;
    let encoding = detect(&bytes).unwrap_or_else(|| {
        log::debug!("No encoding detected for {}, using UTF-8", path.display());
        UTF_8
    });
    decode(&bytes, encoding)
}
