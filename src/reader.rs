use crate::host::ReadableFile;
use base64::Engine;
use log::debug;
use thiserror::Error;

const FALLBACK_MIME: &str = "application/octet-stream";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("file read was aborted")]
    Aborted,
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        debug!("File read failed: {err}");
        ReadError::Aborted
    }
}

/// File contents decoded as UTF-8; invalid sequences become U+FFFD.
pub async fn get_file_text<F: ReadableFile>(file: &F) -> Result<String, ReadError> {
    let bytes = file.read_bytes().await?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// File contents as a base64 `data:` URI using the declared MIME type.
pub async fn get_file_data_uri<F: ReadableFile>(file: &F) -> Result<String, ReadError> {
    let bytes = file.read_bytes().await?;
    let mime = match file.mime_type().trim() {
        "" => FALLBACK_MIME,
        declared => declared,
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}
