use crate::error::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Reads a `.json` file from `path`.
pub async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await.map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    trace!("file read; deserializing bytes ...");
    serde_json::from_slice(&file).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `data` to `path` as pretty-printed JSON (4-space indent), replacing whatever was
/// there before. Parent directories are created as necessary.
pub async fn write_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    data: &T,
) -> Result<(), Error> {
    let path = path.as_ref();

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    write_bytes(path, &buf).await
}

/// Path of the saved company page for `symbol` inside `dir`.
pub fn html_path(dir: impl AsRef<Path>, symbol: &str) -> PathBuf {
    dir.as_ref().join(format!("{symbol}.html"))
}

/// Reads a saved company page. Bytes that are not valid UTF-8 are replaced rather than
/// failing the read.
pub async fn read_html(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    trace!("reading html document: {}", path.display());
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Save a company page for `symbol` to `dir`, returning the path written.
pub async fn write_html(
    dir: impl AsRef<Path>,
    symbol: &str,
    body: &str,
) -> Result<PathBuf, Error> {
    let path = html_path(dir, symbol);
    write_bytes(&path, body.as_bytes()).await?;
    Ok(path)
}

pub(crate) async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let to_err = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    // ensure the directory exists
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        trace!("checking directory path: {}", dir.display());
        tokio::fs::create_dir_all(dir).await.map_err(to_err)?;
    }

    tokio::fs::write(path, bytes).await.map_err(to_err)
}

/// Whether a saved page exists at `path`. An unreadable location counts as absent.
pub async fn is_saved(path: impl AsRef<Path>) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}
