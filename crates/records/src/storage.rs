use crate::error::{CorruptStateError, PersistenceError};
use crate::types::{Record, RecordList};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads the history file. `Ok(None)` means it does not exist yet.
pub(crate) async fn read_list(path: &Path) -> Result<Option<RecordList>, CorruptStateError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let records: Vec<Record> = serde_json::from_slice(&bytes)?;
    Ok(Some(RecordList::from(records)))
}

/// JSON array, 4-space indent, non-ASCII kept verbatim.
pub(crate) fn encode(records: &RecordList) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Replaces the history file in one step:
/// - write the encoded list to a sibling `.tmp` file and fsync it
/// - rename it over the destination
/// - best-effort fsync of the parent directory
pub(crate) async fn write_atomic(path: &Path, records: &RecordList) -> Result<(), PersistenceError> {
    let bytes = encode(records)?;
    let io_err = |source: std::io::Error| PersistenceError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp_path = tmp_sibling(path);
    let written = async {
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(io_err(e));
    }

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(io_err(e));
    }

    if let Some(parent) = non_empty_parent(path)
        && let Ok(dir) = fs::File::open(parent).await
    {
        let _ = dir.sync_all().await;
    }

    Ok(())
}

/// `Path::parent` yields `""` for bare file names.
pub(crate) fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
