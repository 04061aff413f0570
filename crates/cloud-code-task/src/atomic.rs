use crate::error::{TaskInterfaceError, TaskInterfaceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

/// Loads and parses a YAML document, returning `default()` if the file does
/// not exist. Readers must tolerate a missing file as an empty document —
/// there is no lock, so a reader racing a first-ever write may legitimately
/// see nothing yet.
pub fn load_or_default<T>(path: &Path) -> TaskInterfaceResult<T>
where
    T: DeserializeOwned + Default,
{
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str(&contents).map_err(|source| {
            TaskInterfaceError::Core(cloud_code_core::CoreError::DocumentCorrupt {
                path: path.display().to_string(),
                source,
            })
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(source) => Err(TaskInterfaceError::Io(source)),
    }
}

/// Serializes `value` into a sibling `.tmp` file, fsyncs it, then renames it
/// over `path`. This is the only way documents in a workspace's
/// `.cloud-code/` directory may be written — writers must never truncate a
/// document in place, since a reader could observe a half-written file.
pub fn atomic_write_yaml<T: Serialize>(path: &Path, value: &T) -> TaskInterfaceResult<()> {
    let parent = path.parent().ok_or_else(|| {
        TaskInterfaceError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "document path has no parent directory",
        ))
    })?;
    std::fs::create_dir_all(parent)?;

    let serialized = serde_yaml::to_string(value).map_err(|source| {
        TaskInterfaceError::Core(cloud_code_core::CoreError::DocumentCorrupt {
            path: path.display().to_string(),
            source,
        })
    })?;

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
