use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories_next::BaseDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_SESSION: &str = "default";

pub fn cache_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.cache_dir().join("Orrery"))
}

/// Directory holding one session's shared window records. `base` overrides
/// the platform cache directory.
pub fn session_dir(
    base: Option<&Path>,
    session: &str,
) -> Result<PathBuf, String> {
    let base = match base {
        Some(base) => base.to_path_buf(),
        None => cache_dir()
            .ok_or("could not determine a cache directory for the store")?,
    };

    if session.is_empty()
        || session.contains(['/', '\\'])
        || session == "."
        || session == ".."
    {
        return Err(format!("invalid session name '{}'", session));
    }

    Ok(base.join(session))
}

/// Serialize `value` and atomically replace `path` with it.
pub fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(value)?;
    write_atomic(path, json.as_bytes())
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir)?;
    }
    let tmp = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let value = serde_json::from_slice::<T>(&bytes)?;
    Ok(value)
}

pub fn read_json_if_exists<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, Box<dyn Error>> {
    match read_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::NotFound)
            {
                Ok(None)
            } else {
                Err(err)
            }
        }
    }
}

pub fn remove_if_exists(path: &Path) -> Result<(), std::io::Error> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

pub fn remove_dir_if_exists(path: &Path) -> Result<(), std::io::Error> {
    match fs::remove_dir_all(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_dir_rejects_path_like_names() {
        let base = Path::new("/tmp/orrery");
        assert_eq!(
            session_dir(Some(base), "demo").expect("valid session"),
            base.join("demo")
        );
        assert!(session_dir(Some(base), "").is_err());
        assert!(session_dir(Some(base), "../up").is_err());
        assert!(session_dir(Some(base), "..").is_err());
    }

    #[test]
    fn atomic_write_round_trips_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("value.json");

        write_json(&path, &vec![1, 2, 3]).expect("write");
        let value: Vec<i32> = read_json(&path).expect("read");
        assert_eq!(value, vec![1, 2, 3]);

        let entries = fs::read_dir(path.parent().expect("parent"))
            .expect("read dir")
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn missing_files_are_not_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");

        let value: Option<u64> =
            read_json_if_exists(&path).expect("missing is fine");
        assert_eq!(value, None);
        remove_if_exists(&path).expect("remove missing");
        remove_dir_if_exists(&dir.path().join("nope")).expect("remove dir");
    }
}
