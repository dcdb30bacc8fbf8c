//! Root discovery: which mounted volumes get a recursive subscription.

use crate::error::DiscoveryError;
use crate::types::WatchRoot;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::debug;

const OPTICAL_FILE_SYSTEMS: &[&str] = &["iso9660", "udf", "cdfs"];

/// Mount metadata relevant to root selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    pub mount_point: PathBuf,
    pub file_system: String,
    pub is_removable: bool,
}

impl VolumeInfo {
    pub fn is_optical(&self) -> bool {
        let fs = self.file_system.to_lowercase();
        OPTICAL_FILE_SYSTEMS.contains(&fs.as_str())
            || self.mount_point.to_string_lossy().to_lowercase().contains("cdrom")
    }
}

/// Enumerates mounted volumes in the order the OS reports them.
pub fn list_volumes() -> Vec<VolumeInfo> {
    Disks::new_with_refreshed_list()
        .iter()
        .map(|disk| VolumeInfo {
            mount_point: disk.mount_point().to_path_buf(),
            file_system: disk.file_system().to_string_lossy().into_owned(),
            is_removable: disk.is_removable(),
        })
        .collect()
}

/// All fixed, currently existing volumes.
pub fn discover_roots() -> Vec<WatchRoot> {
    select_roots(&list_volumes())
}

/// Drops removable and optical volumes, then anything that does not resolve.
pub fn select_roots(volumes: &[VolumeInfo]) -> Vec<WatchRoot> {
    volumes
        .iter()
        .filter(|volume| {
            if volume.is_removable || volume.is_optical() {
                debug!("Skipping removable/optical volume {:?}", volume.mount_point);
                return false;
            }
            true
        })
        .filter_map(|volume| match resolve_root(&volume.mount_point) {
            Ok(root) => Some(root),
            Err(e) => {
                debug!("Skipping volume: {}", e);
                None
            }
        })
        .collect()
}

/// Configured roots, keeping only those that exist right now.
pub fn resolve_roots(paths: &[PathBuf]) -> Vec<WatchRoot> {
    paths
        .iter()
        .filter_map(|path| match resolve_root(path) {
            Ok(root) => Some(root),
            Err(e) => {
                debug!("Skipping configured root: {}", e);
                None
            }
        })
        .collect()
}

pub fn resolve_root(path: &Path) -> Result<WatchRoot, DiscoveryError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(WatchRoot {
            path: path.to_path_buf(),
            live: true,
        }),
        Ok(_) => Err(DiscoveryError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DiscoveryError::Missing(path.to_path_buf()))
        }
        Err(source) => Err(DiscoveryError::Unresolvable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(mount_point: &Path, file_system: &str, is_removable: bool) -> VolumeInfo {
        VolumeInfo {
            mount_point: mount_point.to_path_buf(),
            file_system: file_system.to_string(),
            is_removable,
        }
    }

    #[test]
    fn keeps_fixed_existing_volumes_in_order() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let volumes = [volume(b.path(), "ext4", false), volume(a.path(), "NTFS", false)];

        let roots = select_roots(&volumes);

        assert_eq!(
            roots.iter().map(|r| r.path.as_path()).collect::<Vec<_>>(),
            [b.path(), a.path()]
        );
        assert!(roots.iter().all(|r| r.live));
    }

    #[test]
    fn drops_removable_optical_and_missing() {
        let fixed = tempfile::tempdir().unwrap();
        let usb = tempfile::tempdir().unwrap();
        let disc = tempfile::tempdir().unwrap();
        let volumes = [
            volume(usb.path(), "vfat", true),
            volume(disc.path(), "ISO9660", false),
            volume(&fixed.path().join("gone"), "ext4", false),
            volume(fixed.path(), "ext4", false),
        ];

        let roots = select_roots(&volumes);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].path, fixed.path());
    }

    #[test]
    fn cdrom_mount_point_counts_as_optical() {
        assert!(volume(Path::new("/media/cdrom0"), "auto", false).is_optical());
        assert!(!volume(Path::new("/"), "ext4", false).is_optical());
    }

    #[test]
    fn resolve_root_classifies_failures() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(resolve_root(dir.path()).is_ok());
        assert!(matches!(resolve_root(&file), Err(DiscoveryError::NotADirectory(_))));
        assert!(matches!(
            resolve_root(&dir.path().join("missing")),
            Err(DiscoveryError::Missing(_))
        ));
    }

    #[test]
    fn resolve_roots_filters_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let roots = resolve_roots(&[dir.path().join("missing"), dir.path().to_path_buf()]);
        assert_eq!(roots, vec![WatchRoot { path: dir.path().to_path_buf(), live: true }]);
    }
}
