//! Companion character nodes for the virtual mouse and keyboard.

use std::fs::{File, OpenOptions};

use nix::sys::stat::{makedev, mknod, Mode, SFlag};
use touchbridge_types::SpecialNode;
use tracing::info;

use crate::error::InputError;

/// Open `node` for writing, creating it as a character device first if the
/// path does not exist.
pub fn ensure_node(node: &SpecialNode) -> Result<File, InputError> {
    if !node.path.exists() {
        mknod(
            &node.path,
            SFlag::S_IFCHR,
            Mode::from_bits_truncate(0o660),
            makedev(node.major, node.minor),
        )
        .map_err(|e| InputError::Node {
            path: node.path.clone(),
            reason: e.to_string(),
        })?;
        info!(path = %node.path.display(), major = node.major, minor = node.minor, "created device node");
    }

    OpenOptions::new()
        .write(true)
        .open(&node.path)
        .map_err(|e| InputError::Node {
            path: node.path.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_path_is_opened_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vmouse");
        std::fs::write(&path, b"").unwrap();

        let node = SpecialNode {
            path: path.clone(),
            major: 10,
            minor: 60,
        };
        let mut file = ensure_node(&node).unwrap();
        std::io::Write::write_all(&mut file, &[1, 2]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2]);
    }

    #[test]
    fn missing_parent_is_a_node_error() {
        let dir = tempfile::tempdir().unwrap();
        let node = SpecialNode {
            path: dir.path().join("absent").join("vkeyboard"),
            major: 10,
            minor: 61,
        };
        assert!(matches!(ensure_node(&node), Err(InputError::Node { .. })));
    }
}
