//! Hot-plug notifications for the input directory.

use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::inotify::{AddWatchFlags, InitFlags, Inotify};
use tracing::debug;

use crate::error::InputError;

/// A device node appeared in or vanished from the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotplugEvent {
    Created(PathBuf),
    Removed(PathBuf),
}

/// Non-blocking inotify watch on one directory.
pub struct HotplugWatch {
    inotify: Inotify,
    dir: PathBuf,
}

impl HotplugWatch {
    pub fn new(dir: &Path) -> Result<Self, InputError> {
        let inotify = Inotify::init(InitFlags::IN_NONBLOCK | InitFlags::IN_CLOEXEC)
            .map_err(|e| InputError::Watch(e.to_string()))?;
        inotify
            .add_watch(dir, AddWatchFlags::IN_CREATE | AddWatchFlags::IN_DELETE)
            .map_err(|e| InputError::Watch(format!("{}: {e}", dir.display())))?;
        debug!(dir = %dir.display(), "watching for hot-plug");
        Ok(Self {
            inotify,
            dir: dir.to_path_buf(),
        })
    }

    /// Drain every pending notification without blocking.
    pub fn poll(&self) -> Result<Vec<HotplugEvent>, InputError> {
        let mut out = Vec::new();
        loop {
            let events = match self.inotify.read_events() {
                Ok(events) => events,
                Err(Errno::EAGAIN) => break,
                Err(e) => return Err(InputError::Watch(e.to_string())),
            };
            if events.is_empty() {
                break;
            }
            for event in events {
                let Some(name) = event.name else { continue };
                let path = self.dir.join(name);
                if event.mask.contains(AddWatchFlags::IN_CREATE) {
                    out.push(HotplugEvent::Created(path));
                } else if event.mask.contains(AddWatchFlags::IN_DELETE) {
                    out.push(HotplugEvent::Removed(path));
                }
            }
        }
        Ok(out)
    }
}
