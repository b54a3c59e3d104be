//! Revealing folders in the platform file browser.

use std::path::Path;
use std::process::Command;

use log::{debug, warn};

/// Shows a folder to the user.
pub trait FolderExplorer {
    fn explore(&self, path: &Path);
}

/// Opens folders with the platform file browser. Failures are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExplorer;

impl SystemExplorer {
    fn opener() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl FolderExplorer for SystemExplorer {
    fn explore(&self, path: &Path) {
        if !path.exists() {
            warn!("unable to explore missing folder: {}", path.display());
            return;
        }

        match Command::new(Self::opener()).arg(path).spawn() {
            Ok(_) => debug!("explored: {}", path.display()),
            Err(e) => warn!("unable to explore {}: {}", path.display(), e),
        }
    }
}

/// Explorer that does nothing, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExplorer;

impl FolderExplorer for NoopExplorer {
    fn explore(&self, path: &Path) {
        debug!("skipping explore of {}", path.display());
    }
}
