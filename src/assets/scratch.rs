use std::path::{Path, PathBuf};

use rand::Rng as _;

use crate::foundation::error::{TensorSpecError, TensorSpecResult};

/// Prefix of every per-build directory created under the cache root.
pub const BUILD_DIR_PREFIX: &str = "build-";

/// Scratch area for intermediate vector assets.
///
/// Each build gets its own directory under `root`, so concurrent caches sharing a root never
/// see each other's files. By default a build directory is removed as soon as the build ends.
/// With `retain` set, the most recent build is kept for inspection and only that directory is
/// removed when the next build starts.
#[derive(Debug)]
pub struct ScratchCache {
    root: PathBuf,
    retain: bool,
    retained: Option<PathBuf>,
}

impl ScratchCache {
    /// Cache rooted at `root`; the directory is created when missing.
    pub fn new(root: impl Into<PathBuf>) -> TensorSpecResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            TensorSpecError::resource(format!("create scratch root '{}': {e}", root.display()))
        })?;
        Ok(Self {
            root,
            retain: false,
            retained: None,
        })
    }

    /// Cache under the system temp directory.
    pub fn in_system_temp() -> TensorSpecResult<Self> {
        Self::new(std::env::temp_dir().join("tensorspec-scratch"))
    }

    /// Keep the most recent build's assets on disk after it finishes.
    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    /// Cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the last retained build, if any.
    pub fn retained(&self) -> Option<&Path> {
        self.retained.as_deref()
    }

    /// Start a build: drop the previously retained build and open a fresh directory.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn begin(&mut self) -> TensorSpecResult<ScratchBuild> {
        if let Some(prev) = self.retained.take() {
            match std::fs::remove_dir_all(&prev) {
                Ok(()) => tracing::debug!(dir = %prev.display(), "removed retained build"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(TensorSpecError::resource(format!(
                        "remove retained build '{}': {e}",
                        prev.display()
                    )));
                }
            }
        }
        std::fs::create_dir_all(&self.root).map_err(|e| {
            TensorSpecError::resource(format!(
                "create scratch root '{}': {e}",
                self.root.display()
            ))
        })?;
        let dir = tempfile::Builder::new()
            .prefix(BUILD_DIR_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| TensorSpecError::resource(format!("create build dir: {e}")))?;
        Ok(ScratchBuild {
            dir,
            assets: Vec::new(),
        })
    }

    /// End a build, removing or retaining its directory.
    pub fn finish(&mut self, build: ScratchBuild) -> TensorSpecResult<()> {
        let count = build.assets.len();
        if self.retain {
            let kept = build.dir.keep();
            tracing::debug!(dir = %kept.display(), assets = count, "retained build");
            self.retained = Some(kept);
            return Ok(());
        }
        build
            .dir
            .close()
            .map_err(|e| {
                TensorSpecError::resource(format!("remove scratch build directory: {e}"))
            })
    }
}

/// Directory owned by one build. Dropping it without [`ScratchCache::finish`] removes it.
#[derive(Debug)]
pub struct ScratchBuild {
    dir: tempfile::TempDir,
    assets: Vec<PathBuf>,
}

impl ScratchBuild {
    /// Build directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve a uniquely named asset path, e.g. `3d_plot_<32 hex>.svg`.
    pub fn asset_path(&mut self, stem: &str, extension: &str) -> PathBuf {
        let id: u128 = rand::rng().random();
        let path = self.dir.path().join(format!("{stem}_{id:032x}.{extension}"));
        self.assets.push(path.clone());
        path
    }

    /// Paths reserved so far, in order.
    pub fn assets(&self) -> &[PathBuf] {
        &self.assets
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/scratch.rs"]
mod tests;
