use crate::config::{ConfigError, FallbackPolicy, LoadOptions};
use log::{debug, warn};
use pcdview_core::PointCloud;
use pcdview_filters::stride_downsample;
use pcdview_io::{decode_pcd, PcdError};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

/// Result of [`Loader::load`].
#[derive(Debug)]
pub enum Loaded {
    Decoded(PointCloud),
    /// Decoding failed and the fallback policy substituted the placeholder.
    Placeholder { cloud: PointCloud, error: PcdError },
}

impl Loaded {
    pub fn cloud(&self) -> &PointCloud {
        match self {
            Loaded::Decoded(cloud) | Loaded::Placeholder { cloud, .. } => cloud,
        }
    }

    pub fn into_cloud(self) -> PointCloud {
        match self {
            Loaded::Decoded(cloud) | Loaded::Placeholder { cloud, .. } => cloud,
        }
    }

    pub fn error(&self) -> Option<&PcdError> {
        match self {
            Loaded::Decoded(_) => None,
            Loaded::Placeholder { error, .. } => Some(error),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Loaded::Placeholder { .. })
    }
}

/// Decode pipeline: header, schema, records, downsample, bounds.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Decodes `raw` into a cloud. Never substitutes a placeholder.
    pub fn decode(&self, raw: &[u8]) -> Result<PointCloud, PcdError> {
        let frame = decode_pcd(raw)?;
        debug!(
            "decoded {} of {} declared points",
            frame.points.len(),
            frame.header.points
        );

        let points = match self.options.max_points {
            Some(max_points) => stride_downsample(frame.points, max_points),
            None => frame.points,
        };

        Ok(PointCloud::from_points(points))
    }

    /// Like [`decode`](Self::decode), with the configured fallback policy applied.
    pub fn load(&self, raw: &[u8]) -> Result<Loaded, PcdError> {
        match self.decode(raw) {
            Ok(cloud) => Ok(Loaded::Decoded(cloud)),
            Err(error) => self.recover(error),
        }
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Loaded, PcdError> {
        match fs::read(path) {
            Ok(raw) => self.load(&raw),
            Err(err) => self.recover(err.into()),
        }
    }

    fn recover(&self, error: PcdError) -> Result<Loaded, PcdError> {
        match self.options.fallback {
            FallbackPolicy::Propagate => Err(error),
            FallbackPolicy::Placeholder => {
                warn!("{} ({}); using placeholder cloud", error, error.kind());
                Ok(Loaded::Placeholder {
                    cloud: PointCloud::placeholder(),
                    error,
                })
            }
        }
    }
}

/// Decodes `raw` with default options and no fallback.
pub fn decode(raw: &[u8]) -> Result<PointCloud, PcdError> {
    Loader::default().decode(raw)
}

/// Runs `loader.load(&raw)` on a dedicated thread.
///
/// The receiver yields exactly one result.
pub fn spawn_load(
    raw: Vec<u8>,
    loader: Loader,
) -> io::Result<mpsc::Receiver<Result<Loaded, PcdError>>> {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name("pcd-decode".to_string())
        .spawn(move || {
            // The caller may have dropped the receiver; nothing to report then.
            let _ = tx.send(loader.load(&raw));
        })?;
    Ok(rx)
}
