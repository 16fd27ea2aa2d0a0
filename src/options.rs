//! Options controlling how split outputs are materialized.

use crate::progress::DEFAULT_PROGRESS_INTERVAL;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for a [`SplitJob`](crate::scene::SplitJob).
///
/// The defaults reproduce the layout produced by the interactive tool: outputs are stored in a
/// `Submeshes` folder next to the source mesh asset and plane or bone outputs are suffixed with
/// `_a` and `_b`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitOptions {
    /// Number of flat triangle indices between two progress reports. Zero disables reporting.
    pub progress_interval: usize,
    /// Name of the folder receiving the outputs.
    pub submesh_folder: String,
    /// Name suffixes for the `A` and `B` outputs of plane and bone splits.
    pub side_suffixes: [String; 2],
    /// Skip storing outputs that received no triangles at all.
    pub skip_empty_outputs: bool,
    /// Deactivate the source object once every output is stored.
    pub deactivate_source: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            submesh_folder: String::from("Submeshes"),
            side_suffixes: [String::from("_a"), String::from("_b")],
            skip_empty_outputs: false,
            deactivate_source: true,
        }
    }
}

impl SplitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_submesh_folder(mut self, folder: impl Into<String>) -> Self {
        self.submesh_folder = folder.into();
        self
    }

    pub fn with_side_suffixes(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.side_suffixes = [a.into(), b.into()];
        self
    }

    pub fn with_skip_empty_outputs(mut self, skip: bool) -> Self {
        self.skip_empty_outputs = skip;
        self
    }

    pub fn with_deactivate_source(mut self, deactivate: bool) -> Self {
        self.deactivate_source = deactivate;
        self
    }
}
