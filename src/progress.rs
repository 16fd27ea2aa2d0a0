//! Progress reporting for long running splits.
//!
//! Progress sinks are advisory: they observe the partition walk but never influence it.

/// Number of flat triangle indices between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 30;

/// A sink for progress updates.
pub trait Progress {
    /// Report that `current` out of `total` units of work are done.
    fn report(&mut self, current: usize, total: usize, label: &str);
    /// Signal that the operation finished and any progress display can be removed.
    fn clear(&mut self);
}

/// A progress sink that ignores all updates.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline]
    fn report(&mut self, _: usize, _: usize, _: &str) {}
    #[inline]
    fn clear(&mut self) {}
}

/// A progress sink that forwards updates to the `log` facade at trace level.
#[derive(Clone, Debug)]
pub struct LogProgress {
    title: String,
}

impl LogProgress {
    pub fn new(title: impl Into<String>) -> Self {
        LogProgress {
            title: title.into(),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        LogProgress::new("Splitting")
    }
}

impl Progress for LogProgress {
    fn report(&mut self, current: usize, total: usize, label: &str) {
        log::trace!("{}: {} ({}/{})", self.title, label, current, total);
    }

    fn clear(&mut self) {
        log::trace!("{}: done", self.title);
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    #[inline]
    fn report(&mut self, current: usize, total: usize, label: &str) {
        (**self).report(current, total, label)
    }
    #[inline]
    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Label used for a progress checkpoint inside a submesh.
pub(crate) fn checkpoint_label(
    submesh: usize,
    num_submeshes: usize,
    index: usize,
    num_indices: usize,
) -> String {
    format!(
        "submesh:{}/{}, triangles:{}/{}",
        submesh, num_submeshes, index, num_indices
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every update for inspection.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingProgress {
        pub reports: Vec<(usize, usize, String)>,
        pub clears: usize,
    }

    impl Progress for RecordingProgress {
        fn report(&mut self, current: usize, total: usize, label: &str) {
            self.reports.push((current, total, label.to_string()));
        }
        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    #[test]
    fn forwarding_through_references() {
        let mut recorder = RecordingProgress::default();
        {
            let mut sink = &mut recorder;
            sink.report(3, 9, "x");
            sink.clear();
        }
        assert_eq!(recorder.reports, vec![(3, 9, "x".to_string())]);
        assert_eq!(recorder.clears, 1);
    }

    #[test]
    fn label_format() {
        assert_eq!(checkpoint_label(1, 3, 30, 90), "submesh:1/3, triangles:30/90");
    }
}
