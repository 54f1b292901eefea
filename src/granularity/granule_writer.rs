use granularity::{AdaptiveGranularity, ConstantGranularity, IndexGranularity};

/// Configuration deciding the shape of the granularity a writer builds.
#[derive(Clone, Debug)]
pub struct GranularityConfig {
    /// Target rows per granule.
    pub index_granularity: usize,
    /// Target bytes per granule. 0 disables adaptive granularity.
    pub index_granularity_bytes: usize,
    /// Lower bound kept with adaptive granularity.
    pub min_index_granularity_bytes: usize,
}

impl Default for GranularityConfig {
    fn default() -> GranularityConfig {
        GranularityConfig {
            index_granularity: 8192,
            index_granularity_bytes: 10 * 1024 * 1024,
            min_index_granularity_bytes: 1024,
        }
    }
}

impl GranularityConfig {
    pub fn use_adaptive_granularity(&self) -> bool {
        self.index_granularity_bytes > 0
    }

    /// Builds the granularity matching this configuration.
    pub fn create_granularity(&self) -> Box<IndexGranularity> {
        if self.use_adaptive_granularity() {
            Box::new(AdaptiveGranularity::new())
        } else {
            Box::new(ConstantGranularity::new(self.index_granularity, 0))
        }
    }
}

/// Drives granule boundaries while a writer streams rows out.
///
/// The caller tracks how many rows and bytes went into the current
/// granule, asks `should_finish_granule`, and on a granule boundary
/// calls `finish_granule` to append the mark.
pub struct GranuleWriter {
    config: GranularityConfig,
    granularity: Box<IndexGranularity>,
}

impl GranuleWriter {
    pub fn new(config: GranularityConfig) -> GranuleWriter {
        let granularity = config.create_granularity();
        GranuleWriter {
            config: config,
            granularity: granularity,
        }
    }

    /// With adaptive granularity a granule closes on either the row or
    /// the byte threshold; with constant granularity only on the row
    /// threshold.
    pub fn should_finish_granule(
        &self,
        rows_written_in_granule: usize,
        bytes_written_in_granule: usize,
    ) -> bool {
        if self.config.use_adaptive_granularity() {
            bytes_written_in_granule >= self.config.index_granularity_bytes
                || rows_written_in_granule >= self.config.index_granularity
        } else {
            rows_written_in_granule >= self.config.index_granularity
        }
    }

    /// Closes the current granule, appending its mark.
    pub fn finish_granule(&mut self, rows_in_granule: usize) {
        self.granularity.add_mark(rows_in_granule);
    }

    pub fn granularity(&self) -> &IndexGranularity {
        &*self.granularity
    }

    pub fn config(&self) -> &GranularityConfig {
        &self.config
    }

    pub fn into_granularity(self) -> Box<IndexGranularity> {
        self.granularity
    }
}

#[cfg(test)]
mod tests {

    use super::{GranularityConfig, GranuleWriter};
    use granularity::IndexGranularity;

    #[test]
    fn test_default_config_is_adaptive() {
        let config = GranularityConfig::default();
        assert!(config.use_adaptive_granularity());
        assert_eq!(config.index_granularity, 8192);
        assert_eq!(config.min_index_granularity_bytes, 1024);
    }

    #[test]
    fn test_adaptive_thresholds() {
        let config = GranularityConfig {
            index_granularity: 100,
            index_granularity_bytes: 1_000,
            min_index_granularity_bytes: 10,
        };
        let granule_writer = GranuleWriter::new(config);
        assert!(!granule_writer.should_finish_granule(99, 999));
        assert!(granule_writer.should_finish_granule(100, 0));
        assert!(granule_writer.should_finish_granule(0, 1_000));
    }

    #[test]
    fn test_constant_ignores_bytes() {
        let config = GranularityConfig {
            index_granularity: 100,
            index_granularity_bytes: 0,
            min_index_granularity_bytes: 0,
        };
        let granule_writer = GranuleWriter::new(config);
        assert!(!granule_writer.should_finish_granule(99, 1 << 30));
        assert!(granule_writer.should_finish_granule(100, 0));
    }

    #[test]
    fn test_writing_granules_builds_marks() {
        let config = GranularityConfig {
            index_granularity: 50,
            index_granularity_bytes: 1_000,
            min_index_granularity_bytes: 10,
        };
        let mut granule_writer = GranuleWriter::new(config);
        let mut rows = 0usize;
        let mut bytes = 0usize;
        for row_bytes in (0..425usize).map(|i| 10 + (i % 7)) {
            rows += 1;
            bytes += row_bytes;
            if granule_writer.should_finish_granule(rows, bytes) {
                granule_writer.finish_granule(rows);
                rows = 0;
                bytes = 0;
            }
        }
        if rows > 0 {
            granule_writer.finish_granule(rows);
        }
        let granularity = granule_writer.into_granularity();
        assert_eq!(granularity.total_rows(), 425);
        assert!(granularity.marks_count() >= 425 / 50);
        assert!(!granularity.has_final_mark());
    }
}
