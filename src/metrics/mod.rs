use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

/// Prometheus metrics for the vocabulary cache
#[derive(Clone)]
pub struct CacheMetrics {
    // Counters
    pub words_observed: Counter,
    pub documents_counted: Counter,
    pub words_promoted: Counter,
    pub snapshots_saved: Counter,
    pub snapshots_loaded: Counter,

    // Gauges
    pub distinct_tokens: Gauge,
    pub vocabulary_size: Gauge,

    // Histograms
    pub snapshot_latency: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl CacheMetrics {
    /// Create a new CacheMetrics instance with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let words_observed = Counter::with_opts(Opts::new(
            "wordvault_words_observed_total",
            "Total word occurrences recorded by scanning workers",
        ))?;
        registry.register(Box::new(words_observed.clone()))?;

        let documents_counted = Counter::with_opts(Opts::new(
            "wordvault_documents_counted_total",
            "Total documents counted",
        ))?;
        registry.register(Box::new(documents_counted.clone()))?;

        let words_promoted = Counter::with_opts(Opts::new(
            "wordvault_words_promoted_total",
            "Total words promoted into the finalized vocabulary",
        ))?;
        registry.register(Box::new(words_promoted.clone()))?;

        let snapshots_saved = Counter::with_opts(Opts::new(
            "wordvault_snapshots_saved_total",
            "Total snapshots written to disk",
        ))?;
        registry.register(Box::new(snapshots_saved.clone()))?;

        let snapshots_loaded = Counter::with_opts(Opts::new(
            "wordvault_snapshots_loaded_total",
            "Total snapshots restored from disk",
        ))?;
        registry.register(Box::new(snapshots_loaded.clone()))?;

        // Gauges
        let distinct_tokens = Gauge::with_opts(Opts::new(
            "wordvault_distinct_tokens",
            "Current number of distinct registered tokens",
        ))?;
        registry.register(Box::new(distinct_tokens.clone()))?;

        let vocabulary_size = Gauge::with_opts(Opts::new(
            "wordvault_vocabulary_size",
            "Current number of promoted words (excluding the sentinel)",
        ))?;
        registry.register(Box::new(vocabulary_size.clone()))?;

        // Histograms
        let snapshot_latency = Histogram::with_opts(
            HistogramOpts::new(
                "wordvault_snapshot_latency_seconds",
                "Snapshot save latency",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(snapshot_latency.clone()))?;

        Ok(Self {
            words_observed,
            documents_counted,
            words_promoted,
            snapshots_saved,
            snapshots_loaded,
            distinct_tokens,
            vocabulary_size,
            snapshot_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record observed word occurrences
    pub fn record_observed(&self, amount: u64) {
        self.words_observed.inc_by(amount as f64);
    }

    /// Record processed documents
    pub fn record_documents(&self, amount: u64) {
        self.documents_counted.inc_by(amount as f64);
    }

    /// Record a word promotion
    pub fn record_promoted(&self) {
        self.words_promoted.inc();
    }

    /// Record a snapshot save
    pub fn record_snapshot_save(&self, duration_secs: f64) {
        self.snapshots_saved.inc();
        self.snapshot_latency.observe(duration_secs);
    }

    /// Record a snapshot restore
    pub fn record_snapshot_load(&self) {
        self.snapshots_loaded.inc();
    }

    /// Update distinct tokens gauge
    pub fn set_distinct_tokens(&self, count: u64) {
        self.distinct_tokens.set(count as f64);
    }

    /// Update vocabulary size gauge
    pub fn set_vocabulary_size(&self, count: u64) {
        self.vocabulary_size.set(count as f64);
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
