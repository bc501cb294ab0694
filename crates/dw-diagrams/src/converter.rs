//! Per-document orchestration of extraction, recovery and rendering.

use std::ops::AddAssign;

use dw_cache::{CacheBucket, NullCacheBucket};
use rayon::ThreadPool;
use rayon::prelude::*;

use crate::bridge::{ExternalRenderer, UnavailableRenderer};
use crate::cache::RecoveryKey;
use crate::consts::{MAX_WORKERS, PROMPT_REVISION};
use crate::description::DiagramGraph;
use crate::extract::{DiagramFragment, extract};
use crate::marker::{Marker, RecoveryMapping};
use crate::recovery::{ConversionResult, StructureRecovery};
use crate::splice::{SpliceOutcome, splice};
use crate::text;

/// Per-document diagram counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Flowcharts found by extraction.
    pub found: usize,
    /// Flowcharts replaced by a textual diagram.
    pub converted: usize,
    /// Flowcharts replaced by a failure notice.
    pub failed: usize,
}

impl AddAssign for ConversionStats {
    fn add_assign(&mut self, other: Self) {
        self.found += other.found;
        self.converted += other.converted;
        self.failed += other.failed;
    }
}

/// Markup with markers in place of flowcharts, ready for translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedDocument {
    /// Markup to hand to the Markdown translator.
    pub markup: String,
    /// Replacement text for every marker in `markup`.
    pub mapping: RecoveryMapping,
    pub stats: ConversionStats,
}

impl PreparedDocument {
    /// Splice the mapping into the translated Markdown.
    #[must_use]
    pub fn splice(&self, markdown: &str) -> SpliceOutcome {
        splice(markdown, &self.mapping)
    }
}

/// Turns the flowcharts of a document into textual diagrams.
///
/// Fragments of one document are recovered on a dedicated pool of at most
/// `max_workers` threads (sequentially by default); results always come back
/// in discovery order.
///
/// # Example
///
/// ```ignore
/// use dw_diagrams::{DiagramConverter, StructureRecoveryClient, probe_d2};
///
/// let converter = DiagramConverter::new(Box::new(StructureRecoveryClient::new(base, key)))
///     .external(probe_d2("d2", probe_timeout, render_timeout))
///     .max_workers(4);
///
/// let prepared = converter.prepare(&html);
/// let markdown = to_markdown(&prepared.markup);
/// let outcome = prepared.splice(&markdown);
/// ```
pub struct DiagramConverter {
    recovery: Box<dyn StructureRecovery>,
    external: Box<dyn ExternalRenderer>,
    cache: Box<dyn CacheBucket>,
    pool: Option<ThreadPool>,
}

impl DiagramConverter {
    #[must_use]
    pub fn new(recovery: Box<dyn StructureRecovery>) -> Self {
        Self {
            recovery,
            external: Box::new(UnavailableRenderer),
            cache: Box::new(NullCacheBucket),
            pool: None,
        }
    }

    #[must_use]
    pub fn external(mut self, external: Box<dyn ExternalRenderer>) -> Self {
        self.external = external;
        self
    }

    /// Cache successful recoveries in `bucket`.
    #[must_use]
    pub fn cache(mut self, bucket: Box<dyn CacheBucket>) -> Self {
        self.cache = bucket;
        self
    }

    /// Recover up to `workers` fragments at once (clamped to `1..=16`).
    #[must_use]
    pub fn max_workers(mut self, workers: usize) -> Self {
        let workers = workers.clamp(1, MAX_WORKERS);
        self.pool = if workers == 1 {
            None
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("dw-recovery-{i}"))
                .build()
                .inspect_err(|e| {
                    tracing::warn!(error = %e, "failed to create recovery pool, running sequentially");
                })
                .ok()
        };
        self
    }

    /// Convert one fragment. Never panics on recovery or render failure.
    pub fn convert(&self, fragment: &DiagramFragment) -> ConversionResult {
        let key = RecoveryKey {
            scope: self.recovery.cache_scope(),
            revision: PROMPT_REVISION,
            fragment: fragment.as_str(),
        }
        .compute_hash();

        let result = if let Some(description) = self.cache.get(&key) {
            tracing::debug!(key = %key, "recovered description cache hit");
            ConversionResult::recovered(description)
        } else {
            let result = self.recovery.recover(fragment);
            if let (true, Some(description)) = (result.success, &result.description) {
                self.cache.set(&key, description);
            }
            result
        };

        if !result.success {
            return result;
        }
        let Some(description) = result.description.clone() else {
            return result;
        };

        if self.external.available() {
            match self.external.try_render(&description) {
                Some(artifact) => {
                    tracing::info!(path = %artifact.path().display(), "external render succeeded");
                }
                None => tracing::debug!("external render failed, using text rendering"),
            }
        }

        let graph = DiagramGraph::parse(&description);
        let dangling = graph.dangling_edges().count();
        if dangling > 0 {
            tracing::debug!(dangling, "edges reference undeclared nodes");
        }
        result.with_diagram(text::render_graph(&graph))
    }

    /// Extract every flowchart from `markup` and convert it.
    ///
    /// Failed fragments get a fenced failure notice in the mapping, so every
    /// marker in the returned markup has an entry.
    pub fn prepare(&self, markup: &str) -> PreparedDocument {
        let extraction = extract(markup);
        let found = extraction.fragments.len();
        if found == 0 {
            return PreparedDocument {
                markup: extraction.markup,
                ..PreparedDocument::default()
            };
        }

        tracing::info!(count = found, "converting flowcharts");
        let results = self.convert_all(&extraction.fragments);

        let mut mapping = RecoveryMapping::new();
        let mut stats = ConversionStats {
            found,
            ..ConversionStats::default()
        };

        for ((marker, _), result) in extraction.fragments.iter().zip(results) {
            if result.success {
                stats.converted += 1;
            } else {
                stats.failed += 1;
                tracing::warn!(
                    %marker,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "flowchart conversion failed"
                );
            }
            mapping.insert(*marker, result.replacement_text());
        }

        tracing::info!(
            found = stats.found,
            converted = stats.converted,
            failed = stats.failed,
            "flowchart conversion finished"
        );

        PreparedDocument {
            markup: extraction.markup,
            mapping,
            stats,
        }
    }

    fn convert_all(&self, fragments: &[(Marker, DiagramFragment)]) -> Vec<ConversionResult> {
        match &self.pool {
            Some(pool) => pool.install(|| {
                fragments
                    .par_iter()
                    .map(|(_, fragment)| self.convert(fragment))
                    .collect()
            }),
            None => fragments
                .iter()
                .map(|(_, fragment)| self.convert(fragment))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::RenderedArtifact;
    use crate::marker::MARKER_SENTINEL;
    use crate::recovery::failure_notice;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SCENARIO: &str = "Start: Begin here\nEnd: Finish up\n\n# Connections\nStart -> End";

    /// Recovers `SCENARIO` unless the fragment mentions "fail"; a fragment
    /// holding `<text>Nk</text>` recovers to a single node `Nk`.
    struct CannedRecovery {
        calls: Arc<AtomicUsize>,
    }

    impl StructureRecovery for CannedRecovery {
        fn recover(&self, fragment: &DiagramFragment) -> ConversionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let svg = fragment.as_str();
            if svg.contains("fail") {
                return ConversionResult::failed("transport/endpoint failure: HTTP 500: boom");
            }
            if let Some(start) = svg.find("<text>N") {
                let rest = &svg[start + "<text>".len()..];
                let name = &rest[..rest.find('<').unwrap()];
                return ConversionResult::recovered(format!("{name}: node"));
            }
            ConversionResult::recovered(SCENARIO.to_owned())
        }

        fn cache_scope(&self) -> &str {
            "canned"
        }
    }

    #[derive(Default)]
    struct MemoryBucket {
        entries: Mutex<HashMap<String, String>>,
    }

    impl CacheBucket for MemoryBucket {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
        }
    }

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
    }

    impl ExternalRenderer for CountingRenderer {
        fn available(&self) -> bool {
            true
        }

        fn try_render(&self, _description: &str) -> Option<RenderedArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    fn converter() -> (DiagramConverter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = DiagramConverter::new(Box::new(CannedRecovery {
            calls: Arc::clone(&calls),
        }));
        (converter, calls)
    }

    fn flowchart(body: &str) -> String {
        format!(r#"<svg aria-roledescription="flowchart-v2"><g class="node">{body}</g></svg>"#)
    }

    struct FixedRecovery(&'static str);

    impl StructureRecovery for FixedRecovery {
        fn recover(&self, _fragment: &DiagramFragment) -> ConversionResult {
            ConversionResult::recovered(self.0.to_owned())
        }

        fn cache_scope(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_edges_to_undeclared_nodes_still_rendered() {
        let converter = DiagramConverter::new(Box::new(FixedRecovery("A: alpha\nA -> Ghost")));

        let result = converter.convert(&DiagramFragment::new(flowchart("")));

        assert!(result.success);
        let diagram = result.diagram.unwrap();
        assert!(diagram.contains("A --> Ghost"), "{diagram}");
        assert!(!diagram.contains("│ Ghost"), "{diagram}");
    }

    #[test]
    fn test_prepare_without_flowcharts() {
        let (converter, calls) = converter();
        let html = "<main><p>Only text</p></main>";

        let prepared = converter.prepare(html);

        assert_eq!(prepared.markup, html);
        assert!(prepared.mapping.is_empty());
        assert_eq!(prepared.stats, ConversionStats::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prepare_mixes_diagrams_and_failure_notices() {
        let (converter, _) = converter();
        let html = format!(
            "<p>a</p>{}<p>b</p>{}",
            flowchart("<text>ok</text>"),
            flowchart("<text>fail</text>")
        );

        let prepared = converter.prepare(&html);

        assert_eq!(
            prepared.stats,
            ConversionStats {
                found: 2,
                converted: 1,
                failed: 1
            }
        );
        assert_eq!(
            prepared.mapping.get(Marker::new(0)),
            Some(text::render(SCENARIO).as_str())
        );
        assert_eq!(
            prepared.mapping.get(Marker::new(1)),
            Some(failure_notice("transport/endpoint failure: HTTP 500: boom").as_str())
        );
        assert_eq!(
            prepared.markup,
            "<p>a</p><p>{{DEEPWIKI-DIAGRAM-0}}</p><p>b</p><p>{{DEEPWIKI-DIAGRAM-1}}</p>"
        );
    }

    #[test]
    fn test_convert_sets_rendered_diagram() {
        let (converter, _) = converter();

        let result = converter.convert(&DiagramFragment::new(flowchart("")));

        assert!(result.success);
        assert_eq!(result.description.as_deref(), Some(SCENARIO));
        let diagram = result.diagram.unwrap();
        assert!(diagram.contains("│ Start      │"));
        assert!(diagram.contains("Start --> End"));
    }

    #[test]
    fn test_cache_hit_skips_recovery() {
        let (converter, calls) = converter();
        let converter = converter.cache(Box::new(MemoryBucket::default()));
        let fragment = DiagramFragment::new(flowchart("<text>ok</text>"));

        let first = converter.convert(&fragment);
        let second = converter.convert(&fragment);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let (converter, calls) = converter();
        let converter = converter.cache(Box::new(MemoryBucket::default()));
        let fragment = DiagramFragment::new(flowchart("<text>fail</text>"));

        converter.convert(&fragment);
        converter.convert(&fragment);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_external_renderer_does_not_replace_text_rendering() {
        let (converter, _) = converter();
        let render_calls = Arc::new(AtomicUsize::new(0));
        let converter = converter.external(Box::new(CountingRenderer {
            calls: Arc::clone(&render_calls),
        }));

        let ok = converter.convert(&DiagramFragment::new(flowchart("")));
        let failed = converter.convert(&DiagramFragment::new(flowchart("<text>fail</text>")));

        assert_eq!(render_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ok.diagram, Some(text::render(SCENARIO)));
        assert_eq!(failed.diagram, None);
    }

    #[test]
    fn test_parallel_recovery_keeps_discovery_order() {
        let (converter, calls) = converter();
        let converter = converter.max_workers(4);
        let html: String = (0..12)
            .map(|i| flowchart(&format!("<text>N{i}</text>")))
            .collect();

        let prepared = converter.prepare(&html);

        assert_eq!(calls.load(Ordering::SeqCst), 12);
        assert_eq!(prepared.stats.converted, 12);
        for i in 0..12 {
            let entry = prepared.mapping.get(Marker::new(i)).unwrap();
            assert_eq!(entry, text::render(&format!("N{i}: node")));
        }
    }

    #[test]
    fn test_prepared_document_splice_consumes_all_markers() {
        let (converter, _) = converter();
        let html = format!("<p>x</p>{}{}", flowchart(""), flowchart("<text>fail</text>"));

        let prepared = converter.prepare(&html);
        let outcome = prepared.splice(&prepared.markup);

        assert_eq!(outcome.text.matches(MARKER_SENTINEL).count(), 0);
        assert!(outcome.warnings.is_empty());
        assert!(outcome.text.contains("[conversion failed: "));
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = ConversionStats::default();
        total += ConversionStats {
            found: 2,
            converted: 1,
            failed: 1,
        };
        total += ConversionStats {
            found: 1,
            converted: 1,
            failed: 0,
        };

        assert_eq!(
            total,
            ConversionStats {
                found: 3,
                converted: 2,
                failed: 1
            }
        );
    }
}
