//! Sequential batch translation
//!
//! Files are translated one at a time with a fixed pause between requests.
//! A failure on one file is recorded and the run moves on.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::gemini::{TextGenerator, TranslateError};
use super::layout::DocsLayout;
use super::prompt::build_prompt;
use super::script::has_urdu_content;
use super::selection::Selection;

/// Result of translating one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Localized file already contains Urdu
    Skipped,
    /// Translation written to `output`
    Translated { output: PathBuf },
    Failed { reason: String },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, FileOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Files selected for a run, split by whether they still need work
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub discovered: usize,
    pub already_translated: Vec<PathBuf>,
    pub pending: Vec<PathBuf>,
}

impl BatchPlan {
    /// Rough wall-clock minutes for the pending files at `delay` per file.
    pub fn estimated_minutes(&self, delay: Duration) -> u64 {
        self.pending.len() as u64 * delay.as_secs() / 60
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub selection: Selection,
    /// Files found by the selection
    pub discovered: usize,
    /// Filtered out before the run because they already had Urdu
    pub already_translated: usize,
    /// Files the run visited
    pub attempted: usize,
    pub translated: usize,
    /// Found already translated while running
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.translated + self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, outcome: FileOutcome) {
        self.attempted += 1;
        match outcome {
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Translated { .. } => self.translated += 1,
            FileOutcome::Failed { reason } => self.failures.push(FileFailure {
                path: path.to_path_buf(),
                reason,
            }),
        }
    }

    /// Human readable end-of-run summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[OK] Successful: {}/{}", self.succeeded(), self.attempted);
        if self.selection.partitions_translated() {
            let _ = writeln!(out, "[OK] Already had Urdu: {}", self.already_translated);
            let _ = writeln!(
                out,
                "[OK] Total Urdu files: {}/{}",
                self.succeeded() + self.already_translated,
                self.discovered
            );
        }

        if !self.failures.is_empty() {
            let listed = self
                .selection
                .listed_failures()
                .unwrap_or(self.failures.len());

            let _ = writeln!(out, "\n[FAIL] Failed: {}", self.failures.len());
            for failure in self.failures.iter().take(listed) {
                let _ = writeln!(out, "  - {} ({})", failure.path.display(), failure.reason);
            }
            if self.failures.len() > listed {
                let _ = writeln!(out, "  ... and {} more", self.failures.len() - listed);
            }
        }

        out
    }
}

/// Drives a generator over a set of documentation files
pub struct BatchTranslator {
    generator: Arc<dyn TextGenerator>,
    layout: DocsLayout,
    selection: Selection,
    delay: Duration,
    sample_chars: usize,
}

impl BatchTranslator {
    /// Translator with the selection's default delay and Urdu sample size
    pub fn new(generator: Arc<dyn TextGenerator>, layout: DocsLayout, selection: Selection) -> Self {
        Self {
            generator,
            layout,
            selection,
            delay: selection.default_delay(),
            sample_chars: selection.sample_chars(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn layout(&self) -> &DocsLayout {
        &self.layout
    }

    /// Resolve the selection's files, moving already-translated ones aside
    /// when the selection asks for it.
    pub fn plan(&self) -> Result<BatchPlan> {
        let files = self.selection.files(&self.layout)?;
        let discovered = files.len();

        if !self.selection.partitions_translated() {
            return Ok(BatchPlan {
                discovered,
                already_translated: Vec::new(),
                pending: files,
            });
        }

        let (already_translated, pending): (Vec<PathBuf>, Vec<PathBuf>) = files
            .into_iter()
            .partition(|source| self.is_translated(source));

        Ok(BatchPlan {
            discovered,
            already_translated,
            pending,
        })
    }

    /// Translate every pending file in order, pausing between files.
    pub async fn run(&self, plan: &BatchPlan) -> BatchReport {
        let mut report = BatchReport {
            selection: self.selection,
            discovered: plan.discovered,
            already_translated: plan.already_translated.len(),
            ..Default::default()
        };
        let total = plan.pending.len();

        for (index, source) in plan.pending.iter().enumerate() {
            tracing::info!("[{}/{}] {}", index + 1, total, source.display());

            let outcome = self.translate_file(source).await;
            report.record(source, outcome);

            if index + 1 < total && !self.delay.is_zero() {
                tracing::info!(
                    "[WAIT] Cooling down {} seconds for API rate limit...",
                    self.delay.as_secs_f32()
                );
                tokio::time::sleep(self.delay).await;
            }
        }

        report
    }

    /// Translate a single source document into its mirrored location.
    pub async fn translate_file(&self, source: &Path) -> FileOutcome {
        let Some(target) = self.layout.localized_path(source) else {
            return failed(source, "outside the documentation root".to_string());
        };

        if has_urdu_content(&target, self.sample_chars) {
            tracing::info!("[SKIP] Already translated: {}", source.display());
            return FileOutcome::Skipped;
        }

        if !source.is_file() {
            tracing::error!("[ERROR] File not found: {}", source.display());
            return FileOutcome::Failed {
                reason: "file not found".to_string(),
            };
        }

        tracing::info!("[...] Translating: {}", source.display());
        match self.translate_to(source, &target).await {
            Ok(()) => {
                tracing::info!("[OK] SUCCESS: {}", target.display());
                FileOutcome::Translated { output: target }
            }
            Err(e) => failed(source, e.to_string()),
        }
    }

    fn is_translated(&self, source: &Path) -> bool {
        self.layout
            .localized_path(source)
            .is_some_and(|target| has_urdu_content(&target, self.sample_chars))
    }

    async fn translate_to(&self, source: &Path, target: &Path) -> Result<(), TranslateError> {
        let english = tokio::fs::read_to_string(source).await?;
        let urdu = self.generator.generate(&build_prompt(&english)).await?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        write_atomically(target, urdu.as_bytes()).await?;
        Ok(())
    }
}

/// Sibling path a translation is staged in before it replaces `target`
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.partial", name))
}

/// Write through a staging file and rename it over `target`, so an
/// interrupted run never leaves a truncated translation behind.
async fn write_atomically(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let staging = staging_path(target);
    if let Err(e) = tokio::fs::write(&staging, contents).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }
    tokio::fs::rename(&staging, target).await
}

fn failed(source: &Path, reason: String) -> FileOutcome {
    tracing::warn!("[FAIL] Translation failed for {}: {}", source.display(), reason);
    FileOutcome::Failed { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers with a fixed Urdu body, or fails for prompts containing `FAIL`.
    #[derive(Default)]
    struct MockGenerator {
        prompts: Mutex<Vec<String>>,
        calls_at: Mutex<Vec<tokio::time::Instant>>,
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, TranslateError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.calls_at.lock().unwrap().push(tokio::time::Instant::now());
            if prompt.contains("FAIL") {
                return Err(TranslateError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                });
            }
            Ok("# ترجمہ".to_string())
        }
    }

    struct Fixture {
        _dir: TempDir,
        docs: PathBuf,
        urdu: PathBuf,
        generator: Arc<MockGenerator>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let docs = dir.path().join("docs");
            let urdu = dir.path().join("ur");
            std::fs::create_dir_all(&docs).unwrap();
            Self {
                _dir: dir,
                docs,
                urdu,
                generator: Arc::new(MockGenerator::default()),
            }
        }

        fn write_source(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.docs.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
            path
        }

        fn write_target(&self, relative: &str, content: &str) {
            let path = self.urdu.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn translator(&self, selection: Selection) -> BatchTranslator {
            BatchTranslator::new(
                self.generator.clone(),
                DocsLayout::new(&self.docs, &self.urdu),
                selection,
            )
            .with_delay(Duration::ZERO)
        }
    }

    #[tokio::test]
    async fn test_translate_file_writes_mirrored_output() {
        let fx = Fixture::new();
        let source = fx.write_source("part1/chapter1/lesson1.md", "# Sensors");

        let outcome = fx.translator(Selection::All).translate_file(&source).await;

        let expected = fx.urdu.join("part1/chapter1/lesson1.md");
        assert_eq!(outcome, FileOutcome::Translated { output: expected.clone() });
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "# ترجمہ");
        assert!(fx.generator.prompts.lock().unwrap()[0].contains("# Sensors"));
    }

    #[tokio::test]
    async fn test_translate_file_skips_existing_urdu() {
        let fx = Fixture::new();
        let source = fx.write_source("intro.md", "# Intro");
        fx.write_target("intro.md", "# تعارف");

        let outcome = fx.translator(Selection::Critical).translate_file(&source).await;

        assert_eq!(outcome, FileOutcome::Skipped);
        assert!(fx.generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_translate_file_retranslates_english_placeholder() {
        let fx = Fixture::new();
        let source = fx.write_source("intro.md", "# Intro");
        fx.write_target("intro.md", "# Intro (untranslated copy)");

        let outcome = fx.translator(Selection::All).translate_file(&source).await;

        assert!(matches!(outcome, FileOutcome::Translated { .. }));
    }

    #[tokio::test]
    async fn test_translate_file_missing_source() {
        let fx = Fixture::new();

        let outcome = fx
            .translator(Selection::Critical)
            .translate_file(&fx.docs.join("part9/intro.md"))
            .await;

        assert_eq!(
            outcome,
            FileOutcome::Failed {
                reason: "file not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_translate_file_generator_failure_writes_nothing() {
        let fx = Fixture::new();
        let source = fx.write_source("broken.md", "FAIL");

        let outcome = fx.translator(Selection::All).translate_file(&source).await;

        assert!(!outcome.is_success());
        assert!(!fx.urdu.join("broken.md").exists());
    }

    #[tokio::test]
    async fn test_plan_partitions_translated_files() {
        let fx = Fixture::new();
        fx.write_source("a.md", "A");
        fx.write_source("b.md", "B");
        fx.write_source("c.md", "C");
        fx.write_target("b.md", "ب");

        let plan = fx.translator(Selection::All).plan().unwrap();

        assert_eq!(plan.discovered, 3);
        assert_eq!(plan.already_translated, vec![fx.docs.join("b.md")]);
        assert_eq!(plan.pending, vec![fx.docs.join("a.md"), fx.docs.join("c.md")]);
    }

    #[tokio::test]
    async fn test_critical_plan_keeps_every_file() {
        let fx = Fixture::new();

        let plan = fx.translator(Selection::Critical).plan().unwrap();

        assert_eq!(plan.pending.len(), 13);
        assert!(plan.already_translated.is_empty());
    }

    #[tokio::test]
    async fn test_run_reports_mixed_outcomes() {
        let fx = Fixture::new();
        let good = fx.write_source("good.md", "fine");
        let bad = fx.write_source("bad.md", "FAIL");
        let done = fx.write_source("done.md", "done");
        fx.write_target("done.md", "مکمل");
        let plan = BatchPlan {
            discovered: 4,
            already_translated: vec![],
            pending: vec![good, bad.clone(), done, fx.docs.join("missing.md")],
        };

        let report = fx.translator(Selection::Critical).run(&plan).await;

        assert_eq!(report.attempted, 4);
        assert_eq!(report.translated, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].path, bad);
        assert!(report.failures[0].reason.contains("quota exceeded"));
        assert!(!report.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_only_between_files() {
        let fx = Fixture::new();
        let files: Vec<PathBuf> = ["1.md", "2.md", "3.md"]
            .iter()
            .map(|name| fx.write_source(name, "text"))
            .collect();
        let plan = BatchPlan {
            discovered: 3,
            already_translated: vec![],
            pending: files,
        };
        let translator = fx
            .translator(Selection::All)
            .with_delay(Duration::from_secs(13));

        let started = tokio::time::Instant::now();
        translator.run(&plan).await;
        let elapsed = started.elapsed();

        let calls = fx.generator.calls_at.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
        assert!(calls[1] - calls[0] >= Duration::from_secs(13));
        assert!(calls[2] - calls[1] >= Duration::from_secs(13));
        assert!(elapsed >= Duration::from_secs(26));
        assert!(elapsed < Duration::from_secs(39));
    }

    fn failures(count: usize) -> Vec<FileFailure> {
        (0..count)
            .map(|i| FileFailure {
                path: PathBuf::from(format!("docs/{i}.md")),
                reason: "file not found".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_summary_lists_first_ten_failures() {
        let report = BatchReport {
            selection: Selection::All,
            discovered: 20,
            attempted: 12,
            failures: failures(12),
            ..Default::default()
        };

        let summary = report.summary();

        assert!(summary.contains("[FAIL] Failed: 12"));
        assert!(summary.contains("docs/9.md"));
        assert!(!summary.contains("docs/10.md"));
        assert!(summary.contains("... and 2 more"));
    }

    #[test]
    fn test_critical_summary_lists_every_failure() {
        let report = BatchReport {
            selection: Selection::Critical,
            discovered: 13,
            attempted: 13,
            failures: failures(12),
            ..Default::default()
        };

        let summary = report.summary();

        assert!(summary.contains("docs/11.md"));
        assert!(!summary.contains("more"));
        assert!(!summary.contains("Already had Urdu"));
    }

    #[test]
    fn test_full_run_summary_always_reports_urdu_totals() {
        let report = BatchReport {
            selection: Selection::All,
            discovered: 3,
            attempted: 3,
            translated: 3,
            ..Default::default()
        };

        let summary = report.summary();

        assert!(summary.contains("[OK] Already had Urdu: 0"));
        assert!(summary.contains("[OK] Total Urdu files: 3/3"));
    }

    #[test]
    fn test_summary_counts_already_translated() {
        let report = BatchReport {
            selection: Selection::All,
            discovered: 10,
            already_translated: 6,
            attempted: 4,
            translated: 4,
            ..Default::default()
        };

        let summary = report.summary();

        assert!(summary.contains("[OK] Successful: 4/4"));
        assert!(summary.contains("[OK] Already had Urdu: 6"));
        assert!(summary.contains("[OK] Total Urdu files: 10/10"));
    }

    #[tokio::test]
    async fn test_translation_replaces_stale_output_without_leftovers() {
        let fx = Fixture::new();
        let source = fx.write_source("part1/intro.md", "# Intro");
        fx.write_target("part1/intro.md", "# Intro (English placeholder)");

        fx.translator(Selection::All).translate_file(&source).await;

        let entries: Vec<String> = std::fs::read_dir(fx.urdu.join("part1"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["intro.md".to_string()]);
        assert_eq!(
            std::fs::read_to_string(fx.urdu.join("part1/intro.md")).unwrap(),
            "# ترجمہ"
        );
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("ur/part1/intro.md")),
            PathBuf::from("ur/part1/.intro.md.partial")
        );
    }

    #[test]
    fn test_estimated_minutes() {
        let plan = BatchPlan {
            discovered: 10,
            already_translated: vec![],
            pending: vec![PathBuf::from("x.md"); 10],
        };

        assert_eq!(plan.estimated_minutes(Duration::from_secs(13)), 2);
    }
}
