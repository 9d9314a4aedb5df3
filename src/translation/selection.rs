//! Which documents a translation run covers

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use super::layout::DocsLayout;

/// Part intros followed by the first lesson of each chapter, relative to
/// the source root, in translation order.
pub const CRITICAL_FILES: [&str; 13] = [
    "part1/intro.md",
    "part2/intro.md",
    "part3/intro.md",
    "part4/intro.md",
    "part5/intro.md",
    "part1/chapter1-what-is-physical-ai/lesson1-defining-physical-ai.md",
    "part1/chapter2-foundations-of-robotics/lesson1-mechanical-systems.md",
    "part1/chapter3-ai-fundamentals/lesson1-machine-learning-basics.md",
    "part2/chapter1-humanoid-design/lesson1-biped-mechanics.md",
    "part2/chapter2-locomotion/lesson1-walking-gaits.md",
    "part3/chapter1-perception-ai/lesson1.md",
    "part4/chapter1-industrial-applications/lesson1.md",
    "part5/chapter1-humanoids-in-everyday-life/lesson1-humanoids-in-the-smart-home.md",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Selection {
    /// Every Markdown file under the source root
    #[default]
    All,
    /// The fixed demo set in `CRITICAL_FILES`
    Critical,
}

impl Selection {
    pub fn default_model(self) -> &'static str {
        match self {
            Selection::All => "gemini-2.5-flash-lite",
            Selection::Critical => "gemini-1.5-flash",
        }
    }

    /// Pause between consecutive requests.
    ///
    /// 13 s keeps a full run under the free tier's 5 requests per minute.
    pub fn default_delay(self) -> Duration {
        match self {
            Selection::All => Duration::from_secs(13),
            Selection::Critical => Duration::from_secs(2),
        }
    }

    /// Characters of an existing translation inspected for Urdu script
    pub fn sample_chars(self) -> usize {
        match self {
            Selection::All => 1000,
            Selection::Critical => 500,
        }
    }

    /// Whether already-translated files are filtered out before the run
    pub fn partitions_translated(self) -> bool {
        matches!(self, Selection::All)
    }

    /// How many failures the summary lists individually; `None` lists all
    pub fn listed_failures(self) -> Option<usize> {
        match self {
            Selection::All => Some(10),
            Selection::Critical => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Selection::All => "COMPLETE URDU TRANSLATION - ALL REMAINING FILES",
            Selection::Critical => "CRITICAL FILES TRANSLATION FOR URDU DEMO",
        }
    }

    /// Source documents in this selection
    pub fn files(self, layout: &DocsLayout) -> Result<Vec<PathBuf>> {
        match self {
            Selection::All => layout.discover(),
            Selection::Critical => Ok(CRITICAL_FILES
                .iter()
                .map(|relative| layout.source_path(relative))
                .collect()),
        }
    }
}
