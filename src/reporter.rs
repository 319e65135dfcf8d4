use log::{debug, info, warn};
use std::fmt::Display;

const BANNER_WIDTH: usize = 60;

/// Progress and diagnostic output for one run.
///
/// Created once at the entry point and handed to every stage. When quiet,
/// nothing is emitted; the structured result is never routed through here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn quiet() -> Self {
        Self::new(true)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// A title framed by rules, used at the start and end of a run
    pub fn banner(&self, title: &str) {
        if !self.quiet {
            let rule = "=".repeat(BANNER_WIDTH);
            info!("{rule}");
            info!("{title}");
            info!("{rule}");
        }
    }

    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            info!("{message}");
        }
    }

    pub fn warn(&self, message: impl Display) {
        if !self.quiet {
            warn!("{message}");
        }
    }

    pub fn debug(&self, message: impl Display) {
        if !self.quiet {
            debug!("{message}");
        }
    }
}
