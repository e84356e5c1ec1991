//! Print triggers used by the auto-print one-shot

use std::fs;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{MonitorError, MonitorResult};

use super::view::DomView;

/// Path prefix that opts a display out of auto-print
pub const NO_AUTOPRINT_PREFIX: &str = "/noautoprint";

/// Whether a display loaded from `path` should auto-print on Stop
pub fn auto_print_enabled(path: &str) -> bool {
    !path.starts_with(NO_AUTOPRINT_PREFIX)
}

/// Something that can raise the platform print dialog.
///
/// Receives the view as it stands after the render that requested the
/// print. Calls are fire-and-forget: an implementation must not block until
/// the job completes.
pub trait Printer<V> {
    fn print(&mut self, view: &V) -> MonitorResult<()>;
}

/// Records the request in the log only
#[derive(Debug, Default)]
pub struct LogPrinter;

impl<V> Printer<V> for LogPrinter {
    fn print(&mut self, _view: &V) -> MonitorResult<()> {
        log::info!("Vote stopped, print requested");
        Ok(())
    }
}

/// Spawns an external command (e.g. `lp board.html`) without waiting for it.
///
/// With a board file set, the board is written there first so the command
/// prints the stopped vote rather than the previous one. Each job is reaped
/// by a background task, so `print` must run inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    program: String,
    args: Vec<String>,
    board_file: Option<PathBuf>,
}

impl CommandPrinter {
    /// Build from a shell-style command line; quotes group words as in `sh`
    pub fn from_command_line(line: &str) -> MonitorResult<Self> {
        let words = shell_words::split(line)
            .map_err(|e| MonitorError::Config(format!("print command {:?}: {}", line, e)))?;
        let mut parts = words.into_iter();
        let program = parts
            .next()
            .ok_or_else(|| MonitorError::Config("empty print command".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
            board_file: None,
        })
    }

    pub fn with_board_file(mut self, path: Option<PathBuf>) -> Self {
        self.board_file = path;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Printer<DomView> for CommandPrinter {
    fn print(&mut self, view: &DomView) -> MonitorResult<()> {
        if let Some(path) = &self.board_file {
            fs::write(path, view.document().to_html())?;
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MonitorError::Config(format!("print jobs need a tokio runtime: {}", e)))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()?;
        log::info!(
            "Started print job {} (pid {})",
            self.program,
            child.id().unwrap_or_default()
        );

        let program = self.program.clone();
        runtime.spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => log::debug!("Print job {} finished", program),
                Ok(status) => log::warn!("Print job {} exited with {}", program, status),
                Err(e) => log::error!("Print job {} could not be awaited: {}", program, e),
            }
        });
        Ok(())
    }
}

/// Counts print requests; useful for checking the one-shot behaviour
#[derive(Debug, Default)]
pub struct CountingPrinter {
    pub calls: usize,
}

impl<V> Printer<V> for CountingPrinter {
    fn print(&mut self, _view: &V) -> MonitorResult<()> {
        self.calls += 1;
        Ok(())
    }
}
