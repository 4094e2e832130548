//! UI capabilities injected into the controller.

use std::io::Write;

/// Blocking yes/no decision from the user.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Route changes requested by the page.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Prompts on stdout and reads the answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        let mut stdout = std::io::stdout();
        if let Err(err) = write!(stdout, "{message} [y/N] ").and_then(|()| stdout.flush()) {
            tracing::error!("failed to write confirmation prompt: {err:?}");
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(err) => {
                tracing::error!("failed to read confirmation answer: {err:?}");
                false
            }
        }
    }
}

/// `y` / `yes`, any case. Everything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Navigator that records every visited route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHistory {
    visited: Vec<String>,
}

impl RouteHistory {
    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            visited: vec![path.into()],
        }
    }

    pub fn current(&self) -> &str {
        self.visited.last().map(String::as_str).unwrap_or("/")
    }

    /// Every route in visit order, starting route included.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// How many times `path` was navigated to (the starting route excluded).
    pub fn navigations_to(&self, path: &str) -> usize {
        self.visited.iter().skip(1).filter(|p| *p == path).count()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&mut self, path: &str) {
        tracing::info!("navigating to {}", path);
        self.visited.push(path.to_string());
    }
}
