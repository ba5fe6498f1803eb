use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::effects::{Effects, SharedEffects};
use crate::reporter::{ProgressEvent, SharedReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandGroup {
    Try,
    Clear,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::Try => "try",
            CommandGroup::Clear => "clear",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Everything a command needs: resolved configuration, effects and a sink
/// for progress notices.
pub struct CommandContext {
    config: Config,
    effects: SharedEffects,
    reporter: SharedReporter,
}

impl CommandContext {
    /// Creates a new command context from the process environment.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be resolved.
    pub fn new(effects: SharedEffects, reporter: SharedReporter) -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::with_config(config, effects, reporter))
    }

    #[must_use]
    pub fn with_config(config: Config, effects: SharedEffects, reporter: SharedReporter) -> Self {
        Self {
            config,
            effects,
            reporter,
        }
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn report(&self, event: &ProgressEvent) {
        self.reporter.report(event);
    }

    pub(crate) fn reporter(&self) -> &dyn crate::reporter::Reporter {
        self.reporter.as_ref()
    }
}
