use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use tracing::debug;

use super::Namespace;
use crate::effects::SessionRunner;
use crate::process::{run_command_passthrough, RunOutput};
use crate::reporter::ProgressEvent;
use crate::CommandContext;

pub(crate) const BINDINGS_ENV: &str = "TRYMODULE_BINDINGS";
pub(crate) const HISTORY_ENV: &str = "TRYMODULE_HISTORY_PATH";
pub(crate) const PROMPT_ENV: &str = "TRYMODULE_PROMPT";
const DEFAULT_PROMPT: &str = "> ";

/// Node program run with `-e`: loads every binding, starts a REPL, merges
/// the bindings into its context and persists history.
pub(crate) const REPL_PRELUDE: &str = r"
const repl = require('repl');
const bindings = JSON.parse(process.env.TRYMODULE_BINDINGS || '{}');
const loaded = {};
for (const [key, location] of Object.entries(bindings)) {
  loaded[key] = require(location);
}
const server = repl.start({ prompt: process.env.TRYMODULE_PROMPT || '> ' });
const history = process.env.TRYMODULE_HISTORY_PATH;
if (history && typeof server.setupHistory === 'function') {
  server.setupHistory(history, (err) => {
    if (err) console.error(`history disabled: ${err.message}`);
  });
}
Object.assign(server.context, loaded);
";

/// Everything needed to start one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub program: Option<String>,
    pub history: PathBuf,
    pub cwd: PathBuf,
    pub prompt: String,
    pub bindings: IndexMap<String, PathBuf>,
}

impl SessionPlan {
    #[must_use]
    pub fn new(namespace: &Namespace, history: PathBuf, cwd: PathBuf) -> Self {
        Self {
            program: None,
            history,
            cwd,
            prompt: DEFAULT_PROMPT.to_string(),
            bindings: namespace
                .iter()
                .map(|(key, binding)| (key.to_string(), binding.location.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_program(mut self, program: Option<String>) -> Self {
        self.program = program;
        self
    }

    fn envs(&self) -> Result<Vec<(String, String)>> {
        let bindings: IndexMap<&str, String> = self
            .bindings
            .iter()
            .map(|(key, path)| (key.as_str(), path.display().to_string()))
            .collect();
        Ok(vec![
            (
                BINDINGS_ENV.to_string(),
                serde_json::to_string(&bindings).context("encoding REPL bindings")?,
            ),
            (HISTORY_ENV.to_string(), self.history.display().to_string()),
            (PROMPT_ENV.to_string(), self.prompt.clone()),
        ])
    }
}

/// Runs the node REPL attached to the current terminal.
pub struct NodeSession;

impl SessionRunner for NodeSession {
    fn launch(&self, plan: &SessionPlan) -> Result<RunOutput> {
        let node = match &plan.program {
            Some(program) => program.clone(),
            None => which::which("node")
                .map(|path| path.display().to_string())
                .map_err(|err| anyhow!("node executable not found ({err})"))?,
        };
        let args = vec!["-e".to_string(), REPL_PRELUDE.to_string()];
        debug!(node = %node, bindings = plan.bindings.len(), "starting REPL");
        run_command_passthrough(&node, &args, &plan.envs()?, &plan.cwd)
    }
}

/// Starts the REPL unless non-interactive mode is configured.
///
/// Returns `None` when the session was skipped.
pub(crate) fn start_session(
    ctx: &CommandContext,
    namespace: &Namespace,
) -> Result<Option<RunOutput>> {
    ctx.report(&ProgressEvent::SessionStarting);
    let session = ctx.config().session();
    if !session.interactive {
        debug!("non-interactive mode; REPL skipped");
        return Ok(None);
    }
    let history = ctx.config().cache().history.clone();
    if let Some(parent) = history.parent() {
        ctx.effects().fs().create_dir_all(parent)?;
    }
    let cwd = env::current_dir().unwrap_or_else(|_| ctx.config().cache().root.clone());
    let plan = SessionPlan::new(namespace, history, cwd).with_program(session.node.clone());
    ctx.effects().session().launch(&plan).map(Some)
}
