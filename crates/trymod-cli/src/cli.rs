use clap::{ArgAction, Parser};

pub const TRYMODULE_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\n{all-args}\n";

pub const TRYMODULE_BEFORE_HELP: &str = concat!(
    "trymodule ",
    env!("CARGO_PKG_VERSION"),
    " – try npm packages without touching your project\n\n",
    "  trymodule lodash is-array   Install (or reuse) packages and open a node REPL with them bound.\n",
    "  trymodule --clear           Delete every cached package.\n\n",
    "Environment: TRYMODULE_PATH, TRYMODULE_HISTORY_PATH, TRYMODULE_NONINTERACTIVE,\n",
    "             TRYMODULE_NPM, TRYMODULE_NODE\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "trymodule",
    author,
    version,
    before_help = TRYMODULE_BEFORE_HELP,
    help_template = TRYMODULE_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct TryCli {
    #[arg(
        value_name = "PACKAGE",
        help = "Package names, scoped names, or repository URLs to load",
        conflicts_with = "clear"
    )]
    pub packages: Vec<String>,
    #[arg(long, help = "Remove every cached package and exit")]
    pub clear: bool,
    #[arg(
        long,
        help = "Finish every install and report all failures instead of stopping at the first",
        conflicts_with = "clear"
    )]
    pub keep_going: bool,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
}
