use std::path::PathBuf;
use std::process;
use structopt::StructOpt;
use syntactic_cli::{cli_err, CheckOptions};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "syntactic",
    about = "Check JavaScript submissions against a structural template and a token policy"
)]
pub(crate) struct Options {
    #[structopt(subcommand)]
    cmd: SubCommand,
}

#[derive(Debug, StructOpt, PartialEq, Eq)]
pub(crate) enum SubCommand {
    /// Check every submission matched by a glob pattern
    Check {
        /// A glob pattern of the submissions to check, directories are searched recursively.
        #[structopt(default_value = "./")]
        files: String,
        /// The config file to use instead of searching for `syntactic.toml`
        #[structopt(short, long, parse(from_os_str))]
        config: Option<PathBuf>,
        /// A template file to use instead of the configured template
        #[structopt(short, long, parse(from_os_str))]
        template: Option<PathBuf>,
        /// Print the reports as JSON
        #[structopt(long)]
        json: bool,
        /// Don't fall back to the config in the user's config directory
        #[structopt(long)]
        no_global: bool,
    },
    /// Print the outline of a file, ex: to see which paths a template requires
    Outline {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
        /// Parse the file as a module instead of a script
        #[structopt(short, long)]
        module: bool,
    },
    /// Print the tokens of a file grouped by token kind
    Tokens {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
        /// Parse the file as a module instead of a script
        #[structopt(short, long)]
        module: bool,
    },
}

fn main() {
    env_logger::init();
    let opt = Options::from_args();

    let res = match opt.cmd {
        SubCommand::Check {
            files,
            config,
            template,
            json,
            no_global,
        } => syntactic_cli::check(CheckOptions {
            files,
            config,
            template,
            json,
            global_config: !no_global,
        }),
        SubCommand::Outline { file, module } => syntactic_cli::outline(&file, module).map(|_| true),
        SubCommand::Tokens { file, module } => syntactic_cli::tokens(&file, module).map(|_| true),
    };

    match res {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            cli_err!("{:#}", err);
            process::exit(2);
        }
    }
}
