use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dvc_utils::areas::config::Config;
use dvc_utils::areas::repository::Repository;
use dvc_utils::artifacts::manifest::tracked_path::TrackedPath;
use dvc_utils::artifacts::pipeline::{DiffOptions, ExecMode, PipelineError};
use dvc_utils::artifacts::revision::refspec::Refspec;
use dvc_utils::commands::porcelain::diff_x::{PipelineOptions, diff_x};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

const FAILURE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "dvc-utils",
    version = "0.1.0",
    about = "Diff DVC-tracked files across git history",
    long_about = "Resolves DVC-tracked files at git revisions through their .dvc manifests \
    and diffs them, optionally piping each side through a chain of commands first.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Log commands and resolved paths to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PipelineArgs {
    #[arg(short = 'c', long = "color", help = "Force colored diff output")]
    color: bool,
    #[arg(long = "no-color", conflicts_with = "color", help = "Disable colored diff output")]
    no_color: bool,
    #[arg(short = 's', long = "shell", help = "Shell used to run each command (default /bin/sh)")]
    shell: Option<PathBuf>,
    #[arg(
        short = 'S',
        long = "no-shell",
        help = "Split commands into arguments instead of running them through a shell"
    )]
    no_shell: bool,
    #[arg(short = 'U', long = "unified", help = "Lines of context in the diff")]
    unified: Option<u32>,
    #[arg(short = 'w', long = "ignore-whitespace", help = "Ignore whitespace differences")]
    ignore_whitespace: bool,
    #[arg(
        short = 'x',
        long = "exec-cmd",
        help = "Command to pipe each side through; repeat to chain (runs before positional commands)"
    )]
    exec_cmds: Vec<String>,
    #[arg(long, value_name = "SECS", help = "Give up and clean up after this many seconds")]
    timeout: Option<u64>,
}

impl PipelineArgs {
    fn into_options(self, positional: &[String]) -> PipelineOptions {
        let color = match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        PipelineOptions {
            commands: self.exec_cmds.into_iter().chain(positional.iter().cloned()).collect(),
            exec_mode: if self.no_shell { ExecMode::Exec } else { ExecMode::Shell },
            shell: self.shell,
            diff: DiffOptions::new(self.ignore_whitespace, self.unified, color),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "diff",
        about = "Diff a DVC-tracked file at two commits, or a commit and the working tree",
        long_about = "Resolves PATH at each side of REFSPEC through its .dvc manifest (or the manifest \
        of a tracked parent directory) and diffs the cached contents. Any commands given before \
        PATH form a pipeline each side is run through; the first receives the side's path."
    )]
    Diff {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[arg(short = 'r', long = "refspec", help = "<before>..<after>, or <before> to compare against the working tree", default_value = "HEAD")]
        refspec: String,
        #[arg(required = true, num_args = 1.., value_name = "[CMD]... PATH")]
        args: Vec<String>,
    },
    #[command(
        name = "diff-x",
        about = "Diff two files, each piped through the same commands",
        long_about = "Runs the given commands on both files and diffs the outputs. \
        A file that does not exist compares as empty."
    )]
    DiffX {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[arg(required = true, num_args = 2.., value_name = "[CMD]... PATH1 PATH2")]
        args: Vec<String>,
    },
    #[command(
        name = "cache-path",
        about = "Print the DVC cache path of a tracked file",
        long_about = "Without PATH, REF may be <revision>:<path> or a bare md5 content hash."
    )]
    CachePath {
        #[arg(short = 'r', long = "ref", default_value = "HEAD", help = "Revision, <revision>:<path>, or content hash")]
        reference: String,
        #[arg(index = 1, help = "DVC-tracked path (data or .dvc)")]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dvc_utils::init_tracing(cli.verbose);

    let code = match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            err.downcast_ref::<PipelineError>()
                .map_or(FAILURE, PipelineError::exit_code)
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(FAILURE as u8))
}

async fn run(command: Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Diff {
            pipeline,
            refspec,
            args,
        } => {
            let Some((path, commands)) = args.split_last() else {
                anyhow::bail!("missing PATH");
            };
            let options = pipeline.into_options(commands);
            let refspec = Refspec::try_parse(&refspec)?;

            let repository = open_repository().await?;
            let outcome = repository
                .diff(&options, &refspec, &TrackedPath::parse(path))
                .await?;

            Ok(outcome.exit_code)
        }
        Commands::DiffX { pipeline, args } => {
            let [commands @ .., first, second] = args.as_slice() else {
                anyhow::bail!("expected two paths to compare");
            };
            let options = pipeline.into_options(commands);

            let outcome = diff_x(&options, Path::new(first), Path::new(second)).await?;

            Ok(outcome.exit_code)
        }
        Commands::CachePath { reference, path } => {
            let repository = open_repository().await?;

            if repository.cache_path(&reference, path.as_deref()).await? {
                Ok(0)
            } else {
                let target = path.unwrap_or(reference);
                eprintln!("{} {target} is not tracked at that revision", "error:".red().bold());
                Ok(1)
            }
        }
    }
}

async fn open_repository() -> anyhow::Result<Repository> {
    let pwd = std::env::current_dir()?;
    let config = Config::discover(&pwd).await?;

    Ok(Repository::new(config, Box::new(std::io::stdout())))
}
