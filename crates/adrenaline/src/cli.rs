use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fix_diff::{AnnotatedDiff, DiffConfig};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::command::run_command;
use crate::config::AppConfig;
use crate::files::save_lines;
use crate::fix::propose_fix;
use crate::provider::OpenAiEditProvider;
use crate::render::{render_annotated, render_json, summary};
use crate::request::FixRequest;

/// Ask an edit service to fix your code and see exactly what it changed.
#[derive(Parser)]
#[clap(name = "adrenaline", version)]
pub struct Cli {
    /// Print the merged code and change regions as JSON
    #[clap(long, global = true)]
    json: bool,

    /// Compare lines exactly instead of ignoring surrounding whitespace
    #[clap(long, global = true)]
    exact: bool,

    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Annotate the differences between two files, without the edit service
    #[clap(name = "diff")]
    Diff(DiffArgs),

    /// Propose a fix for an error, given its stack trace
    #[clap(name = "fix")]
    Fix {
        #[clap(flatten)]
        edit: EditArgs,

        /// The stack trace, or @path to read it from a file
        #[clap(long)]
        stack_trace: String,
    },

    /// Fix all the bugs in a file
    #[clap(name = "lint")]
    Lint(EditArgs),

    /// Optimize a file
    #[clap(name = "optimize")]
    Optimize(EditArgs),

    /// Add comments to a file
    #[clap(name = "document", visible_alias = "doc")]
    Document(EditArgs),

    /// Edit a file with a free-form instruction
    #[clap(name = "edit")]
    Edit {
        #[clap(flatten)]
        edit: EditArgs,

        /// What to do to the code
        #[clap(long, short)]
        instruction: String,
    },

    /// Run a shell command with its first argument resolved under the home directory
    #[clap(name = "run")]
    Run {
        /// Directory, relative to the home directory, for the command's argument
        #[clap(long, default_value = ".")]
        dir: PathBuf,

        #[clap(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

#[derive(Args)]
struct DiffArgs {
    /// The code as submitted
    original: PathBuf,

    /// The revised code
    revised: PathBuf,
}

#[derive(Args)]
struct EditArgs {
    /// The file to send to the edit service
    file: PathBuf,

    /// Save the fixed code here, relative to the home directory
    #[clap(long)]
    save: Option<PathBuf>,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Cmd::Diff(args) => {
                let original = read_file(&args.original)?;
                let revised = read_file(&args.revised)?;
                let diff = self.diff_config().diff_and_annotate(&original, &revised)?;
                self.print(&diff)
            }
            Cmd::Fix { edit, stack_trace } => {
                let stack_trace = read_arg(stack_trace)?;
                self.request_fix(edit, FixRequest::FixError { stack_trace })
            }
            Cmd::Lint(edit) => self.request_fix(edit, FixRequest::Lint),
            Cmd::Optimize(edit) => self.request_fix(edit, FixRequest::Optimize),
            Cmd::Document(edit) => self.request_fix(edit, FixRequest::Document),
            Cmd::Edit { edit, instruction } => {
                self.request_fix(edit, FixRequest::Custom(instruction.clone()))
            }
            Cmd::Run { dir, command } => {
                let output = run_command(&command.join(" "), dir)?;
                print!("{}", output.stdout);
                eprint!("{}", output.stderr);
                output.check_status()
            }
        }
    }

    fn diff_config(&self) -> DiffConfig {
        DiffConfig::default().ignore_whitespace(!self.exact)
    }

    fn request_fix(&self, edit: &EditArgs, request: FixRequest) -> Result<()> {
        let code = read_file(&edit.file)?;
        let config = AppConfig::load();
        let provider = OpenAiEditProvider::from_config(&config)?;

        let proposal = propose_fix(&provider, &self.diff_config(), &code, request)?;
        self.print(&proposal.diff)?;

        if let Some(path) = &edit.save {
            let lines: Vec<&str> = proposal.diff.fixed_text().split('\n').collect();
            let written = save_lines(path, &lines)?;
            eprintln!("Saved fixed code to {}", written.display());
        }
        Ok(())
    }

    fn print(&self, diff: &AnnotatedDiff) -> Result<()> {
        if self.json {
            println!("{}", render_json(diff)?);
        } else {
            print!("{}", render_annotated(diff, std::io::stdout().is_terminal()));
            eprintln!("{}", summary(diff));
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read `@path` arguments from a file, pass anything else through
fn read_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => read_file(Path::new(path)),
        None => Ok(arg.to_string()),
    }
}
