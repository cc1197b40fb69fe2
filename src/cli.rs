//! Command-line interface definitions
//!
//! Arguments are grouped by the component that consumes them: the remote
//! connection, output/logging, and the filesystem command to run.

use crate::config::{Credentials, RemoteConfig};
use crate::fs::WebDavFs;
use crate::protocol::RemoteClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Browse and modify a WebDAV-style remote store
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Remote endpoint and credentials
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Remote connection options
///
/// Used by: `RemoteConfig::new()`, `backends::connect()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Remote Options")]
pub struct RemoteArgs {
    /// Remote base URL (`file:///dir` or `memory://` for the bundled clients)
    #[arg(long, short = 'e', value_name = "URL")]
    pub endpoint: String,

    /// Login name
    #[arg(long, default_value = "anonymous")]
    pub login: String,

    /// Password
    #[arg(long, default_value = "", hide_default_value = true)]
    pub password: String,

    /// Path prefix prepended to every remote path
    #[arg(long)]
    pub root: Option<String>,
}

impl RemoteArgs {
    /// Build the validated remote configuration
    ///
    /// # Errors
    ///
    /// Fails if the endpoint or login is empty or the root is invalid.
    pub fn to_config(&self) -> Result<RemoteConfig> {
        let credentials = Credentials::new(self.login.clone(), self.password.clone());
        let config = RemoteConfig::new(self.endpoint.clone(), credentials)?;
        match &self.root {
            Some(root) => Ok(config.with_root(root)?),
            None => Ok(config),
        }
    }
}

/// Output and logging options
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Log filter directive for the selected verbosity
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Filesystem command
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show normalized information about a path
    Stat { path: String },
    /// Print a file to stdout
    Cat { path: String },
    /// Upload a local file (or stdin) to a remote path
    Put {
        path: String,
        /// Local source file; stdin when omitted
        #[arg(long, short)]
        source: Option<PathBuf>,
    },
    /// Create a directory
    Mkdir {
        path: String,
        /// Succeed if the directory already exists
        #[arg(long, short = 'p')]
        recreate: bool,
    },
    /// Remove a file
    Rm { path: String },
    /// Remove an empty directory
    Rmdir { path: String },
    /// Copy a resource
    Cp {
        src: String,
        dst: String,
        #[arg(long, short)]
        overwrite: bool,
    },
    /// Move a resource
    Mv {
        src: String,
        dst: String,
        #[arg(long, short)]
        overwrite: bool,
    },
    /// Create an empty file if absent
    Touch {
        path: String,
        /// Truncate an existing file
        #[arg(long)]
        wipe: bool,
    },
}

impl Args {
    /// # Errors
    ///
    /// Fails on conflicting output flags.
    pub fn validate(&self) -> Result<()> {
        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }
        Ok(())
    }
}

/// Execute `command` against `fs`, writing results to `out`
///
/// # Errors
///
/// Returns the filesystem error with the command as context.
pub fn run<C: RemoteClient>(fs: &WebDavFs<C>, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Ls { path } => {
            for name in fs.list(path).with_context(|| format!("ls {path}"))? {
                writeln!(out, "{name}")?;
            }
        }
        Command::Stat { path } => {
            let info = fs.stat(path).with_context(|| format!("stat {path}"))?;
            writeln!(out, "{}", info.summary())?;
        }
        Command::Cat { path } => {
            let data = fs.get_bytes(path).with_context(|| format!("cat {path}"))?;
            out.write_all(&data)?;
        }
        Command::Put { path, source } => {
            let data = match source {
                Some(local) => std::fs::read(local)
                    .with_context(|| format!("Failed to read {}", local.display()))?,
                None => {
                    let mut data = Vec::new();
                    std::io::stdin().read_to_end(&mut data)?;
                    data
                }
            };
            fs.set_bytes(path, &data).with_context(|| format!("put {path}"))?;
        }
        Command::Mkdir { path, recreate } => {
            fs.make_dir(path, *recreate).with_context(|| format!("mkdir {path}"))?;
        }
        Command::Rm { path } => fs.remove(path).with_context(|| format!("rm {path}"))?,
        Command::Rmdir { path } => fs.remove_dir(path).with_context(|| format!("rmdir {path}"))?,
        Command::Cp {
            src,
            dst,
            overwrite,
        } => fs
            .copy(src, dst, *overwrite)
            .with_context(|| format!("cp {src} {dst}"))?,
        Command::Mv {
            src,
            dst,
            overwrite,
        } => fs
            .move_to(src, dst, *overwrite)
            .with_context(|| format!("mv {src} {dst}"))?,
        Command::Touch { path, wipe } => {
            fs.create(path, *wipe).with_context(|| format!("touch {path}"))?;
        }
    }
    Ok(())
}
