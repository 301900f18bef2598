// ABOUTME: CLI argument parsing and command routing for ict-portal
//
// Provides command-line interface for:
// - Registering a student account (register)
// - Managing the saved session (login, logout, whoami)
// - Course materials and attendance (upload, check-in)
// - Launching TUI (tui, default)

pub mod auth;
pub mod materials;
pub mod register;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// IGCSE ICT tutoring portal - register, sign in and manage course work
#[derive(Parser)]
#[command(name = "ict-portal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui,

    /// Register a new student account, one wizard step at a time
    Register,

    /// Sign in and save the session
    Login(LoginArgs),

    /// Forget the saved session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Upload a course material file
    Upload(UploadArgs),

    /// Record attendance with a QR check-in token
    CheckIn(CheckInArgs),
}

/// Arguments for the login command
#[derive(clap::Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, short)]
    pub email: String,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for the upload command
#[derive(clap::Args)]
pub struct UploadArgs {
    /// File to upload
    pub path: PathBuf,

    /// Title shown to students (defaults to the file name)
    #[arg(long, short)]
    pub title: Option<String>,
}

/// Arguments for the check-in command
#[derive(clap::Args)]
pub struct CheckInArgs {
    /// Token scanned from the lesson QR code
    pub token: String,
}

/// Print `value` as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
