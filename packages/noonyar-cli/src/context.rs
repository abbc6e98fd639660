//! Shared state and terminal helpers for all commands

use anyhow::{Context, Result};
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use otp_login::{ClientConfig, FileTokenStore};

pub struct CliContext {
    pub config: ClientConfig,
    pub term: Term,
}

impl CliContext {
    pub fn new() -> Result<Self> {
        let config = ClientConfig::from_env().context("Failed to load configuration")?;
        Ok(Self {
            config,
            term: Term::stdout(),
        })
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(&self.config.token_store_path)
    }

    pub fn print_header(&self, msg: &str) {
        println!();
        println!("{}", style(msg).bold());
    }

    pub fn print_success(&self, msg: &str) {
        println!("{}", style(msg).green());
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    pub fn print_error(&self, msg: &str) {
        println!("{}", style(msg).red());
    }

    pub fn print_info(&self, msg: &str) {
        println!("{}", style(msg).cyan());
    }
}
