#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod credentials;
mod error;
mod extract;
mod page;
mod portal;
mod prelude;
mod publisher;
mod quantity;
mod runner;
mod snapshot;
mod tables;
mod validator;
mod wait;

use clap::{Parser, crate_version};

use crate::{
    api::{home_assistant, webdriver::WebDriver},
    cli::Args,
    prelude::*,
    publisher::Publisher,
    runner::Runner,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let accounts = credentials::resolve(
        args.accounts.accounts.as_deref(),
        args.accounts.user_id,
        args.accounts.password,
    )?;
    info!(n_accounts = accounts.len(), "resolved the accounts");

    let naming = args.home_assistant.naming();
    let state_store =
        home_assistant::Api::new(&args.home_assistant.access_token, args.home_assistant.base_url);
    let runner = Runner {
        browser: WebDriver::new(args.browser.webdriver_url, args.browser.user_agent),
        publisher: Publisher::new(state_store, naming),
        settings: args.scraping.settings(),
        validator: args.scraping.validator(),
    };
    let summary = runner.run(&accounts);
    info!(
        n_accounts_succeeded = summary.n_accounts_succeeded,
        n_accounts_failed = summary.n_accounts_failed,
        n_accounts_skipped = summary.n_accounts_skipped,
        n_customers_succeeded = summary.n_customers_succeeded,
        n_customers_failed = summary.n_customers_failed,
        n_published = summary.published.n_succeeded,
        n_unpublished = summary.published.n_failed,
        "finished",
    );
    Ok(())
}
