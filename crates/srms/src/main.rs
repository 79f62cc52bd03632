//! `srms` - CLI for the student record manager
//!
//! Each invocation opens the record database, runs one command through a
//! [`Session`], and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use srms::cli::{
    AddCommand, Cli, Command as CliCommand, ConfigCommand, DeleteCommand, EditCommand,
    OutputFormat, PromptConfirm, ShowCommand,
};
use srms::session::AssumeYes;
use srms::{
    init_logging, Command, Config, Confirm, Error, Outcome, RecordStore, Session, SqliteStore,
    View,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Loaded per command so `config path` and `config validate` work even
    // when the config file in effect is broken.
    let load_config = || Config::load_from(cli.config.clone());

    match cli.command {
        CliCommand::Config(cmd) => handle_config(cli.config.clone(), cmd),
        CliCommand::Add(cmd) => handle_add(&load_config()?, &cmd),
        CliCommand::Edit(cmd) => handle_edit(&load_config()?, &cmd),
        CliCommand::Delete(cmd) => handle_delete(&load_config()?, &cmd),
        CliCommand::List(cmd) => {
            let config = load_config()?;
            let session = open_session(&config, AssumeYes)?;
            print_view(&session.view(), cmd.format)
        }
        CliCommand::Search(cmd) => {
            let config = load_config()?;
            let mut session = open_session(&config, AssumeYes)?;
            let response = session.dispatch(Command::SearchChanged(cmd.query))?;
            print_view(&response.view, cmd.format)
        }
        CliCommand::Show(cmd) => handle_show(&load_config()?, &cmd),
        CliCommand::Status(cmd) => handle_status(&load_config()?, cmd.json),
    }
}

fn open_store(config: &Config) -> anyhow::Result<RecordStore<SqliteStore>> {
    let path = config.database_path();
    let backend = SqliteStore::open(&path)
        .with_context(|| format!("cannot open record database {}", path.display()))?;
    Ok(RecordStore::open_with_key(backend, config.storage.key.clone()))
}

fn open_session<C: Confirm>(
    config: &Config,
    confirm: C,
) -> anyhow::Result<Session<SqliteStore, C>> {
    Ok(Session::new(
        open_store(config)?,
        confirm,
        config.display.clone(),
    ))
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut session = open_session(config, AssumeYes)?;
    match session.dispatch(Command::SubmitAdd(cmd.fields()))?.outcome {
        Outcome::Added(record) => {
            println!("Added {} (id {})", record.name, record.id);
            Ok(())
        }
        Outcome::Rejected(field) => bail!("{field} is required; nothing was saved"),
        other => bail!("unexpected outcome: {other:?}"),
    }
}

fn handle_edit(config: &Config, cmd: &EditCommand) -> anyhow::Result<()> {
    let mut session = open_session(config, AssumeYes)?;

    let current = match session.dispatch(Command::BeginEdit(cmd.id))?.outcome {
        Outcome::EditStarted { fields, .. } => fields,
        Outcome::NotFound(id) => {
            eprintln!("No record with id {id}; nothing changed.");
            return Ok(());
        }
        other => bail!("unexpected outcome: {other:?}"),
    };

    let fields = cmd.merge_into(current);
    match session
        .dispatch(Command::SubmitEdit { id: cmd.id, fields })?
        .outcome
    {
        Outcome::Updated(record) => {
            println!("Updated {} (id {})", record.name, record.id);
            Ok(())
        }
        Outcome::NotFound(id) => {
            eprintln!("No record with id {id}; nothing changed.");
            Ok(())
        }
        Outcome::Rejected(field) => bail!("{field} is required; nothing was saved"),
        other => bail!("unexpected outcome: {other:?}"),
    }
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let mut prompt = PromptConfirm::terminal();
    let skip_prompt = cmd.yes;
    let confirm = move |question: &str| skip_prompt || prompt.confirm(question);

    let mut session = open_session(config, confirm)?;
    match session.dispatch(Command::DeleteRequested(cmd.id))?.outcome {
        Outcome::Deleted(id) => println!("Deleted record {id}"),
        Outcome::DeleteDeclined(_) => println!("Cancelled."),
        Outcome::NotFound(id) => eprintln!("No record with id {id}; nothing changed."),
        other => bail!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let record = store.get(cmd.id).ok_or(Error::NotFound {
        id: cmd.id.get(),
    })?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("Id:           {}", record.id);
        println!("Name:         {}", record.name);
        println!("Roll No:      {}", record.roll_no);
        println!("Class/Grade:  {}", record.class_grade);
        println!(
            "CGPA:         {}",
            record
                .cgpa
                .as_deref()
                .unwrap_or(&config.display.cgpa_placeholder)
        );
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats();
    let path = store.backend().path();
    let size = store.backend().size_bytes();

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "database_size_bytes": size,
            "storage_key": store.key(),
            "total_records": stats.total_records,
            "records_with_cgpa": stats.with_cgpa,
            "newest_id": stats.newest_id,
            "last_saved": stats.last_saved,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("srms status");
        println!("-----------");
        println!("Database:      {}", path.display());
        println!("Size:          {size} bytes");
        println!("Storage key:   {}", store.key());
        println!("Records:       {}", stats.total_records);
        println!("With CGPA:     {}", stats.with_cgpa);
        match stats.last_saved {
            Some(at) => println!("Last saved:    {}", at.to_rfc3339()),
            None => println!("Last saved:    never"),
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Display]");
                println!("  CGPA placeholder:   {}", config.display.cgpa_placeholder);
                println!("  Empty message:      {}", config.display.empty_message);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::resolve_path(config_path).display());
        }
        ConfigCommand::Validate { file } => {
            let path = Config::resolve_path(file.or(config_path));
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_view(view: &View, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", view.to_table()),
        OutputFormat::Plain => print!("{}", view.to_plain()),
        OutputFormat::Json => println!("{}", view.to_json()?),
    }
    Ok(())
}
