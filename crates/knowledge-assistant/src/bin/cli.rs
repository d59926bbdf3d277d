//! Terminal chat over local documents
//!
//! Run with: cargo run -p knowledge-assistant --features cli --bin knowledge-assistant-cli -- --file notes.pdf

use anyhow::{bail, Context};
use clap::Parser;
use console::style;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use knowledge_assistant::{
    config::AppConfig, providers::GroqClient, ConversationManager, Error, Session, Upload,
};

#[derive(Parser)]
#[command(name = "knowledge-assistant")]
#[command(about = "Ask questions about PDF, Word and text documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Document to load (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Override the completion model
    #[arg(long)]
    model: Option<String>,
}

async fn load_files(paths: &[PathBuf]) -> anyhow::Result<Vec<Upload>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} is not a file path", path.display()))?;
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match Upload::new(filename, data) {
            Some(upload) => uploads.push(upload),
            None => bail!(Error::UnsupportedFileType(path.display().to_string())),
        }
    }
    Ok(uploads)
}

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Empty,
    Quit,
    NewChat,
    Load(Vec<PathBuf>),
    Ask(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match head {
        "" => Command::Empty,
        "/quit" | "/exit" => Command::Quit,
        "/new" => Command::NewChat,
        "/load" => Command::Load(rest.split_whitespace().map(PathBuf::from).collect()),
        _ => Command::Ask(line),
    }
}

/// Replace the session's documents with the files at `paths` and print the report
async fn load_into(
    manager: &ConversationManager,
    session: &mut Session,
    paths: &[PathBuf],
) -> anyhow::Result<()> {
    let uploads = load_files(paths).await?;
    let report = manager.ingest(session, uploads).await?;
    for file in &report.files {
        println!(
            "  {} ({}, {} characters)",
            file.filename,
            file.kind.display_name(),
            file.characters
        );
    }
    for error in &report.errors {
        println!("{} {}", style("warning:").yellow().bold(), error.error);
    }
    println!(
        "{} {} ({} characters, {:.0}% of context gauge)",
        style("✓").green(),
        report.message,
        report.context.characters,
        report.context.fill_ratio * 100.0
    );
    Ok(())
}

fn prompt() -> anyhow::Result<()> {
    print!("{} ", style(">").cyan().bold());
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_assistant=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    let client = GroqClient::new(&config.llm, config.secrets.completion_api_key())?;
    let manager = ConversationManager::new(&config, Arc::new(client));
    let mut session = Session::new();

    if !cli.files.is_empty() {
        load_into(&manager, &mut session, &cli.files).await?;
    }

    println!(
        "{}",
        style("Ask a question. /load PATH... replaces the documents, /new starts a new chat, /quit exits.")
            .dim()
    );

    let stdin = std::io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::NewChat => {
                manager.new_chat(&mut session);
                println!("{}", style("New chat started; documents cleared.").dim());
            }
            Command::Load(paths) if paths.is_empty() => {
                println!("{} /load needs at least one file path", style("usage:").yellow().bold());
            }
            Command::Load(paths) => {
                if let Err(e) = load_into(&manager, &mut session, &paths).await {
                    println!("{} {:#}", style("error:").red().bold(), e);
                }
            }
            Command::Ask(question) => match manager.send_message(&mut session, question).await {
                Ok(turn) => println!("\n{}\n", turn.content()),
                Err(e) => println!("{} {}", style("error:").red().bold(), e),
            },
        }
        prompt()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command(" /new "), Command::NewChat);
        assert_eq!(
            parse_command("/load a.pdf  notes/b.txt"),
            Command::Load(vec![PathBuf::from("a.pdf"), PathBuf::from("notes/b.txt")])
        );
        assert_eq!(parse_command("/load"), Command::Load(Vec::new()));
        assert_eq!(
            parse_command(" When is it due? "),
            Command::Ask("When is it due?")
        );
    }

    #[tokio::test]
    async fn test_load_after_new_chat_restores_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Budget closes in March.").unwrap();

        let config = AppConfig::with_api_key("test");
        let manager = ConversationManager::new(
            &config,
            Arc::new(knowledge_assistant::providers::ScriptedProvider::new()),
        );
        let mut session = Session::new();

        load_into(&manager, &mut session, &[path.clone()]).await.unwrap();
        manager.new_chat(&mut session);
        assert!(session.document_context().is_empty());

        load_into(&manager, &mut session, &[path]).await.unwrap();
        assert_eq!(session.document_context(), "Budget closes in March.\n");
    }
}
