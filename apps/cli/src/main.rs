use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use codebench_session::Session;
use codebench_tree::{DocumentTree, NodeId};
use codebench_workbench::{ActiveDocument, Command, Outcome, SearchState, Workbench};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "codebench-cli",
    about = "Utility commands for the CodeBench workbench",
    author,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 對示範專案執行工作台命令腳本。 / Run a workbench command script against the sample project.
    Script(ScriptArgs),
    /// 列出示範專案的樹狀結構。 / Print the sample project outline.
    Outline(OutlineArgs),
    /// 依檔名搜尋示範專案。 / Search the sample project files by name.
    Search(SearchArgs),
}

#[derive(Args)]
struct ScriptArgs {
    /// 腳本檔案路徑；每行一個命令，# 開頭為註解。 / Script file; one command per line, # starts a comment.
    #[arg(value_name = "FILE")]
    script: PathBuf,

    /// 不回報每行命令的結果。 / Suppress the per-command echo lines.
    #[arg(long)]
    quiet: bool,

    /// 第一個被拒絕的命令即中止。 / Abort at the first rejected command.
    #[arg(long)]
    strict: bool,

    /// 以 JSON 輸出最終狀態。 / Emit the final state as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OutlineArgs {
    /// 以 JSON 輸出樹狀結構。 / Emit the tree as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// 檔名搜尋字串（不分大小寫）。 / Case-insensitive file-name query.
    query: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    env_logger::init();
    let Cli { command } = Cli::parse();
    match command {
        Commands::Script(args) => execute_script(args),
        Commands::Outline(args) => execute_outline(args),
        Commands::Search(args) => execute_search(args),
    }
}

fn execute_script(args: ScriptArgs) -> Result<()> {
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    let mut bench = Workbench::with_sample_project();

    for (index, raw) in script.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command =
            build_command(&bench, line).map_err(|err| anyhow!("line {number}: {err}"))?;
        match bench.apply(command) {
            Ok(outcome) => {
                if !args.quiet {
                    println!("[{number}] {}", describe_outcome(&outcome));
                }
            }
            Err(err) => {
                if args.strict {
                    bail!("line {number}: {err}");
                }
                println!("[{number}] rejected: {err}");
            }
        }
    }

    if args.json {
        print_state_json(&bench)
    } else {
        print_outline(&bench);
        print_session(&bench);
        Ok(())
    }
}

fn execute_outline(args: OutlineArgs) -> Result<()> {
    let bench = Workbench::with_sample_project();
    if args.json {
        let rendered =
            serde_json::to_string_pretty(bench.tree()).context("failed to serialize tree")?;
        println!("{rendered}");
    } else {
        print_outline(&bench);
    }
    Ok(())
}

fn execute_search(args: SearchArgs) -> Result<()> {
    let mut bench = Workbench::with_sample_project();
    bench
        .apply(Command::SetSearchQuery {
            query: args.query.clone(),
        })
        .map_err(|err| anyhow!("search failed: {err}"))?;

    let results = bench.search().results();
    if results.is_empty() {
        println!("No files match \"{}\"", args.query);
        return Ok(());
    }
    println!("Files matching \"{}\" ({} hits)", args.query, results.len());
    for &id in results {
        if let Some(node) = bench.tree().get(id) {
            let path = bench
                .tree()
                .path_of(id)
                .unwrap_or_else(|| node.name.clone());
            let chars = node.content().unwrap_or("").chars().count();
            if chars == 0 {
                println!("  {path} (Empty)");
            } else {
                println!("  {path} ({chars} chars)");
            }
        }
    }
    Ok(())
}

fn build_command(bench: &Workbench, line: &str) -> Result<Command> {
    let (verb, rest) = split_verb(line);
    let command = match verb {
        "new-file" => {
            let (path, name) = split_verb(rest);
            if path.is_empty() {
                bail!("new-file needs a context path");
            }
            Command::CreateFile {
                context: resolve_node(bench, path)?,
                name: optional_name(name),
            }
        }
        "new-folder" => {
            let (path, name) = split_verb(rest);
            if path.is_empty() {
                bail!("new-folder needs a context path");
            }
            Command::CreateFolder {
                context: resolve_node(bench, path)?,
                name: optional_name(name),
            }
        }
        "rename" => {
            let (path, name) = split_verb(rest);
            if path.is_empty() || name.is_empty() {
                bail!("rename needs a path and a new name");
            }
            Command::Rename {
                target: resolve_node(bench, path)?,
                name: name.to_string(),
            }
        }
        "edit" => {
            let (path, content) = split_verb(rest);
            if path.is_empty() {
                bail!("edit needs a path");
            }
            Command::Edit {
                target: resolve_node(bench, path)?,
                content: content.to_string(),
            }
        }
        "delete" => Command::RequestDelete {
            target: resolve_target(bench, rest, "delete")?,
        },
        "confirm" => Command::ConfirmDelete,
        "cancel" => Command::CancelDelete,
        "open" => Command::Open {
            target: resolve_target(bench, rest, "open")?,
        },
        "close" => Command::Close {
            target: resolve_target(bench, rest, "close")?,
        },
        "select" => Command::Select {
            target: resolve_target(bench, rest, "select")?,
        },
        "pin" => Command::TogglePin {
            target: resolve_target(bench, rest, "pin")?,
        },
        "reorder" => {
            let (from, to) = split_verb(rest);
            let from = from
                .parse::<usize>()
                .map_err(|_| anyhow!("reorder needs two tab positions"))?;
            let to = to
                .parse::<usize>()
                .map_err(|_| anyhow!("reorder needs two tab positions"))?;
            Command::Reorder { from, to }
        }
        "close-others" => Command::CloseOtherTabs,
        "search" => Command::SetSearchQuery {
            query: rest.to_string(),
        },
        other => bail!("unknown script command '{other}'"),
    };
    Ok(command)
}

fn split_verb(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    }
}

fn optional_name(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn resolve_target(bench: &Workbench, path: &str, verb: &str) -> Result<NodeId> {
    if path.is_empty() {
        bail!("{verb} needs a node path");
    }
    resolve_node(bench, path)
}

fn resolve_node(bench: &Workbench, path: &str) -> Result<NodeId> {
    if path == "." || path == "/" {
        return Ok(bench.tree().root_id());
    }
    bench
        .tree()
        .resolve_path(path)
        .ok_or_else(|| anyhow!("no node at path '{path}'"))
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::TreeChanged(diff) => format!(
            "tree updated ({} added, {} removed, {} updated)",
            diff.added.len(),
            diff.removed.len(),
            diff.updated.len()
        ),
        Outcome::SessionChanged => "session updated".to_string(),
        Outcome::TreeAndSessionChanged(diff) => {
            format!("tree and session updated ({} removed)", diff.removed.len())
        }
        Outcome::SearchRefreshed { hits } => format!("search refreshed ({hits} hits)"),
        Outcome::DeletePending { name, .. } => {
            format!("delete pending for '{name}' (confirm or cancel)")
        }
        Outcome::DeleteCancelled => "delete cancelled".to_string(),
        Outcome::Unchanged => "nothing to change".to_string(),
    }
}

fn print_outline(bench: &Workbench) {
    println!("Outline:");
    print_outline_node(bench, bench.tree().root_id(), 0);
}

fn print_outline_node(bench: &Workbench, id: NodeId, depth: usize) {
    let Some(node) = bench.tree().get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    if node.is_folder() {
        println!("{indent}{}/", node.name);
        for &child in node.child_ids() {
            print_outline_node(bench, child, depth + 1);
        }
    } else if node.edited() {
        println!("{indent}{} *", node.name);
    } else {
        println!("{indent}{}", node.name);
    }
}

fn print_session(bench: &Workbench) {
    if bench.session().is_empty() {
        println!("Tabs: none");
        return;
    }
    println!("Tabs:");
    for (index, tab) in bench.session().tabs().iter().enumerate() {
        let name = bench
            .tree()
            .get(tab.node)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| "<missing>".to_string());
        let pin = if tab.pinned { "[P] " } else { "" };
        let active = if tab.active { " (active)" } else { "" };
        println!("  {}. {pin}{name}{active}", index + 1);
    }
    let document = bench.active();
    if document.id.is_some() {
        println!(
            "Active: {} ({} chars)",
            document.filename,
            document.content.chars().count()
        );
    }
}

#[derive(Serialize)]
struct StateDump<'a> {
    tree: &'a DocumentTree,
    session: &'a Session,
    active: &'a ActiveDocument,
    search: &'a SearchState,
}

fn print_state_json(bench: &Workbench) -> Result<()> {
    let dump = StateDump {
        tree: bench.tree(),
        session: bench.session(),
        active: bench.active(),
        search: bench.search(),
    };
    let rendered = serde_json::to_string_pretty(&dump).context("failed to serialize state")?;
    println!("{rendered}");
    Ok(())
}
