use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use onboard_adapters::{ClientConfig, HttpSubmissionClient};
use onboard_core::{get_str, DraftStorage, DraftStore, FileHandle, FlowRegistry, Node, OfflineSubmissionApi, RequiredPaths,
                   RouteParams, SubmissionApi, SubmitOutcome, WizardController};
use onboard_domain::default_registry;
use onboard_persistence::{open_draft_store, DraftConfig, FileDraftStorage};

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Account-opening wizard drafts and submissions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered flows and their steps
    Flows,
    /// List stored drafts
    Drafts,
    /// Print the current document of a flow (draft or empty template)
    Show {
        region: String,
        applicant_type: String,
        /// Only print this path
        #[arg(long)]
        path: Option<String>,
    },
    /// Write a value into a flow's draft
    Set {
        region: String,
        applicant_type: String,
        path: String,
        value: String,
        /// Parse the value as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report missing required fields
    Check {
        region: String,
        applicant_type: String,
        /// Required paths
        #[arg(long = "required", required = true)]
        required: Vec<String>,
    },
    /// Discard a flow's draft
    Clear { region: String, applicant_type: String },
    /// Submit a draft (or update an existing application with --edit)
    Submit {
        region: String,
        applicant_type: String,
        /// Attachment as field=path, repeatable
        #[arg(long = "file")]
        files: Vec<String>,
        /// Existing application id
        #[arg(long)]
        edit: Option<String>,
    },
}

type Drafts = DraftStore<FileDraftStorage>;

fn open<A: SubmissionApi>(registry: &FlowRegistry,
                          route: RouteParams,
                          drafts: Drafts,
                          api: A)
                          -> Result<WizardController<FileDraftStorage, A>, Box<dyn Error>> {
    Ok(WizardController::open(registry, &route, drafts, api)?)
}

/// Documento guardado (o template) sin pasar por el controller: `show` no
/// debe reescribir el draft.
fn snapshot<S: DraftStorage>(registry: &FlowRegistry,
                             drafts: &DraftStore<S>,
                             region: &str,
                             applicant_type: &str)
                             -> Result<Node, Box<dyn Error>> {
    let flow = registry.resolve(region, applicant_type)?;
    match drafts.load(flow.id()) {
        Some(doc) => {
            info!("showing stored draft {}", drafts.key_for(flow.id()));
            Ok(doc)
        }
        None => Ok(flow.instantiate()),
    }
}

fn parse_value(raw: &str, json: bool) -> Result<Node, Box<dyn Error>> {
    if json {
        Ok(Node::from(serde_json::from_str::<serde_json::Value>(raw)?))
    } else {
        Ok(Node::text(raw))
    }
}

fn parse_file(raw: &str) -> Result<(String, FileHandle), Box<dyn Error>> {
    let (field, path) = raw.split_once('=').ok_or_else(|| format!("expected field=path, got '{raw}'"))?;
    let path = PathBuf::from(path);
    let name = path.file_name()
                   .and_then(|n| n.to_str())
                   .ok_or_else(|| format!("no file name in '{}'", path.display()))?
                   .to_string();
    Ok((field.to_string(), FileHandle::new(name, fs::read(&path)?)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = default_registry()?;
    let config = DraftConfig::from_env();
    let drafts = open_draft_store(&config)?;

    match cli.command {
        Commands::Flows => {
            for flow in registry.flows() {
                println!("{} ({})", flow.id(), &flow.definition_hash()[..12]);
                for (i, step) in flow.steps().iter().enumerate() {
                    println!("  {i}. {} [{}]", step.title, step.key);
                }
            }
        }
        Commands::Drafts => {
            let keys = drafts.storage().list_keys()?;
            if keys.is_empty() {
                println!("No drafts in {}", config.dir.display());
            }
            for key in keys {
                println!("{key}");
            }
        }
        Commands::Show { region, applicant_type, path } => {
            let doc = snapshot(&registry, &drafts, &region, &applicant_type)?;
            let node = match &path {
                Some(p) => get_str(&doc, p).cloned().ok_or_else(|| format!("nothing at '{p}'"))?,
                None => doc,
            };
            println!("{}", serde_json::to_string_pretty(&node)?);
        }
        Commands::Set { region, applicant_type, path, value, json } => {
            let mut wizard = open(&registry, RouteParams::new(region, applicant_type), drafts, OfflineSubmissionApi)?;
            wizard.hydrate_local()?;
            let outcome = wizard.update(&path, parse_value(&value, json)?)?;
            println!("{path} updated{}", if outcome.saved { "" } else { " (unchanged)" });
            for write in outcome.synced {
                println!("  auto: {} <- {} ({})", write.target, write.value.to_json(), write.rule);
            }
        }
        Commands::Check { region, applicant_type, required } => {
            let mut wizard = open(&registry, RouteParams::new(region, applicant_type), drafts, OfflineSubmissionApi)?;
            wizard.hydrate_local()?;
            let count = wizard.validate(&RequiredPaths::new(required))?;
            for (path, message) in wizard.errors().iter() {
                println!("{path}: {message}");
            }
            println!("{count} error(s)");
        }
        Commands::Clear { region, applicant_type } => {
            let mut wizard = open(&registry, RouteParams::new(region, applicant_type), drafts, OfflineSubmissionApi)?;
            wizard.hydrate_local()?;
            wizard.discard()?;
            println!("draft for {} discarded", wizard.flow().id());
        }
        Commands::Submit { region, applicant_type, files, edit } => {
            let api = HttpSubmissionClient::new(ClientConfig::from_env()?)?;
            let mut route = RouteParams::new(region, applicant_type);
            if let Some(id) = edit {
                route = route.editing(id);
            }
            let mut wizard = open(&registry, route, drafts, api)?;
            wizard.hydrate().await?;
            for raw in &files {
                let (field, file) = parse_file(raw)?;
                wizard.set_attachment(&field, Some(file))?;
            }
            match wizard.submit().await {
                Ok(SubmitOutcome::Created(receipt)) => {
                    println!("submitted: id={} editable until {}", receipt.id, receipt.edit_until);
                }
                Ok(SubmitOutcome::Updated { id }) => println!("updated: id={id}"),
                Err(e) => {
                    for (path, message) in wizard.errors().iter() {
                        eprintln!("{path}: {message}");
                    }
                    if let Some(message) = wizard.failure_message() {
                        eprintln!("{message}");
                    }
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::InMemoryDraftStorage;

    const KEY: &str = "onboard:draft:local:individual";

    #[test]
    fn show_leaves_stale_draft_untouched() {
        let registry = default_registry().unwrap();
        let raw = r#"{"clientRegistration":{"principal":{"namesByInitials":"A.B. Silva"}},"iWeDeclaration":{"name":""}}"#;
        let mut storage = InMemoryDraftStorage::new();
        storage.put_raw(KEY, raw);
        let drafts = DraftStore::new(storage);

        let doc = snapshot(&registry, &drafts, "local", "individual").unwrap();
        assert_eq!(get_str(&doc, "iWeDeclaration.name").and_then(Node::as_text), Some(""));
        assert_eq!(drafts.storage().get_raw(KEY), Some(raw));
    }

    #[test]
    fn show_without_draft_prints_template() {
        let registry = default_registry().unwrap();
        let drafts = DraftStore::new(InMemoryDraftStorage::new());
        let doc = snapshot(&registry, &drafts, "foreign", "corporate").unwrap();
        assert!(get_str(&doc, "kyc").is_some());
        assert!(drafts.storage().get_raw("onboard:draft:foreign:corporate").is_none());
        assert!(snapshot(&registry, &drafts, "mars", "individual").is_err());
    }
}
