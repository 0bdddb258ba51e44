/// Demo: sesión completa residente/persona física contra el backend en
/// proceso. Con `ONBOARD_DRAFT_DIR` definido los drafts van a disco; si no,
/// a memoria.
use onboard_core::{DraftStorage, DraftStore, FileHandle, InMemoryDraftStorage, RouteParams, WizardController,
                   WizardError};
use onboard_domain::{default_registry, flow_id, ApplicantType, Region};
use onboard_persistence::{init_dotenv, open_draft_store, DraftConfig};
use onboard_rust::{AppError, LoopbackApi};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init();
    init_dotenv();

    if std::env::var_os("ONBOARD_DRAFT_DIR").is_some() {
        let config = DraftConfig::from_env();
        println!("Drafts en {}", config.dir.display());
        run_local_individual(open_draft_store(&config)?).await
    } else {
        println!("Drafts en memoria");
        run_local_individual(DraftStore::new(InMemoryDraftStorage::new())).await
    }
}

async fn run_local_individual<S: DraftStorage>(drafts: DraftStore<S>) -> Result<(), AppError> {
    let registry = default_registry()?;
    let api = LoopbackApi::with_required(flow_id(Region::Local, ApplicantType::Individual),
                                         ["clientRegistration.principal.namesByInitials",
                                          "kyc.pep",
                                          "beneficialOwnership.beneficialOwners.0.pep"]);
    let route = RouteParams::new(Region::Local.as_str(), ApplicantType::Individual.as_str());
    let mut wizard = WizardController::open(&registry, &route, drafts, api.clone())?;
    let source = wizard.hydrate().await?;
    println!("Hidratado desde {source:?}, step {:?}", wizard.current_step().map(|s| s.key.as_str()));

    wizard.update("clientRegistration.principal.title", "Ms")?;
    let outcome = wizard.update("clientRegistration.principal.namesByInitials", "K.L. Perera")?;
    for write in &outcome.synced {
        println!("  auto-sync {} -> {} = {:?}", write.rule, write.target, write.value);
    }
    wizard.set_attachment("principalSignature",
                          Some(FileHandle::new("firma.png", vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])))?;

    // Primer intento: falta el PEP, el backend lo rechaza por campo.
    match wizard.submit().await {
        Err(WizardError::Submit(e)) => {
            println!("Submit rechazado: {e}");
            for (path, message) in wizard.errors().iter() {
                println!("  {path}: {message}");
            }
        }
        Err(e) => return Err(e.into()),
        Ok(_) => println!("Submit aceptado sin validar"),
    }

    wizard.update("kyc.pep", "no")?;
    wizard.update("beneficialOwnership.beneficialOwners.0.pep", "no")?;
    let done = wizard.submit().await?;
    println!("Submit: {done:?}, estado {}", wizard.state().name());
    println!("Eventos registrados: {}", wizard.events().len());
    println!("Solicitudes en backend: {}", api.len());
    Ok(())
}
