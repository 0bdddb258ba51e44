//! Fragmentos compartidos por los cuatro flows: bloques de template,
//! reglas de auto-sync recurrentes y políticas de adjuntos.
use onboard_core::{AttachmentPolicy, AutoSyncRule, FlowError};
use serde_json::{json, Value};

pub const CLIENT_REGISTRATION: &str = "clientRegistration";
pub const KYC: &str = "kyc";
pub const BENEFICIAL_OWNERSHIP: &str = "beneficialOwnership";
pub const SECURITIES_INVESTMENT_ACCOUNT: &str = "securitiesInvestmentAccount";
pub const BOARD_RESOLUTION: &str = "boardResolution";
pub const DECLARATION: &str = "iWeDeclaration";
pub const CLIENT_AGREEMENT: &str = "clientAgreement";

/// Datos personales de un solicitante. `id_field` es `nic` para residentes
/// y `passportNumber` para extranjeros.
pub fn person(id_field: &str) -> Value {
    let mut person = json!({
        "title": "",
        "namesByInitials": "",
        "nameDenotedByInitials": "",
        "dateOfBirth": "",
        "nationality": "",
        "address": { "street": "", "city": "", "postalCode": "", "country": "" },
        "mobile": "",
        "email": ""
    });
    person[id_field] = json!("");
    person
}

pub fn bank_account() -> Value {
    json!({ "bankName": "", "branch": "", "accountNumber": "" })
}

pub fn kyc_individual() -> Value {
    json!({
        "occupation": "",
        "employer": "",
        "annualIncome": "",
        "sourceOfFunds": "",
        "investmentExperience": "",
        "pep": "",
        "pepDetails": ""
    })
}

pub fn kyc_corporate() -> Value {
    json!({
        "natureOfBusiness": "",
        "annualTurnover": "",
        "sourceOfFunds": "",
        "listedEntity": false,
        "pep": "",
        "pepDetails": ""
    })
}

/// Lista con un beneficiario vacío: el formulario siempre arranca con uno.
pub fn beneficial_owners(id_field: &str) -> Value {
    let mut owner = json!({ "name": "", "address": "", "ownershipPercentage": "", "pep": "" });
    owner[id_field] = json!("");
    json!({ "beneficialOwners": [owner] })
}

pub fn securities_investment_account() -> Value {
    json!({ "accountName": "", "custodianBank": "", "accountNumber": "", "currency": "" })
}

/// Nombre del solicitante principal en la declaración.
pub fn declaration_name(source: &str) -> Result<AutoSyncRule, FlowError> {
    Ok(AutoSyncRule::mirror(source, &format!("{DECLARATION}.name"))?.named("declaration name"))
}

/// Nombre del solicitante conjunto en la declaración, sólo con el toggle de
/// solicitante conjunto activo.
pub fn declaration_joint_name() -> Result<AutoSyncRule, FlowError> {
    Ok(AutoSyncRule::mirror(&format!("{CLIENT_REGISTRATION}.joint.namesByInitials"),
                            &format!("{DECLARATION}.jointName"))?.named("declaration joint name")
                                                              .enabled_when_flag(&format!("{CLIENT_REGISTRATION}.hasJoint"))?)
}

/// `título + nombres` de un solicitante, para el contrato.
pub fn agreement_name(applicant: &str, target: &str) -> Result<AutoSyncRule, FlowError> {
    let title = format!("{CLIENT_REGISTRATION}.{applicant}.title");
    let names = format!("{CLIENT_REGISTRATION}.{applicant}.namesByInitials");
    AutoSyncRule::join(&[&title, &names], &format!("{CLIENT_AGREEMENT}.{target}"), " ").map_err(FlowError::from)
}

/// Por defecto el primer beneficiario es el propio solicitante.
pub fn first_owner_from_principal(id_field: &str) -> Result<Vec<AutoSyncRule>, FlowError> {
    let owner = format!("{BENEFICIAL_OWNERSHIP}.beneficialOwners.0");
    let principal = format!("{CLIENT_REGISTRATION}.principal");
    Ok(vec![AutoSyncRule::mirror(&format!("{principal}.namesByInitials"), &format!("{owner}.name"))?,
            AutoSyncRule::mirror(&format!("{principal}.{id_field}"), &format!("{owner}.{id_field}"))?])
}

pub fn signature(server_name: &str) -> AttachmentPolicy {
    AttachmentPolicy::new().server_filename(server_name)
}

/// Documentos de identidad: el nombre real no se muestra.
pub fn identity_scan() -> AttachmentPolicy {
    AttachmentPolicy::new().random_display()
}
