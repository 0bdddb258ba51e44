//! Sociedad constituida localmente.
use onboard_core::{AutoSyncRule, Flow, FlowError};
use serde_json::json;

use super::common::*;
use crate::ids::{CORPORATE, LOCAL};

pub fn flow() -> Result<Flow, FlowError> {
    let template = json!({
        CLIENT_REGISTRATION: {
            "company": {
                "name": "",
                "registrationNumber": "",
                "dateOfIncorporation": "",
                "address": { "street": "", "city": "", "postalCode": "", "country": "" },
                "telephone": "",
                "email": ""
            },
            "authorisedSignatories": [{ "name": "", "nic": "", "designation": "" }],
            "bank": bank_account()
        },
        KYC: kyc_corporate(),
        BENEFICIAL_OWNERSHIP: beneficial_owners("nic"),
        BOARD_RESOLUTION: {
            "companyName": "",
            "resolutionDate": "",
            "directors": [{ "name": "", "nic": "" }]
        },
        DECLARATION: { "companyName": "", "signatoryName": "", "date": "" }
    });

    Flow::builder(LOCAL, CORPORATE).step(CLIENT_REGISTRATION, "Corporate Registration")
                                   .step(KYC, "Know Your Customer")
                                   .step(BENEFICIAL_OWNERSHIP, "Beneficial Ownership")
                                   .step(BOARD_RESOLUTION, "Board Resolution")
                                   .step(DECLARATION, "I/We Declaration")
                                   .template(template)
                                   .sync_all(company_rules()?)
                                   .attachment("certificateOfIncorporation", signature("Certificate of Incorporation"))
                                   .attachment("boardResolutionCopy", signature("Board Resolution"))
                                   .attachment("signatorySignature", signature("Signature of Authorised Signatory"))
                                   .attachment("companySeal", identity_scan())
                                   .build()
}

/// Nombre de la sociedad y del primer firmante, compartidas con el flow
/// extranjero.
pub(crate) fn company_rules() -> Result<Vec<AutoSyncRule>, FlowError> {
    let company = "clientRegistration.company.name";
    Ok(vec![AutoSyncRule::mirror(company, "boardResolution.companyName")?,
            AutoSyncRule::mirror(company, "iWeDeclaration.companyName")?,
            AutoSyncRule::mirror("clientRegistration.authorisedSignatories.0.name", "iWeDeclaration.signatoryName")?])
}
