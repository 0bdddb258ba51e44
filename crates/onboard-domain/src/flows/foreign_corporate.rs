//! Sociedad constituida en el extranjero.
use onboard_core::{AutoSyncRule, Flow, FlowError};
use serde_json::json;

use super::common::*;
use super::local_corporate::company_rules;
use crate::ids::{CORPORATE, FOREIGN};

pub fn flow() -> Result<Flow, FlowError> {
    let template = json!({
        CLIENT_REGISTRATION: {
            "company": {
                "name": "",
                "registrationNumber": "",
                "countryOfIncorporation": "",
                "dateOfIncorporation": "",
                "address": { "street": "", "city": "", "postalCode": "", "country": "" },
                "telephone": "",
                "email": ""
            },
            "authorisedSignatories": [{ "name": "", "passportNumber": "", "designation": "" }]
        },
        KYC: kyc_corporate(),
        BENEFICIAL_OWNERSHIP: beneficial_owners("passportNumber"),
        SECURITIES_INVESTMENT_ACCOUNT: securities_investment_account(),
        BOARD_RESOLUTION: {
            "companyName": "",
            "resolutionDate": "",
            "directors": [{ "name": "", "passportNumber": "" }]
        },
        DECLARATION: { "companyName": "", "signatoryName": "", "date": "" }
    });

    let sia_holder = AutoSyncRule::mirror("clientRegistration.company.name",
                                          "securitiesInvestmentAccount.accountName")?.named("sia account name");

    Flow::builder(FOREIGN, CORPORATE).step(CLIENT_REGISTRATION, "Corporate Registration")
                                     .step(KYC, "Know Your Customer")
                                     .step(BENEFICIAL_OWNERSHIP, "Beneficial Ownership")
                                     .step(SECURITIES_INVESTMENT_ACCOUNT, "Securities Investment Account")
                                     .step(BOARD_RESOLUTION, "Board Resolution")
                                     .step(DECLARATION, "I/We Declaration")
                                     .template(template)
                                     .sync_all(company_rules()?)
                                     .sync(sia_holder)
                                     .attachment("certificateOfIncorporation", signature("Certificate of Incorporation"))
                                     .attachment("boardResolutionCopy", signature("Board Resolution"))
                                     .attachment("signatorySignature", signature("Signature of Authorised Signatory"))
                                     .attachment("siaConfirmation", signature("SIA Confirmation Letter"))
                                     .build()
}
