//! No residente, persona física. Invierte a través de una cuenta SIA.
use onboard_core::{AutoSyncRule, Flow, FlowError};
use serde_json::json;

use super::common::*;
use crate::ids::{FOREIGN, INDIVIDUAL};

pub fn flow() -> Result<Flow, FlowError> {
    let template = json!({
        CLIENT_REGISTRATION: {
            "principal": person("passportNumber"),
            "countryOfResidence": "",
            "hasJoint": false,
            "joint": person("passportNumber")
        },
        KYC: kyc_individual(),
        BENEFICIAL_OWNERSHIP: beneficial_owners("passportNumber"),
        SECURITIES_INVESTMENT_ACCOUNT: securities_investment_account(),
        DECLARATION: { "name": "", "jointName": "", "date": "" },
        CLIENT_AGREEMENT: {
            "principalName": "",
            "jointName": "",
            "witness": { "name": "", "passportNumber": "" },
            "accepted": false
        }
    });

    let sia_holder = AutoSyncRule::mirror("clientRegistration.principal.namesByInitials",
                                          "securitiesInvestmentAccount.accountName")?.named("sia account name");

    Flow::builder(FOREIGN, INDIVIDUAL).step(CLIENT_REGISTRATION, "Client Registration")
                                      .step(KYC, "Know Your Customer")
                                      .step(BENEFICIAL_OWNERSHIP, "Beneficial Ownership")
                                      .step(SECURITIES_INVESTMENT_ACCOUNT, "Securities Investment Account")
                                      .step(DECLARATION, "I/We Declaration")
                                      .step(CLIENT_AGREEMENT, "Client Agreement")
                                      .template(template)
                                      .sync(declaration_name("clientRegistration.principal.namesByInitials")?)
                                      .sync(declaration_joint_name()?)
                                      .sync(agreement_name("principal", "principalName")?)
                                      .sync(agreement_name("joint", "jointName")?.enabled_when_flag("clientRegistration.hasJoint")?)
                                      .sync_all(first_owner_from_principal("passportNumber")?)
                                      .sync(sia_holder)
                                      .attachment("principalSignature", signature("Signature of Principal Applicant"))
                                      .attachment("jointSignature", signature("Signature of Joint Applicant"))
                                      .attachment("passportCopy", identity_scan())
                                      .attachment("siaConfirmation", signature("SIA Confirmation Letter"))
                                      .build()
}
