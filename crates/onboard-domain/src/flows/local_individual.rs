//! Residente, persona física (con solicitante conjunto opcional).
use onboard_core::{Flow, FlowError};
use serde_json::json;

use super::common::*;
use crate::ids::{INDIVIDUAL, LOCAL};

pub fn flow() -> Result<Flow, FlowError> {
    let template = json!({
        CLIENT_REGISTRATION: {
            "principal": person("nic"),
            "hasJoint": false,
            "joint": person("nic"),
            "bank": bank_account()
        },
        KYC: kyc_individual(),
        BENEFICIAL_OWNERSHIP: beneficial_owners("nic"),
        DECLARATION: { "name": "", "jointName": "", "date": "" },
        CLIENT_AGREEMENT: {
            "principalName": "",
            "jointName": "",
            "witness": { "name": "", "nic": "" },
            "accepted": false
        }
    });

    Flow::builder(LOCAL, INDIVIDUAL).step(CLIENT_REGISTRATION, "Client Registration")
                                    .step(KYC, "Know Your Customer")
                                    .step(BENEFICIAL_OWNERSHIP, "Beneficial Ownership")
                                    .step(DECLARATION, "I/We Declaration")
                                    .step(CLIENT_AGREEMENT, "Client Agreement")
                                    .template(template)
                                    .sync(declaration_name("clientRegistration.principal.namesByInitials")?)
                                    .sync(declaration_joint_name()?)
                                    .sync(agreement_name("principal", "principalName")?)
                                    .sync(agreement_name("joint", "jointName")?.enabled_when_flag("clientRegistration.hasJoint")?)
                                    .sync_all(first_owner_from_principal("nic")?)
                                    .attachment("principalSignature", signature("Signature of Principal Applicant"))
                                    .attachment("jointSignature", signature("Signature of Joint Applicant"))
                                    .attachment("nicFront", identity_scan())
                                    .attachment("nicBack", identity_scan())
                                    .attachment("proofOfAddress", signature("Proof of Address"))
                                    .build()
}
