//! onboard-core: engine de estado de formularios para el wizard de apertura
//! de cuentas.
//!
//! Piezas, de las hojas hacia arriba: `document` (Node + PathAccessor),
//! `validation` (ErrorIndex), `draft` (DraftStore), `flow` (FlowRegistry),
//! `sync` (AutoSyncEngine), `attachment` (AttachmentManager) y `wizard`
//! (WizardController).
pub mod attachment;
pub mod constants;
pub mod document;
pub mod draft;
pub mod errors;
pub mod event;
pub mod flow;
pub mod hashing;
pub mod submit;
pub mod sync;
pub mod validation;
pub mod wizard;

pub use attachment::{Attachment, AttachmentChange, AttachmentManager, AttachmentPolicy, FileHandle, PackagedFile, StoredFile};
pub use document::{get, get_str, set, set_in, Node, Path, Scalar};
pub use draft::{DraftStorage, DraftStore, InMemoryDraftStorage};
pub use errors::{FlowError, PathError, StorageError, SubmitError, WizardError};
pub use event::{EventLog, HydrationSource, WizardEvent, WizardEventKind};
pub use flow::{Flow, FlowBuilder, FlowId, FlowRegistry, StepDef};
pub use submit::{EditBundle, OfflineSubmissionApi, SubmissionApi, SubmitReceipt};
pub use sync::{AutoSyncEngine, AutoSyncRule, SyncWrite};
pub use validation::{ErrorIndex, RequiredPaths, Validator};
pub use wizard::{RouteParams, SubmitOutcome, UpdateOutcome, WizardController, WizardState};
