pub mod bootstrap;
pub mod domain;
pub mod error;
pub mod export;
pub mod ports;
pub mod questions;
pub mod room_key;
pub mod room_session;
pub mod routing;
pub mod submitter;
pub mod wizard;

pub use bootstrap::{BootstrapOutcome, EntryAction, ParticipantContext, SessionBootstrap};
pub use domain::{
    FeedbackPayload, ParticipantIdentity, QuestionDefinition, Role, RoomHandle, RoomKey,
    RoomMetadata,
};
pub use error::{CoreError, CoreResult};
pub use export::FeedbackExport;
pub use ports::{
    FeedbackTransport, PortError, PortResult, RoomProvider, RoomQuery, TransportFailure,
    TransportReply,
};
pub use questions::QuestionSet;
pub use room_key::{derive_key, RoomKeyRequest};
pub use room_session::RoomSession;
pub use routing::{CallTerminationRouter, EndMode, NavigationTarget, Termination};
pub use submitter::{FeedbackEndpoints, FeedbackSubmitter};
pub use wizard::{FeedbackState, FeedbackWizard, Step, SubmissionPhase};
