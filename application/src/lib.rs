//! Application layer for teamvote
//!
//! This crate contains use cases, port definitions, and the in-process
//! session ledger. It depends only on the domain layer.

pub mod coordinator;
pub mod ledger;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use coordinator::{InviteCoordinator, SessionStatus};
pub use ledger::SessionLedger;
pub use ports::{
    notifier::{NoNotifier, Notifier, NotifierError},
    vote_store::{
        MemoryVoteStore, RegistrationStatus, SessionShell, StoreError, VoteStore,
    },
};
pub use use_cases::create_session::{
    CreateSessionError, CreateSessionInput, CreateSessionUseCase,
};
pub use use_cases::submit_response::{RetryPolicy, SubmitError, SubmitResponseUseCase};
