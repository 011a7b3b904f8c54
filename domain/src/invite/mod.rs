//! Invite session aggregate: responses, session state, and the decision rule

pub mod decision;
pub mod link;
pub mod response;
pub mod session;

pub use decision::Decision;
pub use link::ResponseLink;
pub use response::{ResponseRecord, ResponseValue};
pub use session::{InviteSession, SessionState};
