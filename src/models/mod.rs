pub mod event;
pub mod history;
pub mod user;
pub mod volunteer;
pub mod zip;

pub use event::{
    Event, EventChanges, EventDetail, EventStatus, InvalidTransition, MatchDraft, NewEvent,
    Urgency,
};
pub use history::{BulkHistory, HistoryEntry, NewHistory, VolunteerHistory};
pub use user::{NewSession, NewUser, User, UserSummary};
pub use volunteer::{ProfileInput, VolunteerProfile};
pub use zip::{InvalidZipCode, ZipCode};
