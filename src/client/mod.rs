//! HTTP access to the hourly rate service.
//!
//! [`RateClient`] wraps every endpoint of the rate resource. Credentials
//! and the acting user are injected through [`TokenSource`] and
//! [`IdentityProvider`], so the client never reaches for global state.

mod credentials;
mod rate_client;
mod response;

pub use credentials::{
    Anonymous, IdentityProvider, NoAuth, Session, StaticIdentity, StaticToken, TokenSource,
    FALLBACK_USER,
};
pub use rate_client::{RateClient, DEFAULT_UPCOMING_DAYS, REQUEST_ID_HEADER};
pub use response::ErrorBody;
