//! Calendar provider integrations
//!
//! Each provider implements [`calcache_core::FreeBusyProvider`]. Only Google
//! Calendar is wired today; OAuth is handled by the caller, which passes a
//! bearer access token in.

pub mod google;

pub use google::GoogleCalendarProvider;
