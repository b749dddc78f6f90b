//! Session State
//!
//! Client-side session: the persisted token pair and the navigation location
//! that forced logouts write to. "Authenticated" is derived from the presence
//! of an access token; no expiry is tracked here.

mod location;
mod store;

pub use location::{Location, LOGIN_FRAGMENT};
pub use store::{
    FileTokenStore, MemoryTokenStore, StoreError, StoreResult, TokenPair, TokenStore,
};
