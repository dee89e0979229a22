//! Business operations behind the handlers.
//!
//! Handlers deal with HTTP (extractors, envelopes); services take the
//! authenticated principal as a plain `user_id` and do the work.
//!
//! - [`accounts`] -- Registration, login, recovery and profile management.
//! - [`games`] -- Catalog lookups and the owned-game collection.
//! - [`events`] -- The event lifecycle, one transaction per mutation.

pub mod accounts;
pub mod events;
pub mod games;
