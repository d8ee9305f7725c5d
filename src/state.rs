/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - stores, id codec, password hasher, access gate and location tagger
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::repos::{PostStore, UserStore};
use crate::services::{
    auth::AccessGate, geo::LocationTagger, id_codec::IdCodec, password::PasswordHasher,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub id_codec: IdCodec,
    pub hasher: PasswordHasher,
    pub gate: Arc<AccessGate>,
    pub tagger: Arc<LocationTagger>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        id_codec: IdCodec,
        hasher: PasswordHasher,
        gate: Arc<AccessGate>,
        tagger: Arc<LocationTagger>,
    ) -> Self {
        Self {
            users,
            posts,
            id_codec,
            hasher,
            gate,
            tagger,
        }
    }
}
