/*
 * Responsibility
 * - middleware entry points (re-export)
 * - auth (access gate), geo (location tagger), http (transport concerns)
 */
pub mod auth;
pub mod geo;
pub mod http;
