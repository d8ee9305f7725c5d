pub mod auth;
pub mod geo;
pub mod id_codec;
pub mod password;
