pub mod jwt;
pub mod login;
pub mod token_issuer;

pub use jwt::JwtIssuer;
pub use login::Authenticator;
pub use token_issuer::TokenIssuer;
