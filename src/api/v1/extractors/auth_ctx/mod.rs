/*!
 * Authenticated request context
 *
 * - AuthCtx: the identity the access gate resolved for this request
 * - AuthCtxExtractor: how handlers receive it
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
