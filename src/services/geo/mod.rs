/*
 * Responsibility
 * - geolocation seam (GeoLocator) and the shipped CSV range-table adapter
 * - LocationTagger: request source address -> coarse LocationTag
 */
pub mod locator;
pub mod table;
pub mod tagger;

pub use locator::{GeoLocator, LocationTag};
pub use table::{GeoTableError, RangeTable};
pub use tagger::LocationTagger;
