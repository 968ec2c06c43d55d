//! Decoders from raw feed payloads into typed records.
//!
//! - [`decode_live`]: id-to-positional-array mapping into [`LiveFlightRecord`]s
//! - [`decode_detail`]: flat short-key object into a [`FlightDetail`]
//! - [`decode_positions`]: epoch-keyed mapping into ordered [`PositionSample`]s
//!
//! [`LiveFlightRecord`]: crate::model::LiveFlightRecord
//! [`FlightDetail`]: crate::model::FlightDetail
//! [`PositionSample`]: crate::model::PositionSample

mod detail;
pub mod layout;
mod live;
mod positions;
pub(crate) mod value;

pub use detail::decode_detail;
pub use layout::{detect_layout, LiveLayout, LIVE_LAYOUTS};
pub use live::{decode_live, decode_live_entry, decode_live_response};
pub use positions::decode_positions;

use crate::config::FeedConfig;

/// Default CDN prefix for airframe photos.
pub const DEFAULT_PHOTO_BASE_URL: &str = "https://cdn.radarbox.com/photo/";

/// Default CDN prefix for square airline logos.
pub const DEFAULT_AIRLINE_LOGO_BASE_URL: &str = "https://cdn.radarbox.com/airlines/sq/";

/// Default CDN prefix for registration-country flags.
pub const DEFAULT_COUNTRY_FLAG_BASE_URL: &str = "https://cdn.radarbox.com/countries-rect/";

/// URL prefixes for images derived from feed slugs and codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    /// Prefix joined with image slugs.
    pub photo_base: String,
    /// Prefix joined with airline ICAO codes.
    pub airline_logo_base: String,
    /// Prefix joined with lowercased country codes.
    pub country_flag_base: String,
}

impl MediaUrls {
    /// Build from the feed section of the configuration.
    #[must_use]
    pub fn from_config(feed: &FeedConfig) -> Self {
        Self {
            photo_base: feed.photo_base_url.clone(),
            airline_logo_base: feed.airline_logo_base_url.clone(),
            country_flag_base: feed.country_flag_base_url.clone(),
        }
    }

    /// Photo URL for an image slug.
    #[must_use]
    pub fn photo(&self, slug: &str) -> String {
        format!("{}{slug}", self.photo_base)
    }

    /// Logo URL for an airline ICAO code.
    #[must_use]
    pub fn airline_logo(&self, code: &str) -> String {
        format!("{}{code}.png", self.airline_logo_base)
    }

    /// Flag URL for a country code.
    #[must_use]
    pub fn country_flag(&self, country: &str) -> String {
        format!("{}{}.png", self.country_flag_base, country.to_lowercase())
    }
}

impl Default for MediaUrls {
    fn default() -> Self {
        Self {
            photo_base: DEFAULT_PHOTO_BASE_URL.to_string(),
            airline_logo_base: DEFAULT_AIRLINE_LOGO_BASE_URL.to_string(),
            country_flag_base: DEFAULT_COUNTRY_FLAG_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_urls() {
        let urls = MediaUrls::default();
        assert_eq!(urls.photo("a/b.jpg"), "https://cdn.radarbox.com/photo/a/b.jpg");
        assert_eq!(
            urls.airline_logo("UAL"),
            "https://cdn.radarbox.com/airlines/sq/UAL.png"
        );
        assert_eq!(
            urls.country_flag("GB"),
            "https://cdn.radarbox.com/countries-rect/gb.png"
        );
    }

    #[test]
    fn test_media_urls_from_config() {
        let mut feed = FeedConfig::default();
        feed.photo_base_url = "http://localhost/p/".to_string();
        let urls = MediaUrls::from_config(&feed);
        assert_eq!(urls.photo("x"), "http://localhost/p/x");
        assert_eq!(urls.airline_logo_base, DEFAULT_AIRLINE_LOGO_BASE_URL);
    }
}
