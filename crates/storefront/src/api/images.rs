//! Image reference resolution.

use url::Url;

/// Shown when a product has no image.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.png";

/// Map a stored image reference to something displayable.
///
/// - empty or missing: [`PLACEHOLDER_IMAGE`]
/// - absolute `http(s)` URLs: unchanged
/// - server paths under `/api/`: prefixed with `asset_base` when one is set
/// - anything else (data URIs, relative paths): unchanged
#[must_use]
pub fn resolve_image_url(value: Option<&str>, asset_base: Option<&Url>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };

    if value.starts_with("http://") || value.starts_with("https://") {
        return value.to_string();
    }

    match asset_base {
        Some(base) if value.starts_with("/api/") => {
            format!("{}{value}", base.as_str().trim_end_matches('/'))
        }
        _ => value.to_string(),
    }
}
