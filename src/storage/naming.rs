//! Unique asset names: `<unix-millis>-<random 0..1e9><ext>`

use rand::Rng;

pub fn unique_asset_name(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{millis}-{suffix}{extension}")
}

/// True for names this module could have produced
///
/// Used by the static layer to refuse anything else under the uploads prefix.
pub fn is_asset_name(name: &str) -> bool {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    };
    let Some((millis, suffix)) = stem.split_once('-') else {
        return false;
    };
    !millis.is_empty()
        && !suffix.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.bytes().all(|b| b.is_ascii_digit())
        && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}
