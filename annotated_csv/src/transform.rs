use crate::schema::FieldMeta;

/// Output text of one cell
///
/// A configured mask is written verbatim regardless of the raw value (null included).
/// Otherwise null becomes an empty string and any other value is written as is.
pub fn transform(meta: &FieldMeta, raw: Option<String>) -> String {
    match &meta.mask {
        Some(mask) => mask.clone(),
        None => raw.unwrap_or_default(),
    }
}
