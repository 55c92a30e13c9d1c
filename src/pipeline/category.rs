use serde::Deserialize;

/// Sector assigned when the category payload is absent, unparseable, or
/// carries no usable tag. Sector is lossy-recoverable, so decode failures
/// downgrade to this sentinel instead of dropping the row.
pub const FALLBACK_SECTOR: &str = "Other";

/// Decoded form of the nested category payload carried by the source feed.
///
/// The payload is a JSON array of tag objects, except that the feed escapes
/// inner quotes by doubling them. The decode is explicit: either we got a
/// list of tags, or the payload is marked unparsed. A parse failure never
/// leaks a partial result.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryPayload {
    Tagged(Vec<CategoryTag>),
    Unparsed,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryTag {
    #[serde(default)]
    pub category: Option<String>,
}

pub fn decode(raw: Option<&str>) -> CategoryPayload {
    let Some(raw) = raw else {
        return CategoryPayload::Unparsed;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CategoryPayload::Unparsed;
    }

    // Undo the feed's doubled-quote escaping before handing to serde.
    let unescaped = trimmed.replace("\"\"", "\"");
    match serde_json::from_str::<Vec<CategoryTag>>(&unescaped) {
        Ok(tags) => CategoryPayload::Tagged(tags),
        Err(_) => CategoryPayload::Unparsed,
    }
}

/// The first tag with a non-blank category, if the payload carries one.
/// `None` means the caller should fall back to [`FALLBACK_SECTOR`].
pub fn primary_sector(payload: &CategoryPayload) -> Option<String> {
    match payload {
        CategoryPayload::Tagged(tags) => tags.iter().find_map(|tag| {
            tag.category
                .as_deref()
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .map(str::to_string)
        }),
        CategoryPayload::Unparsed => None,
    }
}
