//! Shapes of the payloads returned by the REST API.
//!
//! Every field is optional: the graph exposes nullable fields only, and a
//! record missing an attribute must still resolve its siblings.

use serde::Deserialize;
use serde::Deserializer;

/// One page of the character collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub info: Option<PageInfo>,
    #[serde(default)]
    pub results: Vec<RawCharacter>,
}

/// Pagination metadata of a collection page. Exposed for completeness only:
/// the graph never follows `next`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    pub count: Option<u64>,
    pub pages: Option<u64>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCharacter {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub image: Option<String>,
    pub location: Option<RawLocationRef>,
    /// Episode URLs, in upstream order.
    pub episode: Vec<String>,
}

/// The `{name, url}` object a character embeds for its location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocationRef {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub dimension: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEpisode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub air_date: Option<String>,
    /// The episode code, `S01E01` style.
    pub episode: Option<String>,
    pub created: Option<String>,
}

/// Upstream ids are JSON numbers; the graph carries them as `ID` strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        String(String),
    }

    Ok(
        Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
            RawId::Number(id) => id.to_string(),
            RawId::String(id) => id,
        }),
    )
}
