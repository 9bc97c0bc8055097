use async_graphql::Context;
use async_graphql::ID;
use async_graphql::Object;

use super::fetch_reference;
use crate::upstream::model::RawEpisode;

/*
  type Episode {
    id: ID
    name: String
    airDate: String
    created: String
    season: String
  }
*/
/// An episode known only by its URL until one of its fields is requested.
pub struct Episode(String);

impl From<String> for Episode {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl Episode {
    async fn fetch(&self, ctx: &Context<'_>) -> Option<RawEpisode> {
        fetch_reference(ctx, &self.0).await
    }
}

#[Object]
impl Episode {
    async fn id(&self, ctx: &Context<'_>) -> Option<ID> {
        self.fetch(ctx).await?.id.map(ID)
    }

    async fn name(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.name
    }

    async fn air_date(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.air_date
    }

    async fn created(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.created
    }

    /// The upstream episode code, e.g. `S01E01`.
    async fn season(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.episode
    }
}
