use async_graphql::Context;
use async_graphql::ID;
use async_graphql::Object;

use super::fetch_reference;
use crate::upstream::model::RawLocation;
use crate::upstream::model::RawLocationRef;

/*
  type Location {
    id: ID
    name: String
    type: String
    dimension: String
  }
*/
pub struct Location(RawLocationRef);

impl From<RawLocationRef> for Location {
    fn from(reference: RawLocationRef) -> Self {
        Self(reference)
    }
}

impl Location {
    // Each field fetches on its own; siblings are not shared.
    async fn fetch(&self, ctx: &Context<'_>) -> Option<RawLocation> {
        let url = self.0.url.as_deref().unwrap_or_default();
        fetch_reference(ctx, url).await
    }
}

#[Object]
impl Location {
    async fn id(&self, ctx: &Context<'_>) -> Option<ID> {
        self.fetch(ctx).await?.id.map(ID)
    }

    async fn name(&self) -> Option<&String> {
        self.0.name.as_ref()
    }

    #[graphql(name = "type")]
    async fn kind(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.kind
    }

    async fn dimension(&self, ctx: &Context<'_>) -> Option<String> {
        self.fetch(ctx).await?.dimension
    }
}
