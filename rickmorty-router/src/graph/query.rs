use async_graphql::Context;
use async_graphql::ErrorExtensions;
use async_graphql::ID;
use async_graphql::Object;

use super::Character;
use super::null_with_error;
use super::upstream;

/*
  type Query {
    characters(id: ID): [Character]
  }
*/
pub struct Query;

#[Object]
impl Query {
    /// A single character when `id` is given, otherwise the first page of the collection.
    /// An empty `id` counts as absent.
    async fn characters(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
    ) -> Option<Vec<Option<Character>>> {
        let upstream = upstream(ctx)?;

        let characters = match id.filter(|id| !id.is_empty()) {
            Some(id) => upstream
                .fetch_by_id(id.as_str())
                .await
                .map(|character| vec![character]),
            None => upstream.fetch_collection().await.map(|page| page.results),
        };

        match characters {
            Ok(characters) => Some(
                characters
                    .into_iter()
                    .map(|character| Some(Character::from(character)))
                    .collect(),
            ),
            Err(error) => null_with_error(ctx, error.extend()),
        }
    }
}
