//! The graph schema and its resolvers.
//!
//! Resolvers never touch global state: the upstream client reaches them
//! through a [`ResolverContext`] attached to each incoming request.

mod character;
mod episode;
mod location;
mod query;

use async_graphql::Context;
use async_graphql::EmptyMutation;
use async_graphql::EmptySubscription;
use async_graphql::ErrorExtensions;
use async_graphql::Schema;
use serde::de::DeserializeOwned;

pub use self::character::Character;
pub use self::episode::Episode;
pub use self::location::Location;
pub use self::query::Query;
use crate::upstream::UpstreamClient;

/// The executable schema served by the router.
pub type GatewaySchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Per-request state handed to every resolver.
#[derive(Clone, Debug)]
pub struct ResolverContext {
    upstream: UpstreamClient,
}

impl ResolverContext {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

/// Build the schema. Introspection can be turned off for production deployments.
pub fn build_schema(introspection: bool) -> GatewaySchema {
    let mut builder = Schema::build(Query, EmptyMutation, EmptySubscription);
    if !introspection {
        builder = builder.disable_introspection();
    }
    builder.finish()
}

/// The schema in GraphQL SDL.
pub fn sdl() -> String {
    build_schema(true).sdl()
}

/// Execute one GraphQL request with a fresh resolver context.
pub async fn execute(
    schema: &GatewaySchema,
    upstream: UpstreamClient,
    request: impl Into<async_graphql::Request>,
) -> async_graphql::Response {
    let request = request.into().data(ResolverContext::new(upstream));
    schema.execute(request).await
}

/// Record `error` against the field being resolved and resolve it to `null`.
/// Sibling fields and the parent object keep their values.
fn null_with_error<T>(ctx: &Context<'_>, error: async_graphql::Error) -> Option<T> {
    ctx.add_error(ctx.set_error_path(error.into_server_error(ctx.item.pos)));
    None
}

fn upstream<'a>(ctx: &Context<'a>) -> Option<&'a UpstreamClient> {
    match ctx.data::<ResolverContext>() {
        Ok(resolver_context) => Some(resolver_context.upstream()),
        Err(error) => null_with_error(ctx, error),
    }
}

/// Fetch the record behind a reference URL.
///
/// An empty reference resolves to `None` without a request; upstream uses
/// `""` for references it cannot name. A failed fetch is reported on the
/// current field, which resolves to `null`.
async fn fetch_reference<T>(ctx: &Context<'_>, reference: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    if reference.is_empty() {
        return None;
    }

    match upstream(ctx)?.fetch_by_relative_path(reference).await {
        Ok(record) => Some(record),
        Err(error) => null_with_error(ctx, error.extend()),
    }
}
