use async_graphql::ID;
use async_graphql::Object;

use super::Episode;
use super::Location;
use crate::upstream::model::RawCharacter;

/*
  type Character {
    id: ID
    name: String
    image: String
    gender: String
    location: Location
    status: String
    episodes: [Episode]
    numEpisodes: Int
  }
*/
pub struct Character(RawCharacter);

impl From<RawCharacter> for Character {
    fn from(raw: RawCharacter) -> Self {
        Self(raw)
    }
}

#[Object]
impl Character {
    async fn id(&self) -> Option<ID> {
        self.0.id.clone().map(ID)
    }

    async fn name(&self) -> Option<&String> {
        self.0.name.as_ref()
    }

    async fn image(&self) -> Option<&String> {
        self.0.image.as_ref()
    }

    async fn gender(&self) -> Option<&String> {
        self.0.gender.as_ref()
    }

    /// Last known location. Only `name` is known without a further fetch.
    async fn location(&self) -> Option<Location> {
        self.0.location.clone().map(Location::from)
    }

    async fn status(&self) -> Option<&String> {
        self.0.status.as_ref()
    }

    /// Episodes the character appears in, in upstream order.
    async fn episodes(&self) -> Option<Vec<Option<Episode>>> {
        Some(
            self.0
                .episode
                .iter()
                .map(|url| Some(Episode::from(url.clone())))
                .collect(),
        )
    }

    async fn num_episodes(&self) -> Option<i32> {
        i32::try_from(self.0.episode.len()).ok()
    }
}
