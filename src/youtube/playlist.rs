use reqwest::blocking::Client;

use crate::{
    config::Config,
    error::ApiError,
    types::{
        DeletePlaylistItemRequest, InsertPlaylistItemRequest, PlaylistItem, PlaylistItemListResponse,
        PlaylistItemPage,
    },
    youtube::{PlaylistApi, check_status},
};

/// `playlistItems` resource of the YouTube Data API v3.
pub struct YouTubePlaylistApi {
    client: Client,
    api_url: String,
}

impl YouTubePlaylistApi {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        YouTubePlaylistApi {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/playlistItems", self.api_url)
    }
}

impl PlaylistApi for YouTubePlaylistApi {
    fn list_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemPage, ApiError> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(self.endpoint())
            .query(&query)
            .bearer_auth(access_token)
            .send()?;
        let body = check_status(response)?
            .json::<PlaylistItemListResponse>()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(PlaylistItemPage {
            items: body.items.into_iter().map(PlaylistItem::from).collect(),
            next_page_token: body.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    fn insert_item(
        &self,
        access_token: &str,
        request: &InsertPlaylistItemRequest,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("part", "snippet")])
            .bearer_auth(access_token)
            .json(request)
            .send()?;
        check_status(response)?;
        Ok(())
    }

    fn delete_item(
        &self,
        access_token: &str,
        request: &DeletePlaylistItemRequest,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint())
            .query(&[("id", request.item_id.as_str())])
            .bearer_auth(access_token)
            .send()?;
        check_status(response)?;
        Ok(())
    }
}
