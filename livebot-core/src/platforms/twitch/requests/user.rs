// File: livebot-core/src/platforms/twitch/requests/user.rs

use livebot_common::models::HelixUser;

use super::HelixData;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::Error;

impl TwitchHelixClient {
    /// `GET /users?login=`. Also fills the login -> id cache.
    pub async fn fetch_user(&self, login: &str) -> Result<Option<HelixUser>, Error> {
        let resp: HelixData<HelixUser> = self
            .get_json(&format!("/users?login={}", urlencoding::encode(login)))
            .await?;
        let user = resp.data.into_iter().next();
        if let Some(u) = &user {
            if let Ok(id) = u.id.parse() {
                self.cache_id(&u.login, id);
            }
        }
        Ok(user)
    }
}
