use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::loyalty::catalog::ShopCatalog;
use crate::users::repo::User;

/// A user's loyalty view: balance, equipped cosmetics and the shop listing.
#[derive(Debug, Serialize)]
pub struct LoyaltyState {
    pub user_id: Uuid,
    pub points: i32,
    pub avatar: String,
    pub theme: String,
    pub available_avatars: BTreeMap<String, i32>,
    pub available_themes: BTreeMap<String, i32>,
}

impl LoyaltyState {
    pub fn new(user: User, catalog: &ShopCatalog) -> Self {
        Self {
            user_id: user.id,
            points: user.points,
            avatar: user.avatar,
            theme: user.theme,
            available_avatars: catalog.avatars().clone(),
            available_themes: catalog.themes().clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RedeemAvatarRequest {
    pub user_id: Uuid,
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct RedeemThemeRequest {
    pub user_id: Uuid,
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct CustomThemeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub from_color: String,
    #[serde(default)]
    pub via_color: String,
    #[serde(default)]
    pub to_color: String,
    pub cost: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CustomAvatarRequest {
    pub user_id: Uuid,
    pub glyph: String,
    pub cost: Option<i32>,
}
