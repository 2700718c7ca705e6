use std::collections::BTreeMap;

/// Redeemable cosmetics and their point costs.
///
/// `default` entries are free so a user can always switch back. BTreeMap keeps
/// the shop listing in a stable order in API responses.
#[derive(Debug, Clone)]
pub struct ShopCatalog {
    avatars: BTreeMap<String, i32>,
    themes: BTreeMap<String, i32>,
    custom_theme_cost: i32,
    custom_avatar_cost: i32,
}

impl ShopCatalog {
    pub fn builtin() -> Self {
        let avatars = [
            ("default", 0),
            ("cat", 30),
            ("panda", 30),
            ("dragon", 30),
            ("fox", 30),
            ("robot", 30),
            ("unicorn", 30),
            ("alien", 30),
            ("ghost", 30),
        ];
        let themes = [
            ("default", 0),
            ("sakura", 30),
            ("forest", 30),
            ("sunset", 30),
            ("ocean", 30),
            ("neon", 30),
        ];

        Self {
            avatars: avatars
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            themes: themes.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            custom_theme_cost: 100,
            custom_avatar_cost: 100,
        }
    }

    /// Cost of a catalog avatar, or `None` if the key is not sold.
    pub fn avatar_cost(&self, key: &str) -> Option<i32> {
        self.avatars.get(key).copied()
    }

    /// Cost of a catalog theme, or `None` if the key is not sold.
    pub fn theme_cost(&self, key: &str) -> Option<i32> {
        self.themes.get(key).copied()
    }

    pub fn custom_theme_cost(&self) -> i32 {
        self.custom_theme_cost
    }

    pub fn custom_avatar_cost(&self) -> i32 {
        self.custom_avatar_cost
    }

    pub fn avatars(&self) -> &BTreeMap<String, i32> {
        &self.avatars
    }

    pub fn themes(&self) -> &BTreeMap<String, i32> {
        &self.themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_free() {
        let catalog = ShopCatalog::builtin();
        assert_eq!(catalog.avatar_cost("default"), Some(0));
        assert_eq!(catalog.theme_cost("default"), Some(0));
    }

    #[test]
    fn catalog_items_cost_thirty() {
        let catalog = ShopCatalog::builtin();
        assert_eq!(catalog.avatar_cost("dragon"), Some(30));
        assert_eq!(catalog.theme_cost("neon"), Some(30));
    }

    #[test]
    fn unknown_keys_are_not_sold() {
        let catalog = ShopCatalog::builtin();
        assert_eq!(catalog.avatar_cost("wizard"), None);
        assert_eq!(catalog.theme_cost("midnight"), None);
        // customs bypass the catalog entirely
        assert_eq!(catalog.avatar_cost("🥷"), None);
    }

    #[test]
    fn custom_items_cost_one_hundred() {
        let catalog = ShopCatalog::builtin();
        assert_eq!(catalog.custom_theme_cost(), 100);
        assert_eq!(catalog.custom_avatar_cost(), 100);
    }
}
