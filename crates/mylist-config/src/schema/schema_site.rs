//! Target site configuration.

use serde::{Deserialize, Serialize};

/// URLs and element selectors of the video site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_playlist_url")]
    pub playlist_url: String,

    /// Watch page URL; `{base}` and `{id}` are substituted.
    #[serde(default = "default_watch_url_template")]
    pub watch_url_template: String,

    #[serde(default)]
    pub selectors: SelectorsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            playlist_url: default_playlist_url(),
            watch_url_template: default_watch_url_template(),
            selectors: SelectorsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Watch page URL of one identifier.
    pub fn watch_url(&self, id: &str) -> String {
        self.watch_url_template
            .replace("{base}", self.base_url.trim_end_matches('/'))
            .replace("{id}", id)
    }
}

fn default_base_url() -> String {
    "https://www.nicovideo.jp".to_string()
}

fn default_playlist_url() -> String {
    "https://www.nicovideo.jp/my/mylist".to_string()
}

fn default_watch_url_template() -> String {
    "{base}/watch/{id}".to_string()
}

/// Element selectors. CSS by default; an `xpath:` prefix selects XPath.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorsConfig {
    pub login_link: String,
    pub email_input: String,
    pub password_input: String,
    pub login_submit: String,
    pub playlist_count: String,
    pub playlist_open: String,
    pub playlist_actions: String,
    pub playlist_delete: String,
    pub create_button: String,
    pub title_input: String,
    pub create_confirm: String,
    pub video_menu: String,
    pub add_to_playlist: String,
    pub playlist_choice: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            login_link: "xpath://*[@id=\"CommonHeader\"]/div/div/div/div[2]/a".to_string(),
            email_input: "#input__mailtel".to_string(),
            password_input: "#input__password".to_string(),
            login_submit: "#login__submit".to_string(),
            playlist_count: "xpath://*[@id=\"UserPage-app\"]/section/section/main/div/div/div[1]/div[2]/div/div/div/ul[1]/div/header/div/span/span[1]".to_string(),
            playlist_open: "xpath://*[@id=\"UserPage-app\"]/section/section/main/div/section/div/div[3]/div[1]/div/a".to_string(),
            playlist_actions: "xpath://*[@id=\"UserPage-app\"]/section/section/main/div/section/div/header/div/div[2]/button".to_string(),
            playlist_delete: "xpath://*[@id=\"UserPage-app\"]/section/section/main/div/section/div/header/div/div[2]/div/button[3]".to_string(),
            create_button: "xpath://*[@id=\"UserPage-app\"]/section/section/main/div/div/div[1]/div[2]/div/div/div/ul[1]/div/div/button[1]".to_string(),
            title_input: "#undefined-title".to_string(),
            create_confirm: "xpath:/html/body/div[13]/div/div/article/footer/button".to_string(),
            video_menu: "xpath://*[@id=\"root\"]/div[1]/main/div[2]/section/div[1]/div/div[2]/div[3]/div//button[@aria-label=\"メニュー\"]".to_string(),
            add_to_playlist: "xpath://button[text()=\"マイリストに追加\"]".to_string(),
            playlist_choice: "xpath://*[@id=\"root\"]/div[1]/main/div[2]/section/div[3]/div[2]/section/div/ul/li[2]/button".to_string(),
        }
    }
}
