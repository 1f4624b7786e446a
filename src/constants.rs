/// Default values for the note generator. Every one of these can be
/// overridden through `config.toml`; see `crate::config`.

// Registry documents in the obsidian-releases repository
pub const RAW_GITHUB_BASE: &str = "https://raw.githubusercontent.com";
pub const RELEASES_REPO: &str = "obsidianmd/obsidian-releases";
pub const RELEASES_BRANCH: &str = "master";
pub const PLUGINS_JSON_FILE: &str = "community-plugins.json";
pub const THEMES_JSON_FILE: &str = "community-css-themes.json";

// Per-repository files
pub const DEFAULT_BRANCH: &str = "master";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const THEME_CSS_FILES: &[&str] = &["theme.css", "obsidian.css"];

// Wiki-link labels rendered into notes
pub const MOBILE_COMPATIBLE: &str = "[[Mobile-compatible plugins|Yes]]";
pub const DESKTOP_ONLY: &str = "[[Desktop-only plugins|No]]";
pub const DARK_MODE_THEMES: &str = "[[Dark-mode themes|dark]]";
pub const LIGHT_MODE_THEMES: &str = "[[Light-mode themes|light]]";

// The synthetic category note
pub const UNCATEGORIZED_NAME: &str = "Uncategorized plugins";
pub const UNCATEGORIZED_DESCRIPTION: &str =
    "Plugins which have not yet been categorized by the community.";

// Hub vault layout
pub const PLUGINS_DIR: &str = "02 - Community Expansions/02.05 All Community Expansions/Plugins";
pub const THEMES_DIR: &str = "02 - Community Expansions/02.05 All Community Expansions/Themes";
pub const CATEGORIES_DIR: &str = "02 - Community Expansions/02.01 Plugins by Category";
pub const NOTE_EXTENSION: &str = "md";
pub const TEMPLATES_DIR: &str = "templates";
pub const LOGS_DIR: &str = "logs";

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("hub_notes/", env!("CARGO_PKG_VERSION"));

/// Raw URL of a file on a repository branch.
pub fn raw_file_url(raw_base: &str, repo: &str, branch: &str, file: &str) -> String {
    format!("{}/{}/{}/{}", raw_base.trim_end_matches('/'), repo, branch, file)
}

/// Raw URL of a registry document in the obsidian-releases repository.
pub fn releases_url(file: &str) -> String {
    raw_file_url(RAW_GITHUB_BASE, RELEASES_REPO, RELEASES_BRANCH, file)
}
