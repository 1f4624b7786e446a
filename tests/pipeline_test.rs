use anyhow::Result;
use async_trait::async_trait;
use hub_notes::app::ports::{HttpClientPort, HttpGetResult};
use hub_notes::config::{Config, MatchMode};
use hub_notes::error::HubError;
use hub_notes::pipeline::{Mode, Pipeline};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

const PLUGINS_URL: &str = "https://raw.test/releases/community-plugins.json";
const THEMES_URL: &str = "https://raw.test/releases/community-css-themes.json";

#[derive(Default)]
struct MockHttp {
    responses: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<String>>,
}

impl MockHttp {
    fn serve(&self, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (200, body.to_string()));
    }

    fn requested(&self, url: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl HttpClientPort for MockHttp {
    async fn get(&self, url: &str) -> hub_notes::error::Result<HttpGetResult> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or((404, "404: Not Found".to_string()));
        Ok(HttpGetResult {
            status,
            bytes: body.into_bytes(),
        })
    }
}

struct Vault {
    _root: TempDir,
    config: Config,
    http: Arc<MockHttp>,
}

impl Vault {
    fn new() -> Self {
        let root = tempdir().unwrap();
        let templates = root.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("plugin.md.jinja"),
            "id={{ id }}\nuser={{ user }}\nmobile={{ mobile }}\nname={{ name }}\n",
        )
        .unwrap();
        fs::write(
            templates.join("theme.md.jinja"),
            "name={{ name }}\nuser={{ user }}\nmodes={{ modes }}\nbranch={{ branch }}\n\
             {% for s in settings %}setting={{ s.title }}\n{% endfor %}\
             {% for p in plugins %}plugin={{ p.id }}:{{ p.kind }}\n{% endfor %}",
        )
        .unwrap();
        fs::write(
            templates.join("category.md.jinja"),
            "# {{ name }}\n{{ description }}\n{% for p in plugins %}- {{ p.id }}\n{% endfor %}",
        )
        .unwrap();

        let mut config = Config::default().rooted_at(root.path());
        config.templates.dir = templates;
        config.registry.plugins_url = PLUGINS_URL.into();
        config.registry.themes_url = THEMES_URL.into();
        config.registry.raw_base = "https://raw.test".into();
        config.concurrency = 1;

        Self {
            _root: root,
            config,
            http: Arc::new(MockHttp::default()),
        }
    }

    async fn run(&self, mode: Mode, overwrite: bool) -> hub_notes::error::Result<hub_notes::pipeline::RunSummary> {
        Pipeline::new(&self.config, self.http.clone())
            .run(mode, overwrite)
            .await
    }

    fn plugin_note(&self, id: &str) -> PathBuf {
        self.config.output.plugins_dir.join(format!("{id}.md"))
    }

    fn theme_note(&self, name: &str) -> PathBuf {
        self.config.output.themes_dir.join(format!("{name}.md"))
    }

    fn uncategorized_note(&self) -> PathBuf {
        self.config
            .output
            .categories_dir
            .join("Uncategorized plugins.md")
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn note_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_single_plugin_end_to_end() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(PLUGINS_URL, r#"[{"repo": "alice/foo", "id": "foo"}]"#);
    vault.http.serve("https://raw.test/alice/foo/master/manifest.json", "{}");

    let summary = vault.run(Mode::Plugins, true).await?;

    assert_eq!(note_count(&vault.config.output.plugins_dir), 1);
    let note = read(&vault.plugin_note("foo"));
    assert!(note.contains("user=alice"));
    assert!(note.contains("mobile=[[Mobile-compatible plugins|Yes]]"));
    assert_eq!(summary.pass("plugins").unwrap().created, 1);
    assert!(vault.http.requested("https://raw.test/alice/foo/master/manifest.json"));
    Ok(())
}

#[tokio::test]
async fn test_desktop_only_and_manifest_fields() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(
        PLUGINS_URL,
        r#"[{"repo": "alice/foo", "id": "foo", "name": "Registry"},
            {"repo": "bob/bar", "id": "bar", "branch": "main"}]"#,
    );
    vault.http.serve(
        "https://raw.test/alice/foo/master/manifest.json",
        r#"{"isDesktopOnly": true, "name": "Foo From Manifest"}"#,
    );
    vault.http.serve(
        "https://raw.test/bob/bar/main/manifest.json",
        r#"{"isDesktopOnly": false}"#,
    );

    vault.run(Mode::Plugins, false).await?;

    let foo = read(&vault.plugin_note("foo"));
    assert!(foo.contains("mobile=[[Desktop-only plugins|No]]"));
    assert!(foo.contains("name=Foo From Manifest"));
    let bar = read(&vault.plugin_note("bar"));
    assert!(bar.contains("mobile=[[Mobile-compatible plugins|Yes]]"));
    assert!(bar.contains("user=bob"));
    Ok(())
}

#[tokio::test]
async fn test_second_run_without_overwrite_keeps_files() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(PLUGINS_URL, r#"[{"repo": "alice/foo", "id": "foo"}]"#);
    vault.http.serve("https://raw.test/alice/foo/master/manifest.json", "{}");

    vault.run(Mode::Plugins, false).await?;
    let first = fs::read(vault.plugin_note("foo"))?;

    // The manifest changes upstream, but existing notes are left alone
    vault.http.serve(
        "https://raw.test/alice/foo/master/manifest.json",
        r#"{"isDesktopOnly": true}"#,
    );
    let summary = vault.run(Mode::Plugins, false).await?;
    assert_eq!(fs::read(vault.plugin_note("foo"))?, first);
    assert_eq!(summary.pass("plugins").unwrap().skipped, 1);

    let summary = vault.run(Mode::Plugins, true).await?;
    assert_eq!(summary.pass("plugins").unwrap().replaced, 1);
    assert!(read(&vault.plugin_note("foo")).contains("Desktop-only"));
    Ok(())
}

#[tokio::test]
async fn test_overwrite_is_deterministic() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(PLUGINS_URL, r#"[{"repo": "alice/foo", "id": "foo"}]"#);
    vault.http.serve("https://raw.test/alice/foo/master/manifest.json", r#"{"version": "1.0.0"}"#);

    vault.run(Mode::Plugins, true).await?;
    let first = fs::read(vault.plugin_note("foo"))?;
    vault.run(Mode::Plugins, true).await?;
    assert_eq!(fs::read(vault.plugin_note("foo"))?, first);
    Ok(())
}

#[tokio::test]
async fn test_uncategorized_note() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(
        PLUGINS_URL,
        r#"[{"repo": "a/one", "id": "zeta"},
            {"repo": "a/two", "id": "my-plugin"},
            {"repo": "a/three", "id": "alpha"}]"#,
    );
    for repo in ["a/one", "a/two", "a/three"] {
        vault
            .http
            .serve(&format!("https://raw.test/{repo}/master/manifest.json"), "{}");
    }
    let categories = &vault.config.output.categories_dir;
    fs::create_dir_all(categories)?;
    fs::write(categories.join("Editing.md"), "- [[my-plugin]]\n")?;
    // Mentions in the uncategorized note itself do not count
    fs::write(vault.uncategorized_note(), "- alpha\n- zeta\n")?;

    let summary = vault.run(Mode::Plugins, false).await?;

    let note = read(&vault.uncategorized_note());
    assert!(note.starts_with("# Uncategorized plugins\n"));
    assert!(note.contains("Plugins which have not yet been categorized by the community."));
    assert!(!note.contains("my-plugin"));
    // Registry order, not alphabetical
    let zeta = note.find("- zeta").unwrap();
    let alpha = note.find("- alpha").unwrap();
    assert!(zeta < alpha);
    // Always regenerated even when plugin notes are not overwritten
    assert_eq!(summary.pass("uncategorized").unwrap().replaced, 1);
    Ok(())
}

#[tokio::test]
async fn test_uncategorized_substring_vs_delimited() -> Result<()> {
    let mut vault = Vault::new();
    vault.http.serve(
        PLUGINS_URL,
        r#"[{"repo": "a/one", "id": "tag"}, {"repo": "a/two", "id": "tag-wrangler"}]"#,
    );
    vault.http.serve("https://raw.test/a/one/master/manifest.json", "{}");
    vault.http.serve("https://raw.test/a/two/master/manifest.json", "{}");
    let categories = vault.config.output.categories_dir.clone();
    fs::create_dir_all(&categories)?;
    fs::write(categories.join("Tags.md"), "- [[tag-wrangler]]\n")?;

    vault.run(Mode::Plugins, false).await?;
    assert!(!read(&vault.uncategorized_note()).contains("- tag\n"));

    vault.config.categories.match_mode = MatchMode::Delimited;
    vault.run(Mode::Plugins, false).await?;
    let note = read(&vault.uncategorized_note());
    assert!(note.contains("- tag\n"));
    assert!(!note.contains("- tag-wrangler\n"));
    Ok(())
}

#[tokio::test]
async fn test_themes() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(
        THEMES_URL,
        r#"[{"repo": "carol/night", "name": "Night", "modes": ["dark", "light"]},
            {"repo": "dave/plain", "name": "Plain", "modes": ["light"], "branch": "main"}]"#,
    );
    vault.http.serve(
        "https://raw.test/carol/night/master/theme.css",
        "/* @settings\nname: Night\nid: night\nsettings:\n  - id: accent\n    title: Accent\n    type: variable-color\n*/\n\
         /* @plugins\ncommunity:\n- obsidian-kanban\n*/\n",
    );

    let summary = vault.run(Mode::Themes, false).await?;
    assert!(summary.pass("plugins").is_none());
    assert_eq!(summary.pass("themes").unwrap().created, 2);

    let night = read(&vault.theme_note("Night"));
    assert!(night.contains("user=carol"));
    assert!(night.contains("modes=[[Dark-mode themes|dark]], [[Light-mode themes|light]]"));
    assert!(night.contains("branch=master"));
    assert!(night.contains("setting=Accent"));
    assert!(night.contains("plugin=obsidian-kanban:community"));

    // No stylesheet at all: still written, just without annotations
    let plain = read(&vault.theme_note("Plain"));
    assert!(plain.contains("branch=main"));
    assert!(!plain.contains("setting="));
    assert!(vault.http.requested("https://raw.test/dave/plain/main/obsidian.css"));

    assert_eq!(note_count(&vault.config.output.plugins_dir), 0);
    Ok(())
}

#[tokio::test]
async fn test_all_runs_plugins_then_uncategorized_then_themes() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(PLUGINS_URL, r#"[{"repo": "alice/foo", "id": "foo"}]"#);
    vault.http.serve("https://raw.test/alice/foo/master/manifest.json", "{}");
    vault.http.serve(THEMES_URL, r#"[{"repo": "carol/night", "name": "Night", "modes": ["dark"]}]"#);

    let summary = vault.run(Mode::All, false).await?;
    let passes: Vec<&str> = summary.passes.iter().map(|p| p.pass).collect();
    assert_eq!(passes, vec!["plugins", "uncategorized", "themes"]);
    assert_eq!(summary.pass("plugins").unwrap().total(), 1);
    assert_eq!(summary.pass("themes").unwrap().created, 1);

    assert!(vault.plugin_note("foo").exists());
    assert!(vault.uncategorized_note().exists());
    assert!(vault.theme_note("Night").exists());
    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_aborts_pass() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(
        PLUGINS_URL,
        r#"[{"repo": "a/one", "id": "one"}, {"repo": "a/two", "id": "two"}, {"repo": "a/three", "id": "three"}]"#,
    );
    vault.http.serve("https://raw.test/a/one/master/manifest.json", "{}");
    vault.http.serve("https://raw.test/a/three/master/manifest.json", "{}");

    let err = vault.run(Mode::All, false).await.unwrap_err();
    assert!(err.is_fetch());

    assert!(vault.plugin_note("one").exists());
    assert!(!vault.plugin_note("two").exists());
    assert!(!vault.plugin_note("three").exists());
    assert!(!vault.uncategorized_note().exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_manifest_is_parse_error() -> Result<()> {
    let vault = Vault::new();
    vault.http.serve(PLUGINS_URL, r#"[{"repo": "a/one", "id": "one"}]"#);
    vault.http.serve("https://raw.test/a/one/master/manifest.json", "{broken");

    let err = vault.run(Mode::Plugins, false).await.unwrap_err();
    assert!(matches!(err, HubError::Parse { .. }));
    Ok(())
}

#[tokio::test]
async fn test_missing_template() -> Result<()> {
    let vault = Vault::new();
    fs::remove_file(vault.config.templates.dir.join("theme.md.jinja"))?;
    vault.http.serve(THEMES_URL, "[]");

    let err = vault.run(Mode::Themes, false).await.unwrap_err();
    assert!(matches!(err, HubError::TemplateNotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn test_parallel_fetches_keep_order() -> Result<()> {
    let mut vault = Vault::new();
    vault.config.concurrency = 8;
    let entries: Vec<String> = (0..20)
        .map(|i| format!(r#"{{"repo": "u{i}/p{i}", "id": "p{i}"}}"#))
        .collect();
    vault.http.serve(PLUGINS_URL, &format!("[{}]", entries.join(",")));
    for i in 0..20 {
        vault
            .http
            .serve(&format!("https://raw.test/u{i}/p{i}/master/manifest.json"), "{}");
    }

    let summary = vault.run(Mode::Plugins, false).await?;
    assert_eq!(summary.pass("plugins").unwrap().created, 20);

    let note = read(&vault.uncategorized_note());
    let positions: Vec<usize> = (0..20)
        .map(|i| note.find(&format!("- p{i}\n")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}
