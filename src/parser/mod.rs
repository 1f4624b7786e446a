pub mod theme_css;

pub use theme_css::{get_theme_plugin_support, get_theme_settings, PluginKind, PluginSupport, ThemeSetting};
