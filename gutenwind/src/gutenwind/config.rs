use std::path::{Path, PathBuf};

use confik::{Configuration, EnvSource};
use serde::{Deserialize, Serialize};

use self::yaml::YamlFileSource;

#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct SiteSection {
    #[confik(default = default_title())]
    pub title: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Filesystem locations. Relative paths resolve against the crate manifest.
#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct ContentSection {
    #[confik(default = String::from("../content"))]
    pub content_root: String,
    #[confik(default = String::from("../.build"))]
    pub build_root: String,
    #[confik(default = String::from("static"))]
    pub static_root: String,
    #[confik(default = String::from("../.build/safelist.json"))]
    pub safelist_path: String,
}

#[derive(Debug, Clone, Default, Hash, Serialize, Deserialize, Configuration)]
pub struct RenderSection {
    /// Warn about dropped inline tags in release builds too.
    #[confik(default = false)]
    pub diagnostics: bool,
    /// Wrap unlinked images in a lightbox anchor unless the block opts out.
    #[confik(default = false)]
    pub lightbox: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct ServerSection {
    #[confik(default = String::from("127.0.0.1"))]
    pub host: String,
    #[confik(default = 8080u16)]
    pub port: u16,
    #[confik(default = default_cors_origins())]
    pub cors_origins: Vec<String>,
    #[confik(default = 4u64)]
    pub max_payload_mb: u64,
}

impl ServerSection {
    pub fn max_payload_bytes(&self) -> usize {
        (self.max_payload_mb as usize).saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Configuration)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub content: ContentSection,
    pub render: RenderSection,
    pub server: ServerSection,
}

fn default_title() -> String {
    "Gutenwind".into()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteSection {
                title: default_title(),
                base_url: None,
            },
            content: ContentSection {
                content_root: "../content".into(),
                build_root: "../.build".into(),
                static_root: "static".into(),
                safelist_path: "../.build/safelist.json".into(),
            },
            render: RenderSection::default(),
            server: ServerSection {
                host: "127.0.0.1".into(),
                port: 8080,
                cors_origins: default_cors_origins(),
                max_payload_mb: 4,
            },
        }
    }
}

impl SiteConfig {
    /// Load configuration from `config.yml` (if present) and environment variables.
    /// Falls back to the compiled-in defaults when parsing fails.
    pub fn load() -> Self {
        let config_path = manifest_dir().join("config.yml");
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Self {
        let mut builder = SiteConfig::builder();

        if config_path.exists() {
            builder.override_with(YamlFileSource::new(config_path));
        }

        builder.override_with(EnvSource::new());

        match builder.try_build() {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Failed to load config.yml or env overrides: {err}. Using defaults.");
                SiteConfig::default()
            }
        }
    }

    pub fn content_root(&self) -> PathBuf {
        resolve(&self.content.content_root)
    }

    pub fn build_root(&self) -> PathBuf {
        resolve(&self.content.build_root)
    }

    pub fn static_root(&self) -> PathBuf {
        resolve(&self.content.static_root)
    }

    pub fn safelist_path(&self) -> PathBuf {
        resolve(&self.content.safelist_path)
    }
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Absolute paths pass through; relative ones hang off the crate manifest.
pub fn resolve(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        manifest_dir().join(path)
    }
}

mod yaml {
    use std::error::Error;
    use std::path::PathBuf;

    use confik::Source;
    use serde::de::DeserializeOwned;

    #[derive(Debug)]
    pub struct YamlFileSource {
        path: PathBuf,
    }

    impl YamlFileSource {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }
    }

    impl<T> Source<T> for YamlFileSource
    where
        T: DeserializeOwned + confik::ConfigurationBuilder,
    {
        fn allows_secrets(&self) -> bool {
            false
        }

        fn provide(&self) -> Result<T, Box<dyn Error + Sync + Send>> {
            let contents = std::fs::read_to_string(&self.path)?;
            let parsed = serde_yaml::from_str(&contents)?;
            Ok(parsed)
        }
    }
}
