use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use lifegrid::{Error, GridSize, Seed, Settings, UpdateMode};
use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

/// Config and grid files are YAML when named `*.yaml`/`*.yml`, JSON otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T> {
        Ok(match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub grid_size: GridSize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub init: InitConfig,
    #[serde(default = "default_update_mode")]
    pub update_mode: String,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Deserialize)]
pub struct InitConfig {
    #[serde(default = "default_init_mode")]
    pub mode: String,
    #[serde(default = "default_probability")]
    pub probability: f64,
    pub seed: Option<u64>,
    pub path: Option<PathBuf>,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            mode: default_init_mode(),
            probability: default_probability(),
            seed: None,
            path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_visualization_mode")]
    pub mode: String,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            mode: default_visualization_mode(),
            delay_ms: 0,
            output_dir: default_output_dir(),
        }
    }
}

fn default_max_steps() -> usize {
    100
}

fn default_update_mode() -> String {
    "all".into()
}

fn default_init_mode() -> String {
    "random".into()
}

fn default_probability() -> f64 {
    0.5
}

fn default_visualization_mode() -> String {
    "text".into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

#[derive(Clone, Debug, PartialEq)]
pub enum InitMode {
    Random { probability: f64, seed: Option<u64> },
    File(PathBuf),
    Input,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visualization {
    Text,
    /// Live window.
    Graphical,
    /// PPM frames written to a directory.
    Image { output_dir: PathBuf },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Format::of(path)
            .decode(&text)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Format::Json.decode(text)
    }

    pub fn update_mode(&self) -> Result<UpdateMode, Error> {
        self.update_mode.parse()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.visualization.delay_ms)
    }

    pub fn init_mode(&self) -> Result<InitMode> {
        let InitConfig {
            mode,
            probability,
            seed,
            path,
        } = &self.init;
        Ok(match mode.as_str() {
            "random" => InitMode::Random {
                probability: *probability,
                seed: *seed,
            },
            "file" => match path {
                Some(path) => InitMode::File(path.clone()),
                None => bail!("init mode \"file\" needs init.path"),
            },
            "input" => InitMode::Input,
            other => {
                return Err(Error::UnsupportedMode {
                    kind: "initialization",
                    mode: other.to_owned(),
                }
                .into());
            }
        })
    }

    pub fn visualization(&self) -> Result<Visualization, Error> {
        match self.visualization.mode.as_str() {
            "text" => Ok(Visualization::Text),
            "graphical" => Ok(Visualization::Graphical),
            "image" => Ok(Visualization::Image {
                output_dir: self.visualization.output_dir.clone(),
            }),
            other => Err(Error::UnsupportedMode {
                kind: "visualization",
                mode: other.to_owned(),
            }),
        }
    }

    /// Checks the grid size and modes, then builds the seed. `read_coords`
    /// only runs for input mode, once everything else is known to be valid.
    pub fn settings(
        &self,
        read_coords: impl FnOnce() -> Result<Vec<(i64, i64)>>,
    ) -> Result<Settings> {
        let dims = self.grid_size.resolve()?;
        let update_mode = self.update_mode()?;
        let seed = match self.init_mode()? {
            InitMode::Random { probability, seed } => {
                let seed = Seed::Random {
                    probability,
                    rng_seed: seed,
                };
                seed.validate()?;
                seed
            }
            InitMode::File(path) => Seed::Array(load_array(&path)?),
            InitMode::Input => Seed::Coords(read_coords()?),
        };
        debug!("resolved grid size {}x{}", dims.height(), dims.width());
        Ok(Settings {
            size: self.grid_size.clone(),
            generations: self.max_steps,
            update_mode,
            seed,
            delay: self.delay(),
        })
    }
}

/// Reads a previously saved `[[0, 1, ...], ...]` array.
pub fn load_array(path: &Path) -> Result<Vec<Vec<u8>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading grid {}", path.display()))?;
    Format::of(path)
        .decode(&text)
        .with_context(|| format!("parsing grid {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse(r#"{ "grid_size": 8 }"#).unwrap();
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.update_mode().unwrap(), UpdateMode::All);
        assert_eq!(
            config.init_mode().unwrap(),
            InitMode::Random {
                probability: 0.5,
                seed: None
            }
        );
        assert_eq!(config.visualization().unwrap(), Visualization::Text);
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn test_full() {
        let config = Config::parse(
            r#"{
                "grid_size": [4, 9],
                "max_steps": 12,
                "init": { "mode": "file", "path": "seed.json" },
                "update_mode": "alive_based",
                "visualization": { "mode": "image", "delay_ms": 40, "output_dir": "out" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.grid_size, GridSize::Pair(vec![4, 9]));
        assert_eq!(config.max_steps, 12);
        assert_eq!(config.update_mode().unwrap(), UpdateMode::AliveBased);
        assert_eq!(
            config.init_mode().unwrap(),
            InitMode::File(PathBuf::from("seed.json"))
        );
        assert_eq!(
            config.visualization().unwrap(),
            Visualization::Image {
                output_dir: PathBuf::from("out")
            }
        );
        assert_eq!(config.delay(), Duration::from_millis(40));
    }

    #[test]
    fn test_graphical_opens_window() {
        let config =
            Config::parse(r#"{ "grid_size": 3, "visualization": { "mode": "graphical" } }"#)
                .unwrap();
        assert_eq!(config.visualization().unwrap(), Visualization::Graphical);
    }

    #[test]
    fn test_yaml() {
        let config = Format::Yaml
            .decode::<Config>(
                "grid_size: [20, 40]\n\
                 max_steps: 50\n\
                 init:\n  mode: random\n  probability: 0.3\n  seed: 9\n\
                 update_mode: alive_based\n\
                 visualization:\n  mode: text\n  delay_ms: 100\n",
            )
            .unwrap();
        assert_eq!(config.grid_size, GridSize::Pair(vec![20, 40]));
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.update_mode().unwrap(), UpdateMode::AliveBased);
        assert_eq!(
            config.init_mode().unwrap(),
            InitMode::Random {
                probability: 0.3,
                seed: Some(9)
            }
        );
        assert_eq!(config.delay(), Duration::from_millis(100));
        let square: Config = Format::Yaml.decode("grid_size: 7\n").unwrap();
        assert_eq!(square.grid_size, GridSize::Square(7));
    }

    #[test]
    fn test_format_of() {
        assert_eq!(Format::of(Path::new("config.yaml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("dir/run.yml")), Format::Yaml);
        assert_eq!(Format::of(Path::new("config.json")), Format::Json);
        assert_eq!(Format::of(Path::new("config")), Format::Json);
    }

    #[test]
    fn test_invalid_size_rejected_before_input() {
        for size in ["0", "[3, 0]", "[9223372036854775807, 2]"] {
            let text = format!(r#"{{ "grid_size": {size}, "init": {{ "mode": "input" }} }}"#);
            let config = Config::parse(&text).unwrap();
            let err = config
                .settings(|| panic!("coordinates read for an invalid grid"))
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::InvalidGridSize(_))
            ));
        }
    }

    #[test]
    fn test_bad_modes_rejected_before_input() {
        let config = Config::parse(
            r#"{ "grid_size": 4, "init": { "mode": "input" }, "update_mode": "lazy" }"#,
        )
        .unwrap();
        let err = config.settings(|| panic!("coordinates read")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedMode { kind: "update", .. })
        ));
    }

    #[test]
    fn test_settings_reads_input_last() {
        let config = Config::parse(
            r#"{ "grid_size": [2, 3], "max_steps": 7, "init": { "mode": "input" } }"#,
        )
        .unwrap();
        let settings = config.settings(|| Ok(vec![(0, 1), (2, 0)])).unwrap();
        assert_eq!(settings.seed, Seed::Coords(vec![(0, 1), (2, 0)]));
        assert_eq!(settings.generations, 7);
        assert_eq!(settings.update_mode, UpdateMode::All);
    }

    #[test]
    fn test_unsupported_modes() {
        let config = Config::parse(
            r#"{
                "grid_size": 3,
                "init": { "mode": "glider" },
                "update_mode": "lazy",
                "visualization": { "mode": "opengl" }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            config.update_mode(),
            Err(Error::UnsupportedMode { kind: "update", .. })
        ));
        assert!(matches!(
            config.visualization(),
            Err(Error::UnsupportedMode {
                kind: "visualization",
                ..
            })
        ));
        let err = config.init_mode().unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnsupportedMode {
                kind: "initialization",
                mode: "glider".into()
            })
        );
    }

    #[test]
    fn test_file_mode_needs_path() {
        let config = Config::parse(r#"{ "grid_size": 3, "init": { "mode": "file" } }"#).unwrap();
        assert!(config.init_mode().is_err());
    }
}
