use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::cli;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HeaderSettingsFile {
    pub name: String,
    pub version: u32,
}

/// A filesystem to report usage for. The `main` and `usb` labels map onto the
/// corresponding snapshot fields.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MountPointSettings {
    pub label: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SettingsStruct {
    pub header: HeaderSettingsFile,
    /// Directory holding the persisted previous-sample files.
    pub samples_dir: PathBuf,
    pub mount_points: Vec<MountPointSettings>,
    /// Interfaces hidden from the `/interfaces` listing.
    pub excluded_interfaces: Vec<String>,
    pub process_list_size: usize,
}

impl Default for SettingsStruct {
    fn default() -> Self {
        SettingsStruct {
            header: HeaderSettingsFile {
                name: "System Status Manager".to_string(),
                version: 0,
            },
            samples_dir: std::env::temp_dir().join("system-status-manager"),
            mount_points: vec![
                MountPointSettings {
                    label: "main".to_string(),
                    path: "/".into(),
                },
                MountPointSettings {
                    label: "usb".to_string(),
                    path: "/mnt/usb".into(),
                },
            ],
            excluded_interfaces: vec!["lo".to_string(), "wlan0".to_string()],
            process_list_size: 10,
        }
    }
}

#[derive(Debug)]
struct ManagerStruct {
    pub file_name: String,
    pub config: SettingsStruct,
}

#[derive(Default)]
struct Manager {
    pub content: Option<ManagerStruct>,
}

lazy_static! {
    static ref MANAGER: Arc<Mutex<Manager>> = Default::default();
}

impl Manager {
    fn new(file_name: &str) -> ManagerStruct {
        let file_name = if !Path::new(file_name).is_absolute() {
            match ProjectDirs::from("org", "system-status", env!("CARGO_PKG_NAME")) {
                Some(project) => {
                    let folder_path = Path::new(project.config_dir());
                    if let Err(error) = std::fs::create_dir_all(folder_path) {
                        error!("Failed to create settings folder {folder_path:?}: {error:#?}");
                    }
                    folder_path
                        .join(file_name)
                        .to_str()
                        .expect("Failed to create settings path.")
                        .to_string()
                }
                None => panic!("Failed to find user settings path."),
            }
        } else {
            file_name.into()
        };

        debug!("Using settings file: {file_name}");

        let settings = ManagerStruct {
            file_name: file_name.clone(),
            config: load_settings_from_file(&file_name),
        };

        save_settings_to_file(&settings.file_name, &settings.config).unwrap_or_else(|error| {
            error!("Failed to save settings file: {error:#?}");
        });

        settings
    }
}

// Init settings manager with the desired settings file,
// will be created with defaults if it does not exist
pub fn init(file_name: Option<&str>) {
    let mut manager = MANAGER.lock().unwrap();
    let file_name = file_name.unwrap_or("settings.json");
    manager.content = Some(Manager::new(file_name));
}

fn load_settings_from_file(file_name: &str) -> SettingsStruct {
    let result = std::fs::read_to_string(file_name);

    if result.is_err() || cli::manager::is_reset() {
        return SettingsStruct::default();
    };

    serde_json::from_str(&result.unwrap()).unwrap_or_else(|_error| SettingsStruct::default())
}

fn save_settings_to_file(file_name: &str, content: &SettingsStruct) -> std::io::Result<()> {
    let value = serde_json::to_string_pretty(content).map_err(std::io::Error::other)?;
    std::fs::write(file_name, value)
}

#[allow(dead_code)]
pub fn header() -> HeaderSettingsFile {
    let manager = MANAGER.lock().unwrap();
    manager.content.as_ref().unwrap().config.header.clone()
}

pub fn samples_dir() -> PathBuf {
    let manager = MANAGER.lock().unwrap();
    manager.content.as_ref().unwrap().config.samples_dir.clone()
}

pub fn mount_points() -> Vec<MountPointSettings> {
    let manager = MANAGER.lock().unwrap();
    manager.content.as_ref().unwrap().config.mount_points.clone()
}

pub fn excluded_interfaces() -> Vec<String> {
    let manager = MANAGER.lock().unwrap();
    manager
        .content
        .as_ref()
        .unwrap()
        .config
        .excluded_interfaces
        .clone()
}

pub fn process_list_size() -> usize {
    let manager = MANAGER.lock().unwrap();
    manager.content.as_ref().unwrap().config.process_list_size
}
