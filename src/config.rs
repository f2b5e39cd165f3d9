use std::path::{Path, PathBuf};

use crate::globals::{GLOBAL_PREFIX, LABEL_FUNCTION};
use crate::hierarchy::{NO_PARENT, UNIVERSAL_ROOT};

/// Where an export lives and which of its scripts carry global tables.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory holding the manifest and one script file per object
    pub export_dir: PathBuf,
    /// Manifest file name inside `export_dir`
    pub manifest_file: String,
    /// Script file extension, without the dot
    pub script_extension: String,
    /// Script registering localised labels
    pub labels_script: String,
    /// Call used in `labels_script` to register one label
    pub label_function: String,
    /// Script assigning global variables
    pub globals_script: String,
    /// Prefix of global variable assignments in `globals_script`
    pub global_prefix: String,
    /// Parent ids that end an inheritance chain
    pub terminators: Vec<String>,
}

impl ExportConfig {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            manifest_file: "data.json".to_string(),
            script_extension: "gml".to_string(),
            labels_script: "scrLocalization".to_string(),
            label_function: LABEL_FUNCTION.to_string(),
            globals_script: "scrGlobalVars".to_string(),
            global_prefix: GLOBAL_PREFIX.to_string(),
            terminators: vec![NO_PARENT.to_string(), UNIVERSAL_ROOT.to_string()],
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.export_dir.join(&self.manifest_file)
    }

    /// `<export_dir>/<script_name>.<ext>`
    pub fn script_path(&self, script_name: &str) -> PathBuf {
        script_path_in(&self.export_dir, script_name, &self.script_extension)
    }
}

pub(crate) fn script_path_in(dir: &Path, script_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{script_name}.{extension}"))
}
