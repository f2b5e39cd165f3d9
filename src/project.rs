//! Loading an exported game into records ready for resolution.
//!
//! An export directory looks like this:
//!
//! ```text
//! export/
//! ├── data.json          categories, parent map, tags
//! ├── oWeapon.gml        one script per object
//! ├── oWPLaser.gml
//! ├── scrLocalization.gml
//! └── scrGlobalVars.gml
//! ```
//!
//! Every object named in the parent map gets a source record; objects without
//! a script file get an empty one.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{ExportConfig, script_path_in};
use crate::errors::LoadError;
use crate::globals::{GlobalTables, extract_constants, extract_labels, game_version};
use crate::hierarchy::ParentMap;
use crate::patch::{Patch, apply_patches};
use crate::record::RecordTable;
use crate::tokenizer::tokenize;

/// Contents of the exporter's `data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Object id -> parent id; `null` and the no-parent marker both end a chain
    #[serde(default)]
    pub obj_parent_map: HashMap<String, Option<String>>,
    #[serde(default)]
    pub obj_cat_data: Vec<Category>,
    #[serde(default)]
    pub obj_tags_map: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub obj_names: Vec<String>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn parent_map(&self, terminators: &[String]) -> ParentMap {
        let mut parents = ParentMap::with_terminators(terminators.iter().cloned());
        for (object_id, parent) in &self.obj_parent_map {
            parents.insert(object_id.clone(), parent.clone().unwrap_or_default());
        }
        parents
    }
}

/// Somewhere script text can be fetched from by object id.
pub trait ScriptSource {
    /// `Ok(None)` when the object simply has no script.
    fn script(&self, object_id: &str) -> Result<Option<String>, LoadError>;
}

impl ScriptSource for HashMap<String, String> {
    fn script(&self, object_id: &str) -> Result<Option<String>, LoadError> {
        Ok(self.get(object_id).cloned())
    }
}

/// Script files laid out flat in one directory.
#[derive(Debug, Clone)]
pub struct ExportDir {
    pub root: PathBuf,
    pub extension: String,
}

impl ExportDir {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }
}

impl ScriptSource for ExportDir {
    fn script(&self, object_id: &str) -> Result<Option<String>, LoadError> {
        let path = script_path_in(&self.root, object_id, &self.extension);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadError::io(path, e)),
        }
    }
}

/// Tokenize the script of every object in `object_ids`.
pub fn build_records<'a, I, S>(object_ids: I, source: &S) -> Result<RecordTable, LoadError>
where
    I: IntoIterator<Item = &'a str>,
    S: ScriptSource + ?Sized,
{
    let mut records = RecordTable::new();
    let mut missing = 0usize;

    for object_id in object_ids {
        let record = match source.script(object_id)? {
            Some(text) => tokenize(&text),
            None => {
                missing += 1;
                Default::default()
            },
        };
        records.insert(object_id, record);
    }

    debug!(
        records = records.len(),
        without_script = missing,
        "built source records"
    );
    Ok(records)
}

/// Read the global tables from their well-known scripts, when present.
pub fn load_globals<S>(source: &S, config: &ExportConfig) -> Result<GlobalTables, LoadError>
where
    S: ScriptSource + ?Sized,
{
    let mut globals = GlobalTables::new();
    if let Some(text) = source.script(&config.labels_script)? {
        globals.labels = extract_labels(&text, &config.label_function);
    }
    if let Some(text) = source.script(&config.globals_script)? {
        globals.constants = extract_constants(&text, &config.global_prefix);
    }
    Ok(globals)
}

/// Everything mined from one export.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest: Manifest,
    pub parents: ParentMap,
    pub records: RecordTable,
    pub globals: GlobalTables,
    pub game_version: Option<String>,
}

impl Project {
    /// Load an export directory described by `config`.
    pub fn load(config: &ExportConfig) -> Result<Self, LoadError> {
        if !config.export_dir.is_dir() {
            return Err(LoadError::MissingExportDir(config.export_dir.clone()));
        }

        let manifest_path = config.manifest_path();
        let json =
            fs::read_to_string(&manifest_path).map_err(|e| LoadError::io(&manifest_path, e))?;
        let manifest = Manifest::from_json(&json).map_err(|source| LoadError::Manifest {
            path: manifest_path.clone(),
            source,
        })?;

        let source = ExportDir::new(&config.export_dir, &config.script_extension);
        let project = Self::from_parts(manifest, &source, config)?;

        info!(
            export = %config.export_dir.display(),
            objects = project.records.len(),
            labels = project.globals.labels.len(),
            version = project.game_version.as_deref().unwrap_or("unknown"),
            "loaded export"
        );
        Ok(project)
    }

    /// Build from an already parsed manifest and any script source.
    pub fn from_parts<S>(
        manifest: Manifest,
        source: &S,
        config: &ExportConfig,
    ) -> Result<Self, LoadError>
    where
        S: ScriptSource + ?Sized,
    {
        let parents = manifest.parent_map(&config.terminators);
        let records = build_records(manifest.obj_parent_map.keys().map(String::as_str), source)?;
        let globals = load_globals(source, config)?;
        let game_version = source
            .script(&config.globals_script)?
            .and_then(|text| game_version(&text));

        Ok(Self {
            manifest,
            parents,
            records,
            globals,
            game_version,
        })
    }

    pub fn hierarchy(&self, object_id: &str) -> Vec<String> {
        self.parents.hierarchy(object_id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.manifest.obj_cat_data.iter().find(|c| c.name == name)
    }

    pub fn tags(&self, object_id: &str) -> &[String] {
        self.manifest
            .obj_tags_map
            .get(object_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_tag(&self, object_id: &str, tag: &str) -> bool {
        self.tags(object_id).iter().any(|t| t == tag)
    }

    /// Run the patch layer against this project's records and globals.
    pub fn apply_patches(&mut self, patches: &[Patch]) -> usize {
        apply_patches(&mut self.records, patches, &self.globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "objCatData": [{ "name": "Armaments", "objNames": ["oWPLaser"] }],
        "objParentMap": {
            "oWPLaser": "oWeapon",
            "oWeapon": "oSaveObject",
            "oSaveObject": "__NONE__",
            "oOrphan": null
        },
        "objTagsMap": { "oWPLaser": ["buyableWeapon"] }
    }"#;

    fn scripts() -> HashMap<String, String> {
        HashMap::from([
            ("oWPLaser".to_string(), "name = \"Laser\"\n".to_string()),
            ("oWeapon".to_string(), "buyPrice = 20\n".to_string()),
            (
                "scrGlobalVars".to_string(),
                "global.manualVersionNumber = \"0.9\";\nglobal.lifespan = 4;\n".to_string(),
            ),
        ])
    }

    #[test]
    fn test_manifest_parses() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.obj_parent_map.len(), 4);
        assert_eq!(manifest.obj_parent_map["oOrphan"], None);
        assert_eq!(manifest.obj_cat_data[0].obj_names, vec!["oWPLaser"]);
    }

    #[test]
    fn test_from_parts() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        let config = ExportConfig::new("unused");
        let project = Project::from_parts(manifest, &scripts(), &config).unwrap();

        assert_eq!(project.hierarchy("oWPLaser"), vec!["oWPLaser", "oWeapon"]);
        assert_eq!(project.hierarchy("oOrphan"), vec!["oOrphan"]);
        assert_eq!(project.records.len(), 4);
        assert!(project.records.get("oOrphan").is_some_and(|r| r.is_empty()));
        assert_eq!(project.game_version.as_deref(), Some("0.9"));
        assert_eq!(project.globals.constant("lifespan"), Some("4"));
        assert!(project.has_tag("oWPLaser", "buyableWeapon"));
        assert!(project.tags("oWeapon").is_empty());
        assert!(project.category("Armaments").is_some());
    }
}
