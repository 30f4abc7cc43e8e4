#![deny(missing_docs)]

//! # Directory Combiner
//!
//! Walks a directory of OpenAPI YAML fragments, bundles every file through
//! the reference bundler and merges the results into a single document.
//! The nominated main document always merges last, so its values win on
//! conflict regardless of traversal order.

use crate::bundler::bundle;
use crate::error::CombineResult;
use crate::merge::merge_all;
use serde_yaml::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Options for a directory combine run.
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Directory containing the OpenAPI YAML fragments.
    pub openapi_dir: PathBuf,
    /// The main document, merged last so its values win.
    pub main_file: PathBuf,
    /// Output path for the combined document.
    pub output: PathBuf,
    /// Keep the top-level `components` key in the merged result.
    pub keep_components: bool,
}

/// Bundles gathered during the walk. The main document is held aside so
/// it can be appended after every other fragment once traversal finishes.
#[derive(Default)]
struct GatheredBundles {
    main: Option<Value>,
    others: Vec<Value>,
}

impl GatheredBundles {
    fn into_merge_list(self) -> Vec<Value> {
        let mut list = self.others;
        list.extend(self.main);
        list
    }
}

/// Runs the combine pipeline: walk, bundle, merge, strip, write.
///
/// Fail-fast: the first traversal, parse or reference error aborts the
/// run and no output is written. The single output write is the
/// pipeline's only side effect beyond filesystem reads.
pub fn combine(options: &CombineOptions) -> CombineResult<()> {
    let gathered = gather(options)?;
    let mut merged = merge_all(gathered.into_merge_list());

    if !options.keep_components {
        if let Value::Mapping(map) = &mut merged {
            map.remove("components");
        }
    }

    let text = serde_yaml::to_string(&merged)?;
    fs::write(&options.output, text)?;
    Ok(())
}

/// Walks `openapi_dir` and bundles every YAML fragment.
///
/// A file whose basename matches the main file's basename takes the main
/// slot; only other `.yaml` files land in the general list, so the main
/// document is never bundled twice.
fn gather(options: &CombineOptions) -> CombineResult<GatheredBundles> {
    let main_name = options.main_file.file_name();
    let main_path = absolutize(&options.main_file)?;
    let mut gathered = GatheredBundles::default();

    for entry in WalkDir::new(&options.openapi_dir).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        if entry.path().file_name() == main_name {
            if gathered.main.is_none() {
                gathered.main = Some(bundle(&main_path, &options.openapi_dir)?);
            }
        } else if entry.path().extension() == Some(OsStr::new("yaml")) {
            // walkdir yields paths already prefixed with openapi_dir, so
            // anchor them to the working directory before bundling
            let path = absolutize(entry.path())?;
            gathered.others.push(bundle(&path, &options.openapi_dir)?);
        }
    }

    Ok(gathered)
}

fn absolutize(path: &std::path::Path) -> CombineResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
