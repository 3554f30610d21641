use std::fs;
use std::path::{Path, PathBuf};

/// One testable cache: the payload file handed to the extractor, plus the
/// architecture and cache-entry names it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheArtifact {
    pub arch: String,
    pub name: String,
    pub path: PathBuf,
}

impl CacheArtifact {
    pub fn label(&self) -> String {
        format!("{}_{}", self.arch, self.name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("read corpus dir {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cache {cache} needs exactly one extensionless payload entry, found {found}")]
    PayloadSelection { cache: PathBuf, found: usize },
}

/// Keyword exclusion set. A cache is skipped when any keyword occurs in the
/// string form of its payload path. An empty set excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    keywords: Vec<String>,
}

impl FilterSet {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn excludes(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }
}

/// Lazy walk over the two-level corpus tree (architecture, then cache entry).
/// Yields each qualifying, non-filtered cache exactly once, in directory
/// listing order. Not restartable.
pub fn walk_corpus(root: &Path, filters: FilterSet) -> Result<CorpusWalk, CorpusError> {
    let arch_dirs = fs::read_dir(root).map_err(|source| CorpusError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(CorpusWalk {
        root: root.to_path_buf(),
        arch_dirs,
        current: None,
        filters,
    })
}

pub struct CorpusWalk {
    root: PathBuf,
    arch_dirs: fs::ReadDir,
    current: Option<ArchDir>,
    filters: FilterSet,
}

struct ArchDir {
    name: String,
    entries: fs::ReadDir,
}

impl Iterator for CorpusWalk {
    type Item = Result<CacheArtifact, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(arch) = &mut self.current {
                match arch.entries.next() {
                    Some(Ok(entry)) => {
                        let artifact = match resolve_cache_entry(&arch.name, &entry.path()) {
                            Ok(artifact) => artifact,
                            Err(err) => return Some(Err(err)),
                        };
                        if self.filters.excludes(&artifact.path) {
                            continue;
                        }
                        return Some(Ok(artifact));
                    }
                    Some(Err(source)) => {
                        return Some(Err(CorpusError::Io {
                            path: self.root.clone(),
                            source,
                        }))
                    }
                    None => {
                        self.current = None;
                        continue;
                    }
                }
            }

            match self.arch_dirs.next()? {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().into_owned();
                    match fs::read_dir(&path) {
                        Ok(entries) => self.current = Some(ArchDir { name, entries }),
                        Err(source) => return Some(Err(CorpusError::Io { path, source })),
                    }
                }
                Err(source) => {
                    return Some(Err(CorpusError::Io {
                        path: self.root.clone(),
                        source,
                    }))
                }
            }
        }
    }
}

fn resolve_cache_entry(arch: &str, cache_path: &Path) -> Result<CacheArtifact, CorpusError> {
    let name = cache_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let path = if cache_path.is_dir() {
        select_payload(cache_path)?
    } else {
        cache_path.to_path_buf()
    };
    Ok(CacheArtifact {
        arch: arch.to_string(),
        name,
        path,
    })
}

// A directory-shaped cache entry holds the actual payload as its single
// extensionless file; any other count is a corpus defect.
fn select_payload(cache_path: &Path) -> Result<PathBuf, CorpusError> {
    let entries = fs::read_dir(cache_path).map_err(|source| CorpusError::Io {
        path: cache_path.to_path_buf(),
        source,
    })?;
    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CorpusError::Io {
            path: cache_path.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_none() {
            candidates.push(path);
        }
    }
    if candidates.len() != 1 {
        return Err(CorpusError::PayloadSelection {
            cache: cache_path.to_path_buf(),
            found: candidates.len(),
        });
    }
    Ok(candidates.remove(0))
}
