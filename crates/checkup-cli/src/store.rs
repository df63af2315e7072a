// crates/checkup-cli/src/store.rs
// ============================================================================
// Module: Checks Package Store
// Description: On-disk package cache, slug resolution, and working-area setup.
// Purpose: Map slugs onto cached check directories and stage submission files.
// Dependencies: checkup-core, checkup-client, globset, tempfile, tracing, walkdir.
// ============================================================================

//! ## Overview
//! Downloaded checks packages live in a per-user cache keyed by slug.
//! [`PackageStore::resolve`] turns a slug into a usable package directory,
//! downloading when a client is supplied and otherwise requiring a cached
//! copy; unknown slugs produce a suggestion list built from cached slugs by
//! edit distance. The store also stages the working area: the student's files
//! are filtered through the package's glob patterns and copied into a
//! temporary directory so checks never touch the originals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use checkup_client::FetchError;
use checkup_client::RemoteClient;
use checkup_core::CONFIG_FILE;
use checkup_core::Failure;
use globset::Glob;
use globset::GlobSetBuilder;
use tempfile::TempDir;
use tracing::warn;
use walkdir::WalkDir;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the package cache root.
pub const CACHE_ENV: &str = "CHECKUP_PATH";
/// Cache location relative to the home directory.
const DEFAULT_CACHE_SUFFIX: &str = ".local/share/checkup";
/// Name of the stored credentials file cleared by logout.
const CREDENTIALS_FILE: &str = ".credentials";
/// Maximum number of slug suggestions offered for an unknown slug.
const MAX_SUGGESTIONS: usize = 3;

// ============================================================================
// SECTION: Types
// ============================================================================

/// On-disk cache of downloaded checks packages.
///
/// # Invariants
/// - Every cached package directory contains the package config file.
pub struct PackageStore {
    /// Cache root directory.
    root: PathBuf,
}

impl PackageStore {
    /// Creates a store rooted at an explicit directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Creates a store rooted at `CHECKUP_PATH` or the per-user default.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Unexpected`] when no cache location can be derived.
    pub fn from_env() -> Result<Self, Failure> {
        if let Some(root) = std::env::var_os(CACHE_ENV) {
            return Ok(Self::new(PathBuf::from(root)));
        }
        let Some(home) = std::env::var_os("HOME") else {
            return Err(Failure::Unexpected {
                message: format!("could not determine the checks cache directory; set {CACHE_ENV}"),
                source: None,
            });
        };
        Ok(Self::new(PathBuf::from(home).join(DEFAULT_CACHE_SUFFIX)))
    }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cache directory for `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::InvalidTarget`] when the slug would escape the
    /// cache root.
    pub fn package_dir(&self, slug: &str) -> Result<PathBuf, Failure> {
        let relative = Path::new(slug);
        let safe = !slug.is_empty()
            && relative.components().all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(Failure::InvalidTarget {
                message: t!("slug.not_found", slug = slug),
                suggestions: Vec::new(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Returns the stored credentials file path.
    #[must_use]
    pub fn credentials_file(&self) -> PathBuf {
        self.root.join(CREDENTIALS_FILE)
    }

    /// Removes any stored credentials.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors from the removal.
    pub fn clear_credentials(&self) -> Result<(), Failure> {
        let path = self.credentials_file();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Lists every cached slug, sorted.
    #[must_use]
    pub fn local_slugs(&self) -> Vec<String> {
        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_dir() || !entry.path().join(CONFIG_FILE).is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let slug = relative
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => part.to_str(),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/");
                slugs.push(slug);
            }
        }
        slugs.sort();
        slugs
    }

    /// Returns cached slugs similar to `slug`, best match first.
    #[must_use]
    pub fn similar_slugs(&self, slug: &str) -> Vec<String> {
        let cutoff = (slug.len() / 5).max(2);
        let mut scored: Vec<(usize, String)> = self
            .local_slugs()
            .into_iter()
            .map(|candidate| (edit_distance(slug, &candidate), candidate))
            .filter(|(distance, _)| *distance <= cutoff)
            .collect();
        scored.sort();
        scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, candidate)| candidate).collect()
    }

    /// Resolves `slug` to a usable package directory.
    ///
    /// With a client, the package is (re)downloaded into the cache, falling
    /// back to a cached copy when the service is unreachable. Without one,
    /// only the cache is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::InvalidTarget`] for unknown slugs (with cached-slug
    /// suggestions), [`Failure::Network`] when the service is unreachable and
    /// nothing is cached, and [`Failure::RemoteService`] for malformed
    /// package archives.
    pub async fn resolve(
        &self,
        client: Option<&RemoteClient>,
        slug: &str,
    ) -> Result<PathBuf, Failure> {
        let dir = self.package_dir(slug)?;
        let cached = dir.join(CONFIG_FILE).is_file();
        let Some(client) = client else {
            if cached {
                return Ok(dir);
            }
            return Err(self.invalid_slug(slug, true));
        };

        match client.fetch_package(slug, &dir).await {
            Ok(()) => Ok(dir),
            Err(FetchError::NotFound {
                ..
            }) => Err(self.invalid_slug(slug, false)),
            Err(FetchError::Unreachable(reason)) => {
                if cached {
                    warn!(%reason, "distribution service unreachable, using cached checks");
                    return Ok(dir);
                }
                Err(Failure::Network {
                    message: t!("network.unreachable"),
                })
            }
            Err(FetchError::Protocol(reason)) => Err(Failure::RemoteService {
                message: reason,
                payload: None,
            }),
        }
    }

    /// Builds the unknown-slug failure with suggestions from the cache.
    fn invalid_slug(&self, slug: &str, offline: bool) -> Failure {
        let suggestions = self.similar_slugs(slug);
        let mut message = t!("slug.not_found", slug = slug);
        if !suggestions.is_empty() {
            message.push('\n');
            message.push_str(&t!("slug.did_you_mean"));
            for suggestion in &suggestions {
                message.push_str("\n    ");
                message.push_str(suggestion);
            }
            message.push('\n');
            message.push_str(&t!("slug.refer"));
        }
        if offline {
            message.push('\n');
            message.push_str(&t!("slug.offline_hint"));
        }
        Failure::InvalidTarget {
            message,
            suggestions,
        }
    }
}

// ============================================================================
// SECTION: Working Area
// ============================================================================

/// Lists the files under `base` selected by the package's glob patterns,
/// as sorted paths relative to `base`. No patterns selects everything.
///
/// # Errors
///
/// Returns [`Failure::InvalidTarget`] for malformed glob patterns.
pub fn included_files(base: &Path, patterns: Option<&[String]>) -> Result<Vec<PathBuf>, Failure> {
    let matcher = match patterns {
        Some(patterns) => {
            let mut builder = GlobSetBuilder::new();
            for pattern in patterns {
                let glob = Glob::new(pattern).map_err(|err| Failure::InvalidTarget {
                    message: format!("invalid file pattern {pattern}: {err}"),
                    suggestions: Vec::new(),
                })?;
                builder.add(glob);
            }
            Some(builder.build().map_err(|err| Failure::InvalidTarget {
                message: format!("invalid file patterns: {err}"),
                suggestions: Vec::new(),
            })?)
        }
        None => None,
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(base).min_depth(1).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(base) else {
            continue;
        };
        let selected = matcher.as_ref().is_none_or(|set| set.is_match(relative));
        if selected {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Copies the selected files into a fresh temporary working area,
/// preserving relative paths.
///
/// The returned guard removes the area when dropped.
///
/// # Errors
///
/// Propagates filesystem errors from staging.
pub fn working_area(base: &Path, files: &[PathBuf]) -> Result<TempDir, Failure> {
    let area = tempfile::Builder::new().prefix("checkup_").tempdir()?;
    for relative in files {
        let target = area.path().join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(base.join(relative), &target)?;
    }
    Ok(area)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classic two-row Levenshtein distance over bytes.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a: &[u8] = a.as_bytes();
    let b: &[u8] = b.as_bytes();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, &byte_a) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &byte_b) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(byte_a != byte_b);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
