// crates/checkup-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localization support.
// Dependencies: Standard library collections and synchronization primitives.
// ============================================================================

//! ## Overview
//! The checkup CLI stores user-facing strings in a small translation catalog
//! to enforce consistent messaging. All runtime output should be routed
//! through the [`t!`](crate::t) macro. Checks packages may ship their own
//! catalog entries (check descriptions, failure hints); those are installed
//! at run time through [`add_translations`] and consulted after the built-in
//! catalogs.
//!
//! ## Invariants
//! - Built-in catalogs are initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::RwLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// Environment variable selecting the CLI locale.
pub const LANG_ENV: &str = "CHECKUP_LANG";

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "checkup {version}"),
    ("logout.ok", "logged out successfully"),
    ("logout.failed", "failed to logout"),
    ("slug.not_found", "Could not find checks for {slug}."),
    ("slug.did_you_mean", "Did you mean:"),
    ("slug.refer", "Do refer back to the problem specification if unsure."),
    (
        "slug.offline_hint",
        "No cached copy of the checks exists. Run once without --offline to download them.",
    ),
    (
        "network.unreachable",
        "Could not connect to the distribution service. Check your internet connection, or run \
         with --local --offline to use cached checks.",
    ),
    ("dev.not_a_directory", "{path} is not a directory"),
    (
        "error.generic",
        "Sorry, something's wrong! checkup ran into an error, please contact \
         sysadmins@checkup.dev!",
    ),
    ("error.not_found", "{path} not found"),
    ("results.detailed", "To see more detailed results go to {url}"),
    ("progress.connecting", "Connecting"),
    ("progress.uploading", "Uploading"),
    ("progress.waiting", "Waiting for results"),
    ("progress.preparing", "Preparing"),
    ("progress.checking", "Running checks"),
    ("progress.installing", "Installing dependencies"),
    ("compile.overwrite", "{path} already exists. Overwrite? [y/N]"),
    ("ansi.log_header", "Log"),
    ("ansi.skipped", "check skipped"),
    ("ansi.score", "{passed} of {ran} checks passed"),
    ("engine.signal", "terminated by a signal"),
    ("engine.exit_mismatch", "expected exit code {expected}, got {actual}"),
    ("engine.unknown_target", "check {name} does not exist"),
    ("installer.launch_failed", "could not launch the dependency installer: {error}"),
    ("installer.failed", "failed to install dependencies"),
];

/// Static Spanish catalog entries loaded into the localized message bundle.
const CATALOG_ES: &[(&str, &str)] = &[
    ("main.version", "checkup {version}"),
    ("logout.ok", "sesión cerrada correctamente"),
    ("logout.failed", "no se pudo cerrar la sesión"),
    ("slug.not_found", "No se encontraron comprobaciones para {slug}."),
    ("slug.did_you_mean", "¿Quisiste decir:"),
    ("slug.refer", "Consulta la especificación del problema si tienes dudas."),
    (
        "slug.offline_hint",
        "No existe una copia local de las comprobaciones. Ejecuta una vez sin --offline para \
         descargarlas.",
    ),
    (
        "network.unreachable",
        "No se pudo conectar con el servicio de distribución. Comprueba tu conexión a internet, \
         o ejecuta con --local --offline para usar las comprobaciones en caché.",
    ),
    ("dev.not_a_directory", "{path} no es un directorio"),
    (
        "error.generic",
        "¡Vaya, algo va mal! checkup encontró un error, por favor contacta con \
         sysadmins@checkup.dev!",
    ),
    ("error.not_found", "no se encontró {path}"),
    ("results.detailed", "Para ver resultados más detallados visita {url}"),
    ("progress.connecting", "Conectando"),
    ("progress.uploading", "Subiendo"),
    ("progress.waiting", "Esperando resultados"),
    ("progress.preparing", "Preparando"),
    ("progress.checking", "Ejecutando comprobaciones"),
    ("progress.installing", "Instalando dependencias"),
    ("compile.overwrite", "{path} ya existe. ¿Sobrescribir? [y/N]"),
    ("ansi.log_header", "Registro"),
    ("ansi.skipped", "comprobación omitida"),
    ("ansi.score", "{passed} de {ran} comprobaciones superadas"),
    ("engine.signal", "terminado por una señal"),
    ("engine.exit_mismatch", "se esperaba el código de salida {expected}, se obtuvo {actual}"),
    ("engine.unknown_target", "la comprobación {name} no existe"),
    (
        "installer.launch_failed",
        "no se pudo lanzar el instalador de dependencias: {error}",
    ),
    ("installer.failed", "no se pudieron instalar las dependencias"),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_ES_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Es => CATALOG_ES_MAP.get_or_init(|| CATALOG_ES.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Package Catalog
// ============================================================================

/// Runtime catalog populated from a checks package's translation file.
static PACKAGE_CATALOG: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn package_catalog() -> &'static RwLock<HashMap<String, String>> {
    PACKAGE_CATALOG.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Installs catalog entries shipped by a checks package.
///
/// Package entries never shadow built-in entries; they are consulted only
/// when the built-in catalog for the current locale lacks the key.
pub fn add_translations(entries: impl IntoIterator<Item = (String, String)>) {
    if let Ok(mut catalog) = package_catalog().write() {
        catalog.extend(entries);
    }
}

fn package_lookup(key: &str) -> Option<String> {
    package_catalog().read().ok().and_then(|catalog| catalog.get(key).cloned())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .map(str::to_string)
        .or_else(|| package_lookup(key))
        .or_else(|| catalog_for(Locale::En).get(key).copied().map(str::to_string))
        .unwrap_or_else(|| key.to_string());
    if args.is_empty() {
        return template;
    }

    let mut result = template;
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
