//! Asset URL resolution: manifest overrides with deterministic fallbacks.
//!
//! A `BuildManifest` is allowed to be arbitrarily sparse; resolution always
//! produces a fully concrete [`RuntimeInstanceConfig`] so the web bridge
//! never deals with partially resolved values.

use crate::manifest::{BuildManifest, CodeUrl};

/// Used when neither the caller, the manifest, nor the base URL yields a name.
pub const DEFAULT_BUILD_NAME: &str = "WebGLBuild";

const DEFAULT_COMPANY_NAME: &str = "DefaultCompany";
const DEFAULT_PRODUCT_NAME: &str = "DefaultProduct";
const DEFAULT_PRODUCT_VERSION: &str = "1.0";

/// Fully resolved configuration handed to the runtime factory.
///
/// Unlike `BuildManifest`, every field holds a concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInstanceConfig {
    pub data_url: String,
    pub framework_url: String,
    /// Resolved code URLs in precedence order, never empty; the first entry
    /// is the primary executable passed to the factory.
    pub code_urls: Vec<String>,
    pub streaming_assets_url: String,
    pub company_name: String,
    pub product_name: String,
    pub product_version: String,
    pub arguments: Vec<String>,
}

impl RuntimeInstanceConfig {
    /// The primary executable URL.
    pub fn code_url(&self) -> &str {
        &self.code_urls[0]
    }
}

/// Join the base URL and the build folder, tolerating a trailing slash.
pub fn build_path(base_url: &str, build_folder: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), build_folder)
}

/// Where the runtime's bootstrap script lives for a detected build.
pub fn loader_script_url(build_path: &str, build_name: &str) -> String {
    format!("{build_path}/{build_name}.loader.js")
}

/// Detected build name: explicit > manifest-declared > last path segment of
/// the base URL > [`DEFAULT_BUILD_NAME`].
pub fn detect_build_name(
    base_url: &str,
    explicit: Option<&str>,
    manifest: Option<&BuildManifest>,
) -> String {
    if let Some(name) = explicit.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = manifest.and_then(|m| m.name.as_deref()).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    base_url
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_BUILD_NAME)
        .to_string()
}

/// A manifest value starting with a scheme or a root slash passes through
/// unchanged; anything else is joined under the build path.
fn resolve_url(value: &str, build_path: &str) -> String {
    if value.starts_with("http") || value.starts_with('/') {
        value.to_string()
    } else {
        format!("{build_path}/{value}")
    }
}

/// Code URL precedence: `codeFiles` list > `wasmCodeUrl` > `codeUrl` single >
/// `codeUrl` list > `{build_path}/{name}.wasm`. The result is never empty.
fn resolve_code_urls(
    manifest: Option<&BuildManifest>,
    build_path: &str,
    build_name: &str,
) -> Vec<String> {
    if let Some(m) = manifest {
        if let Some(files) = m.code_files.as_ref().filter(|f| !f.is_empty()) {
            return files.iter().map(|f| resolve_url(f, build_path)).collect();
        }
        if let Some(url) = m.wasm_code_url.as_deref() {
            return vec![resolve_url(url, build_path)];
        }
        match m.code_url.as_ref() {
            Some(CodeUrl::Single(url)) => return vec![resolve_url(url, build_path)],
            Some(CodeUrl::Multiple(urls)) if !urls.is_empty() => {
                return urls.iter().map(|u| resolve_url(u, build_path)).collect();
            }
            _ => {}
        }
    }
    vec![format!("{build_path}/{build_name}.wasm")]
}

/// Resolve a sparse manifest into a concrete config.
pub fn resolve_config(
    base_url: &str,
    build_folder: &str,
    explicit_name: Option<&str>,
    manifest: Option<&BuildManifest>,
) -> RuntimeInstanceConfig {
    let path = build_path(base_url, build_folder);
    let name = detect_build_name(base_url, explicit_name, manifest);

    let two_tier = |value: Option<&str>, default: String| match value {
        Some(v) => resolve_url(v, &path),
        None => default,
    };

    RuntimeInstanceConfig {
        data_url: two_tier(
            manifest.and_then(|m| m.data_url.as_deref()),
            format!("{path}/{name}.data"),
        ),
        framework_url: two_tier(
            manifest.and_then(|m| m.framework_url.as_deref()),
            format!("{path}/{name}.framework.js"),
        ),
        code_urls: resolve_code_urls(manifest, &path, &name),
        // Streaming assets live beside the build folder, not inside it.
        streaming_assets_url: two_tier(
            manifest.and_then(|m| m.streaming_assets_url.as_deref()),
            format!("{}/StreamingAssets", base_url.trim_end_matches('/')),
        ),
        company_name: manifest
            .and_then(|m| m.company_name.clone())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
        product_name: manifest
            .and_then(|m| m.product_name.clone())
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        product_version: manifest
            .and_then(|m| m.product_version.clone())
            .unwrap_or_else(|| DEFAULT_PRODUCT_VERSION.to_string()),
        arguments: manifest.and_then(|m| m.arguments.clone()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::BuildManifest;

    const BASE: &str = "/game/GODUCK";
    const FOLDER: &str = "Build";

    fn manifest(json: &str) -> BuildManifest {
        BuildManifest::from_json(json).unwrap()
    }

    #[test]
    fn test_detect_name_from_base_url() {
        assert_eq!(detect_build_name(BASE, None, None), "GODUCK");
        assert_eq!(detect_build_name("/game/GODUCK/", None, None), "GODUCK");
        assert_eq!(detect_build_name("", None, None), DEFAULT_BUILD_NAME);
    }

    #[test]
    fn test_detect_name_precedence() {
        let m = manifest(r#"{"name": "FromManifest"}"#);
        assert_eq!(detect_build_name(BASE, Some("Explicit"), Some(&m)), "Explicit");
        assert_eq!(detect_build_name(BASE, None, Some(&m)), "FromManifest");
        assert_eq!(detect_build_name(BASE, Some(""), Some(&m)), "FromManifest");
    }

    #[test]
    fn test_defaults_without_manifest() {
        let config = resolve_config(BASE, FOLDER, None, None);
        assert_eq!(config.data_url, "/game/GODUCK/Build/GODUCK.data");
        assert_eq!(config.framework_url, "/game/GODUCK/Build/GODUCK.framework.js");
        assert_eq!(config.code_urls, vec!["/game/GODUCK/Build/GODUCK.wasm"]);
        assert_eq!(config.streaming_assets_url, "/game/GODUCK/StreamingAssets");
        // Product metadata falls back to fixed placeholders, never to
        // values derived from the URL.
        assert_eq!(config.company_name, "DefaultCompany");
        assert_eq!(config.product_name, "DefaultProduct");
        assert_eq!(config.product_version, "1.0");
        assert!(config.arguments.is_empty());
    }

    #[test]
    fn test_relative_values_join_build_path() {
        let m = manifest(r#"{"wasmCodeUrl": "game.wasm"}"#);
        let config = resolve_config(BASE, FOLDER, None, Some(&m));
        assert_eq!(config.code_url(), "/game/GODUCK/Build/game.wasm");
    }

    #[test]
    fn test_absolute_values_pass_through() {
        let m = manifest(
            r#"{"wasmCodeUrl": "/cdn/game.wasm", "dataUrl": "https://cdn.example.com/game.data"}"#,
        );
        let config = resolve_config(BASE, FOLDER, None, Some(&m));
        assert_eq!(config.code_url(), "/cdn/game.wasm");
        assert_eq!(config.data_url, "https://cdn.example.com/game.data");
    }

    #[test]
    fn test_code_precedence_code_files_win() {
        let m = manifest(
            r#"{
                "codeFiles": ["part0.wasm", "/cdn/part1.wasm"],
                "wasmCodeUrl": "ignored.wasm",
                "codeUrl": "also-ignored.wasm"
            }"#,
        );
        let config = resolve_config(BASE, FOLDER, None, Some(&m));
        assert_eq!(
            config.code_urls,
            vec!["/game/GODUCK/Build/part0.wasm", "/cdn/part1.wasm"]
        );
    }

    #[test]
    fn test_code_precedence_wasm_code_url_beats_code_url() {
        let m = manifest(r#"{"wasmCodeUrl": "alt.wasm", "codeUrl": "generic.wasm"}"#);
        let config = resolve_config(BASE, FOLDER, None, Some(&m));
        assert_eq!(config.code_urls, vec!["/game/GODUCK/Build/alt.wasm"]);
    }

    #[test]
    fn test_code_precedence_code_url_single_and_list() {
        let single = manifest(r#"{"codeUrl": "generic.wasm"}"#);
        let config = resolve_config(BASE, FOLDER, None, Some(&single));
        assert_eq!(config.code_urls, vec!["/game/GODUCK/Build/generic.wasm"]);

        let list = manifest(r#"{"codeUrl": ["x.wasm", "y.wasm"]}"#);
        let config = resolve_config(BASE, FOLDER, None, Some(&list));
        assert_eq!(
            config.code_urls,
            vec!["/game/GODUCK/Build/x.wasm", "/game/GODUCK/Build/y.wasm"]
        );
    }

    #[test]
    fn test_empty_code_lists_fall_through() {
        let m = manifest(r#"{"codeFiles": [], "codeUrl": []}"#);
        let config = resolve_config(BASE, FOLDER, None, Some(&m));
        assert_eq!(config.code_urls, vec!["/game/GODUCK/Build/GODUCK.wasm"]);
    }

    #[test]
    fn test_loader_script_url() {
        let path = build_path(BASE, FOLDER);
        assert_eq!(
            loader_script_url(&path, "GODUCK"),
            "/game/GODUCK/Build/GODUCK.loader.js"
        );
    }

    #[test]
    fn test_explicit_name_drives_asset_defaults_only() {
        let config = resolve_config(BASE, FOLDER, Some("Custom"), None);
        assert_eq!(config.code_urls, vec!["/game/GODUCK/Build/Custom.wasm"]);
        assert_eq!(config.data_url, "/game/GODUCK/Build/Custom.data");
        assert_eq!(config.product_name, "DefaultProduct");
    }
}
