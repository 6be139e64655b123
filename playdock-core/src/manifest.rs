use serde::{Deserialize, Serialize};

/// Optional JSON descriptor (`Build.json`) overriding default asset locations
/// for a build, plus product metadata and launch arguments.
///
/// Every field is optional; anything missing falls back to a deterministic
/// default computed from the base URL and the detected build name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    /// Build name declared by the exporter; overrides the name detected
    /// from the base URL.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data_url: Option<String>,
    #[serde(default)]
    pub framework_url: Option<String>,
    /// Multi-file code list. Wins over every single-URL code field.
    #[serde(default)]
    pub code_files: Option<Vec<String>>,
    /// Single alternate code URL; beats `codeUrl`.
    #[serde(default)]
    pub wasm_code_url: Option<String>,
    /// Generic code URL: either one filename or a list.
    #[serde(default)]
    pub code_url: Option<CodeUrl>,
    #[serde(default)]
    pub streaming_assets_url: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_version: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

/// `codeUrl` accepts both a single filename and a list of filenames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeUrl {
    Single(String),
    Multiple(Vec<String>),
}

impl BuildManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_manifest() {
        let manifest = BuildManifest::from_json("{}").unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.data_url.is_none());
        assert!(manifest.code_files.is_none());
        assert!(manifest.arguments.is_none());
    }

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "name": "GODUCK",
            "dataUrl": "game.data",
            "frameworkUrl": "game.framework.js",
            "wasmCodeUrl": "game.wasm",
            "streamingAssetsUrl": "/cdn/StreamingAssets",
            "companyName": "Duck Labs",
            "productName": "Go Duck",
            "productVersion": "2.3",
            "arguments": ["--lang", "zh"]
        }"#;
        let manifest = BuildManifest::from_json(json).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("GODUCK"));
        assert_eq!(manifest.wasm_code_url.as_deref(), Some("game.wasm"));
        assert_eq!(manifest.arguments.unwrap(), vec!["--lang", "zh"]);
    }

    #[test]
    fn code_url_accepts_string_or_list() {
        let single = BuildManifest::from_json(r#"{"codeUrl": "a.wasm"}"#).unwrap();
        assert!(matches!(single.code_url, Some(CodeUrl::Single(ref s)) if s == "a.wasm"));

        let multi = BuildManifest::from_json(r#"{"codeUrl": ["a.wasm", "b.wasm"]}"#).unwrap();
        assert!(matches!(multi.code_url, Some(CodeUrl::Multiple(ref v)) if v.len() == 2));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let manifest = BuildManifest::from_json(r#"{"graphicsApi": "webgl2"}"#).unwrap();
        assert!(manifest.code_url.is_none());
    }
}
