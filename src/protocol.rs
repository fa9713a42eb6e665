//! Messages exchanged between the host and a webview page.
//!
//! Both directions are closed unions tagged by a `"type"` field. The host
//! side is [`ExtensionMessage`], the page side [`PageMessage`].

use serde::{Deserialize, Serialize};

use crate::git::{Commit, Snapshot};

/// Correlates a `get_commit` request with its `commit` or `error` reply.
pub type RequestId = u64;

/// Host color theme kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorThemeKind {
    /// Dark theme.
    #[default]
    Dark,
    /// Light theme.
    Light,
    /// High contrast dark theme.
    HighContrast,
    /// High contrast light theme.
    HighContrastLight,
}

impl ColorThemeKind {
    /// Name of the stylesheet theme the page renders with.
    #[must_use]
    pub fn page_theme(self) -> &'static str {
        match self {
            Self::Dark | Self::HighContrast => "dark",
            Self::Light | Self::HighContrastLight => "white",
        }
    }
}

impl std::str::FromStr for ColorThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "high_contrast" => Ok(Self::HighContrast),
            "high_contrast_light" => Ok(Self::HighContrastLight),
            other => Err(format!(
                "unknown color theme {other:?} \
                 (expected dark, light, high_contrast or high_contrast_light)"
            )),
        }
    }
}

/// Render-time configuration handed to the page script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewConfig {
    /// `dark` or `white`.
    pub theme: String,
    /// Display language tag, e.g. `en`.
    pub language: String,
    /// Base URI of the localization bundles.
    pub l10n_uri: String,
}

/// Host to page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtensionMessage {
    /// Render configuration. Embedded into the document, never posted.
    Config {
        /// The configuration.
        data: WebviewConfig,
    },
    /// The full graph, answering `init` or a page `refresh`.
    #[serde(alias = "init")]
    Commits {
        /// Refs and history.
        data: Snapshot,
    },
    /// One commit's detail, answering `get_commit`.
    Commit {
        /// Id of the request being answered.
        id: RequestId,
        /// The commit with files and change counts.
        data: Commit,
    },
    /// Tells the page to reload its data.
    Refresh,
    /// A request could not be answered.
    Error {
        /// Id of the failed `get_commit`. Absent for `init` and `refresh`,
        /// and for input that was not a page message at all.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<RequestId>,
        /// User-facing message.
        message: String,
    },
}

/// Hash parameter of `get_commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitParams {
    /// Revision to look up.
    pub hash: String,
}

/// Page to host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageMessage {
    /// The page mounted and wants the graph.
    Init,
    /// The page wants one commit's detail.
    GetCommit {
        /// Echoed in the reply.
        id: RequestId,
        /// What to look up.
        params: CommitParams,
    },
    /// The page asks for the graph again.
    Refresh,
}
