use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The screens of the app. Rendering them is the UI layer's job.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    Home,
    Login,
    ThoughtList,
    ThoughtReader,
    ThoughtComposer,
}

/// What a completed navigation hands to the UI layer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub view: ViewId,
    pub route_name: String,
    pub path: String,
    /// Path params passed to the view, for routes declared with `props: true`.
    pub props: BTreeMap<String, String>,
}
