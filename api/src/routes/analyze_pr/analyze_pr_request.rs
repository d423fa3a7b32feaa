use serde::Deserialize;

/// Request body for triggering a pull-request analysis.
///
/// Sent by CI hooks or manual curl calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePrRequest {
    /// Owner of the GitHub repository.
    pub owner: String,
    /// Name of the GitHub repository.
    pub repo: String,
    /// Pull request number.
    pub pr_number: u64,
}

/// Optional query parameters for the analyze endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePrQuery {
    /// When present, the model is asked to include a code snippet per issue.
    pub code_snippet: Option<String>,
}
