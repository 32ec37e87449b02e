//! GitHub issue viewer tool.
//!
//! Fetches an issue (and its comments) from the GitHub REST API and
//! renders it as a plain-text document for the model to summarize.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::Tool;

const API_BASE: &str = "https://api.github.com";
const MAX_RESULT_CHARS: usize = 20000;

/// View a GitHub issue by URL.
pub struct GitHubIssueViewer {
    client: reqwest::Client,
    token: Option<String>,
}

/// Owner/repo/number triple parsed from an issue URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    /// Parse `https://github.com/{owner}/{repo}/issues/{number}`.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let url = Url::parse(raw).map_err(|e| anyhow::anyhow!("Invalid issue URL: {}", e))?;

        if !matches!(url.host_str(), Some("github.com") | Some("www.github.com")) {
            return Err(anyhow::anyhow!("Not a github.com URL: {}", raw));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, "issues", number] => Ok(IssueRef {
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
                number: number
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid issue number: {}", number))?,
            }),
            _ => Err(anyhow::anyhow!(
                "Expected https://github.com/{{owner}}/{{repo}}/issues/{{number}}, got: {}",
                raw
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub user: Author,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Author {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Comment {
    pub user: Author,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GitHubIssueViewer {
    pub fn new(token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("issue-agent/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { client, token })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("GitHub API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    async fn fetch_issue(&self, issue: &IssueRef) -> anyhow::Result<(Issue, Vec<Comment>)> {
        let issue_url = format!(
            "{}/repos/{}/{}/issues/{}",
            API_BASE, issue.owner, issue.repo, issue.number
        );
        let fetched: Issue = self.get_json(&issue_url).await?;

        let comments = if fetched.comments > 0 {
            self.get_json(&format!("{}/comments", issue_url)).await?
        } else {
            Vec::new()
        };

        Ok((fetched, comments))
    }
}

#[async_trait]
impl Tool for GitHubIssueViewer {
    fn name(&self) -> &str {
        "github_issue_viewer"
    }

    fn description(&self) -> &str {
        "View a GitHub issue by URL. Returns the issue title, state, author, labels, body, and all comments as plain text. Use when asked about a specific GitHub issue."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Issue URL, e.g. https://github.com/owner/repo/issues/123"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let url = args["url"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'url' argument"))?;

        let issue_ref = IssueRef::parse(url)?;
        let (issue, comments) = self.fetch_issue(&issue_ref).await?;

        Ok(truncate_result(&render_issue(&issue, &comments)))
    }
}

/// Render an issue and its comments as one plain-text document.
pub(crate) fn render_issue(issue: &Issue, comments: &[Comment]) -> String {
    let mut doc = format!("#{}: {}\n", issue.number, issue.title);

    doc.push_str(&format!(
        "State: {} | Author: {} | Created: {} | Updated: {}\n",
        issue.state,
        issue.user.login,
        issue.created_at.format("%Y-%m-%d %H:%M UTC"),
        issue.updated_at.format("%Y-%m-%d %H:%M UTC"),
    ));

    if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        doc.push_str(&format!("Labels: {}\n", names.join(", ")));
    }

    doc.push_str(&format!("URL: {}\n\n", issue.html_url));
    doc.push_str(issue.body.as_deref().unwrap_or("(no description)"));

    if !comments.is_empty() {
        doc.push_str(&format!("\n\n--- {} comment(s) ---\n", comments.len()));
        for comment in comments {
            doc.push_str(&format!(
                "\n[{} @ {}]\n{}\n",
                comment.user.login,
                comment.created_at.format("%Y-%m-%d %H:%M UTC"),
                comment.body.as_deref().unwrap_or(""),
            ));
        }
    }

    doc
}

fn truncate_result(s: &str) -> String {
    if s.len() <= MAX_RESULT_CHARS {
        return s.to_string();
    }

    // Back off to a char boundary so we never split a UTF-8 sequence.
    let mut idx = MAX_RESULT_CHARS;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    format!("{}... [content truncated]", &s[..idx])
}
