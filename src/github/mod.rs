// github-archive: GitHub Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST API client.
//!
//! ```text
//! Context      endpoint                          assets
//! Personal     GET /user/repos?affiliation=owner  repos (token)
//! User         GET /users/{owner}/repos           repos
//! Org          GET /orgs/{owner}/repos            repos
//! Star         GET /users/{owner}/starred         repos
//! Gist         GET /users/{owner}/gists           gists
//!
//! fork         POST /repos/{owner}/{name}/forks   (token)
//!              POST /gists/{id}/forks             (token)
//! ```
//!
//! One page of up to 100 items is read per owner.


use futures_util::future::BoxFuture;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

use crate::archive::Forker;
use crate::asset::{AssetKind, GitAsset};
use crate::config::Config;
use crate::config::types::non_blank_token;
use crate::error::{ArchiveResult, GithubError};

const PER_PAGE: u32 = 100;
const ACCEPT: &str = "application/vnd.github+json";

/// Where assets are enumerated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Repositories owned by the authenticated user, private ones included.
    Personal,
    User,
    Org,
    Star,
    Gist,
}

impl Context {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => "personal repos",
            Self::User => "user repos",
            Self::Org => "org repos",
            Self::Star => "starred repos",
            Self::Gist => "gists",
        }
    }

    #[must_use]
    pub const fn asset_kind(self) -> AssetKind {
        match self {
            Self::Gist => AssetKind::Gist,
            Self::Personal | Self::User | Self::Org | Self::Star => AssetKind::Repository,
        }
    }

    fn path(self, owner: &str) -> String {
        match self {
            Self::Personal => format!("/user/repos?affiliation=owner&per_page={PER_PAGE}"),
            Self::User => format!("/users/{owner}/repos?per_page={PER_PAGE}"),
            Self::Org => format!("/orgs/{owner}/repos?per_page={PER_PAGE}"),
            Self::Star => format!("/users/{owner}/starred?per_page={PER_PAGE}"),
            Self::Gist => format!("/users/{owner}/gists?per_page={PER_PAGE}"),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    owner: OwnerResponse,
    #[serde(default)]
    fork: bool,
    language: Option<String>,
    ssh_url: String,
    html_url: String,
}

impl From<RepoResponse> for GitAsset {
    fn from(repo: RepoResponse) -> Self {
        Self::repository(repo.owner.login, repo.name, repo.ssh_url, repo.html_url)
            .with_fork(repo.fork)
            .with_language(repo.language)
    }
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    owner: Option<OwnerResponse>,
    html_url: String,
}

impl GistResponse {
    fn into_asset(self, queried_owner: &str) -> GitAsset {
        let owner = self
            .owner
            .map_or_else(|| queried_owner.to_string(), |owner| owner.login);
        GitAsset::gist(owner, self.id, self.html_url)
    }
}

/// Thin client over the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    include_forks: bool,
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("authenticated", &self.token.is_some())
            .field("include_forks", &self.include_forks)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Creates a client for `api_url`, authenticated when a token is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> ArchiveResult<Self> {
        let client = Client::builder()
            .user_agent(format!("github-archive/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GithubError::Request)?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.and_then(non_blank_token),
            include_forks: false,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> ArchiveResult<Self> {
        Ok(Self::new(&config.github.api_url, config.github.token.clone())?
            .with_forks(config.archive.forks))
    }

    /// Keeps forked repositories in enumeration results.
    #[must_use]
    pub const fn with_forks(mut self, include_forks: bool) -> Self {
        self.include_forks = include_forks;
        self
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Login of the token's owner, lowercased.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::TokenRequired` without a token, or any request error.
    pub async fn authenticated_login(&self) -> ArchiveResult<String> {
        if self.token.is_none() {
            return Err(GithubError::TokenRequired("look up the authenticated user".into()).into());
        }
        let owner: OwnerResponse = self.get_json("/user").await?;
        Ok(owner.login.to_lowercase())
    }

    /// Enumerates the assets of every owner in `owners` for `context`.
    ///
    /// The personal context ignores `owners` and needs a token. Forks are
    /// dropped unless enabled with [`Self::with_forks`]. Results are sorted
    /// by owner, then name.
    ///
    /// # Errors
    ///
    /// Returns the first request or decode error.
    pub async fn list_assets(
        &self,
        context: Context,
        owners: &[String],
    ) -> ArchiveResult<Vec<GitAsset>> {
        let mut assets = Vec::new();

        if context == Context::Personal {
            if self.token.is_none() {
                return Err(GithubError::TokenRequired("list personal repos".into()).into());
            }
            let repos: Vec<RepoResponse> = self.get_json(&context.path("")).await?;
            debug!(count = repos.len(), "personal repos retrieved");
            assets.extend(repos.into_iter().map(GitAsset::from));
        } else {
            for owner in owners {
                let owner = owner.trim();
                if context == Context::Gist {
                    let gists: Vec<GistResponse> = self.get_json(&context.path(owner)).await?;
                    debug!(owner, count = gists.len(), "gists retrieved");
                    assets.extend(gists.into_iter().map(|gist| gist.into_asset(owner)));
                } else {
                    let repos: Vec<RepoResponse> = self.get_json(&context.path(owner)).await?;
                    debug!(owner, count = repos.len(), %context, "retrieved");
                    assets.extend(repos.into_iter().map(GitAsset::from));
                }
            }
        }

        if !self.include_forks {
            assets.retain(|asset| !asset.is_fork());
        }
        assets.sort_by(|a, b| {
            (a.owner_login(), a.name_or_id()).cmp(&(b.owner_login(), b.name_or_id()))
        });
        Ok(assets)
    }

    /// Forks a repository or gist into the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::TokenRequired` without a token, or
    /// `GithubError::ForkFailed` if GitHub rejects the request.
    pub async fn fork_asset(&self, asset: &GitAsset) -> ArchiveResult<()> {
        if self.token.is_none() {
            return Err(GithubError::TokenRequired("fork".into()).into());
        }

        let path = match asset.kind() {
            AssetKind::Repository => {
                format!("/repos/{}/{}/forks", asset.owner_login(), asset.name_or_id())
            }
            AssetKind::Gist => format!("/gists/{}/forks", asset.name_or_id()),
        };

        let response = self
            .authorize(self.client.post(self.url(&path)))
            .send()
            .await
            .map_err(GithubError::Request)?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(GithubError::ForkFailed {
            asset: asset.full_name(),
            message: format!("{status}: {body}"),
        }
        .into())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", ACCEPT);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ArchiveResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(GithubError::Request)?;
        let response = check_status(response, &url)?;

        Ok(response.json::<T>().await.map_err(GithubError::Request)?)
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GithubError::HttpError {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

impl Forker for GithubClient {
    fn fork<'a>(&'a self, asset: &'a GitAsset) -> BoxFuture<'a, ArchiveResult<()>> {
        Box::pin(self.fork_asset(asset))
    }
}
