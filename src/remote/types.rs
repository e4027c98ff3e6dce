//! Wire types of the JSON API.
//!
//! Every field defaults when absent, so partial payloads decode instead of
//! failing the whole response.

use serde::{Deserialize, Serialize};

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewer {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Public profile of any user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub following: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub favorited: bool,
    pub favorites_count: u64,
    pub author: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub author: Profile,
}

/// One page of articles plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleList {
    pub articles: Vec<Article>,
    pub articles_count: u64,
}

/// Filters and pagination for article lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ArticleQuery {
    /// Query for page `page_index` of `page_size` articles.
    pub fn page(page_index: u32, page_size: u32) -> Self {
        Self {
            limit: Some(page_size),
            offset: Some(page_index.saturating_mul(page_size)),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_favorited(mut self, username: impl Into<String>) -> Self {
        self.favorited = Some(username.into());
        self
    }

    /// Query-string pairs, skipping unset filters.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let filters = [
            ("tag", &self.tag),
            ("author", &self.author),
            ("favorited", &self.favorited),
        ];
        for (name, value) in filters {
            if let Some(value) = value {
                pairs.push((name.to_string(), value.clone()));
            }
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Changes to the viewer's settings. A `None` password is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewerUpdate {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Editable article fields, for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct UserEnvelope {
    pub user: Viewer,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct ProfileEnvelope {
    pub profile: Profile,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct ArticleEnvelope {
    pub article: Article,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct CommentEnvelope {
    pub comment: Comment,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct CommentsEnvelope {
    pub comments: Vec<Comment>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub(crate) struct TagsEnvelope {
    pub tags: Vec<String>,
}
