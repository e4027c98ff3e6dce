//! View pieces used by several pages.

use crate::program::{Callback, Dispatch, Message};
use crate::remote::{Article, Profile};
use crate::routing::{Route, Router};
use crate::view::Node;

pub(crate) fn date(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

pub(crate) fn profile_link(profile: &Profile) -> Node {
    Node::link(
        profile.username.clone(),
        Router::href(&Route::Profile {
            username: profile.username.clone(),
        }),
    )
}

/// A tab of a tab list.
pub(crate) struct Tab {
    pub label: String,
    pub active: bool,
    pub on_press: Callback,
}

pub(crate) fn tab_list(tabs: Vec<Tab>) -> Node {
    Node::section(
        "tabs",
        tabs.into_iter()
            .map(|tab| {
                let label = if tab.active {
                    format!("{} *", tab.label)
                } else {
                    tab.label
                };
                Node::button(label, tab.on_press)
            })
            .collect(),
    )
}

/// Article previews with a favorite toggle each.
pub(crate) fn article_list<M>(
    articles: &[Article],
    dispatch: &Dispatch<M>,
    on_favorite: impl Fn(String) -> M,
) -> Node
where
    M: Message + Clone + Sync,
{
    if articles.is_empty() {
        return Node::text("No articles are here... yet.");
    }
    let previews = articles
        .iter()
        .map(|article| {
            let favorite = if article.favorited { "Unfavorite" } else { "Favorite" };
            Node::section(
                "article-preview",
                vec![
                    profile_link(&article.author),
                    Node::text(date(&article.created_at)),
                    Node::button(
                        format!("{favorite} ({})", article.favorites_count),
                        dispatch.trigger(on_favorite(article.slug.clone())),
                    ),
                    Node::link(
                        article.title.clone(),
                        Router::href(&Route::ArticleView {
                            article_slug: article.slug.clone(),
                        }),
                    ),
                    Node::text(article.description.clone()),
                    Node::text(article.tag_list.join(" ")),
                ],
            )
        })
        .collect();
    Node::Fragment(previews)
}

/// Page selector; hidden when everything fits on one page.
pub(crate) fn pagination<M>(
    article_count: u64,
    page_size: u32,
    current: u32,
    dispatch: &Dispatch<M>,
    on_select: impl Fn(u32) -> M,
) -> Node
where
    M: Message + Clone + Sync,
{
    let page_size = u64::from(page_size.max(1));
    let pages = article_count.div_ceil(page_size);
    if pages <= 1 {
        return Node::Empty;
    }
    let buttons = (0..pages)
        .filter_map(|index| u32::try_from(index).ok())
        .map(|index| {
            Node::button((index + 1).to_string(), dispatch.trigger(on_select(index)))
                .disabled(index == current)
        })
        .collect();
    Node::section("pagination", buttons)
}

/// Replaces the article with the same slug.
pub(crate) fn replace_article(articles: &mut [Article], updated: Article) {
    if let Some(slot) = articles.iter_mut().find(|a| a.slug == updated.slug) {
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    struct Select(u32);
    impl Message for Select {}

    #[test]
    fn pagination_counts_pages() {
        let dispatch = Dispatch::new(|_: Select| {});
        assert!(pagination(10, 10, 0, &dispatch, Select).is_empty());
        assert_eq!(pagination(12, 10, 0, &dispatch, Select).controls().len(), 2);
        assert_eq!(pagination(31, 10, 1, &dispatch, Select).controls().len(), 4);
    }

    #[test]
    fn replace_article_matches_slug() {
        let mut articles = vec![
            Article {
                slug: "a".into(),
                ..Article::default()
            },
            Article {
                slug: "b".into(),
                ..Article::default()
            },
        ];
        replace_article(
            &mut articles,
            Article {
                slug: "b".into(),
                favorited: true,
                ..Article::default()
            },
        );
        assert!(!articles[0].favorited);
        assert!(articles[1].favorited);
    }

    #[test]
    fn date_keeps_day_part() {
        assert_eq!(date("2016-02-18T03:22:56.637Z"), "2016-02-18");
        assert_eq!(date("short"), "short");
    }
}
