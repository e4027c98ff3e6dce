//! Typed routes and their fragment templates.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::program::Message;

const PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Fragment segment of an empty parameter. The encoder writes a literal
/// `%` as `%25`, so no other parameter formats to a bare `%`.
const EMPTY_PARAM: &str = "%";

/// A destination of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Logout,
    Register,
    Settings,
    ArticleCreate,
    ArticleEdit { article_slug: String },
    ArticleView { article_slug: String },
    Profile { username: String },
    ProfileFavorites { username: String },
    NotFound,
}

impl Message for Route {}

/// Fragment template of every route with a URL, one per kind.
/// `:name` segments capture a parameter.
const TEMPLATES: &[(&str, &str)] = &[
    ("Home", "/"),
    ("Login", "/login"),
    ("Logout", "/logout"),
    ("Register", "/register"),
    ("Settings", "/settings"),
    ("ArticleCreate", "/editor"),
    ("ArticleEdit", "/editor/:articleSlug"),
    ("ArticleView", "/article/:articleSlug"),
    ("Profile", "/profile/:username"),
    ("ProfileFavorites", "/profile/:username/favorites"),
];

impl Route {
    /// Name of the route's tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Logout => "Logout",
            Route::Register => "Register",
            Route::Settings => "Settings",
            Route::ArticleCreate => "ArticleCreate",
            Route::ArticleEdit { .. } => "ArticleEdit",
            Route::ArticleView { .. } => "ArticleView",
            Route::Profile { .. } => "Profile",
            Route::ProfileFavorites { .. } => "ProfileFavorites",
            Route::NotFound => "NotFound",
        }
    }

    /// True when both routes have the same tag, whatever their parameters.
    pub fn is_same_kind(&self, other: &Route) -> bool {
        self.kind() == other.kind()
    }

    fn param(&self) -> Option<&str> {
        match self {
            Route::ArticleEdit { article_slug } | Route::ArticleView { article_slug } => {
                Some(article_slug)
            }
            Route::Profile { username } | Route::ProfileFavorites { username } => Some(username),
            _ => None,
        }
    }

    fn from_parts(kind: &str, param: Option<String>) -> Option<Route> {
        let route = match (kind, param) {
            ("Home", None) => Route::Home,
            ("Login", None) => Route::Login,
            ("Logout", None) => Route::Logout,
            ("Register", None) => Route::Register,
            ("Settings", None) => Route::Settings,
            ("ArticleCreate", None) => Route::ArticleCreate,
            ("ArticleEdit", Some(article_slug)) => Route::ArticleEdit { article_slug },
            ("ArticleView", Some(article_slug)) => Route::ArticleView { article_slug },
            ("Profile", Some(username)) => Route::Profile { username },
            ("ProfileFavorites", Some(username)) => Route::ProfileFavorites { username },
            _ => return None,
        };
        Some(route)
    }
}

fn template_for(kind: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, template)| *template)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Matches `path` against one template.
fn match_template(template: &str, path: &str) -> Option<Option<String>> {
    let mut expected = segments(template);
    let mut actual = segments(path);
    let mut param = None;
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return Some(param),
            (Some(pattern), Some(segment)) => {
                if pattern.starts_with(':') {
                    let decoded: Cow<'_, str> = if segment == EMPTY_PARAM {
                        Cow::Borrowed("")
                    } else {
                        percent_decode_str(segment).decode_utf8().ok()?
                    };
                    param = Some(decoded.into_owned());
                } else if pattern != segment {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Parses an in-app fragment such as `/article/how-to-train`.
///
/// A leading `#` and any query string are ignored. Unrecognized paths map
/// to [`Route::NotFound`].
pub fn parse(fragment: &str) -> Route {
    let path = fragment.strip_prefix('#').unwrap_or(fragment);
    let path = path.split('?').next().unwrap_or_default();
    TEMPLATES
        .iter()
        .find_map(|(kind, template)| {
            match_template(template, path).and_then(|param| Route::from_parts(kind, param))
        })
        .unwrap_or(Route::NotFound)
}

/// Formats a route as its in-app fragment. `NotFound` formats as `/404`,
/// which parses back to `NotFound`.
pub fn format(route: &Route) -> String {
    let Some(template) = template_for(route.kind()) else {
        return "/404".to_string();
    };
    let param = route.param().unwrap_or_default();
    let path: Vec<Cow<'_, str>> = segments(template)
        .map(|segment| {
            if segment.starts_with(':') && param.is_empty() {
                Cow::Borrowed(EMPTY_PARAM)
            } else if segment.starts_with(':') {
                Cow::Owned(utf8_percent_encode(param, PARAM).to_string())
            } else {
                Cow::Borrowed(segment)
            }
        })
        .collect();
    format!("/{}", path.join("/"))
}
