//! Start-up routes, in the same shape as the web catalog's links:
//! `/`, `/?search=term`, `/?filter=name`, `/watch/:id`. Anything else lands
//! on the catalog.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog {
        search: Option<String>,
        /// Accepted for link compatibility, not acted on
        filter: Option<String>,
    },
    Watch {
        id: u64,
    },
}

impl Default for Route {
    fn default() -> Self {
        Route::Catalog {
            search: None,
            filter: None,
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

impl Route {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input.strip_prefix('#').unwrap_or(input);

        let (path, query) = match input.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (input, None),
        };
        let path = path.trim_end_matches('/');

        if path.is_empty() {
            let mut search = None;
            let mut filter = None;

            for pair in query.unwrap_or("").split('&') {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                match key {
                    "search" => {
                        let term = decode_component(value);
                        search = (!term.trim().is_empty()).then_some(term);
                    }
                    "filter" => filter = Some(decode_component(value)),
                    _ => {}
                }
            }

            return Route::Catalog { search, filter };
        }

        if let Some(id) = path.strip_prefix("/watch/") {
            if let Ok(id) = id.parse::<u64>() {
                if id > 0 {
                    return Route::Watch { id };
                }
            }
        }

        Route::default()
    }

    pub fn path(&self) -> String {
        match self {
            Route::Catalog {
                search: Some(term), ..
            } => format!("/?search={}", urlencoding::encode(term)),
            Route::Catalog {
                filter: Some(filter),
                ..
            } => format!("/?filter={}", urlencoding::encode(filter)),
            Route::Catalog { .. } => "/".to_string(),
            Route::Watch { id } => format!("/watch/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(search: Option<&str>, filter: Option<&str>) -> Route {
        Route::Catalog {
            search: search.map(str::to_string),
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn test_root() {
        assert_eq!(Route::parse("/"), Route::default());
        assert_eq!(Route::parse(""), Route::default());
        assert_eq!(Route::parse("#/"), Route::default());
    }

    #[test]
    fn test_search_is_decoded() {
        assert_eq!(
            Route::parse("/?search=one%20piece"),
            catalog(Some("one piece"), None)
        );
        assert_eq!(
            Route::parse("#/?search=attack+on+titan"),
            catalog(Some("attack on titan"), None)
        );
        assert_eq!(Route::parse("/?search=T%C3%B3quio"), catalog(Some("Tóquio"), None));
    }

    #[test]
    fn test_blank_search_is_absent() {
        assert_eq!(Route::parse("/?search="), Route::default());
        assert_eq!(Route::parse("/?search=%20%20"), Route::default());
    }

    #[test]
    fn test_filter_is_kept() {
        assert_eq!(Route::parse("/?filter=trending"), catalog(None, Some("trending")));
        assert_eq!(
            Route::parse("/?filter=new&search=frieren"),
            catalog(Some("frieren"), Some("new"))
        );
    }

    #[test]
    fn test_watch() {
        assert_eq!(Route::parse("/watch/21"), Route::Watch { id: 21 });
        assert_eq!(Route::parse("#/watch/154587/"), Route::Watch { id: 154587 });
    }

    #[test]
    fn test_unknown_redirects_to_catalog() {
        assert_eq!(Route::parse("/watch/abc"), Route::default());
        assert_eq!(Route::parse("/watch/0"), Route::default());
        assert_eq!(Route::parse("/watch/"), Route::default());
        assert_eq!(Route::parse("/settings"), Route::default());
        assert_eq!(Route::parse("/watch/21/extra"), Route::default());
    }

    #[test]
    fn test_path() {
        assert_eq!(Route::default().path(), "/");
        assert_eq!(Route::Watch { id: 21 }.path(), "/watch/21");
        assert_eq!(
            catalog(Some("one piece"), None).path(),
            "/?search=one%20piece"
        );
        assert_eq!(catalog(None, Some("new")).path(), "/?filter=new");
    }
}
