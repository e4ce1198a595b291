//! Request descriptors for the named catalog queries.

use std::fmt;

/// Ranking filter for the top listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TopFilter {
    #[default]
    All,
    Airing,
    Upcoming,
    ByPopularity,
    Favorite,
}

impl TopFilter {
    pub const ALL: [TopFilter; 5] = [
        TopFilter::All,
        TopFilter::Airing,
        TopFilter::Upcoming,
        TopFilter::ByPopularity,
        TopFilter::Favorite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopFilter::All => "all",
            TopFilter::Airing => "airing",
            TopFilter::Upcoming => "upcoming",
            TopFilter::ByPopularity => "bypopularity",
            TopFilter::Favorite => "favorite",
        }
    }

    /// Value of the `filter` query parameter; `None` means unfiltered
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            TopFilter::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl From<&str> for TopFilter {
    /// Unrecognized names map to [`TopFilter::All`]
    fn from(name: &str) -> Self {
        match name {
            "airing" => TopFilter::Airing,
            "upcoming" => TopFilter::Upcoming,
            "bypopularity" => TopFilter::ByPopularity,
            "favorite" => TopFilter::Favorite,
            _ => TopFilter::All,
        }
    }
}

impl fmt::Display for TopFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream resource, relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Currently airing season
    Seasonal,
    Top(TopFilter),
    /// Ten most recently started airing titles
    Recent,
    Details(String),
    Characters(String),
    Search { query: String, genre: Option<u32> },
    Genres,
}

impl Endpoint {
    /// Path and query string appended to the base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::Seasonal => "/seasons/now".to_string(),
            Endpoint::Top(filter) => match filter.query_value() {
                Some(value) => format!("/top/anime?filter={}", value),
                None => "/top/anime".to_string(),
            },
            Endpoint::Recent => {
                "/anime?order_by=start_date&sort=desc&limit=10&status=airing".to_string()
            }
            Endpoint::Details(id) => format!("/anime/{}/full", id),
            Endpoint::Characters(id) => format!("/anime/{}/characters", id),
            Endpoint::Search { query, genre } => {
                let mut path = format!(
                    "/anime?q={}&sfw=true&limit=20",
                    urlencoding::encode(query)
                );
                // A zero genre id means "any genre"
                if let Some(genre) = genre.filter(|&g| g != 0) {
                    path.push_str(&format!("&genres={}", genre));
                }
                path
            }
            Endpoint::Genres => "/genres/anime".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
