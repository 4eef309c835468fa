// OMDb client module: a small blocking HTTP client that looks a title up
// on the movie-information service and maps the answer onto the fields
// the catalog stores (year, rating, poster).

use crate::error::LookupError;
use crate::movie::{parse_year, NO_POSTER};
use reqwest::blocking::Client;
use serde::Deserialize;

/// Blocking client holding the reqwest client, the endpoint and the API
/// key sent with every lookup.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Raw response body. OMDb answers with HTTP 200 in both cases and uses
/// `Response: "False"` plus `Error` to signal a failed lookup.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    pub response: String,
    pub error: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub poster: Option<String>,
}

/// What a successful lookup contributes to a catalog entry. The rating
/// is `None` when the service has none ("N/A").
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInfo {
    pub title: Option<String>,
    pub year: i32,
    pub rating: Option<f64>,
    pub poster: String,
}

impl OmdbResponse {
    pub fn into_movie_info(self) -> Result<MovieInfo, LookupError> {
        if !self.response.eq_ignore_ascii_case("true") {
            let msg = self.error.unwrap_or_else(|| "Movie not found!".into());
            return Err(LookupError::NotFound(msg));
        }

        let year_text = self
            .year
            .ok_or_else(|| LookupError::Malformed("missing Year".into()))?;
        let year = parse_year(&year_text)
            .ok_or_else(|| LookupError::Malformed(format!("unparsable Year '{}'", year_text)))?;
        let rating = self
            .imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok());
        let poster = self
            .poster
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| NO_POSTER.into());

        Ok(MovieInfo {
            title: self.title,
            year,
            rating,
            poster,
        })
    }
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, LookupError> {
        let client = Client::builder().build()?;
        Ok(OmdbClient {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// GET `{base_url}?apikey=..&t=<title>` and parse the answer.
    pub fn lookup(&self, title: &str) -> Result<MovieInfo, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        log::info!("looking up '{}' at {}", title, self.base_url);

        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("t", title)])
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            log::warn!("lookup of '{}' failed: {} - {}", title, status, txt);
            return Err(LookupError::Status { status, body: txt });
        }

        let body: OmdbResponse = res.json()?;
        log::debug!("lookup response for '{}': {:?}", title, body);
        body.into_movie_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response on a local port and return
    /// the URL to reach it.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf).unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (url, handle)
    }

    fn parse(json: &str) -> Result<MovieInfo, LookupError> {
        serde_json::from_str::<OmdbResponse>(json)
            .unwrap()
            .into_movie_info()
    }

    #[test]
    fn maps_successful_response() {
        let info = parse(
            r#"{"Title":"Inception","Year":"2010","imdbRating":"8.8",
                "Poster":"https://example.com/inception.jpg","Response":"True"}"#,
        )
        .unwrap();
        assert_eq!(
            info,
            MovieInfo {
                title: Some("Inception".into()),
                year: 2010,
                rating: Some(8.8),
                poster: "https://example.com/inception.jpg".into(),
            }
        );
    }

    #[test]
    fn not_found_sentinel() {
        let err = parse(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap_err();
        match err {
            LookupError::NotFound(msg) => assert_eq!(msg, "Movie not found!"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn other_errors_are_reported_too() {
        let err = parse(r#"{"Response":"False","Error":"Invalid API key!"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid API key!");
    }

    #[test]
    fn series_year_and_missing_rating() {
        let info = parse(r#"{"Year":"2010–2012","imdbRating":"N/A","Poster":"N/A","Response":"True"}"#)
            .unwrap();
        assert_eq!(info.year, 2010);
        assert_eq!(info.rating, None);
        assert_eq!(info.poster, NO_POSTER);
    }

    #[test]
    fn missing_year_is_malformed() {
        let err = parse(r#"{"imdbRating":"7.0","Response":"True"}"#).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[test]
    fn lookup_without_key_fails_early() {
        let client = OmdbClient::new("http://localhost:1", None).unwrap();
        assert!(!client.has_api_key());
        assert!(matches!(client.lookup("Inception"), Err(LookupError::MissingApiKey)));
    }

    #[test]
    fn error_status_is_reported_as_status() {
        let (url, server) = serve_once("503 Service Unavailable", "down");
        let client = OmdbClient::new(url, Some("key".into())).unwrap();
        match client.lookup("Inception") {
            Err(LookupError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn lookup_parses_served_body() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"Title":"Heat","Year":"1995","imdbRating":"8.3","Poster":"N/A","Response":"True"}"#,
        );
        let client = OmdbClient::new(url, Some("key".into())).unwrap();
        let info = client.lookup("Heat").unwrap();
        assert_eq!(info.year, 1995);
        assert_eq!(info.rating, Some(8.3));
        server.join().unwrap();
    }
}
