extern crate reqwest;

use player::Track;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        MissingConfig(config_path: &'static str) {
            display("No audio service is configured ({})", config_path)
        }
        NoResults(query: String) {
            display("No results for \"{}\"", query)
        }
        Request(err: reqwest::Error) {
            from()
            display("Service request failed")
        }
        UnexpectedStatus(status: reqwest::StatusCode) {
            display("Service responded with {}", status)
        }
    }
}

/// Turns a URL or a free-text query into playable track references.
/// URLs are checked with a HEAD request; queries go to the configured
/// search endpoint, which answers with a JSON array of hits.
pub struct Resolver {
    search_url: Option<String>,
}

impl Resolver {
    pub fn new(search_url: Option<String>) -> Resolver {
        Resolver {
            search_url: search_url,
        }
    }

    pub fn resolve(&self, query: &str) -> Result<Vec<Track>, Error> {
        if query.starts_with("http://") || query.starts_with("https://") {
            self.resolve_url(query)
        } else {
            self.search(query)
        }
    }

    fn resolve_url(&self, url: &str) -> Result<Vec<Track>, Error> {
        let res = reqwest::blocking::Client::new().head(url).send()?;

        if !res.status().is_success() {
            return Err(Error::UnexpectedStatus(res.status()));
        }

        Ok(vec![Track {
            name: track_name_from_url(url),
            url: url.to_string(),
        }])
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, Error> {
        #[derive(Deserialize)]
        struct Hit {
            title: String,
            url: String,
        }

        let search_url = self.search_url
            .as_ref()
            .ok_or(Error::MissingConfig("service.search_url"))?;

        let res = reqwest::blocking::Client::new()
            .get(search_url)
            .query(&[("q", query)])
            .send()?;

        if !res.status().is_success() {
            return Err(Error::UnexpectedStatus(res.status()));
        }

        let hits: Vec<Hit> = res.json()?;

        if hits.is_empty() {
            return Err(Error::NoResults(query.to_string()));
        }

        Ok(hits.into_iter()
            .map(|hit| Track {
                name: hit.title,
                url: hit.url,
            })
            .collect())
    }
}

fn track_name_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| url.to_string())
}
