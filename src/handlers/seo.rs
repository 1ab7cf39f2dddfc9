//! Crawler directives.
//!
//! - GET /robots.txt
//! - GET /sitemap.xml
//!
//! Both are built from `SITE_URL`, so a deployment behind a different
//! domain only needs the environment changed.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use url::Url;

use crate::state::AppState;

/// Paths crawlers must not index.
const DISALLOWED: [&str; 5] = ["/admin", "/api", "/_next", "/uploads", "/data"];

/// Public pages listed in the sitemap.
const PAGES: [&str; 2] = ["/", "/about"];

/// `SITE_URL` without a trailing slash or path, e.g. `https://example.org`.
fn site_base(site_url: &str) -> String {
    match Url::parse(site_url.trim()) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(_) => site_url.trim().trim_end_matches('/').to_string(),
    }
}

pub fn robots_txt(site_url: &str) -> String {
    let base = site_base(site_url);
    let mut out = String::from("User-Agent: *\nAllow: /\n");
    for path in DISALLOWED {
        out.push_str(&format!("Disallow: {path}\n"));
    }
    out.push_str(&format!("\nHost: {base}\nSitemap: {base}/sitemap.xml\n"));
    out
}

pub fn sitemap_xml(site_url: &str, last_modified: chrono::DateTime<chrono::Utc>) -> String {
    let base = site_base(site_url);
    let lastmod = last_modified.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in PAGES {
        out.push_str(&format!(
            "<url>\n<loc>{base}{page}</loc>\n<lastmod>{lastmod}</lastmod>\n</url>\n"
        ));
    }
    out.push_str("</urlset>\n");
    out
}

/// # Endpoint
///
/// `GET /robots.txt`
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.site_url),
    )
}

/// # Endpoint
///
/// `GET /sitemap.xml`
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        sitemap_xml(&state.config.site_url, chrono::Utc::now()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_lists_rules_host_and_sitemap() {
        let robots = robots_txt("https://example.org/");
        assert!(robots.contains("Allow: /\n"));
        for path in DISALLOWED {
            assert!(robots.contains(&format!("Disallow: {path}\n")), "{path}");
        }
        assert!(robots.contains("Host: https://example.org\n"));
        assert!(robots.contains("Sitemap: https://example.org/sitemap.xml\n"));
    }

    #[test]
    fn sitemap_lists_pages_under_site_url() {
        let xml = sitemap_xml("http://localhost:3000", chrono::DateTime::from_timestamp(0, 0).unwrap());
        assert!(xml.contains("<loc>http://localhost:3000/</loc>"));
        assert!(xml.contains("<loc>http://localhost:3000/about</loc>"));
        assert!(xml.contains("<lastmod>1970-01-01T00:00:00Z</lastmod>"));
    }

    #[test]
    fn unparsable_site_url_is_used_as_is() {
        assert_eq!(site_base("example.org/"), "example.org");
    }
}
