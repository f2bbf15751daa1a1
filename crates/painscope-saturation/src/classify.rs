//! Competitor-domain classification for search results.
//!
//! A result counts as a SaaS competitor unless its host is a forum, blog,
//! documentation site, social network, news or review outlet, code host, or
//! an institutional (`.gov` / `.edu`) domain.

use reqwest::Url;

/// Hosts (and their subdomains) that are never competitors.
const NON_COMPETITOR_DOMAINS: &[&str] = &[
    "reddit.com",
    "quora.com",
    "medium.com",
    "substack.com",
    "wordpress.com",
    "blogspot.com",
    "youtube.com",
    "wikipedia.org",
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "pinterest.com",
    "github.com",
    "gitlab.com",
    "stackoverflow.com",
    "stackexchange.com",
    "news.ycombinator.com",
    "ycombinator.com",
    "producthunt.com",
    "indiehackers.com",
    "g2.com",
    "capterra.com",
    "getapp.com",
    "trustpilot.com",
    "softwareadvice.com",
    "forbes.com",
    "techcrunch.com",
    "businessinsider.com",
    "nytimes.com",
    "hubspot.com/blog",
    "investopedia.com",
];

/// Leading host labels that mark content rather than product sites.
const NON_COMPETITOR_SUBDOMAINS: &[&str] = &[
    "blog", "blogs", "docs", "help", "support", "forum", "forums", "community", "dev", "news",
    "wiki", "learn",
];

const NON_COMPETITOR_TLDS: &[&str] = &[".gov", ".edu", ".mil"];

/// Registrable-ish host of `url`, lowercased with any `www.` prefix removed.
///
/// Returns `None` for unparseable URLs or URLs without a host.
#[must_use]
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Whether the page at `url` looks like a commercial SaaS product site.
#[must_use]
pub fn is_saas_competitor(url: &str) -> bool {
    let Some(host) = domain_of(url) else {
        return false;
    };

    if NON_COMPETITOR_TLDS.iter().any(|tld| host.ends_with(tld)) {
        return false;
    }

    let on_listed_domain = NON_COMPETITOR_DOMAINS.iter().any(|domain| {
        match domain.split_once('/') {
            Some((listed_host, listed_path)) => {
                host == listed_host && path_starts_with(url, listed_path)
            }
            None => host == *domain || host.ends_with(&format!(".{domain}")),
        }
    });
    if on_listed_domain {
        return false;
    }

    let first_label = host.split('.').next().unwrap_or_default();
    let has_content_subdomain =
        host.matches('.').count() >= 2 && NON_COMPETITOR_SUBDOMAINS.contains(&first_label);
    if has_content_subdomain {
        return false;
    }

    // Content paths on an otherwise commercial host.
    !["blog", "forum", "community", "docs"]
        .iter()
        .any(|segment| path_starts_with(url, segment))
}

fn path_starts_with(url: &str, segment: &str) -> bool {
    Url::parse(url).ok().is_some_and(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .is_some_and(|first| first.eq_ignore_ascii_case(segment))
    })
}
