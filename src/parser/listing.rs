use crate::model::ExtractError;
use crate::parser::selector;
use scraper::Html;
use url::Url;

const JOB_LINK: &str = "ul.last_updated > li > span > a:nth-child(2)";

/// Pulls detail-page links out of the listing page, resolved against `base`.
/// Hrefs that do not resolve to an http(s) URL are dropped.
pub fn parse_listing(html: &str, base: &Url) -> Result<Vec<Url>, ExtractError> {
    let document = Html::parse_document(html);
    let link_selector = selector(JOB_LINK)?;

    let links = document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect();

    Ok(links)
}
