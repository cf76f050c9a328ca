use crate::model::{ExtractError, Job};
use crate::parser::selector;
use crate::utils::{parse_cn_date, parse_iso_date, split_labels, squash_whitespace};
use chrono::FixedOffset;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

const META_SEPARATOR: char = '：';

pub const LABEL_PROVINCES: &str = "所属省份";
pub const LABEL_LOCATIONS: &str = "工作地点";
pub const LABEL_SUBJECTS: &str = "需求学科";
pub const LABEL_PUBLISHED_AT: &str = "发布时间";
pub const LABEL_EXPIRE_AT: &str = "截止日期";

/// Turns a detail page into a [`Job`].
pub struct DetailParser {
    tz: FixedOffset,
    root: Selector,
    breadcrumb: Selector,
    title: Selector,
    body: Selector,
    meta: Selector,
}

impl DetailParser {
    pub fn new(tz: FixedOffset) -> Result<Self, ExtractError> {
        Ok(Self {
            tz,
            root: selector("body.articleview")?,
            breadcrumb: selector("div.position a")?,
            title: selector("div.article_left.border > h1.title-a")?,
            body: selector("div.article_body")?,
            meta: selector("ul.article_fenlei > li")?,
        })
    }

    pub fn parse(&self, html: &str, url: &str) -> Result<Job, ExtractError> {
        let document = Html::parse_document(html);
        if document.select(&self.root).next().is_none() {
            return Err(ExtractError::NotDetailPage);
        }

        // First breadcrumb entry is the site root.
        let categories = document
            .select(&self.breadcrumb)
            .skip(1)
            .map(|a| squash_whitespace(&text_of(a)))
            .collect();

        let title = squash_whitespace(&joined_text(&document, &self.title));
        let body = joined_text(&document, &self.body).trim().to_string();
        let meta = self.parse_meta(&document, url);

        let labels = |key: &str| meta.get(key).map(|v| split_labels(v)).unwrap_or_default();
        let provinces = labels(LABEL_PROVINCES);
        let locations = labels(LABEL_LOCATIONS);
        let subjects = labels(LABEL_SUBJECTS);

        let published_at = match meta.get(LABEL_PUBLISHED_AT) {
            Some(value) => Some(parse_iso_date(value, &self.tz).ok_or_else(|| {
                ExtractError::InvalidDate {
                    field: LABEL_PUBLISHED_AT,
                    value: value.clone(),
                }
            })?),
            None => None,
        };

        let expire_at = meta.get(LABEL_EXPIRE_AT).and_then(|value| {
            let parsed = parse_cn_date(value, &self.tz);
            if parsed.is_none() {
                debug!(url, value = %value, "unparseable expire date ignored");
            }
            parsed
        });

        Ok(Job {
            url: url.to_string(),
            title,
            categories,
            subjects,
            provinces,
            locations,
            meta,
            published_at,
            expire_at,
            body,
        })
    }

    fn parse_meta(&self, document: &Html, url: &str) -> HashMap<String, String> {
        let mut meta = HashMap::new();
        for li in document.select(&self.meta) {
            let text = text_of(li);
            match text.split_once(META_SEPARATOR) {
                Some((label, value)) => {
                    meta.insert(label.trim().to_string(), value.trim().to_string());
                }
                None => debug!(url, entry = %text.trim(), "metadata entry without separator skipped"),
            }
        }
        meta
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn joined_text(document: &Html, selector: &Selector) -> String {
    document.select(selector).map(text_of).collect()
}
