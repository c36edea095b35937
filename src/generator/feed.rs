//! RSS 2.0 feed generation.

use std::sync::LazyLock;

use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::Post;

#[derive(Debug, Error)]
#[error("RSS validation failed: {0}")]
pub struct FeedError(String);

/// Render the feed for `posts` (already in display order).
pub fn render(config: &SiteConfig, posts: &[Post]) -> Result<String, FeedError> {
    let items: Vec<_> = posts.iter().map(|post| post_to_item(post, config)).collect();

    let channel = ChannelBuilder::default()
        .title(config.site_title.clone())
        .link(config.base_url.clone())
        .description(format!("Latest posts from {}", config.site_title))
        .generator("folio".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError(e.to_string()))?;
    Ok(channel.to_string())
}

fn post_to_item(post: &Post, config: &SiteConfig) -> rss::Item {
    let description = if post.description.is_empty() {
        None
    } else {
        Some(post.description.clone())
    };

    ItemBuilder::default()
        .title(post.title.clone())
        .link(post.full_link.clone())
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(post.full_link.clone())
                .build(),
        )
        .description(description)
        .pub_date(post.parsed_date.map(|d| d.to_rfc2822()))
        .author(rss_author(post, config))
        .build()
}

/// RSS wants `email (Name)`.
fn rss_author(post: &Post, config: &SiteConfig) -> Option<String> {
    static RE_EMAIL: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

    let email = if post.email.is_empty() {
        &config.email
    } else {
        &post.email
    };
    if !RE_EMAIL.is_match(email) {
        return None;
    }
    if post.author.is_empty() {
        Some(email.clone())
    } else {
        Some(format!("{email} ({})", post.author))
    }
}
