use crate::api::{ListingClient, RedditListing, RedditPostData, SortOrder};
use redditcast_core::{BroadcastError, RedditPost};
use tracing::debug;

/// A post is a candidate when it carries an image hint, or a non-empty
/// self-text no longer than the configured bound.
pub fn qualifies(post: &RedditPostData, max_text_length: usize) -> bool {
    if post.has_image_hint() {
        return true;
    }
    let text_length = post.selftext.chars().count();
    text_length > 0 && text_length <= max_text_length
}

/// Unwrap a listing page into its qualifying posts.
pub fn filter_page(
    listing: RedditListing<RedditPostData>,
    max_text_length: usize,
) -> Vec<RedditPostData> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| child.data)
        .filter(|post| qualifies(post, max_text_length))
        .collect()
}

/// Cursor for the follow-up fetch, present only when page one left the
/// candidate set short and the listing offered a continuation.
pub fn next_page_cursor(
    filtered_len: usize,
    fetch_count: u32,
    after: Option<String>,
) -> Option<String> {
    if (filtered_len as u32) < fetch_count {
        after
    } else {
        None
    }
}

impl ListingClient {
    /// Pick one qualifying post, uniformly at random, from up to two listing
    /// pages. `Ok(None)` means no suitable post exists right now; the caller
    /// skips silently.
    pub async fn select_post(
        &self,
        subreddit: &str,
        fetch_count: u32,
        max_text_length: usize,
    ) -> Result<Option<RedditPost>, BroadcastError> {
        let sort = SortOrder::choose_random();
        let page = self.fetch_page(subreddit, sort, fetch_count, None).await?;
        let after = page.data.after.clone();
        let mut candidates = filter_page(page, max_text_length);

        if let Some(cursor) = next_page_cursor(candidates.len(), fetch_count, after) {
            debug!(
                "Only {} candidates on page one of r/{}, following cursor",
                candidates.len(),
                subreddit
            );
            let next_page = self
                .fetch_page(subreddit, sort, fetch_count, Some(&cursor))
                .await?;
            candidates.extend(filter_page(next_page, max_text_length));
        }

        if candidates.is_empty() {
            debug!("No qualifying posts in r/{} ({})", subreddit, sort.as_str());
            return Ok(None);
        }

        let pick = fastrand::usize(..candidates.len());
        Ok(Some(candidates.swap_remove(pick).into()))
    }
}
