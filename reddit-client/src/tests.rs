use crate::api::{ListingClient, RedditListing, RedditPostData, SortOrder};
use crate::select::{filter_page, next_page_cursor, qualifies};
use redditcast_core::{BroadcastError, RedditPost};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Minimal HTTP fixture answering successive requests with successive bodies,
/// so pagination tests can serve distinct pages.
async fn serve_pages(bodies: Vec<String>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture addr");
    let bodies = Arc::new(Mutex::new(VecDeque::from(bodies)));
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = bodies.lock().unwrap().pop_front().unwrap_or_default();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });
    format!("http://{}", addr)
}

fn text_post(title: &str, selftext: &str) -> RedditPostData {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "selftext": selftext,
        "subreddit": "test",
        "url": "https://reddit.com/r/test/comments/abc",
    }))
    .expect("valid post fixture")
}

fn image_post(title: &str, url: &str) -> RedditPostData {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "subreddit": "test",
        "url": url,
        "post_hint": "image",
    }))
    .expect("valid post fixture")
}

#[test]
fn test_sort_order_strings() {
    assert_eq!(SortOrder::Hot.as_str(), "hot");
    assert_eq!(SortOrder::Rising.as_str(), "rising");
}

#[test]
fn test_random_sort_is_one_of_the_two_options() {
    for _ in 0..32 {
        let sort = SortOrder::choose_random();
        assert!(matches!(sort, SortOrder::Hot | SortOrder::Rising));
    }
}

#[test]
fn test_qualifies_image_hint() {
    let post = image_post("t", "https://i.redd.it/abc.jpg");
    assert!(qualifies(&post, 256));
    // Image posts qualify regardless of the text bound
    assert!(qualifies(&post, 0));
}

#[test]
fn test_qualifies_text_bounds() {
    assert!(qualifies(&text_post("t", "short enough"), 256));
    assert!(!qualifies(&text_post("t", ""), 256));
    assert!(!qualifies(&text_post("t", "0123456789"), 9));
    // Boundary: length exactly at the bound still qualifies
    assert!(qualifies(&text_post("t", "0123456789"), 10));
}

#[test]
fn test_qualifies_counts_characters_not_bytes() {
    let post = text_post("t", "héllo");
    assert!(qualifies(&post, 5));
}

#[test]
fn test_listing_fixture_parses_and_filters() {
    // Shape taken from the live listing endpoint
    let listing: RedditListing<RedditPostData> = serde_json::from_value(serde_json::json!({
        "data": {
            "children": [
                {"data": {"post_hint": "image", "url": "u", "subreddit": "r", "title": "t"}}
            ],
            "after": null
        }
    }))
    .expect("listing fixture parses");

    assert!(listing.data.after.is_none());
    let candidates = filter_page(listing, 256);
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].has_image_hint());
    assert_eq!(candidates[0].url, "u");

    // With fetch_count=1 satisfied, no follow-up fetch is requested
    assert_eq!(next_page_cursor(candidates.len(), 1, None), None);
}

#[test]
fn test_filter_page_drops_unqualified_posts() {
    let listing: RedditListing<RedditPostData> = serde_json::from_value(serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "image", "subreddit": "r", "url": "u", "post_hint": "image"}},
                {"data": {"title": "texty", "subreddit": "r", "selftext": "hello"}},
                {"data": {"title": "link only", "subreddit": "r", "url": "https://example.com"}},
                {"data": {"title": "too long", "subreddit": "r", "selftext": "x".repeat(300)}}
            ],
            "after": "t3_cursor"
        }
    }))
    .expect("listing fixture parses");

    let candidates = filter_page(listing, 256);
    let titles: Vec<&str> = candidates.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["image", "texty"]);
}

#[test]
fn test_next_page_cursor_only_when_short_and_available() {
    let cursor = Some("t3_abc".to_string());
    assert_eq!(next_page_cursor(3, 10, cursor.clone()), cursor);
    assert_eq!(next_page_cursor(10, 10, cursor.clone()), None);
    assert_eq!(next_page_cursor(12, 10, cursor), None);
    assert_eq!(next_page_cursor(3, 10, None), None);
}

#[test]
fn test_post_conversion_image_branch() {
    let post: RedditPost = image_post("t", "https://i.redd.it/abc.jpg").into();
    assert!(post.is_image());
    assert_eq!(post.image_url.as_deref(), Some("https://i.redd.it/abc.jpg"));
}

#[test]
fn test_post_conversion_text_branch() {
    let post: RedditPost = text_post("Hi", "world").into();
    assert!(!post.is_image());
    assert_eq!(post.title, "Hi");
    assert_eq!(post.self_text, "world");
    assert_eq!(post.image_url, None);
}

#[tokio::test]
async fn test_client_creation() {
    let client = ListingClient::new("redditcast/0.1 test".to_string());
    assert_eq!(client.user_agent(), "redditcast/0.1 test");

    let metrics = client.get_metrics().await;
    assert_eq!(metrics.total_requests, 0);
}

#[tokio::test]
async fn test_fetch_failure_is_recorded_and_typed() {
    // Nothing listens on the discard port, so the connection is refused
    let client = ListingClient::with_base_url(
        "redditcast/0.1 test".to_string(),
        "http://127.0.0.1:9".to_string(),
    );

    let result = client.fetch_page("rust", SortOrder::Hot, 5, None).await;
    assert!(matches!(result, Err(BroadcastError::Network(_))));

    let metrics = client.get_metrics().await;
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.failed_requests, 1);
    assert_eq!(metrics.last_status_code, None);
}

#[tokio::test]
async fn test_select_post_returns_none_for_empty_candidate_set() {
    // One link post, no text and no image hint: nothing qualifies
    let body = serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "link only", "subreddit": "rust", "url": "https://example.com"}}
            ],
            "after": null
        }
    })
    .to_string();
    let base = serve_pages(vec![body]).await;
    let client = ListingClient::with_base_url("redditcast/0.1 test".to_string(), base);

    let result = client.select_post("rust", 5, 256).await.expect("fetch succeeds");
    assert!(result.is_none());

    // No cursor on page one, so no follow-up fetch either
    let metrics = client.get_metrics().await;
    assert_eq!(metrics.total_requests, 1);
}

#[tokio::test]
async fn test_select_post_follows_cursor_when_page_one_is_short() {
    let page_one = serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "first", "selftext": "hello", "subreddit": "rust"}}
            ],
            "after": "t3_cursor"
        }
    })
    .to_string();
    let page_two = serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "second", "selftext": "world", "subreddit": "rust"}}
            ],
            "after": null
        }
    })
    .to_string();
    let base = serve_pages(vec![page_one, page_two]).await;
    let client = ListingClient::with_base_url("redditcast/0.1 test".to_string(), base);

    let post = client
        .select_post("rust", 5, 256)
        .await
        .expect("fetch succeeds")
        .expect("a candidate exists");
    // The pick is uniform over both pages' candidates
    assert!(post.title == "first" || post.title == "second");

    let metrics = client.get_metrics().await;
    assert_eq!(metrics.total_requests, 2);
}

#[tokio::test]
async fn test_select_post_can_pick_from_page_two_only() {
    // Page one has a cursor but no qualifying post, so the selection must
    // come from the appended second page
    let page_one = serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "link only", "subreddit": "rust", "url": "https://example.com"}}
            ],
            "after": "t3_cursor"
        }
    })
    .to_string();
    let page_two = serde_json::json!({
        "data": {
            "children": [
                {"data": {"title": "second", "selftext": "world", "subreddit": "rust"}}
            ],
            "after": null
        }
    })
    .to_string();
    let base = serve_pages(vec![page_one, page_two]).await;
    let client = ListingClient::with_base_url("redditcast/0.1 test".to_string(), base);

    let post = client
        .select_post("rust", 5, 256)
        .await
        .expect("fetch succeeds")
        .expect("a candidate exists");
    assert_eq!(post.title, "second");
}

#[test]
fn test_select_post_propagates_fetch_errors() {
    let client = ListingClient::with_base_url(
        "redditcast/0.1 test".to_string(),
        "http://127.0.0.1:9".to_string(),
    );

    let result = tokio_test::block_on(client.select_post("rust", 5, 256));
    assert!(result.is_err());
}
