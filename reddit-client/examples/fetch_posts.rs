use reddit_client::{ListingClient, SortOrder};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Listing API Manual Test ===\n");

    print!("Enter a subreddit (default: rust): ");
    io::stdout().flush()?;
    let mut subreddit = String::new();
    io::stdin().read_line(&mut subreddit)?;
    let subreddit = subreddit.trim();
    let subreddit = if subreddit.is_empty() { "rust" } else { subreddit };

    let client = ListingClient::new("redditcast/0.1 manual test".to_string());

    println!("\nFetching one page of r/{} (hot)...", subreddit);
    let listing = client.fetch_page(subreddit, SortOrder::Hot, 10, None).await?;
    println!("Got {} posts:", listing.data.children.len());
    for (i, child) in listing.data.children.iter().enumerate() {
        let post = &child.data;
        let kind = if post.has_image_hint() {
            "image"
        } else if !post.selftext.is_empty() {
            "text"
        } else {
            "link"
        };
        println!("  {}. [{}] {} (score {})", i + 1, kind, post.title, post.score);
    }
    println!("Pagination cursor: {:?}", listing.data.after);

    println!("\nSelecting one qualifying post at random...");
    match client.select_post(subreddit, 10, 256).await? {
        Some(post) => {
            println!("Selected: {}", post.title);
            if let Some(url) = &post.image_url {
                println!("  image: {}", url);
            } else {
                let preview: String = post.self_text.chars().take(100).collect();
                println!("  text: {}", preview);
            }
        }
        None => println!("No qualifying post right now."),
    }

    let metrics = client.get_metrics().await;
    println!("\nRequests made: {} ({} ok, {} failed), avg response time {:?}",
        metrics.total_requests,
        metrics.successful_requests,
        metrics.failed_requests,
        metrics.average_response_time,
    );

    Ok(())
}
