pub mod api;
pub mod metrics;
pub mod select;

#[cfg(test)]
mod tests;

pub use api::{ListingClient, RedditListing, RedditListingChild, RedditListingData,
    RedditPostData, SortOrder};
pub use select::{filter_page, next_page_cursor, qualifies};
