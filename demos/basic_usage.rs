//! Basic usage example for the Textbook Catalogue library.
//!
//! Searches the repository by subject and prints the first few records.

use textbook_catalogue::catalogue::CatalogueFetcher;
use textbook_catalogue::models::SearchCriteria;
use textbook_catalogue::utils::field_to_csv;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = CatalogueFetcher::new()?;

    let subject = std::env::args().nth(1).unwrap_or_else(|| "Biology".to_string());
    println!("Searching for textbooks in {}...", subject);

    let result = fetcher.fetch(&SearchCriteria::subject(&subject)).await?;
    println!(
        "Collected {} of {} records\n",
        result.len(),
        result.total_available
    );

    for (i, record) in result.records.iter().take(5).enumerate() {
        let name = record.get("name").and_then(|v| v.as_str()).unwrap_or("?");
        println!("{}. {}", i + 1, name);
    }

    println!("\nTitles: {}", field_to_csv(&result.records[..result.len().min(5)], "name"));

    Ok(())
}
