//! Media classification command

use crate::error::CryptResult;
use crate::media::classify;

/// Print the media kind of the first link found in `text`
pub fn handle_classify(text: &str, json: bool) -> CryptResult<()> {
    let content = classify(text);

    if json {
        println!("{}", serde_json::to_string(&content)?);
        return Ok(());
    }

    match content {
        Some(content) => {
            print!("{}\t{}", content.kind, content.url);
            if let Some(id) = content.id {
                print!("\t{}", id);
            }
            println!();
        }
        None => println!("none"),
    }
    Ok(())
}
