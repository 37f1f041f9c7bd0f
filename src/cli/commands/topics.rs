//! Topic listing command.

use console::style;

use crate::config::Config;

/// Print every topic with the pattern it compiles to.
pub async fn cmd_topics(config: &Config, bilingual: bool) -> anyhow::Result<()> {
    let library = config.pattern_library()?;
    let set = library.select(bilingual);

    println!(
        "\n{} ({} topics{})",
        style("Topics").bold(),
        set.len(),
        if bilingual { ", English + Indonesian" } else { "" }
    );
    println!("{}", "-".repeat(50));
    for matcher in set.matchers() {
        println!(
            "  {:<24} {}",
            style(matcher.topic()).cyan(),
            style(matcher.as_str()).dim()
        );
    }
    Ok(())
}
